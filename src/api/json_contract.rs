use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

use super::{DashboardFrame, DashboardSnapshot};

pub const DASHBOARD_FRAME_JSON_SCHEMA_V1: u32 = 1;
pub const DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardFrameJsonContractV1 {
    pub schema_version: u32,
    pub frame: DashboardFrame,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: DashboardSnapshot,
}

impl DashboardFrame {
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize frame json: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = DashboardFrameJsonContractV1 {
            schema_version: DASHBOARD_FRAME_JSON_SCHEMA_V1,
            frame: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize frame contract v1: {e}"))
        })
    }

    /// Accepts both the bare frame and the versioned v1 envelope.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(frame) = serde_json::from_str::<DashboardFrame>(input) {
            return Ok(frame);
        }
        let payload: DashboardFrameJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse frame json payload: {e}"))
        })?;
        if payload.schema_version != DASHBOARD_FRAME_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported frame schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.frame)
    }
}

impl DashboardSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = DashboardSnapshotJsonContractV1 {
            schema_version: DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<DashboardSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: DashboardSnapshotJsonContractV1 =
            serde_json::from_str(input).map_err(|e| {
                ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
            })?;
        if payload.schema_version != DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
