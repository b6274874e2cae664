//! Dashboard assembly: configuration, the per-fetch snapshot and the
//! renderer-agnostic frame handed to the presentation layer.

mod dashboard_config;
mod dashboard_frame;
mod dashboard_snapshot;
mod json_contract;

pub use dashboard_config::DashboardConfig;
pub use dashboard_frame::{
    AUDIT_DONE_LABEL, AUDIT_RECEIVED_LABEL, BarChart, ChartPanel, DashboardFrame, DonutChart,
    LineChart, RadarChart, build_dashboard, build_dashboard_in,
};
pub use dashboard_snapshot::DashboardSnapshot;
pub use json_contract::{
    DASHBOARD_FRAME_JSON_SCHEMA_V1, DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1,
    DashboardFrameJsonContractV1, DashboardSnapshotJsonContractV1,
};
