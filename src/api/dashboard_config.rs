use serde::{Deserialize, Serialize};

use crate::aggregate::{MAX_RECENT_DAYS, ZeroReceivedRatio};
use crate::chart::DEFAULT_MAX_BARS;
use crate::core::{ExtentTuning, PlotArea, PlotMargins, Viewport};
use crate::error::{ChartError, ChartResult};

/// Dashboard layout and aggregation policy.
///
/// This type is serializable so host applications can persist/load the setup
/// without inventing their own ad-hoc format. Every field has a default, so a
/// partial JSON object is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub margins: PlotMargins,
    #[serde(default = "default_max_bars")]
    pub max_bars: usize,
    #[serde(default)]
    pub extent_tuning: ExtentTuning,
    #[serde(default)]
    pub zero_received_ratio: ZeroReceivedRatio,
    #[serde(default = "default_recent_days")]
    pub recent_days: u32,
    #[serde(default = "default_donut_inner_radius_ratio")]
    pub donut_inner_radius_ratio: f64,
    #[serde(default = "default_axis_tick_spacing_px")]
    pub axis_tick_spacing_px: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl DashboardConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            margins: PlotMargins::default(),
            max_bars: default_max_bars(),
            extent_tuning: ExtentTuning::default(),
            zero_received_ratio: ZeroReceivedRatio::default(),
            recent_days: default_recent_days(),
            donut_inner_radius_ratio: default_donut_inner_radius_ratio(),
            axis_tick_spacing_px: default_axis_tick_spacing_px(),
        }
    }

    #[must_use]
    pub fn with_margins(mut self, margins: PlotMargins) -> Self {
        self.margins = margins;
        self
    }

    /// Caps the number of bars in category charts.
    #[must_use]
    pub fn with_max_bars(mut self, max_bars: usize) -> Self {
        self.max_bars = max_bars;
        self
    }

    #[must_use]
    pub fn with_extent_tuning(mut self, tuning: ExtentTuning) -> Self {
        self.extent_tuning = tuning;
        self
    }

    /// Sets the audit ratio reported while nothing has been received.
    #[must_use]
    pub fn with_zero_received_ratio(mut self, policy: ZeroReceivedRatio) -> Self {
        self.zero_received_ratio = policy;
        self
    }

    /// Sets the length of the recent-activity window, in days.
    #[must_use]
    pub fn with_recent_days(mut self, days: u32) -> Self {
        self.recent_days = days;
        self
    }

    #[must_use]
    pub fn with_donut_inner_radius_ratio(mut self, ratio: f64) -> Self {
        self.donut_inner_radius_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_axis_tick_spacing_px(mut self, spacing_px: f64) -> Self {
        self.axis_tick_spacing_px = spacing_px;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        self.plot_area()?;
        self.extent_tuning.validate()?;
        self.zero_received_ratio.validate()?;

        if self.max_bars == 0 {
            return Err(ChartError::InvalidData("max bars must be >= 1".to_owned()));
        }
        if !(1..=MAX_RECENT_DAYS).contains(&self.recent_days) {
            return Err(ChartError::InvalidData(format!(
                "recent activity window must be between 1 and {MAX_RECENT_DAYS} days"
            )));
        }
        if !self.donut_inner_radius_ratio.is_finite()
            || !(0.0..1.0).contains(&self.donut_inner_radius_ratio)
        {
            return Err(ChartError::InvalidData(
                "donut inner radius ratio must be finite and in [0, 1)".to_owned(),
            ));
        }
        if !self.axis_tick_spacing_px.is_finite() || self.axis_tick_spacing_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "axis tick spacing must be finite and > 0".to_owned(),
            ));
        }

        Ok(self)
    }

    pub fn plot_area(self) -> ChartResult<PlotArea> {
        PlotArea::from_viewport(self.viewport, self.margins)
    }

    /// Parses and validates a JSON config.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config json: {e}")))?;
        config.validate()
    }

    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config json: {e}")))
    }
}

fn default_max_bars() -> usize {
    DEFAULT_MAX_BARS
}

fn default_recent_days() -> u32 {
    14
}

fn default_donut_inner_radius_ratio() -> f64 {
    0.6
}

fn default_axis_tick_spacing_px() -> f64 {
    64.0
}
