use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(640, 320)
    }
}

/// Point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

impl ChartPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Space reserved around the plot for axes and labels, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotMargins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl PlotMargins {
    #[must_use]
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (side, value) in [
            ("left", self.left),
            ("right", self.right),
            ("top", self.top),
            ("bottom", self.bottom),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "plot margin `{side}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }
}

impl Default for PlotMargins {
    fn default() -> Self {
        Self::new(56.0, 16.0, 16.0, 32.0)
    }
}

/// Drawable rectangle left over once margins are removed from the viewport.
///
/// Y grows downwards, as in SVG.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn from_viewport(viewport: Viewport, margins: PlotMargins) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let margins = margins.validate()?;

        let left = margins.left;
        let top = margins.top;
        let right = f64::from(viewport.width) - margins.right;
        let bottom = f64::from(viewport.height) - margins.bottom;
        if right <= left || bottom <= top {
            return Err(ChartError::InvalidData(format!(
                "plot margins leave no drawable area in a {}x{} viewport",
                viewport.width, viewport.height
            )));
        }

        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn center(self) -> ChartPoint {
        ChartPoint::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// Horizontal pixel range, left to right.
    #[must_use]
    pub fn x_range(self) -> (f64, f64) {
        (self.left, self.right)
    }

    /// Vertical pixel range, bottom to top, so larger values sit higher.
    #[must_use]
    pub fn y_range(self) -> (f64, f64) {
        (self.bottom, self.top)
    }
}
