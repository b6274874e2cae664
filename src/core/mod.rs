pub mod primitives;
pub mod scale;
pub mod types;

pub use scale::{
    Extent, ExtentTuning, LinearScale, ScaleValue, axis_tick_count, infer_extent,
    infer_extent_tuned, make_linear_scale,
};
pub use types::{ChartPoint, PlotArea, PlotMargins, Viewport};
