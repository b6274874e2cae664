//! Chart data builders: aggregated series in, drawable primitives out.
//!
//! Nothing in this module touches a rendering API; the output is plain data
//! that any SVG, canvas or native backend can draw.

pub mod axis;
pub mod bar;
pub mod donut;
pub mod labels;
pub mod line;
pub mod path;
pub mod radar;

pub use axis::{AxisTick, build_axis_ticks};
pub use bar::{Bar, DEFAULT_MAX_BARS, bar_slot_scale, build_bar_series, hidden_bar_count};
pub use donut::{
    DonutSegment, DonutSegments, FAILED_LABEL, PASSED_LABEL, build_donut_segments,
    build_ring_segments,
};
pub use labels::{format_amount, format_day, format_day_millis, format_percentage, format_ratio};
pub use line::{
    LineSegment, MIN_LINE_POINTS, build_line_series, build_time_series,
    has_enough_points_for_line, line_segments,
};
pub use path::{DonutGeometry, closed_path, donut_segment_path, format_coordinate, polyline_path};
pub use radar::{MIN_RADAR_CATEGORIES, RadarPoint, build_radar_points, radar_spokes};
