use std::f64::consts::FRAC_PI_2;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::aggregate::{CategoryTotal, DateBucket, MonthlyAuditPoint};
use crate::chart::{
    AxisTick, Bar, DonutGeometry, DonutSegments, MIN_LINE_POINTS, MIN_RADAR_CATEGORIES,
    RadarPoint, bar_slot_scale, build_axis_ticks, build_bar_series, build_donut_segments,
    build_radar_points, build_ring_segments, build_time_series, closed_path, donut_segment_path,
    format_amount, format_day_millis, format_percentage, format_ratio, hidden_bar_count,
    polyline_path, radar_spokes,
};
use crate::core::{
    ChartPoint, ExtentTuning, LinearScale, PlotArea, ScaleValue, Viewport, axis_tick_count,
    infer_extent, infer_extent_tuned, make_linear_scale,
};
use crate::error::ChartResult;
use crate::model::DashboardInput;

use super::{DashboardConfig, DashboardSnapshot};

pub const AUDIT_DONE_LABEL: &str = "Done";
pub const AUDIT_RECEIVED_LABEL: &str = "Received";

const MIN_AXIS_TICKS: usize = 2;
const MAX_AXIS_TICKS: usize = 8;
const BAR_FILL_RATIO: f64 = 0.8;

/// One dashboard panel: drawable geometry or the reason there is none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartPanel<T> {
    Ready { chart: T },
    NotEnoughData { required: usize, available: usize },
    NoData,
}

impl<T> ChartPanel<T> {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    #[must_use]
    pub fn chart(&self) -> Option<&T> {
        match self {
            Self::Ready { chart } => Some(chart),
            _ => None,
        }
    }

    fn gated(available: usize, required: usize, build: impl FnOnce() -> T) -> Self {
        if available == 0 {
            Self::NoData
        } else if available < required {
            Self::NotEnoughData {
                required,
                available,
            }
        } else {
            Self::Ready { chart: build() }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub points: Vec<ChartPoint>,
    pub path: String,
    pub x_ticks: Vec<AxisTick>,
    pub y_ticks: Vec<AxisTick>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub bars: Vec<Bar>,
    /// Categories left out by the bar cap.
    pub hidden_count: usize,
    pub y_ticks: Vec<AxisTick>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutChart {
    pub geometry: DonutGeometry,
    pub segments: DonutSegments,
    /// One SVG path per segment, same order.
    pub paths: SmallVec<[String; 2]>,
    /// Centre text.
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarChart {
    pub center: ChartPoint,
    pub radius: f64,
    /// Vertices in plot coordinates.
    pub points: Vec<RadarPoint>,
    /// Outer axis ends in plot coordinates.
    pub spokes: Vec<ChartPoint>,
    pub path: String,
}

/// Every dashboard panel projected into one viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardFrame {
    pub generated_at: DateTime<Utc>,
    pub viewport: Viewport,
    pub plot_area: PlotArea,
    pub xp_progress: ChartPanel<LineChart>,
    pub recent_activity: ChartPanel<LineChart>,
    pub xp_by_project: ChartPanel<BarChart>,
    pub audit_history: ChartPanel<LineChart>,
    pub audit_balance: ChartPanel<DonutChart>,
    pub pass_rate: ChartPanel<DonutChart>,
    pub skills: ChartPanel<RadarChart>,
}

impl DashboardFrame {
    /// Projects a snapshot. Fails only on an invalid config.
    pub fn build(snapshot: &DashboardSnapshot, config: &DashboardConfig) -> ChartResult<Self> {
        let config = config.validate()?;
        let plot = config.plot_area()?;
        let tuning = config.extent_tuning;
        let spacing = config.axis_tick_spacing_px;

        let xp_progress = ChartPanel::gated(snapshot.xp_by_date.len(), MIN_LINE_POINTS, || {
            day_line_chart(
                &snapshot.xp_by_date,
                |bucket: &DateBucket| bucket.date,
                |bucket| bucket.cumulative_amount,
                format_amount,
                LineLayout::new(plot, tuning, spacing),
            )
        });

        let recent_active = if snapshot.recent_activity_total() > 0.0 {
            snapshot.recent_activity.len()
        } else {
            0
        };
        let recent_activity = ChartPanel::gated(recent_active, MIN_LINE_POINTS, || {
            day_line_chart(
                &snapshot.recent_activity,
                |bucket: &DateBucket| bucket.date,
                |bucket| bucket.amount,
                format_amount,
                LineLayout::new(plot, tuning, spacing),
            )
        });

        let xp_by_project = ChartPanel::gated(snapshot.xp_by_project.len(), 1, || {
            bar_chart(&snapshot.xp_by_project, config.max_bars, plot, tuning, spacing)
        });

        let audit_history = ChartPanel::gated(snapshot.audit.history.len(), MIN_LINE_POINTS, || {
            day_line_chart(
                &snapshot.audit.history,
                |point: &MonthlyAuditPoint| point.date,
                |point| point.ratio,
                format_ratio,
                LineLayout::new(plot, tuning, spacing),
            )
        });

        let donut = donut_geometry(plot, config.donut_inner_radius_ratio);
        let audit = &snapshot.audit;
        let audit_segments = build_ring_segments(&[
            (AUDIT_DONE_LABEL, audit.done_amount),
            (AUDIT_RECEIVED_LABEL, audit.received_amount),
        ]);
        let audit_balance = ChartPanel::gated(audit_segments.len(), 1, || {
            donut_chart(audit_segments, donut, format_ratio(audit.ratio))
        });

        let pass = &snapshot.pass_rate;
        let pass_segments = build_donut_segments(pass.passed as f64, pass.failed as f64);
        let pass_rate = ChartPanel::gated(pass_segments.len(), 1, || {
            donut_chart(pass_segments, donut, format_percentage(pass.success_rate))
        });

        let skills = ChartPanel::gated(snapshot.skills.len(), MIN_RADAR_CATEGORIES, || {
            radar_chart(&snapshot.skills, plot)
        });

        let frame = Self {
            generated_at: snapshot.generated_at,
            viewport: config.viewport,
            plot_area: plot,
            xp_progress,
            recent_activity,
            xp_by_project,
            audit_history,
            audit_balance,
            pass_rate,
            skills,
        };

        debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            ready_panels = frame.ready_panel_count(),
            "built dashboard frame"
        );
        Ok(frame)
    }

    #[must_use]
    pub fn ready_panel_count(&self) -> usize {
        [
            self.xp_progress.is_ready(),
            self.recent_activity.is_ready(),
            self.xp_by_project.is_ready(),
            self.audit_history.is_ready(),
            self.audit_balance.is_ready(),
            self.pass_rate.is_ready(),
            self.skills.is_ready(),
        ]
        .into_iter()
        .filter(|ready| *ready)
        .count()
    }
}

/// Snapshot and frame in one call, calendar grouping in local time.
pub fn build_dashboard(
    input: &DashboardInput,
    config: &DashboardConfig,
    now: DateTime<Utc>,
) -> ChartResult<DashboardFrame> {
    build_dashboard_in(input, config, now, &Local)
}

pub fn build_dashboard_in<Tz: TimeZone>(
    input: &DashboardInput,
    config: &DashboardConfig,
    now: DateTime<Utc>,
    tz: &Tz,
) -> ChartResult<DashboardFrame> {
    let config = config.validate()?;
    let snapshot = DashboardSnapshot::build_in(input, &config, now, tz);
    DashboardFrame::build(&snapshot, &config)
}

#[derive(Debug, Clone, Copy)]
struct LineLayout {
    plot: PlotArea,
    tuning: ExtentTuning,
    tick_spacing_px: f64,
}

impl LineLayout {
    fn new(plot: PlotArea, tuning: ExtentTuning, tick_spacing_px: f64) -> Self {
        Self {
            plot,
            tuning,
            tick_spacing_px,
        }
    }

    fn tick_count(self, span_px: f64) -> usize {
        axis_tick_count(span_px, self.tick_spacing_px, MIN_AXIS_TICKS, MAX_AXIS_TICKS)
    }
}

/// Value axis anchored at zero so bars and areas share a baseline.
fn value_scale(values: &[f64], tuning: ExtentTuning, range: (f64, f64)) -> LinearScale {
    let (start, end) = infer_extent_tuned(values, tuning).bounds();
    make_linear_scale((start.min(0.0), end), range)
}

fn day_line_chart<S>(
    samples: &[S],
    day_of: impl Fn(&S) -> NaiveDate,
    value_of: impl Fn(&S) -> f64,
    value_label: fn(f64) -> String,
    layout: LineLayout,
) -> LineChart {
    let plot = layout.plot;
    let days: Vec<NaiveDate> = samples.iter().map(&day_of).collect();
    let values: Vec<f64> = samples.iter().map(&value_of).collect();

    let x_scale = make_linear_scale(infer_extent(&days).as_domain(), plot.x_range());
    let y_scale = value_scale(&values, layout.tuning, plot.y_range());

    let points = build_time_series(
        samples,
        |sample| ScaleValue::Day(day_of(sample)),
        &value_of,
        x_scale,
        y_scale,
    );

    LineChart {
        path: polyline_path(&points).unwrap_or_default(),
        x_ticks: build_axis_ticks(x_scale, layout.tick_count(plot.width()), format_day_millis),
        y_ticks: build_axis_ticks(y_scale, layout.tick_count(plot.height()), value_label),
        points,
    }
}

fn bar_chart(
    totals: &[CategoryTotal],
    max_bars: usize,
    plot: PlotArea,
    tuning: ExtentTuning,
    tick_spacing_px: f64,
) -> BarChart {
    let shown = totals.len().min(max_bars);
    let amounts: Vec<f64> = totals.iter().map(|total| total.amount).collect();
    let x_scale = bar_slot_scale(shown, plot.x_range());
    let y_scale = value_scale(&amounts, tuning, plot.y_range());
    let slot_width = plot.width();

    let bars = build_bar_series(
        totals,
        x_scale,
        y_scale,
        |count| slot_width / count.max(1) as f64 * BAR_FILL_RATIO,
        max_bars,
    );
    let tick_count = axis_tick_count(
        plot.height(),
        tick_spacing_px,
        MIN_AXIS_TICKS,
        MAX_AXIS_TICKS,
    );

    BarChart {
        bars,
        hidden_count: hidden_bar_count(totals.len(), max_bars),
        y_ticks: build_axis_ticks(y_scale, tick_count, format_amount),
    }
}

fn donut_geometry(plot: PlotArea, inner_radius_ratio: f64) -> DonutGeometry {
    let outer_radius = plot.width().min(plot.height()) * 0.5;
    DonutGeometry {
        center: plot.center(),
        outer_radius,
        inner_radius: outer_radius * inner_radius_ratio,
        rotation: -FRAC_PI_2,
    }
}

fn donut_chart(segments: DonutSegments, geometry: DonutGeometry, caption: String) -> DonutChart {
    let paths = segments
        .iter()
        .map(|segment| donut_segment_path(segment, geometry))
        .collect();
    DonutChart {
        geometry,
        segments,
        paths,
        caption,
    }
}

fn radar_chart(categories: &[CategoryTotal], plot: PlotArea) -> RadarChart {
    let center = plot.center();
    let radius = plot.width().min(plot.height()) * 0.5;
    let amounts: Vec<f64> = categories.iter().map(|category| category.amount).collect();
    let (_, peak) = infer_extent(&amounts).bounds();
    let scale = make_linear_scale((0.0, peak), (0.0, radius));

    let points: Vec<RadarPoint> = build_radar_points(categories, scale)
        .into_iter()
        .map(|point| RadarPoint {
            x: point.x + center.x,
            y: point.y + center.y,
            ..point
        })
        .collect();
    let vertices: Vec<ChartPoint> = points.iter().map(RadarPoint::position).collect();
    let spokes = radar_spokes(categories.len(), radius)
        .into_iter()
        .map(|spoke| spoke.translated(center.x, center.y))
        .collect();

    RadarChart {
        center,
        radius,
        path: closed_path(&vertices).unwrap_or_default(),
        points,
        spokes,
    }
}
