//! progress-charts: aggregation and chart geometry for a student progress
//! dashboard.
//!
//! Raw GraphQL records are normalized once (`model`), reduced into series
//! (`aggregate`), projected through linear scales (`core`) into drawable
//! primitives (`chart`) and assembled per fetch into a serializable frame
//! (`api`). Nothing here performs I/O or reads the wall clock.

pub mod aggregate;
pub mod api;
pub mod chart;
pub mod core;
pub mod error;
pub mod model;
pub mod telemetry;

pub use api::{DashboardConfig, DashboardFrame, DashboardSnapshot, build_dashboard};
pub use error::{ChartError, ChartResult};
