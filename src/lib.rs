//! plotcore: interactive 2D plot model.
//!
//! A `PlotModel` owns axes, series and annotations, turns them into
//! screen-space geometry through a pluggable `RenderContext`, answers
//! hit-test queries, and is driven by a `PlotController` that maps input
//! gestures to commands.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{HeadlessPlotView, PlotModel, PlotView};
pub use error::{PlotError, PlotResult};
pub use interaction::PlotController;
