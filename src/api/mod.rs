mod axis_render;
mod hit_test;
mod layout;
mod model;
mod model_render;
mod model_update;
mod plot_style;
mod view;

pub use hit_test::{ElementKind, ElementRef, HitTestResult};
pub use layout::PlotLayout;
pub use model::PlotModel;
pub use plot_style::PlotStyle;
pub use view::{CursorType, HeadlessPlotView, PlotView};
