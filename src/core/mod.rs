pub mod annotations;
pub mod axis;
pub mod axis_label_format;
pub mod element;
pub mod line_series;
pub mod primitives;
pub mod scatter_series;
pub mod ticks;
pub mod transform;
pub mod types;
pub mod windowing;

pub use annotations::{LineAnnotation, LineAnnotationKind, RectangleAnnotation, TextAnnotation};
pub use axis::{
    Axis, AxisAppearance, AxisHandle, AxisPosition, AxisTuning, DEFAULT_AXIS_RANGE, TickStyle,
};
pub use axis_label_format::AxisLabelFormat;
pub use element::{Annotation, ElementHit, PlotElement, Series, TrackerHitResult};
pub use line_series::LineSeries;
pub use scatter_series::ScatterSeries;
pub use ticks::AxisTicks;
pub use transform::{AxisScaleKind, AxisTransform, XyTransform};
pub use types::{DataPoint, DataRect, ElementId, ModelId, ScreenPoint, ScreenRect, Thickness};
