use crate::api::PlotStyle;
use crate::core::{Axis, AxisHandle, AxisPosition, ScreenRect, Thickness};
use crate::render::RenderContext;

/// Geometry resolved by the last render pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlotLayout {
    pub bounds: ScreenRect,
    /// Area above the plot holding title and subtitle; zero height without titles.
    pub title_area: ScreenRect,
    /// Space reserved around the plot area for axes, per edge.
    pub axis_margins: Thickness,
    pub plot_area: ScreenRect,
}

/// Space an axis needs perpendicular to its edge: ticks, labels and title.
pub(crate) fn axis_desired_size(
    axis: &Axis,
    style: &PlotStyle,
    rc: &mut dyn RenderContext,
) -> f64 {
    if axis.position() == AxisPosition::None {
        return 0.0;
    }
    let appearance = axis.appearance();
    let (_, outside) = axis.tick_style().extents(appearance.tick_length_px);
    let gap = style.axis_label_gap_px;

    let ticks = axis.ticks();
    let (minimum, maximum) = axis.actual_range();
    let mut label_width: f64 = 0.0;
    let mut label_height: f64 = 0.0;
    let labels = if ticks.major.is_empty() {
        vec![minimum, maximum]
    } else {
        ticks.major.clone()
    };
    for value in labels {
        let text = axis.format_label(value, ticks.major_step);
        if text.is_empty() {
            continue;
        }
        let (width, height) = rc.measure_text(&text, appearance.font_size_px);
        label_width = label_width.max(width);
        label_height = label_height.max(height);
    }

    let label_extent = if axis.is_vertical() {
        label_width
    } else {
        label_height
    };
    let title_extent = axis
        .title()
        .filter(|title| !title.is_empty())
        .map_or(0.0, |title| {
            rc.measure_text(title, appearance.font_size_px).1 + gap
        });

    outside + gap + label_extent + title_extent
}

/// Splits `bounds` into title area, axis margins and plot area.
///
/// Every rectangle collapses to zero size instead of inverting when the
/// bounds are too small.
pub(crate) fn compute_layout(
    bounds: ScreenRect,
    style: &PlotStyle,
    titles: (Option<&str>, Option<&str>),
    axes: &[AxisHandle],
    rc: &mut dyn RenderContext,
) -> PlotLayout {
    let inner = bounds.deflate(style.padding);

    let mut title_height = 0.0;
    if titles.0.is_some_and(|title| !title.is_empty()) {
        title_height += style.title_font_size_px;
    }
    if titles.1.is_some_and(|subtitle| !subtitle.is_empty()) {
        title_height += style.subtitle_font_size_px;
    }
    if title_height > 0.0 {
        title_height += style.title_gap_px;
    }
    let title_area = ScreenRect::new(
        inner.left,
        inner.top,
        inner.width,
        title_height.min(inner.height),
    );

    let mut margins = Thickness::default();
    for axis in axes {
        let Some(axis) = axis.try_borrow() else {
            continue;
        };
        let size = axis_desired_size(&axis, style, rc);
        let edge = match axis.position() {
            AxisPosition::Left => &mut margins.left,
            AxisPosition::Right => &mut margins.right,
            AxisPosition::Top => &mut margins.top,
            AxisPosition::Bottom => &mut margins.bottom,
            AxisPosition::None => continue,
        };
        *edge = edge.max(size);
    }

    let below_title = ScreenRect::new(
        inner.left,
        inner.top + title_area.height,
        inner.width,
        inner.height - title_area.height,
    );
    PlotLayout {
        bounds,
        title_area,
        axis_margins: margins,
        plot_area: below_title.deflate(margins),
    }
}
