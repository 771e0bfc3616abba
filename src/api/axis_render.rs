use smallvec::SmallVec;

use crate::api::PlotStyle;
use crate::core::{Axis, AxisPosition, AxisTicks, ScreenPoint, ScreenRect};
use crate::render::{RenderContext, StrokeStyle, TextHAlign, TextStyle, TextVAlign};

type SegmentBatch = SmallVec<[ScreenPoint; 64]>;

const GRIDLINE_THICKNESS: f64 = 1.0;
const AXIS_LINE_THICKNESS: f64 = 1.0;
// Ticks this close to the band ends still count as inside.
const BAND_EPSILON_PX: f64 = 0.5;

/// Edge coordinate and outward unit direction of an axis along its normal.
fn edge_geometry(position: AxisPosition, plot_area: ScreenRect) -> Option<(f64, f64)> {
    match position {
        AxisPosition::Bottom => Some((plot_area.bottom(), 1.0)),
        AxisPosition::Top => Some((plot_area.top, -1.0)),
        AxisPosition::Left => Some((plot_area.left, -1.0)),
        AxisPosition::Right => Some((plot_area.right(), 1.0)),
        AxisPosition::None => None,
    }
}

/// Screen coordinates of `values` that fall inside the axis band.
fn band_coordinates(axis: &Axis, values: &[f64]) -> SmallVec<[f64; 32]> {
    let (start, end) = axis.screen_band();
    let (low, high) = (start.min(end) - BAND_EPSILON_PX, start.max(end) + BAND_EPSILON_PX);
    values
        .iter()
        .map(|value| axis.to_screen(*value))
        .filter(|screen| screen.is_finite() && *screen >= low && *screen <= high)
        .collect()
}

/// Builds a point with `along` on the axis direction and `across` on its normal.
fn oriented(axis: &Axis, along: f64, across: f64) -> ScreenPoint {
    if axis.is_vertical() {
        ScreenPoint::new(across, along)
    } else {
        ScreenPoint::new(along, across)
    }
}

/// Gridlines spanning the plot area; drawn before series.
pub(crate) fn render_gridlines(
    axis: &Axis,
    ticks: &AxisTicks,
    plot_area: ScreenRect,
    rc: &mut dyn RenderContext,
) {
    if axis.position() == AxisPosition::None {
        return;
    }
    let appearance = axis.appearance();
    let (across_start, across_end) = if axis.is_vertical() {
        (plot_area.left, plot_area.right())
    } else {
        (plot_area.top, plot_area.bottom())
    };

    let passes = [
        (
            appearance.show_minor_gridlines,
            &ticks.minor,
            appearance.minor_gridline_color,
        ),
        (
            appearance.show_major_gridlines,
            &ticks.major,
            appearance.major_gridline_color,
        ),
    ];
    for (enabled, values, color) in passes {
        if !enabled || !color.is_visible() {
            continue;
        }
        let mut batch = SegmentBatch::new();
        for along in band_coordinates(axis, values) {
            batch.push(oriented(axis, along, across_start));
            batch.push(oriented(axis, along, across_end));
        }
        if !batch.is_empty() {
            rc.draw_line_segments(&batch, StrokeStyle::new(color, GRIDLINE_THICKNESS));
        }
    }
}

/// Axis line, tick marks, tick labels and title.
pub(crate) fn render_axis(
    axis: &Axis,
    ticks: &AxisTicks,
    plot_area: ScreenRect,
    style: &PlotStyle,
    rc: &mut dyn RenderContext,
) {
    let Some((edge, direction)) = edge_geometry(axis.position(), plot_area) else {
        return;
    };
    let appearance = axis.appearance();
    let (band_start, band_end) = axis.screen_band();

    rc.draw_line(
        &[
            oriented(axis, band_start, edge),
            oriented(axis, band_end, edge),
        ],
        StrokeStyle::new(appearance.axis_line_color, AXIS_LINE_THICKNESS),
    );

    let (inside, outside) = axis.tick_style().extents(appearance.tick_length_px);
    let major = band_coordinates(axis, &ticks.major);
    if inside + outside > 0.0 {
        let minor_length = 0.5;
        let mut batch = SegmentBatch::new();
        for along in &major {
            batch.push(oriented(axis, *along, edge - direction * inside));
            batch.push(oriented(axis, *along, edge + direction * outside));
        }
        for along in band_coordinates(axis, &ticks.minor) {
            batch.push(oriented(axis, along, edge - direction * inside * minor_length));
            batch.push(oriented(axis, along, edge + direction * outside * minor_length));
        }
        rc.draw_line_segments(&batch, StrokeStyle::new(appearance.tick_color, AXIS_LINE_THICKNESS));
    }

    let (h_align, v_align) = match axis.position() {
        AxisPosition::Bottom => (TextHAlign::Center, TextVAlign::Top),
        AxisPosition::Top => (TextHAlign::Center, TextVAlign::Bottom),
        AxisPosition::Left => (TextHAlign::Right, TextVAlign::Middle),
        AxisPosition::Right | AxisPosition::None => (TextHAlign::Left, TextVAlign::Middle),
    };
    let label_style =
        TextStyle::new(appearance.text_color, appearance.font_size_px).aligned(h_align, v_align);
    let label_offset = edge + direction * (outside + style.axis_label_gap_px);

    let mut label_extent: f64 = 0.0;
    for (value, along) in ticks
        .major
        .iter()
        .map(|value| (*value, axis.to_screen(*value)))
        .filter(|(_, along)| major.contains(along))
    {
        let text = axis.format_label(value, ticks.major_step);
        if text.is_empty() {
            continue;
        }
        let (width, height) = rc.measure_text(&text, appearance.font_size_px);
        label_extent = label_extent.max(if axis.is_vertical() { width } else { height });
        rc.draw_text(oriented(axis, along, label_offset), &text, label_style);
    }

    if let Some(title) = axis.title().filter(|title| !title.is_empty()) {
        let across = label_offset + direction * (label_extent + style.axis_label_gap_px);
        let along = 0.5 * (band_start + band_end);
        rc.draw_text(oriented(axis, along, across), title, label_style);
    }
}

#[cfg(test)]
mod tests {
    use super::{render_axis, render_gridlines};
    use crate::api::PlotStyle;
    use crate::core::{Axis, AxisAppearance, AxisPosition, ScreenRect};
    use crate::render::{DrawCommand, RenderFrame};

    fn bottom_axis(plot_area: ScreenRect) -> Axis {
        let mut axis = Axis::new(AxisPosition::Bottom)
            .with_title("Time")
            .with_range(Some(0.0), Some(10.0))
            .expect("range");
        axis.update_actual_range();
        axis.update_transform(plot_area);
        axis
    }

    #[test]
    fn bottom_axis_draws_labels_below_the_edge() {
        let plot_area = ScreenRect::new(50.0, 20.0, 400.0, 300.0);
        let axis = bottom_axis(plot_area);
        let mut frame = RenderFrame::new(500.0, 400.0);
        render_axis(&axis, &axis.ticks(), plot_area, &PlotStyle::default(), &mut frame);

        assert!(frame.contains_text("Time"));
        assert!(frame.contains_text("0"));
        let below_edge = frame.commands().iter().all(|command| match command {
            DrawCommand::Text { position, .. } => position.y > plot_area.bottom(),
            _ => true,
        });
        assert!(below_edge);
    }

    #[test]
    fn gridlines_are_drawn_only_when_enabled() {
        let plot_area = ScreenRect::new(0.0, 0.0, 400.0, 300.0);
        let mut axis = bottom_axis(plot_area);
        let mut frame = RenderFrame::new(400.0, 300.0);
        render_gridlines(&axis, &axis.ticks(), plot_area, &mut frame);
        assert!(frame.is_empty());

        axis.set_appearance(AxisAppearance {
            show_major_gridlines: true,
            ..AxisAppearance::default()
        })
        .expect("appearance");
        render_gridlines(&axis, &axis.ticks(), plot_area, &mut frame);
        assert!(frame.lines().count() >= 2);
        assert!(frame
            .lines()
            .all(|line| (line[0].y - 0.0).abs() <= 1e-9 && (line[1].y - 300.0).abs() <= 1e-9));
    }
}
