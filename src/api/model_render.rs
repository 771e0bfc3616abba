use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::api::axis_render::{render_axis, render_gridlines};
use crate::api::layout::compute_layout;
use crate::api::PlotModel;
use crate::core::{AxisTicks, PlotElement, ScreenPoint, ScreenRect};
use crate::render::{Color, RenderContext, StrokeStyle, TextHAlign, TextStyle, TextVAlign};

impl PlotModel {
    /// Draws the model into `rc` over a `width` x `height` surface.
    ///
    /// Paint order: background, titles, plot-area background, element
    /// backgrounds, gridlines, axes, plot-area border, series, annotations.
    /// Sizes that are non-finite or below `ScreenRect::MIN_EXTENT` draw nothing.
    /// The axis ranges come from the last `update`; only the transforms are
    /// refreshed for the new layout.
    pub fn render(&mut self, rc: &mut dyn RenderContext, width: f64, height: f64) {
        if !width.is_finite()
            || !height.is_finite()
            || width < ScreenRect::MIN_EXTENT
            || height < ScreenRect::MIN_EXTENT
        {
            debug!(width, height, "skipping render of degenerate surface");
            return;
        }

        let bounds = ScreenRect::new(0.0, 0.0, width, height);
        self.layout = compute_layout(
            bounds,
            &self.style,
            (self.title.as_deref(), self.subtitle.as_deref()),
            &self.axes,
            rc,
        );
        let plot_area = self.layout.plot_area;
        for axis in &self.axes {
            if let Some(mut axis) = axis.try_borrow_mut() {
                axis.update_transform(plot_area);
            }
        }

        let style = self.style;
        if style.background.is_visible() {
            rc.draw_rectangle(bounds, style.background, StrokeStyle::NONE);
        }
        self.render_titles(rc);

        if plot_area.is_degenerate() {
            debug!(?plot_area, "plot area collapsed; skipping axes and elements");
            return;
        }

        if style.plot_area_background.is_visible() {
            rc.draw_rectangle(plot_area, style.plot_area_background, StrokeStyle::NONE);
        }
        for series in &self.series {
            self.render_element_background(series.as_ref(), rc);
        }
        for annotation in &self.annotations {
            self.render_element_background(annotation.as_ref(), rc);
        }

        let ticks: SmallVec<[AxisTicks; 4]> = self
            .axes
            .iter()
            .map(|axis| axis.try_borrow().map(|axis| axis.ticks()).unwrap_or_default())
            .collect();
        for (axis, ticks) in self.axes.iter().zip(&ticks) {
            if let Some(axis) = axis.try_borrow() {
                render_gridlines(&axis, ticks, plot_area, rc);
            }
        }
        for (axis, ticks) in self.axes.iter().zip(&ticks) {
            if let Some(axis) = axis.try_borrow() {
                render_axis(&axis, ticks, plot_area, &style, rc);
            }
        }

        if style.plot_area_border_thickness > 0.0 && style.plot_area_border_color.is_visible() {
            rc.draw_rectangle(
                plot_area,
                Color::TRANSPARENT,
                StrokeStyle::new(style.plot_area_border_color, style.plot_area_border_thickness),
            );
        }

        // Elements are taken out so they can be rendered mutably while the
        // model resolves their axes.
        let mut series = std::mem::take(&mut self.series);
        for element in &mut series {
            self.render_element(element.as_mut(), rc);
        }
        self.series = series;

        let mut annotations = std::mem::take(&mut self.annotations);
        for element in &mut annotations {
            self.render_element(element.as_mut(), rc);
        }
        self.annotations = annotations;

        rc.reset_clip();
        trace!(
            model = self.id().raw(),
            series = self.series.len(),
            annotations = self.annotations.len(),
            "plot rendered"
        );
    }

    fn render_titles(&self, rc: &mut dyn RenderContext) {
        let area = self.layout.title_area;
        if area.is_degenerate() {
            return;
        }
        let center = area.left + area.width * 0.5;
        let mut top = area.top;
        let entries = [
            (self.title.as_deref(), self.style.title_font_size_px),
            (self.subtitle.as_deref(), self.style.subtitle_font_size_px),
        ];
        for (text, font_size) in entries {
            let Some(text) = text.filter(|text| !text.is_empty()) else {
                continue;
            };
            rc.draw_text(
                ScreenPoint::new(center, top),
                text,
                TextStyle::new(self.style.text_color, font_size)
                    .aligned(TextHAlign::Center, TextVAlign::Top),
            );
            top += font_size;
        }
    }

    fn render_element_background<E: PlotElement + ?Sized>(
        &self,
        element: &E,
        rc: &mut dyn RenderContext,
    ) {
        if !element.is_visible() {
            return;
        }
        let Some(fill) = element.background().filter(|fill| fill.is_visible()) else {
            return;
        };
        if let Some(transform) = self.element_transform(element) {
            rc.draw_rectangle(transform.clip, fill, StrokeStyle::NONE);
        }
    }

    fn render_element<E: PlotElement + ?Sized>(&self, element: &mut E, rc: &mut dyn RenderContext) {
        if !element.is_visible() {
            return;
        }
        let Some(transform) = self.element_transform(element) else {
            trace!(element = element.id().raw(), "element has no axes; skipped");
            return;
        };
        if transform.clip.is_degenerate() {
            return;
        }
        rc.set_clip(transform.clip);
        element.render(rc, &transform);
    }
}
