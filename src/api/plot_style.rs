use crate::core::Thickness;
use crate::error::{PlotError, PlotResult};
use crate::render::Color;

/// Model-level appearance and spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotStyle {
    /// Space between the outer bounds and everything drawn.
    pub padding: Thickness,
    pub background: Color,
    pub plot_area_background: Color,
    pub plot_area_border_color: Color,
    pub plot_area_border_thickness: f64,
    pub text_color: Color,
    pub title_font_size_px: f64,
    pub subtitle_font_size_px: f64,
    /// Gap between the title block and the plot area.
    pub title_gap_px: f64,
    /// Gap between tick marks and their labels, and between labels and axis titles.
    pub axis_label_gap_px: f64,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            padding: Thickness::uniform(8.0),
            background: Color::WHITE,
            plot_area_background: Color::TRANSPARENT,
            plot_area_border_color: Color::BLACK,
            plot_area_border_thickness: 1.0,
            text_color: Color::rgb(0.10, 0.12, 0.16),
            title_font_size_px: 18.0,
            subtitle_font_size_px: 14.0,
            title_gap_px: 6.0,
            axis_label_gap_px: 4.0,
        }
    }
}

impl PlotStyle {
    pub fn validate(self) -> PlotResult<Self> {
        if !self.padding.is_valid() {
            return Err(PlotError::InvalidData(
                "plot padding must be finite and >= 0".to_owned(),
            ));
        }
        self.background.validate()?;
        self.plot_area_background.validate()?;
        self.plot_area_border_color.validate()?;
        self.text_color.validate()?;

        for (name, value) in [
            ("title_font_size_px", self.title_font_size_px),
            ("subtitle_font_size_px", self.subtitle_font_size_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlotError::InvalidData(format!(
                    "plot style `{name}` must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("plot_area_border_thickness", self.plot_area_border_thickness),
            ("title_gap_px", self.title_gap_px),
            ("axis_label_gap_px", self.axis_label_gap_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PlotError::InvalidData(format!(
                    "plot style `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }
}
