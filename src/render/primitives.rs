use crate::error::{PlotError, PlotResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Fully transparent colors are skipped by the draw routines.
    #[must_use]
    pub fn is_visible(self) -> bool {
        self.alpha > 0.0
    }

    pub fn validate(self) -> PlotResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PlotError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Outline attributes for lines, polygons and rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub thickness: f64,
}

impl StrokeStyle {
    pub const NONE: Self = Self {
        color: Color::TRANSPARENT,
        thickness: 0.0,
    };

    #[must_use]
    pub const fn new(color: Color, thickness: f64) -> Self {
        Self { color, thickness }
    }

    #[must_use]
    pub fn is_visible(self) -> bool {
        self.color.is_visible() && self.thickness.is_finite() && self.thickness > 0.0
    }

    pub fn validate(self) -> PlotResult<()> {
        if !self.thickness.is_finite() || self.thickness < 0.0 {
            return Err(PlotError::InvalidData(
                "stroke thickness must be finite and >= 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextHAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextVAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub font_size_px: f64,
    pub h_align: TextHAlign,
    pub v_align: TextVAlign,
}

impl TextStyle {
    #[must_use]
    pub const fn new(color: Color, font_size_px: f64) -> Self {
        Self {
            color,
            font_size_px,
            h_align: TextHAlign::Left,
            v_align: TextVAlign::Top,
        }
    }

    #[must_use]
    pub const fn aligned(mut self, h_align: TextHAlign, v_align: TextVAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn validate(self) -> PlotResult<()> {
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(PlotError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}
