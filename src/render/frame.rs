use crate::core::{ScreenPoint, ScreenRect};
use crate::error::{PlotError, PlotResult};
use crate::render::{Color, RenderContext, StrokeStyle, TextStyle};

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        points: Vec<ScreenPoint>,
        stroke: StrokeStyle,
    },
    Polygon {
        points: Vec<ScreenPoint>,
        fill: Color,
        stroke: StrokeStyle,
    },
    Rectangle {
        rect: ScreenRect,
        fill: Color,
        stroke: StrokeStyle,
    },
    Text {
        position: ScreenPoint,
        text: String,
        style: TextStyle,
    },
    SetClip(ScreenRect),
    ResetClip,
}

/// Backend-agnostic recording of one draw pass, in paint order.
///
/// Used by headless hosts and tests to inspect what a render produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderFrame {
    pub width: f64,
    pub height: f64,
    commands: Vec<DrawCommand>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &[ScreenPoint]> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    pub fn rectangles(&self) -> impl Iterator<Item = ScreenRect> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Rectangle { rect, .. } => Some(*rect),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text == needle)
    }

    /// Checks every recorded primitive for finite geometry and valid styles.
    pub fn validate(&self) -> PlotResult<()> {
        for command in &self.commands {
            match command {
                DrawCommand::Line { points, stroke } => {
                    validate_points(points)?;
                    stroke.validate()?;
                }
                DrawCommand::Polygon {
                    points,
                    fill,
                    stroke,
                } => {
                    validate_points(points)?;
                    fill.validate()?;
                    stroke.validate()?;
                }
                DrawCommand::Rectangle { rect, fill, stroke } => {
                    validate_rect(*rect)?;
                    fill.validate()?;
                    stroke.validate()?;
                }
                DrawCommand::Text {
                    position,
                    text,
                    style,
                } => {
                    if text.is_empty() {
                        return Err(PlotError::InvalidData(
                            "text primitive must not be empty".to_owned(),
                        ));
                    }
                    validate_points(std::slice::from_ref(position))?;
                    style.validate()?;
                }
                DrawCommand::SetClip(rect) => validate_rect(*rect)?,
                DrawCommand::ResetClip => {}
            }
        }
        Ok(())
    }
}

fn validate_points(points: &[ScreenPoint]) -> PlotResult<()> {
    if points.iter().all(|point| point.is_finite()) {
        Ok(())
    } else {
        Err(PlotError::InvalidData(
            "primitive coordinates must be finite".to_owned(),
        ))
    }
}

fn validate_rect(rect: ScreenRect) -> PlotResult<()> {
    if rect.left.is_finite() && rect.top.is_finite() {
        Ok(())
    } else {
        Err(PlotError::InvalidData(
            "rectangle origin must be finite".to_owned(),
        ))
    }
}

impl RenderContext for RenderFrame {
    fn draw_line(&mut self, points: &[ScreenPoint], stroke: StrokeStyle) {
        if points.len() < 2 {
            return;
        }
        self.commands.push(DrawCommand::Line {
            points: points.to_vec(),
            stroke,
        });
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: Color, stroke: StrokeStyle) {
        if points.len() < 3 {
            return;
        }
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            fill,
            stroke,
        });
    }

    fn draw_rectangle(&mut self, rect: ScreenRect, fill: Color, stroke: StrokeStyle) {
        self.commands
            .push(DrawCommand::Rectangle { rect, fill, stroke });
    }

    fn draw_text(&mut self, position: ScreenPoint, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_owned(),
            style,
        });
    }

    fn set_clip(&mut self, rect: ScreenRect) {
        self.commands.push(DrawCommand::SetClip(rect));
    }

    fn reset_clip(&mut self) {
        self.commands.push(DrawCommand::ResetClip);
    }
}
