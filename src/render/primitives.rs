use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Point, Rect};
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
///
/// Serialized as a `#rrggbb` / `#rrggbbaa` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
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

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(value: &str) -> ChartResult<Self> {
        let digits = value.trim().trim_start_matches('#');
        let invalid = || ChartError::InvalidData(format!("invalid hex color `{value}`"));
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| -> ChartResult<f64> {
            let byte = u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())?;
            Ok(f64::from(byte) / 255.0)
        };
        match digits.len() {
            3 => {
                let nibble = |index: usize| -> ChartResult<f64> {
                    let value = u8::from_str_radix(&digits[index..=index], 16).map_err(|_| invalid())?;
                    Ok(f64::from(value * 17) / 255.0)
                };
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(invalid()),
        }
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        let byte = |channel: f64| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        let rgb = format!(
            "#{:02x}{:02x}{:02x}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        );
        if self.alpha >= 1.0 {
            rgb
        } else {
            format!("{rgb}{:02x}", byte(self.alpha))
        }
    }

    /// Mixes toward white for positive `amount`, toward black for negative.
    /// `amount` is clamped to `[-1, 1]`; alpha is preserved.
    #[must_use]
    pub fn shade(self, amount: f64) -> Self {
        let amount = if amount.is_finite() { amount.clamp(-1.0, 1.0) } else { 0.0 };
        let mix = |channel: f64| {
            if amount >= 0.0 {
                channel + (1.0 - channel) * amount
            } else {
                channel * (1.0 + amount)
            }
        };
        Self::rgba(mix(self.red), mix(self.green), mix(self.blue), self.alpha)
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = ChartError;

    fn try_from(value: String) -> ChartResult<Self> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}

fn ensure_finite(values: &[f64], what: &str) -> ChartResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!("{what} must be finite")))
    }
}

fn ensure_non_negative(value: f64, what: &str) -> ChartResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!("{what} must be finite and >= 0")))
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        ensure_finite(&[self.x1, self.y1, self.x2, self.y2], "line coordinates")?;
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Filled rectangle with an optional outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub rect: Rect,
    pub fill: Color,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
}

impl RectPrimitive {
    #[must_use]
    pub const fn filled(rect: Rect, fill: Color) -> Self {
        Self {
            rect,
            fill,
            stroke: None,
            stroke_width: 0.0,
        }
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: Color, stroke_width: f64) -> Self {
        self.stroke = Some(stroke);
        self.stroke_width = stroke_width;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        ensure_finite(&[self.rect.x, self.rect.y], "rect origin")?;
        ensure_non_negative(self.rect.width, "rect width")?;
        ensure_non_negative(self.rect.height, "rect height")?;
        ensure_non_negative(self.stroke_width, "rect stroke width")?;
        self.fill.validate()?;
        self.stroke.map_or(Ok(()), Color::validate)
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to `TextPrimitive::y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextVAlign {
    Top,
    Middle,
    Bottom,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub font_weight: u16,
    pub color: Color,
    pub h_align: TextHAlign,
    pub v_align: TextVAlign,
    /// Clockwise rotation around the anchor, in degrees.
    pub rotation_deg: f64,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            font_weight: 400,
            color,
            h_align,
            v_align: TextVAlign::Middle,
            rotation_deg: 0.0,
        }
    }

    #[must_use]
    pub fn with_v_align(mut self, v_align: TextVAlign) -> Self {
        self.v_align = v_align;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    #[must_use]
    pub fn with_weight(mut self, font_weight: u16) -> Self {
        self.font_weight = font_weight;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        ensure_finite(&[self.x, self.y, self.rotation_deg], "text placement")?;
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Annular sector; angles in radians clockwise from twelve o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcPrimitive {
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub fill: Color,
}

impl ArcPrimitive {
    pub fn validate(self) -> ChartResult<()> {
        ensure_finite(
            &[self.center.x, self.center.y, self.start_angle, self.end_angle],
            "arc placement",
        )?;
        ensure_non_negative(self.inner_radius, "arc inner radius")?;
        ensure_non_negative(self.outer_radius - self.inner_radius, "arc thickness")?;
        if self.end_angle < self.start_angle {
            return Err(ChartError::InvalidData(
                "arc end angle must not precede its start angle".to_owned(),
            ));
        }
        self.fill.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclePrimitive {
    pub center: Point,
    pub radius: f64,
    pub fill: Color,
}

impl CirclePrimitive {
    pub fn validate(self) -> ChartResult<()> {
        ensure_finite(&[self.center.x, self.center.y], "circle center")?;
        ensure_non_negative(self.radius, "circle radius")?;
        self.fill.validate()
    }
}

/// Open stroked path through `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylinePrimitive {
    pub points: Vec<Point>,
    pub stroke_width: f64,
    pub color: Color,
}

impl PolylinePrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        for point in &self.points {
            ensure_finite(&[point.x, point.y], "polyline points")?;
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "polyline stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}
