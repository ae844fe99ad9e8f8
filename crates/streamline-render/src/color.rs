//! RGBA colors and the color-spec resolver used by chart options.

use serde::Deserialize;

/// An RGBA color with `f32` components in the `0.0..=1.0` range.
///
/// ```
/// use streamline_render::Color;
///
/// let red = Color::rgb(1.0, 0.0, 0.0);
/// let from_hex = Color::from_hex(0xFF8800);
/// assert_eq!(Color::parse("#ff0000").unwrap(), red);
/// assert_eq!(from_hex.to_array()[3], 1.0);
/// ```
///
/// The struct is `#[repr(C)]` and implements `bytemuck::Pod`, so it can be
/// written directly into uniform buffers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit RGBA values (0–255 mapped to 0.0–1.0).
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create a color from a 24-bit RGB hex value (e.g. `0xFF8800`).
    pub fn from_hex(hex: u32) -> Self {
        let [_, r, g, b] = hex.to_be_bytes();
        Self::from_rgba_u8(r, g, b, 255)
    }

    /// Create a color from a 32-bit RGBA hex value (e.g. `0xFF880080`).
    pub fn from_hex_alpha(hex: u32) -> Self {
        let [r, g, b, a] = hex.to_be_bytes();
        Self::from_rgba_u8(r, g, b, a)
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or one of a few CSS color names.
    pub fn parse(text: &str) -> Result<Self, ColorParseError> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            let value = u32::from_str_radix(hex, 16)
                .map_err(|_| ColorParseError(text.to_string()))?;
            return match hex.len() {
                3 => {
                    let expand = |nibble: u32| ((nibble & 0xF) * 0x11) as u8;
                    Ok(Self::from_rgba_u8(
                        expand(value >> 8),
                        expand(value >> 4),
                        expand(value),
                        255,
                    ))
                }
                6 => Ok(Self::from_hex(value)),
                8 => Ok(Self::from_hex_alpha(value)),
                _ => Err(ColorParseError(text.to_string())),
            };
        }

        match text.to_ascii_lowercase().as_str() {
            "white" => Ok(Self::WHITE),
            "black" => Ok(Self::BLACK),
            "red" => Ok(Self::RED),
            "green" => Ok(Self::from_hex(0x008000)),
            "blue" => Ok(Self::BLUE),
            "orange" => Ok(Self::from_hex(0xFFA500)),
            "gray" | "grey" => Ok(Self::from_hex(0x808080)),
            "transparent" => Ok(Self::TRANSPARENT),
            _ => Err(ColorParseError(text.to_string())),
        }
    }

    /// Convert to the equivalent `wgpu::Color` (f64 components).
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// A color string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized color {0:?}")]
pub struct ColorParseError(pub String);

/// A user-supplied color, as it appears in chart configuration.
///
/// Deserializes from either a string (`"#1f77b4"`, `"red"`) or an
/// `[r, g, b, a]` float array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Rgba([f32; 4]),
    Css(String),
}

impl ColorSpec {
    /// Resolve to concrete RGBA, with every component clamped to `[0, 1]`.
    pub fn resolve(&self) -> Result<Color, ColorParseError> {
        let color = match self {
            ColorSpec::Rgba(rgba) => Color::from(*rgba),
            ColorSpec::Css(text) => Color::parse(text)?,
        };
        Ok(Color::from(color.to_array().map(|c| c.clamp(0.0, 1.0))))
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        ColorSpec::Rgba(color.to_array())
    }
}

impl From<&str> for ColorSpec {
    fn from(text: &str) -> Self {
        ColorSpec::Css(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Color::parse("#f00").unwrap(), Color::RED);
        assert_eq!(Color::parse("#0000ff").unwrap(), Color::BLUE);
        let translucent = Color::parse("#ffffff80").unwrap();
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("#gggggg").is_err());
        assert!(Color::parse("chartreuse-ish").is_err());
    }

    #[test]
    fn test_spec_resolve_clamps() {
        let spec = ColorSpec::Rgba([2.0, -1.0, 0.5, 1.0]);
        assert_eq!(spec.resolve().unwrap(), Color::rgba(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_spec_deserialize() {
        let named: ColorSpec = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(named.resolve().unwrap(), Color::RED);

        let array: ColorSpec = serde_json::from_str("[0.0, 1.0, 0.0, 1.0]").unwrap();
        assert_eq!(array.resolve().unwrap(), Color::GREEN);
    }
}
