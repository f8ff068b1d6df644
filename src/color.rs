use std::fmt;
use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Rgb – a single marker colour
// ---------------------------------------------------------------------------

/// An 8-bit sRGB colour, the only style property a layer symbol carries.
///
/// Serialised as a `[r, g, b]` array so config and project files stay
/// readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb(Srgb<u8>);

/// Coral, the airport layer colour.
pub const CORAL: Rgb = Rgb::from_rgb(255, 127, 80);
/// Green, the low-latitude layer colour.
pub const GREEN: Rgb = Rgb::from_rgb(0, 128, 0);
/// Colour of a symbol nobody has styled yet.
pub const GRAY: Rgb = Rgb::from_rgb(160, 160, 160);

impl Rgb {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Rgb(Srgb::new(r, g, b))
    }

    pub fn components(&self) -> (u8, u8, u8) {
        (self.0.red, self.0.green, self.0.blue)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb::from_rgb(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        let (r, g, b) = c.components();
        [r, g, b]
    }
}

impl From<Rgb> for Color32 {
    fn from(c: Rgb) -> Self {
        let (r, g, b) = c.components();
        Color32::from_rgb(r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.components();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a colour (expected #rrggbb or r,g,b)")]
pub struct ParseRgbError(String);

impl FromStr for Rgb {
    type Err = ParseRgbError;

    /// Accepts `#ff7f50` or `255,127,80`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRgbError(s.to_string());
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(err());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
            return Ok(Rgb::from_rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let parts: Vec<u8> = s
            .split(',')
            .map(|p| p.trim().parse::<u8>().map_err(|_| err()))
            .collect::<Result<_, _>>()?;
        match parts.as_slice() {
            [r, g, b] => Ok(Rgb::from_rgb(*r, *g, *b)),
            _ => Err(err()),
        }
    }
}

// ---------------------------------------------------------------------------
// Automatic colours for new layers
// ---------------------------------------------------------------------------

/// Colour given to the `index`-th layer added to a project.
///
/// Golden-angle hue steps keep neighbouring layers visually distinct without
/// knowing the final layer count.
pub fn auto_color(index: usize) -> Rgb {
    let hue = (index as f32 * 137.508) % 360.0;
    let hsl = Hsl::new(hue, 0.75, 0.55);
    let rgb: Srgb = hsl.into_color();
    let rgb: Srgb<u8> = rgb.into_format();
    Rgb(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_triples() {
        assert_eq!("#ff7f50".parse::<Rgb>().unwrap(), CORAL);
        assert_eq!("0, 128, 0".parse::<Rgb>().unwrap(), GREEN);
        assert!("#ff7f5".parse::<Rgb>().is_err());
        assert!("1,2".parse::<Rgb>().is_err());
        assert!("256,0,0".parse::<Rgb>().is_err());
    }

    #[test]
    fn display_is_lowercase_hex() {
        assert_eq!(CORAL.to_string(), "#ff7f50");
    }

    #[test]
    fn serialises_as_array() {
        let json = serde_json::to_string(&GREEN).unwrap();
        assert_eq!(json, "[0,128,0]");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GREEN);
    }

    #[test]
    fn auto_colors_differ_between_neighbours() {
        let a = auto_color(0);
        let b = auto_color(1);
        let c = auto_color(2);
        assert_ne!(a, b);
        assert_ne!(b, c);
    }
}
