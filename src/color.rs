//! Portable RGBA color values and the platform color bridge.
//!
//! `ColorValue` is the only color type the rest of the crate works with.
//! Presentation layers convert their native color objects through the
//! [`PlatformColor`] trait; the core never depends on a concrete type.

use serde::{Deserialize, Serialize};

/// Luma threshold above which a color counts as bright.
pub const BRIGHTNESS_THRESHOLD: f64 = 0.5;

/// An RGBA color with all channels in `0.0..=1.0`.
///
/// Channels are normalized on construction: a value above `1.0` but not
/// above `255.0` is read as a 0-255 channel and divided by 255, and the
/// result is clamped into range. Values are immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawColorValue")]
pub struct ColorValue {
    red: f64,
    green: f64,
    blue: f64,
    alpha: f64,
}

/// Unchecked wire form, routed through [`ColorValue::new`] on load.
#[derive(Deserialize)]
struct RawColorValue {
    red: f64,
    green: f64,
    blue: f64,
    #[serde(default = "opaque")]
    alpha: f64,
}

fn opaque() -> f64 {
    1.0
}

impl From<RawColorValue> for ColorValue {
    fn from(raw: RawColorValue) -> Self {
        Self::new(raw.red, raw.green, raw.blue, raw.alpha)
    }
}

fn normalize_channel(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    let value = if value > 1.0 && value <= 255.0 {
        value / 255.0
    } else {
        value
    };
    value.clamp(0.0, 1.0)
}

impl ColorValue {
    pub const BLACK: Self = Self::opaque_const(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::opaque_const(1.0, 1.0, 1.0);
    /// Neutral mid-gray used whenever a color cannot be determined.
    pub const NEUTRAL_GRAY: Self = Self::opaque_const(0.5, 0.5, 0.5);

    const fn opaque_const(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Create a color, normalizing each channel.
    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red: normalize_channel(red),
            green: normalize_channel(green),
            blue: normalize_channel(blue),
            alpha: normalize_channel(alpha),
        }
    }

    /// Create a fully opaque color.
    pub fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::new(red, green, blue, 1.0)
    }

    /// Create from 0-255 RGB values with full opacity.
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: f64::from(red) / 255.0,
            green: f64::from(green) / 255.0,
            blue: f64::from(blue) / 255.0,
            alpha: 1.0,
        }
    }

    pub fn red(&self) -> f64 {
        self.red
    }

    pub fn green(&self) -> f64 {
        self.green
    }

    pub fn blue(&self) -> f64 {
        self.blue
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: normalize_channel(alpha),
            ..self
        }
    }

    /// Convert a platform color, falling back to neutral gray when the
    /// platform object cannot produce RGBA components.
    pub fn from_platform<C: PlatformColor>(color: &C) -> Self {
        color.to_rgba().unwrap_or_else(|| {
            log::debug!("Platform color has no RGBA components, using neutral gray");
            Self::NEUTRAL_GRAY
        })
    }

    /// Convert into a platform color.
    pub fn to_platform<C: PlatformColor>(self) -> C {
        C::from_rgba(self)
    }

    /// Shift every color channel up by `amount`. Alpha is untouched.
    pub fn lighten(self, amount: f64) -> Self {
        self.shift(amount)
    }

    /// Shift every color channel down by `amount`. Alpha is untouched.
    pub fn darken(self, amount: f64) -> Self {
        self.shift(-amount)
    }

    /// A NaN amount leaves the color unchanged.
    fn shift(self, delta: f64) -> Self {
        let delta = if delta.is_nan() { 0.0 } else { delta };
        Self {
            red: (self.red + delta).clamp(0.0, 1.0),
            green: (self.green + delta).clamp(0.0, 1.0),
            blue: (self.blue + delta).clamp(0.0, 1.0),
            alpha: self.alpha,
        }
    }

    /// Perceptual luma: `0.299 R + 0.587 G + 0.114 B`.
    pub fn brightness(&self) -> f64 {
        0.299 * self.red + 0.587 * self.green + 0.114 * self.blue
    }

    pub fn is_bright(&self) -> bool {
        self.brightness() > BRIGHTNESS_THRESHOLD
    }

    /// Black on bright colors, white on dark ones.
    pub fn contrast_color(&self) -> Self {
        if self.is_bright() {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }

    /// Parse a hex string (with or without `#`, 6 or 8 digits).
    ///
    /// 8-digit hex is read as RRGGBBAA.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        match digits.len() {
            6 => Some(Self::from_rgb8(byte(0..2)?, byte(2..4)?, byte(4..6)?)),
            8 => {
                let alpha = byte(6..8)?;
                Some(
                    Self::from_rgb8(byte(0..2)?, byte(2..4)?, byte(4..6)?)
                        .with_alpha(f64::from(alpha) / 255.0),
                )
            }
            _ => None,
        }
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == u8::MAX {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// Convert to 0-255 RGBA components.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let to_byte = |v: f64| (v * 255.0).round() as u8;
        [
            to_byte(self.red),
            to_byte(self.green),
            to_byte(self.blue),
            to_byte(self.alpha),
        ]
    }
}

impl Default for ColorValue {
    fn default() -> Self {
        Self::NEUTRAL_GRAY
    }
}

/// Bridge between [`ColorValue`] and a presentation layer's color object.
///
/// Implemented once per target platform. Conversions must round-trip
/// losslessly for RGBA values inside `0.0..=1.0`.
pub trait PlatformColor: Sized {
    /// Extract RGBA components, or `None` if the object has no RGB form.
    fn to_rgba(&self) -> Option<ColorValue>;

    /// Build the platform object from a color value.
    fn from_rgba(color: ColorValue) -> Self;
}

impl PlatformColor for [f32; 4] {
    fn to_rgba(&self) -> Option<ColorValue> {
        if self.iter().any(|c| !c.is_finite()) {
            return None;
        }
        Some(ColorValue::new(
            f64::from(self[0]),
            f64::from(self[1]),
            f64::from(self[2]),
            f64::from(self[3]),
        ))
    }

    fn from_rgba(color: ColorValue) -> Self {
        [
            color.red as f32,
            color.green as f32,
            color.blue as f32,
            color.alpha as f32,
        ]
    }
}

impl PlatformColor for [u8; 4] {
    fn to_rgba(&self) -> Option<ColorValue> {
        let [r, g, b, a] = *self;
        Some(ColorValue::from_rgb8(r, g, b).with_alpha(f64::from(a) / 255.0))
    }

    fn from_rgba(color: ColorValue) -> Self {
        color.to_rgba8()
    }
}

/// A CSS-style hex color string, as used by web front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexColor(pub String);

impl PlatformColor for HexColor {
    fn to_rgba(&self) -> Option<ColorValue> {
        ColorValue::from_hex(&self.0)
    }

    fn from_rgba(color: ColorValue) -> Self {
        HexColor(color.to_hex())
    }
}

/// Keyword table for guessing a color from a free-text name.
///
/// Each entry carries a Chinese and an English keyword. Order matters:
/// the first entry with a keyword contained in the lower-cased name wins.
const NAME_KEYWORDS: &[(&str, &str, ColorValue)] = &[
    ("黑", "black", ColorValue::BLACK),
    ("白", "white", ColorValue::WHITE),
    ("红", "red", ColorValue::opaque_const(1.0, 0.0, 0.0)),
    ("蓝", "blue", ColorValue::opaque_const(0.0, 0.0, 1.0)),
    ("绿", "green", ColorValue::opaque_const(0.0, 1.0, 0.0)),
    ("黄", "yellow", ColorValue::opaque_const(1.0, 1.0, 0.0)),
    ("紫", "purple", ColorValue::opaque_const(0.5, 0.0, 0.5)),
    ("橙", "orange", ColorValue::opaque_const(1.0, 0.5, 0.0)),
    ("灰", "gray", ColorValue::opaque_const(0.5, 0.5, 0.5)),
    (
        "透明",
        "transparent",
        ColorValue {
            red: 1.0,
            green: 1.0,
            blue: 1.0,
            alpha: 0.5,
        },
    ),
];

/// Guess a display color from a color name.
///
/// This is a substring heuristic, not a classifier: names mentioning
/// several colors resolve to whichever keyword comes first in the table.
/// Unmatched names fall back to neutral gray.
pub fn color_for_name(name: &str) -> ColorValue {
    let lowered = name.to_lowercase();
    NAME_KEYWORDS
        .iter()
        .find(|(zh, en, _)| lowered.contains(zh) || lowered.contains(en))
        .map(|(_, _, color)| *color)
        .unwrap_or(ColorValue::NEUTRAL_GRAY)
}

/// Convert HSV to RGB.
///
/// # Arguments
/// * `h` - Hue in degrees (0-360)
/// * `s` - Saturation (0.0-1.0)
/// * `v` - Value/brightness (0.0-1.0)
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> ColorValue {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    ColorValue::rgb(r + m, g + m, b + m)
}

/// Evenly spaced fully saturated hues, used for rainbow gradients.
pub fn rainbow_stops(count: usize) -> Vec<ColorValue> {
    (0..count)
        .map(|i| hsv_to_rgb(360.0 * i as f64 / count as f64, 1.0, 1.0))
        .collect()
}
