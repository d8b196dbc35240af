//! RGBA color with HSV conversions
//!
//! Hue is expressed in degrees and always normalized into `[0, 360)`.
//! Saturation and value are clamped into `[0, 1]` when building a color
//! from HSV, so every color produced here stays inside the unit cube.

use serde::{Deserialize, Serialize};

/// Full hue circle in degrees
pub const HUE_RANGE: f32 = 360.0;

/// Linear RGBA color, channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color4 {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    #[serde(default = "opaque")]
    pub a: f32,
}

const fn opaque() -> f32 {
    1.0
}

/// Hue (degrees), saturation and value triple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    /// Hue in degrees, `[0, 360)`
    pub hue: f32,
    /// Saturation, `[0, 1]`
    pub saturation: f32,
    /// Value, `[0, 1]`
    pub value: f32,
}

impl Default for Color4 {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color4 {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Create a color from all four channels
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build an opaque color from hue (degrees), saturation and value.
    ///
    /// Hue wraps modulo 360; saturation and value are clamped to `[0, 1]`.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let hue = normalize_hue(hue);
        let saturation = saturation.clamp(0.0, 1.0);
        let value = value.clamp(0.0, 1.0);

        let chroma = value * saturation;
        let sector = hue / 60.0;
        let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let m = value - chroma;

        let (r, g, b) = match sector as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        Self::rgb(r + m, g + m, b + m)
    }

    /// Convert to hue, saturation and value
    pub fn to_hsv(&self) -> Hsv {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;

        let hue = if delta <= f32::EPSILON {
            0.0
        } else if (max - self.r).abs() <= f32::EPSILON {
            60.0 * ((self.g - self.b) / delta)
        } else if (max - self.g).abs() <= f32::EPSILON {
            60.0 * ((self.b - self.r) / delta + 2.0)
        } else {
            60.0 * ((self.r - self.g) / delta + 4.0)
        };

        Hsv {
            hue: normalize_hue(hue),
            saturation: if max > 0.0 { delta / max } else { 0.0 },
            value: max,
        }
    }

    /// Hue in degrees
    pub fn hue(&self) -> f32 {
        self.to_hsv().hue
    }

    /// HSV saturation
    pub fn saturation(&self) -> f32 {
        self.to_hsv().saturation
    }

    /// HSV value
    pub fn value(&self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    /// Same color with a different alpha
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// RGB channels as an array
    pub const fn rgb_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// RGBA channels as an array
    pub const fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Whether every channel lies in `[0, 1]`
    pub fn is_normalized(&self) -> bool {
        self.to_array().iter().all(|c| (0.0..=1.0).contains(c))
    }
}

/// Wrap an angle in degrees into `[0, 360)`
pub fn normalize_hue(hue: f32) -> f32 {
    let wrapped = hue.rem_euclid(HUE_RANGE);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= HUE_RANGE {
        0.0
    } else {
        wrapped
    }
}

impl From<[f32; 4]> for Color4 {
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Color4> for [f32; 4] {
    fn from(c: Color4) -> Self {
        c.to_array()
    }
}
