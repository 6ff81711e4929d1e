use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ReplotError, ReplotResult};

/// Sentinel color returned for unknown domain values.
pub const UNKNOWN_COLOR: Color = Color::rgb(0xE3, 0xE3, 0xE3);

/// An sRGB color, serialized as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: &str) -> ReplotResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ReplotError::InvalidData(format!(
                "color must be a 6-digit hex string, got `{hex}`"
            )));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| {
                ReplotError::InvalidData(format!("color must be a 6-digit hex string, got `{hex}`"))
            })
        };
        Ok(Self {
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
        })
    }

    /// Linear blend toward `other`; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ReplotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

macro_rules! stops {
    ($($hex:literal),+ $(,)?) => {
        &[$(hex_stop($hex)),+]
    };
}

const fn hex_stop(hex: u32) -> Color {
    Color::rgb(
        ((hex >> 16) & 0xFF) as u8,
        ((hex >> 8) & 0xFF) as u8,
        (hex & 0xFF) as u8,
    )
}

/// A named color palette sampled over `[0, 1]` by piecewise-linear
/// interpolation between fixed control points.
///
/// The registry mirrors the ColorBrewer diverging/sequential sets plus the
/// matplotlib perceptual maps commonly offered by plotting front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScale {
    key: &'static str,
    stops: &'static [Color],
}

/// Default palette for discrete scales.
pub const DEFAULT_COLOR_SCALE_KEY: &str = "RdYlBu";
/// Default palette for continuous scales.
pub const CONTINUOUS_COLOR_SCALE_KEY: &str = "YlOrRd";

const PALETTES: &[(&str, &[Color])] = &[
    (
        "RdYlBu",
        stops![
            0xa50026, 0xd73027, 0xf46d43, 0xfdae61, 0xfee090, 0xffffbf, 0xe0f3f8, 0xabd9e9,
            0x74add1, 0x4575b4, 0x313695,
        ],
    ),
    (
        "YlOrRd",
        stops![
            0xffffcc, 0xffeda0, 0xfed976, 0xfeb24c, 0xfd8d3c, 0xfc4e2a, 0xe31a1c, 0xbd0026,
            0x800026,
        ],
    ),
    (
        "Spectral",
        stops![
            0x9e0142, 0xd53e4f, 0xf46d43, 0xfdae61, 0xfee08b, 0xffffbf, 0xe6f598, 0xabdda4,
            0x66c2a5, 0x3288bd, 0x5e4fa2,
        ],
    ),
    (
        "RdBu",
        stops![
            0x67001f, 0xb2182b, 0xd6604d, 0xf4a582, 0xfddbc7, 0xf7f7f7, 0xd1e5f0, 0x92c5de,
            0x4393c3, 0x2166ac, 0x053061,
        ],
    ),
    (
        "Viridis",
        stops![0x440154, 0x443983, 0x31688e, 0x21918c, 0x35b779, 0x90d743, 0xfde725],
    ),
    (
        "Inferno",
        stops![0x000004, 0x320a5e, 0x781c6d, 0xbc3754, 0xed6925, 0xfbb61a, 0xfcffa4],
    ),
    (
        "Magma",
        stops![0x000004, 0x3b0f70, 0x8c2981, 0xde4968, 0xfe9f6d, 0xfcfdbf],
    ),
    (
        "Plasma",
        stops![0x0d0887, 0x6a00a8, 0xb12a90, 0xe16462, 0xfca636, 0xf0f921],
    ),
    (
        "Blues",
        stops![
            0xf7fbff, 0xdeebf7, 0xc6dbef, 0x9ecae1, 0x6baed6, 0x4292c6, 0x2171b5, 0x08519c,
            0x08306b,
        ],
    ),
    (
        "Greens",
        stops![
            0xf7fcf5, 0xe5f5e0, 0xc7e9c0, 0xa1d99b, 0x74c476, 0x41ab5d, 0x238b45, 0x006d2c,
            0x00441b,
        ],
    ),
    (
        "Greys",
        stops![
            0xffffff, 0xf0f0f0, 0xd9d9d9, 0xbdbdbd, 0x969696, 0x737373, 0x525252, 0x252525,
            0x000000,
        ],
    ),
    (
        "Oranges",
        stops![
            0xfff5eb, 0xfee6ce, 0xfdd0a2, 0xfdae6b, 0xfd8d3c, 0xf16913, 0xd94801, 0xa63603,
            0x7f2704,
        ],
    ),
    (
        "Purples",
        stops![
            0xfcfbfd, 0xefedf5, 0xdadaeb, 0xbcbddc, 0x9e9ac8, 0x807dba, 0x6a51a3, 0x54278f,
            0x3f007d,
        ],
    ),
    (
        "Reds",
        stops![
            0xfff5f0, 0xfee0d2, 0xfcbba1, 0xfc9272, 0xfb6a4a, 0xef3b2c, 0xcb181d, 0xa50f15,
            0x67000d,
        ],
    ),
];

impl ColorScale {
    /// Looks up a palette by its registry key.
    #[must_use]
    pub fn by_key(key: &str) -> Option<Self> {
        PALETTES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(name, stops)| Self { key: name, stops })
    }

    /// Default palette for discrete scales (`RdYlBu`).
    #[must_use]
    pub fn default_discrete() -> Self {
        Self::by_key(DEFAULT_COLOR_SCALE_KEY).unwrap_or(Self {
            key: DEFAULT_COLOR_SCALE_KEY,
            stops: &[UNKNOWN_COLOR],
        })
    }

    /// Default palette for continuous scales (`YlOrRd`).
    #[must_use]
    pub fn default_continuous() -> Self {
        Self::by_key(CONTINUOUS_COLOR_SCALE_KEY).unwrap_or(Self {
            key: CONTINUOUS_COLOR_SCALE_KEY,
            stops: &[UNKNOWN_COLOR],
        })
    }

    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// All registered palette keys, in registry order.
    #[must_use]
    pub fn keys() -> Vec<&'static str> {
        PALETTES.iter().map(|(name, _)| *name).collect()
    }

    /// Samples the palette at normalized position `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match self.stops {
            [] => UNKNOWN_COLOR,
            [only] => *only,
            stops => {
                let scaled = t * (stops.len() - 1) as f64;
                let index = (scaled.floor() as usize).min(stops.len() - 2);
                stops[index].lerp(stops[index + 1], scaled - index as f64)
            }
        }
    }
}
