//! Colors and color spaces.

use serde::{Deserialize, Serialize};

/// Color space family (`CT_ColorSpace/@Type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorSpaceKind {
    Gray,
    #[default]
    Rgb,
    Cmyk,
}

impl ColorSpaceKind {
    /// Parse the `Type` attribute value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GRAY" => Some(ColorSpaceKind::Gray),
            "RGB" => Some(ColorSpaceKind::Rgb),
            "CMYK" => Some(ColorSpaceKind::Cmyk),
            _ => None,
        }
    }

    /// Number of components per color.
    pub fn components(&self) -> usize {
        match self {
            ColorSpaceKind::Gray => 1,
            ColorSpaceKind::Rgb => 3,
            ColorSpaceKind::Cmyk => 4,
        }
    }
}

/// A color space resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSpace {
    pub id: String,
    pub kind: ColorSpaceKind,
    /// Bits per component (1, 2, 4, 8 or 16)
    pub bits_per_component: u8,
    /// Palette entries, each in component units
    pub palette: Vec<Vec<f64>>,
}

impl ColorSpace {
    pub fn new(id: impl Into<String>, kind: ColorSpaceKind) -> Self {
        Self {
            id: id.into(),
            kind,
            bits_per_component: 8,
            palette: Vec::new(),
        }
    }

    /// Largest component value for this bit depth.
    pub fn max_value(&self) -> f64 {
        let bits = self.bits_per_component.clamp(1, 16) as u32;
        ((1u32 << bits) - 1) as f64
    }
}

/// A color (`CT_Color`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Component values in color space units
    pub value: Vec<f64>,
    /// Referenced color space, if not the document default
    pub color_space: Option<String>,
    /// Palette index, used instead of `value` when set
    pub index: Option<usize>,
    /// Opacity, 0 (transparent) to 255 (opaque)
    pub alpha: u8,
}

impl Color {
    /// An opaque color from component values.
    pub fn new(value: Vec<f64>) -> Self {
        Self {
            value,
            color_space: None,
            index: None,
            alpha: 255,
        }
    }

    pub fn black() -> Self {
        Self::new(vec![0.0, 0.0, 0.0])
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(vec![r as f64, g as f64, b as f64])
    }

    /// Opacity as a fraction.
    pub fn opacity(&self) -> f64 {
        self.alpha as f64 / 255.0
    }

    /// Convert to DeviceRGB components in `0.0..=1.0`.
    ///
    /// Without a color space the family follows the component count
    /// (1 gray, 3 RGB, 4 CMYK) at 8 bits per component.
    pub fn to_rgb(&self, space: Option<&ColorSpace>) -> [f64; 3] {
        let components: &[f64] = match (self.index, space) {
            (Some(i), Some(cs)) if i < cs.palette.len() => &cs.palette[i],
            _ => &self.value,
        };

        let kind = match space {
            Some(cs) => cs.kind,
            None => match components.len() {
                1 => ColorSpaceKind::Gray,
                4 => ColorSpaceKind::Cmyk,
                _ => ColorSpaceKind::Rgb,
            },
        };
        let max = space.map(|cs| cs.max_value()).unwrap_or(255.0);
        let c = |i: usize| -> f64 {
            components
                .get(i)
                .map(|v| (v / max).clamp(0.0, 1.0))
                .unwrap_or(0.0)
        };

        match kind {
            ColorSpaceKind::Gray => {
                let g = c(0);
                [g, g, g]
            }
            ColorSpaceKind::Rgb => [c(0), c(1), c(2)],
            ColorSpaceKind::Cmyk => {
                let k = c(3);
                [
                    (1.0 - c(0)) * (1.0 - k),
                    (1.0 - c(1)) * (1.0 - k),
                    (1.0 - c(2)) * (1.0 - k),
                ]
            }
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}
