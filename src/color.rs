//! Colors shared by the simulation, renderer and HUD

use serde::{Deserialize, Serialize};

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Color of an unlit slot or an untouched background particle
    pub const UNLIT: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Lit life cell
    pub const LIFE: Color = Color::rgb(0xff, 0xa5, 0x00);
    /// Resting bulb color
    pub const BULB: Color = Color::rgb(228, 228, 227);

    /// CSS hex string (`#rrggbb`)
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS `rgba(...)` string with the given alpha
    pub fn to_css_alpha(self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha.clamp(0.0, 1.0))
    }

    /// Linear RGB floats for the GPU (sRGB surface does the encode)
    pub fn to_linear(self) -> [f32; 3] {
        fn channel(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [channel(self.r), channel(self.g), channel(self.b)]
    }
}

/// Ball colors, picked uniformly at spawn
pub const PALETTE: [Color; 4] = [
    Color::rgb(0x70, 0xe0, 0xff),
    Color::rgb(0xb3, 0x88, 0xeb),
    Color::rgb(0xf7, 0xb8, 0x01),
    Color::rgb(0xff, 0x5e, 0x5b),
];
