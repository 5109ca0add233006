//! RGB colours shared by the simulation (bullet/boss colours) and the
//! renderer (fill styles).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::from_hex(0xFFFFFF);
    pub const BLACK: Color = Color::from_hex(0x000000);
    pub const RED: Color = Color::from_hex(0xFF3333);
    pub const GREEN: Color = Color::from_hex(0x33FF66);
    pub const YELLOW: Color = Color::from_hex(0xFFDD33);
    pub const ORANGE: Color = Color::from_hex(0xFF8800);
    pub const CYAN: Color = Color::from_hex(0x33DDFF);
    pub const PURPLE: Color = Color::from_hex(0x9933FF);

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }

    /// CSS hex form, e.g. `#33ff66`
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear blend toward `other` (`t = 0` keeps self)
    pub fn mix(&self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
        }
    }
}
