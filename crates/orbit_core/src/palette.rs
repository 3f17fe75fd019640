use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::DEFAULT_PALETTE;

/// `#RRGGBB` color code, always stored uppercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Accepts `#` followed by exactly six hex digits, any case
    pub fn parse(code: &str) -> Option<Self> {
        let digits = code.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(code.to_ascii_uppercase()))
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self(format!("#{:06X}", rng.gen_range(0..=0xFF_FFFFu32)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn rgb(&self) -> [u8; 3] {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        [channel(1), channel(3), channel(5)]
    }

    /// Channels as 0.0-1.0 sRGB
    pub fn srgb(&self) -> [f32; 3] {
        self.rgb().map(|c| c as f32 / 255.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::parse(&code).ok_or_else(|| format!("invalid color {code:?}, expected #RRGGBB"))
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered color list shapes draw from. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<HexColor>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE
                .iter()
                .filter_map(|code| HexColor::parse(code))
                .collect(),
        }
    }
}

impl Palette {
    /// Wrap an existing list as-is (duplicates kept). `None` if empty.
    pub fn new(colors: Vec<HexColor>) -> Option<Self> {
        if colors.is_empty() {
            None
        } else {
            Some(Self { colors })
        }
    }

    pub fn single(color: HexColor) -> Self {
        Self { colors: vec![color] }
    }

    pub fn colors(&self) -> &[HexColor] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn get(&self, index: usize) -> Option<&HexColor> {
        self.colors.get(index)
    }

    pub fn contains(&self, color: &HexColor) -> bool {
        self.colors.contains(color)
    }

    /// Append unless already present. Returns whether the palette changed.
    pub fn add(&mut self, color: HexColor) -> bool {
        if self.contains(&color) {
            return false;
        }
        self.colors.push(color);
        true
    }

    /// Remove by index, refusing to drop the last color
    pub fn remove(&mut self, index: usize) -> bool {
        if self.colors.len() <= 1 || index >= self.colors.len() {
            return false;
        }
        self.colors.remove(index);
        true
    }

    /// Replace in place. Duplicates are allowed here, as the picker edits a
    /// slot rather than inserting.
    pub fn edit(&mut self, index: usize, color: HexColor) -> bool {
        match self.colors.get_mut(index) {
            Some(slot) => {
                *slot = color;
                true
            }
            None => false,
        }
    }

    /// `len` colors taken by cycling through the palette in order
    pub fn cycled(&self, len: usize) -> Vec<HexColor> {
        self.colors.iter().cycle().take(len).cloned().collect()
    }
}
