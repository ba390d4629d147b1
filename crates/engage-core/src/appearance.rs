//! Widget colors and label.

use serde::{Deserialize, Serialize};

/// RGB color parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 0xFF,
        g: 0xFF,
        b: 0xFF,
    };

    /// Parses a hex color string like "#4070FF" or "4070ff".
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        Some(Self {
            r: u8::from_str_radix(&hex[0..2], 16).ok()?,
            g: u8::from_str_radix(&hex[2..4], 16).ok()?,
            b: u8::from_str_radix(&hex[4..6], 16).ok()?,
        })
    }

    /// Formats the color as `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// What the widget shows: a short label on a colored tab with a glow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    /// Label drawn in the expanded widget.
    pub text: String,
    /// Tab fill as `#RRGGBB`.
    pub background: String,
    /// Label color as `#RRGGBB`.
    pub text_color: String,
    /// Glow/shadow color as `#RRGGBB`.
    pub glow: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            text: "W".into(),
            background: "#4070FF".into(),
            text_color: "#FFFFFF".into(),
            glow: "#4070FF".into(),
        }
    }
}

/// Parsed form of an [`Appearance`], ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub text: String,
    pub background: Color,
    pub text_color: Color,
    pub glow: Color,
}

impl Appearance {
    /// Replaces the appearance, keeping the previous value of any color
    /// that fails to parse.
    ///
    /// Returns the names of the rejected fields.
    pub fn customize(
        &mut self,
        background: &str,
        text: &str,
        text_color: &str,
        glow: &str,
    ) -> Vec<&'static str> {
        let mut rejected = Vec::new();
        let mut assign = |slot: &mut String, value: &str, name: &'static str| {
            match Color::from_hex(value) {
                Some(c) => *slot = c.to_hex(),
                None => rejected.push(name),
            }
        };
        assign(&mut self.background, background, "background");
        assign(&mut self.text_color, text_color, "text_color");
        assign(&mut self.glow, glow, "glow");
        self.text = text.to_string();

        for name in &rejected {
            log::warn!("Ignoring invalid widget {name} color");
        }
        rejected
    }

    /// Resolves hex strings into colors, substituting defaults for
    /// anything unparseable.
    pub fn palette(&self) -> Palette {
        let defaults = Appearance::default();
        let parse = |value: &str, fallback: &str| {
            Color::from_hex(value)
                .or_else(|| Color::from_hex(fallback))
                .unwrap_or(Color::WHITE)
        };
        Palette {
            text: self.text.clone(),
            background: parse(&self.background, &defaults.background),
            text_color: parse(&self.text_color, &defaults.text_color),
            glow: parse(&self.glow, &defaults.glow),
        }
    }
}
