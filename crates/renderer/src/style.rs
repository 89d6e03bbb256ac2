//! Colormap configuration loaded from JSON or YAML.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::colormap::{Color, Colormap};

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Failed to parse style: {0}")]
    ParseError(String),

    #[error("Invalid color '{0}' (expected #RRGGBB)")]
    InvalidColor(String),

    #[error("Colormap needs at least 2 stops, got {0}")]
    TooFewStops(usize),

    #[error("Colormap stop positions must be increasing and within [0, 1]")]
    InvalidStops,

    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),
}

/// Color stop at a normalized position in [0, 1]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColorStop {
    pub position: f32,
    pub color: String,
}

/// A colormap either by name or by explicit stops.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ColormapConfig {
    Named(String),
    Stops { stops: Vec<ColorStop> },
}

impl Default for ColormapConfig {
    fn default() -> Self {
        ColormapConfig::Named("viridis".to_string())
    }
}

impl ColormapConfig {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        serde_json::from_str(json).map_err(|e| StyleError::ParseError(e.to_string()))
    }

    /// Build the colormap this configuration describes.
    pub fn build(&self) -> Result<Colormap, StyleError> {
        match self {
            ColormapConfig::Named(name) => {
                Colormap::by_name(name).ok_or_else(|| StyleError::UnknownColormap(name.clone()))
            }
            ColormapConfig::Stops { stops } => {
                let parsed = stops
                    .iter()
                    .map(|stop| {
                        hex_to_rgb(&stop.color)
                            .map(|(r, g, b)| (stop.position, Color::opaque(r, g, b)))
                            .ok_or_else(|| StyleError::InvalidColor(stop.color.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Colormap::new(parsed)
            }
        }
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FF0000"), Some((255, 0, 0)));
        assert_eq!(hex_to_rgb("#00FF00"), Some((0, 255, 0)));
        assert_eq!(hex_to_rgb("#0000FF"), Some((0, 0, 255)));
        assert_eq!(hex_to_rgb("FF0000"), Some((255, 0, 0)));
        assert_eq!(hex_to_rgb("#GGGGGG"), None);
        assert_eq!(hex_to_rgb("#FFF"), None);
    }
}
