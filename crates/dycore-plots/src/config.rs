//! YAML configuration for the plotting tools.
//!
//! Every field has a default, so an empty file (or no file at all) gives
//! the stock look. Example:
//!
//! ```yaml
//! field:
//!   width: 1200
//!   height: 500
//!   colormap: viridis
//!   symmetric: [v, w]
//! series:
//!   line_color: "#1f77b4"
//! ratio_fields: false
//! ```

use std::path::{Path, PathBuf};

use renderer::style::hex_to_rgb;
use renderer::{Color, Colormap, ColormapConfig, FieldPlotOptions, SeriesPlotOptions, SkewTConfig};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default)]
    pub field: FieldConfig,

    #[serde(default)]
    pub series: SeriesConfig,

    #[serde(default)]
    pub skewt: SkewTSettings,

    #[serde(default)]
    pub output: OutputConfig,

    /// Render the `<d>c` density ratio fields
    #[serde(default = "default_true")]
    pub ratio_fields: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            series: SeriesConfig::default(),
            skewt: SkewTSettings::default(),
            output: OutputConfig::default(),
            ratio_fields: true,
        }
    }
}

impl PlotConfig {
    pub fn from_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
            .map_err(|e| PipelineError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml(yaml: &str) -> PipelineResult<Self> {
        // serde_yaml rejects an empty document for a struct
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| PipelineError::Config(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default = "default_field_width")]
    pub width: u32,

    #[serde(default = "default_field_height")]
    pub height: u32,

    #[serde(default)]
    pub colormap: ColormapConfig,

    /// Colormap for fields listed in `symmetric`
    #[serde(default = "default_diverging")]
    pub diverging_colormap: ColormapConfig,

    /// Label stems (the part before `.<member>`) scaled symmetrically about zero
    #[serde(default = "default_symmetric")]
    pub symmetric: Vec<String>,

    #[serde(default = "default_true")]
    pub colorbar: bool,

    #[serde(default = "default_nodata")]
    pub nodata_color: String,
}

fn default_field_width() -> u32 {
    900
}

fn default_field_height() -> u32 {
    450
}

fn default_diverging() -> ColormapConfig {
    ColormapConfig::Named("diverging".to_string())
}

fn default_symmetric() -> Vec<String> {
    vec!["v".to_string(), "w".to_string(), "qxz".to_string()]
}

fn default_nodata() -> String {
    "#C8C8C8".to_string()
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: default_field_width(),
            height: default_field_height(),
            colormap: ColormapConfig::default(),
            diverging_colormap: default_diverging(),
            symmetric: default_symmetric(),
            colorbar: true,
            nodata_color: default_nodata(),
        }
    }
}

impl FieldConfig {
    /// Whether the field labeled `label` uses a zero-centered scale.
    pub fn is_symmetric(&self, label: &str) -> bool {
        let stem = label.split('.').next().unwrap_or(label);
        self.symmetric.iter().any(|s| s == stem)
    }

    pub fn colormaps(&self) -> PipelineResult<(Colormap, Colormap)> {
        let build = |c: &ColormapConfig| c.build().map_err(|e| PipelineError::Config(e.to_string()));
        Ok((build(&self.colormap)?, build(&self.diverging_colormap)?))
    }

    pub fn plot_options(&self, symmetric: bool) -> PipelineResult<FieldPlotOptions> {
        Ok(FieldPlotOptions {
            width: self.width,
            height: self.height,
            symmetric,
            nodata: parse_color(&self.nodata_color)?,
            colorbar: self.colorbar,
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    #[serde(default = "default_series_width")]
    pub width: u32,

    #[serde(default = "default_series_height")]
    pub height: u32,

    #[serde(default = "default_series_color")]
    pub line_color: String,

    #[serde(default = "default_series_line_width")]
    pub line_width: f32,
}

fn default_series_width() -> u32 {
    800
}

fn default_series_height() -> u32 {
    400
}

fn default_series_color() -> String {
    "#1F77B4".to_string()
}

fn default_series_line_width() -> f32 {
    1.5
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            width: default_series_width(),
            height: default_series_height(),
            line_color: default_series_color(),
            line_width: default_series_line_width(),
        }
    }
}

impl SeriesConfig {
    pub fn plot_options(&self) -> PipelineResult<SeriesPlotOptions> {
        Ok(SeriesPlotOptions {
            width: self.width,
            height: self.height,
            line: parse_color(&self.line_color)?,
            line_width: self.line_width,
            ..Default::default()
        })
    }
}

/// Skew-T figure settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkewTSettings {
    #[serde(default = "default_skewt_width")]
    pub width: u32,

    #[serde(default = "default_skewt_height")]
    pub height: u32,

    #[serde(default = "default_temperature_color")]
    pub temperature_color: String,

    #[serde(default = "default_dew_point_color")]
    pub dew_point_color: String,

    #[serde(default = "default_dry_adiabat_color")]
    pub dry_adiabat_color: String,

    #[serde(default = "default_moist_adiabat_color")]
    pub moist_adiabat_color: String,

    #[serde(default = "default_adiabat_alpha")]
    pub adiabat_alpha: f32,

    #[serde(default = "default_profile_width")]
    pub profile_width: f32,
}

fn default_skewt_width() -> u32 {
    900
}

fn default_skewt_height() -> u32 {
    1100
}

fn default_temperature_color() -> String {
    "#FF0000".to_string()
}

fn default_dew_point_color() -> String {
    "#008000".to_string()
}

fn default_dry_adiabat_color() -> String {
    "#FF4500".to_string()
}

fn default_moist_adiabat_color() -> String {
    "#008000".to_string()
}

fn default_adiabat_alpha() -> f32 {
    0.25
}

fn default_profile_width() -> f32 {
    2.0
}

impl Default for SkewTSettings {
    fn default() -> Self {
        Self {
            width: default_skewt_width(),
            height: default_skewt_height(),
            temperature_color: default_temperature_color(),
            dew_point_color: default_dew_point_color(),
            dry_adiabat_color: default_dry_adiabat_color(),
            moist_adiabat_color: default_moist_adiabat_color(),
            adiabat_alpha: default_adiabat_alpha(),
            profile_width: default_profile_width(),
        }
    }
}

impl SkewTSettings {
    pub fn diagram_config(&self) -> SkewTConfig {
        SkewTConfig {
            width: self.width,
            height: self.height,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory plots are written to; the CLI flag takes precedence
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Zero-padded width of the time index in field file names
    #[serde(default = "default_time_digits")]
    pub time_digits: usize,
}

fn default_time_digits() -> usize {
    4
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            time_digits: default_time_digits(),
        }
    }
}

/// Parse a `#RRGGBB` color.
pub fn parse_color(hex: &str) -> PipelineResult<Color> {
    hex_to_rgb(hex)
        .map(|(r, g, b)| Color::opaque(r, g, b))
        .ok_or_else(|| PipelineError::Config(format!("invalid color '{}'", hex)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(PlotConfig::from_yaml("").unwrap(), PlotConfig::default());
        assert!(PlotConfig::default().ratio_fields);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = PlotConfig::from_yaml(
            "field:\n  width: 1200\n  colormap: gray\nratio_fields: false\n",
        )
        .unwrap();
        assert_eq!(config.field.width, 1200);
        assert_eq!(config.field.height, 450);
        assert_eq!(config.field.colormap, ColormapConfig::Named("gray".into()));
        assert!(!config.ratio_fields);
        assert_eq!(config.output.time_digits, 4);
    }

    #[test]
    fn test_colormap_stops_in_yaml() {
        let yaml = r##"
field:
  colormap:
    stops:
      - { position: 0.0, color: "#000000" }
      - { position: 1.0, color: "#FFFFFF" }
"##;
        let config = PlotConfig::from_yaml(yaml).unwrap();
        let (cmap, _) = config.field.colormaps().unwrap();
        assert_eq!(cmap.sample(1.0), Color::WHITE);
    }

    #[test]
    fn test_is_symmetric_uses_label_stem() {
        let field = FieldConfig::default();
        assert!(field.is_symmetric("v.0"));
        assert!(field.is_symmetric("qxz.3"));
        assert!(!field.is_symmetric("vl.0"));
        assert!(!field.is_symmetric("h.0"));
    }

    #[test]
    fn test_bad_color_is_config_error() {
        let series = SeriesConfig {
            line_color: "blue".into(),
            ..Default::default()
        };
        assert!(matches!(series.plot_options(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_malformed_section_is_error() {
        assert!(PlotConfig::from_yaml("field: [1, 2]").is_err());
    }
}
