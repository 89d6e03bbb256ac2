//! PNG file output.

use std::fs;
use std::path::{Path, PathBuf};

use netcdf_parser::DataArray;
use renderer::{
    encode_pixmap, relative_change, render_field, render_series, Colormap, PlotLabels,
    SeriesPlotOptions,
};
use tracing::debug;

use crate::config::PlotConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::execute::PlotSink;

/// Writes each plot to `<dir>/<label>.png` or `<dir>/<label>.t<NNNN>.png`.
pub struct PngFileSink {
    output_dir: PathBuf,
    config: PlotConfig,
    colormap: Colormap,
    diverging: Colormap,
    series: SeriesPlotOptions,
    written: Vec<PathBuf>,
}

impl PngFileSink {
    /// Create the sink, creating `output_dir` if it does not exist.
    pub fn new(output_dir: impl Into<PathBuf>, config: PlotConfig) -> PipelineResult<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        let (colormap, diverging) = config.field.colormaps()?;
        let series = config.series.plot_options()?;
        Ok(Self {
            output_dir,
            config,
            colormap,
            diverging,
            series,
            written: Vec::new(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Paths written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn field_path(&self, label: &str, time_index: usize) -> PathBuf {
        let digits = self.config.output.time_digits;
        self.output_dir
            .join(format!("{}.t{:0width$}.png", label, time_index, width = digits))
    }

    pub fn statistic_path(&self, label: &str) -> PathBuf {
        self.output_dir.join(format!("{}.png", label))
    }

    fn write(&mut self, path: PathBuf, png: Vec<u8>) -> PipelineResult<()> {
        fs::write(&path, &png)?;
        debug!(path = %path.display(), bytes = png.len(), "Wrote plot");
        self.written.push(path);
        Ok(())
    }

    fn series(&mut self, label: &str, data: &DataArray, relative: bool) -> PipelineResult<()> {
        if data.ndim() != 1 {
            return Err(PipelineError::UnsupportedRank {
                label: label.to_string(),
                rank: data.ndim(),
            });
        }
        let values = if relative {
            relative_change(data.values())
        } else {
            data.values().to_vec()
        };
        let labels = PlotLabels {
            title: label,
            x: "t",
            y: if relative { "relative change" } else { "value" },
        };
        let png = render_series(&values, &labels, &self.series)
            .and_then(|pixmap| encode_pixmap(&pixmap))
            .map_err(|message| render_error(label, message))?;
        let path = self.statistic_path(label);
        self.write(path, png)
    }
}

fn render_error(label: &str, message: String) -> PipelineError {
    PipelineError::Render {
        label: label.to_string(),
        message,
    }
}

impl PlotSink for PngFileSink {
    fn scalar_field(&mut self, label: &str, data: &DataArray, time_index: usize) -> PipelineResult<()> {
        let (nrows, ncols) = match data.shape().as_slice() {
            [n] => (1, *n),
            [rows, cols] => (*rows, *cols),
            _ => {
                return Err(PipelineError::UnsupportedRank {
                    label: label.to_string(),
                    rank: data.ndim(),
                })
            }
        };

        let symmetric = self.config.field.is_symmetric(label);
        let options = self.config.field.plot_options(symmetric)?;
        let colormap = if symmetric {
            &self.diverging
        } else {
            &self.colormap
        };

        let labels = PlotLabels {
            title: label,
            x: "x",
            y: if nrows > 1 { "z" } else { "" },
        };
        let png = render_field(data.values(), nrows, ncols, colormap, &labels, &options)
            .and_then(|pixmap| encode_pixmap(&pixmap))
            .map_err(|message| render_error(label, message))?;
        let path = self.field_path(label, time_index);
        self.write(path, png)
    }

    fn statistic(&mut self, label: &str, data: &DataArray) -> PipelineResult<()> {
        self.series(label, data, true)
    }

    fn raw_statistic(&mut self, label: &str, data: &DataArray) -> PipelineResult<()> {
        self.series(label, data, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcdf_parser::Dimension;
    use tempfile::TempDir;

    #[test]
    fn test_file_names() {
        let dir = TempDir::new().unwrap();
        let sink = PngFileSink::new(dir.path(), PlotConfig::default()).unwrap();
        assert_eq!(sink.field_path("h.0", 7), dir.path().join("h.0.t0007.png"));
        assert_eq!(sink.statistic_path("total_mass.0"), dir.path().join("total_mass.0.png"));
    }

    #[test]
    fn test_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let sink = PngFileSink::new(&nested, PlotConfig::default()).unwrap();
        assert!(sink.output_dir().is_dir());
    }

    #[test]
    fn test_rank_three_field_rejected() {
        let dir = TempDir::new().unwrap();
        let mut sink = PngFileSink::new(dir.path(), PlotConfig::default()).unwrap();
        let data = DataArray::new(
            "cube",
            vec![Dimension::new("a", 2), Dimension::new("b", 2), Dimension::new("c", 2)],
            vec![0.0; 8],
        )
        .unwrap();
        let err = sink.scalar_field("cube.0", &data, 0).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedRank { rank: 3, .. }));
        assert!(sink.written().is_empty());
    }

    #[test]
    fn test_statistic_needs_series() {
        let dir = TempDir::new().unwrap();
        let mut sink = PngFileSink::new(dir.path(), PlotConfig::default()).unwrap();
        let scalar = DataArray::new("s", vec![], vec![1.0]).unwrap();
        assert!(sink.statistic("total_pv.0", &scalar).is_err());

        let series = DataArray::from_vec("mass", "t", vec![1.0, 1.0, 1.0]);
        sink.statistic("total_mass.0", &series).unwrap();
        assert!(dir.path().join("total_mass.0.png").is_file());
    }

    #[test]
    fn test_label_is_drawn_on_field() {
        let dir = TempDir::new().unwrap();
        let mut sink = PngFileSink::new(dir.path(), PlotConfig::default()).unwrap();
        let data = DataArray::new(
            "h",
            vec![Dimension::new("z", 4), Dimension::new("x", 6)],
            (0..24).map(f64::from).collect(),
        )
        .unwrap();
        sink.scalar_field("h.0", &data, 0).unwrap();
        sink.scalar_field("hs.0", &data, 0).unwrap();

        let first = fs::read(dir.path().join("h.0.t0000.png")).unwrap();
        let second = fs::read(dir.path().join("hs.0.t0000.png")).unwrap();
        assert_ne!(first, second);
    }
}
