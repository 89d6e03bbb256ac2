//! Skew-T rendering of a single sounding.

use netcdf_parser::Sounding;
use renderer::thermo::arange;
use renderer::{encode_pixmap, LineStyle, SkewT};
use tracing::info;

use crate::config::{parse_color, SkewTSettings};
use crate::error::{PipelineError, PipelineResult};

/// Starting temperatures (K at 1000 hPa) of the reference dry adiabats.
pub fn dry_adiabat_starts() -> Vec<f64> {
    arange(233.0, 533.0, 20.0)
}

/// Starting temperatures (K at 1000 hPa) of the reference moist adiabats.
pub fn moist_adiabat_starts() -> Vec<f64> {
    arange(230.0, 400.0, 5.0)
}

/// Draw `sounding` on a skew-T diagram and encode it as PNG.
pub fn render_sounding(sounding: &Sounding, settings: &SkewTSettings) -> PipelineResult<Vec<u8>> {
    let mut skew = SkewT::new(settings.diagram_config()).map_err(skewt_error)?;

    let dry = LineStyle::new(parse_color(&settings.dry_adiabat_color)?, 1.0)
        .with_alpha(settings.adiabat_alpha);
    let moist = LineStyle::new(parse_color(&settings.moist_adiabat_color)?, 1.0)
        .with_alpha(settings.adiabat_alpha);
    skew.plot_dry_adiabats(&dry_adiabat_starts(), &dry);
    skew.plot_moist_adiabats(&moist_adiabat_starts(), &moist);

    let temperature = LineStyle::new(
        parse_color(&settings.temperature_color)?,
        settings.profile_width,
    );
    let dew_point = LineStyle::new(parse_color(&settings.dew_point_color)?, settings.profile_width);
    skew.plot(&sounding.pressure_hpa, &sounding.temperature_c, &temperature);
    skew.plot(&sounding.pressure_hpa, &sounding.dew_point_c, &dew_point);

    let png = encode_pixmap(&skew.finish()).map_err(skewt_error)?;
    info!(levels = sounding.len(), bytes = png.len(), "Rendered skew-T");
    Ok(png)
}

fn skewt_error(message: String) -> PipelineError {
    PipelineError::Render {
        label: "skewt".to_string(),
        message,
    }
}
