//! Moist thermodynamics for skew-T reference lines.
//!
//! Temperatures are in kelvin and pressures in hPa throughout.

/// Dry-air gas constant (J kg⁻¹ K⁻¹)
pub const RD: f64 = 287.04749;
/// Specific heat of dry air at constant pressure (J kg⁻¹ K⁻¹)
pub const CP_D: f64 = 1004.6662;
/// Latent heat of vaporization (J kg⁻¹)
pub const LV: f64 = 2.50084e6;
/// Ratio of molecular weights, water vapor to dry air
pub const EPSILON: f64 = 0.6219569;
pub const KAPPA: f64 = RD / CP_D;
/// Reference pressure for potential temperature (hPa)
pub const P0: f64 = 1000.0;
pub const ZERO_CELSIUS: f64 = 273.15;

/// Largest pressure step taken when integrating a moist adiabat (hPa).
const MAX_STEP_HPA: f64 = 5.0;

/// Saturation vapor pressure over water (Bolton 1980), hPa.
pub fn saturation_vapor_pressure(t: f64) -> f64 {
    6.112 * (17.67 * (t - ZERO_CELSIUS) / (t - 29.65)).exp()
}

/// Saturation mixing ratio (kg/kg) at pressure `p` and temperature `t`.
pub fn saturation_mixing_ratio(p: f64, t: f64) -> f64 {
    let es = saturation_vapor_pressure(t);
    EPSILON * es / (p - es)
}

/// Temperature along the dry adiabat through `t0` at 1000 hPa.
pub fn dry_adiabat(p: f64, t0: f64) -> f64 {
    t0 * (p / P0).powf(KAPPA)
}

/// dT/dp along a saturated pseudo-adiabat (K/hPa).
pub fn moist_lapse_rate(p: f64, t: f64) -> f64 {
    let rs = saturation_mixing_ratio(p, t);
    let numerator = RD * t + LV * rs;
    let denominator = CP_D + LV * LV * rs * EPSILON / (RD * t * t);
    numerator / denominator / p
}

/// Temperatures along the moist adiabat starting at `t0` at 1000 hPa,
/// evaluated at each of `pressures`.
///
/// Integrates with fixed-step RK4 from the reference level in both
/// directions; `pressures` may be in any order.
pub fn moist_adiabat(pressures: &[f64], t0: f64) -> Vec<f64> {
    pressures
        .iter()
        .map(|&p| integrate_moist(P0, t0, p))
        .collect()
}

fn integrate_moist(p_start: f64, t_start: f64, p_end: f64) -> f64 {
    let span = p_end - p_start;
    if span == 0.0 {
        return t_start;
    }
    let steps = (span.abs() / MAX_STEP_HPA).ceil().max(1.0) as usize;
    let h = span / steps as f64;

    let mut p = p_start;
    let mut t = t_start;
    for _ in 0..steps {
        let k1 = moist_lapse_rate(p, t);
        let k2 = moist_lapse_rate(p + h / 2.0, t + h / 2.0 * k1);
        let k3 = moist_lapse_rate(p + h / 2.0, t + h / 2.0 * k2);
        let k4 = moist_lapse_rate(p + h, t + h * k3);
        t += h / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
        p += h;
    }
    t
}

/// Evenly spaced values in `[start, stop)` with step `step`.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step == 0.0 || (stop - start) / step <= 0.0 {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}
