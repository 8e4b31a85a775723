//! Gaussian peak model for diffraction patterns.
//!
//! XRD peak positions are refined by fitting a 4-parameter Gaussian
//! `A * exp(-(x - mu)^2 / (2 * sigma^2)) + B` to a windowed slice of the
//! pattern. The nonlinear least-squares solver is external; this module
//! provides the model, the FWHM/sigma relation used for initial guesses,
//! and the fit-window selection.

/// A 4-parameter Gaussian peak with constant baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianPeak {
    /// Peak amplitude above the baseline (A).
    pub amplitude: f64,
    /// Peak center (mu).
    pub center: f64,
    /// Standard deviation (sigma).
    pub sigma: f64,
    /// Constant baseline (B).
    pub baseline: f64,
}

impl GaussianPeak {
    /// Construct a peak from a full-width-at-half-maximum estimate,
    /// the usual form of an initial guess read off a plotted pattern.
    pub fn from_fwhm(amplitude: f64, center: f64, fwhm: f64, baseline: f64) -> Self {
        Self {
            amplitude,
            center,
            sigma: fwhm / (2.0 * 4.0f64.ln().sqrt()),
            baseline,
        }
    }

    /// Evaluate the model at a single point.
    pub fn eval(&self, x: f64) -> f64 {
        let d = x - self.center;
        self.amplitude * (-d * d / (2.0 * self.sigma * self.sigma)).exp() + self.baseline
    }

    /// Evaluate the model over a slice of points.
    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    /// Full width at half maximum: 2 * sqrt(ln 4) * sigma.
    pub fn fwhm(&self) -> f64 {
        2.0 * 4.0f64.ln().sqrt() * self.sigma
    }
}

/// Restrict paired samples to the open interval lo < x < hi.
///
/// Used to cut a fit window around a single peak before handing the data
/// to a solver.
pub fn window(x: &[f64], y: &[f64], lo: f64, hi: f64) -> (Vec<f64>, Vec<f64>) {
    debug_assert_eq!(x.len(), y.len(), "x and y must have same length");

    let mut wx = Vec::new();
    let mut wy = Vec::new();
    for (&xv, &yv) in x.iter().zip(y) {
        if xv > lo && xv < hi {
            wx.push(xv);
            wy.push(yv);
        }
    }
    (wx, wy)
}
