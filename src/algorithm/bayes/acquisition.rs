//! Expected-improvement acquisition and the normal distribution helpers it needs.

use crate::types::Direction;

/// Standard normal PDF.
fn norm_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal CDF (Hart / Abramowitz-Stegun rational approximation).
///
/// Saturates to exactly 0 and 1 beyond |x| > 8, including at the infinities.
/// NaN propagates.
pub(crate) fn norm_cdf(x: f64) -> f64 {
    if x < -8.0 {
        return 0.0;
    }
    if x > 8.0 {
        return 1.0;
    }

    let abs_x = x.abs();
    let t = 1.0 / (1.0 + 0.231_641_9 * abs_x);
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;

    let poly = 0.319_381_530 * t - 0.356_563_782 * t2 + 1.781_477_937 * t3 - 1.821_255_978 * t4
        + 1.330_274_429 * t5;
    let cdf = 1.0 - norm_pdf(abs_x) * poly;

    if x >= 0.0 { cdf } else { 1.0 - cdf }
}

/// Expected improvement of a prediction over `best`.
///
/// `d` is the predicted improvement in the direction of optimization, shrunk
/// by `epsilon`:
///
/// - minimize: `d = best - mean + epsilon`
/// - maximize: `d = mean - best - epsilon`
///
/// and `EI = d * Φ(d / std)`. A zero `std` makes `d / std` infinite, so EI
/// collapses to `max(d, 0)`; the `0 / 0` case is defined as zero. A NaN
/// prediction yields NaN.
pub(crate) fn expected_improvement(
    mean: f64,
    std: f64,
    best: f64,
    epsilon: f64,
    direction: Direction,
) -> f64 {
    let d = match direction {
        Direction::Minimize => best - mean + epsilon,
        Direction::Maximize => mean - best - epsilon,
    };
    if d == 0.0 && std == 0.0 {
        return 0.0;
    }
    let ei = d * norm_cdf(d / std);
    // d < 0 with zero std gives -0.0
    if ei == 0.0 { 0.0 } else { ei }
}
