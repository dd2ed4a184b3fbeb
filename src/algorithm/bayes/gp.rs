//! Gaussian-process regression surrogate.
//!
//! Matérn 5/2 kernel with one shared length scale over min-max scaled inputs.
//! Targets are standardized for fitting and predictions are mapped back to
//! raw objective units. The length scale is the point of a fixed
//! log-spaced grid with the highest log marginal likelihood.

use nalgebra::{Cholesky, DMatrix, DVector, Dyn};

const SQRT_5: f64 = 2.236_067_977_499_79;

/// Length-scale grid: `LENGTH_SCALE_STEPS` log-spaced points in `[1e-2, 1e2]`.
const LENGTH_SCALE_STEPS: i32 = 25;
const LOG10_LENGTH_SCALE_MIN: f64 = -2.0;
const LOG10_LENGTH_SCALE_MAX: f64 = 2.0;

/// Times the noise term is multiplied by 10 when factorization fails.
const JITTER_RETRIES: usize = 4;

/// Fitted Gaussian process.
pub(crate) struct GaussianProcess {
    x_train: Vec<Vec<f64>>,
    x_offset: Vec<f64>,
    x_scale: Vec<f64>,
    length_scale: f64,
    cholesky: Cholesky<f64, Dyn>,
    alpha: DVector<f64>,
    y_mean: f64,
    y_std: f64,
}

// ---------------------------------------------------------------------------
// Kernel
// ---------------------------------------------------------------------------

/// Matérn 5/2 kernel with unit signal variance.
///
/// `k(r) = (1 + √5 r/l + 5r²/(3l²)) exp(-√5 r/l)`
fn matern52(a: &[f64], b: &[f64], length_scale: f64) -> f64 {
    let r_sq: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let d = (x - y) / length_scale;
            d * d
        })
        .sum();
    let sqrt5_r = SQRT_5 * r_sq.sqrt();
    (1.0 + sqrt5_r + 5.0 / 3.0 * r_sq) * (-sqrt5_r).exp()
}

fn kernel_matrix(x: &[Vec<f64>], length_scale: f64, noise: f64) -> DMatrix<f64> {
    let n = x.len();
    DMatrix::from_fn(n, n, |i, j| {
        let k = matern52(&x[i], &x[j], length_scale);
        if i == j { k + noise } else { k }
    })
}

// ---------------------------------------------------------------------------
// Fitting
// ---------------------------------------------------------------------------

/// Factorize `K + noise·I`, growing the noise tenfold on failure.
fn factorize(x: &[Vec<f64>], length_scale: f64, noise: f64) -> Option<Cholesky<f64, Dyn>> {
    let mut noise = noise.max(1e-12);
    for _ in 0..=JITTER_RETRIES {
        if let Some(chol) = Cholesky::new(kernel_matrix(x, length_scale, noise)) {
            return Some(chol);
        }
        noise *= 10.0;
    }
    None
}

/// `log p(y | X) = -½ yᵀα - Σ log L_ii - n/2 log 2π`
#[allow(clippy::cast_precision_loss)]
fn log_marginal_likelihood(
    chol: &Cholesky<f64, Dyn>,
    y: &DVector<f64>,
    alpha: &DVector<f64>,
) -> f64 {
    let log_det: f64 = chol.l_dirty().diagonal().iter().map(|d| d.ln()).sum();
    let n = y.len() as f64;
    -0.5 * y.dot(alpha) - log_det - 0.5 * n * core::f64::consts::TAU.ln()
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

impl GaussianProcess {
    /// Fits the surrogate to rows `x` with targets `y`.
    ///
    /// Returns `None` when there is no data, when the inputs are ragged, or
    /// when no grid length scale yields a positive-definite kernel matrix.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn fit(x: &[Vec<f64>], y: &[f64], noise_variance: f64) -> Option<Self> {
        let n = y.len();
        if n == 0 || x.len() != n {
            return None;
        }
        let d = x[0].len();
        if x.iter().any(|row| row.len() != d) {
            return None;
        }

        // Min-max scale every input column to [0, 1]
        let mut x_offset = vec![f64::INFINITY; d];
        let mut upper = vec![f64::NEG_INFINITY; d];
        for row in x {
            for (j, &v) in row.iter().enumerate() {
                x_offset[j] = x_offset[j].min(v);
                upper[j] = upper[j].max(v);
            }
        }
        let x_scale: Vec<f64> = x_offset
            .iter()
            .zip(&upper)
            .map(|(lo, hi)| if hi - lo > 1e-12 { hi - lo } else { 1.0 })
            .collect();
        let x_train: Vec<Vec<f64>> = x
            .iter()
            .map(|row| scale_row(row, &x_offset, &x_scale))
            .collect();

        let y_mean = y.iter().sum::<f64>() / n as f64;
        let y_var = if n > 1 {
            y.iter().map(|v| (v - y_mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let y_std = if y_var > 1e-24 { y_var.sqrt() } else { 1.0 };
        let y_vec = DVector::from_iterator(n, y.iter().map(|v| (v - y_mean) / y_std));

        let mut best: Option<(f64, f64, Cholesky<f64, Dyn>, DVector<f64>)> = None;
        for step in 0..LENGTH_SCALE_STEPS {
            let t = f64::from(step) / f64::from(LENGTH_SCALE_STEPS - 1);
            let exponent =
                LOG10_LENGTH_SCALE_MIN + t * (LOG10_LENGTH_SCALE_MAX - LOG10_LENGTH_SCALE_MIN);
            let length_scale = 10f64.powf(exponent);
            let Some(chol) = factorize(&x_train, length_scale, noise_variance) else {
                continue;
            };
            let alpha = chol.solve(&y_vec);
            let lml = log_marginal_likelihood(&chol, &y_vec, &alpha);
            if lml.is_finite() && best.as_ref().is_none_or(|(b, ..)| lml > *b) {
                best = Some((lml, length_scale, chol, alpha));
            }
        }

        let (_, length_scale, cholesky, alpha) = best?;
        Some(Self {
            x_train,
            x_offset,
            x_scale,
            length_scale,
            cholesky,
            alpha,
            y_mean,
            y_std,
        })
    }

    /// Predicted mean and standard deviation at `x`, in objective units.
    pub(crate) fn predict(&self, x: &[f64]) -> (f64, f64) {
        let x = scale_row(x, &self.x_offset, &self.x_scale);
        let k_star = DVector::from_fn(self.x_train.len(), |i, _| {
            matern52(&x, &self.x_train[i], self.length_scale)
        });

        let mean = k_star.dot(&self.alpha);
        let v = self.cholesky.solve(&k_star);
        let var = (1.0 - k_star.dot(&v)).max(0.0);

        (mean * self.y_std + self.y_mean, var.sqrt() * self.y_std)
    }
}

// ---------------------------------------------------------------------------
// Input scaling
// ---------------------------------------------------------------------------

fn scale_row(row: &[f64], offset: &[f64], scale: &[f64]) -> Vec<f64> {
    row.iter()
        .zip(offset.iter().zip(scale))
        .map(|(v, (o, s))| (v - o) / s)
        .collect()
}
