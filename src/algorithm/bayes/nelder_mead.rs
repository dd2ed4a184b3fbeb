//! Bounded Nelder–Mead simplex minimizer.
//!
//! Every vertex is clamped into the box before evaluation. Non-finite
//! objective values are treated as `+∞`.

/// Relative step used to build the initial simplex around a non-zero coordinate.
const NONZERO_DELTA: f64 = 0.05;
/// Absolute step used for coordinates at zero.
const ZERO_DELTA: f64 = 0.000_25;

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Stopping criteria.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Options {
    /// Iteration cap; `None` means `200 * n`. With a cap of 0 only the start
    /// point is evaluated.
    pub(crate) max_iter: Option<usize>,
    /// Largest allowed vertex spread in `x` at convergence.
    pub(crate) xatol: f64,
    /// Largest allowed spread in `f` at convergence.
    pub(crate) fatol: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_iter: None,
            xatol: 1e-4,
            fatol: 1e-4,
        }
    }
}

fn clamp(x: &mut [f64], bounds: &[(f64, f64)]) {
    for (v, &(lo, hi)) in x.iter_mut().zip(bounds) {
        *v = v.clamp(lo.min(hi), hi.max(lo));
    }
}

/// Minimizes `f` starting from `x0` within `bounds`.
///
/// Returns the best vertex found and its value. With an empty `x0` or an
/// iteration cap of 0 the start point is evaluated once and returned.
#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
pub(crate) fn minimize<F>(
    mut f: F,
    x0: &[f64],
    bounds: &[(f64, f64)],
    options: Options,
) -> (Vec<f64>, f64)
where
    F: FnMut(&[f64]) -> f64,
{
    let mut eval = |x: &[f64]| {
        let v = f(x);
        if v.is_finite() { v } else { f64::INFINITY }
    };

    let n = x0.len();
    let mut start = x0.to_vec();
    clamp(&mut start, bounds);
    let max_iter = options.max_iter.unwrap_or(200 * n);
    if n == 0 || max_iter == 0 {
        let v = eval(&start);
        return (start, v);
    }

    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
    simplex.push((start.clone(), eval(&start)));
    for i in 0..n {
        let mut x = start.clone();
        x[i] = if x[i] == 0.0 {
            ZERO_DELTA
        } else {
            x[i] * (1.0 + NONZERO_DELTA)
        };
        clamp(&mut x, bounds);
        if x[i] == start[i] {
            // Pinned against the upper bound; step inward instead
            x[i] = if start[i] == 0.0 {
                -ZERO_DELTA
            } else {
                start[i] * (1.0 - NONZERO_DELTA)
            };
            clamp(&mut x, bounds);
        }
        let v = eval(&x);
        simplex.push((x, v));
    }

    for _ in 0..max_iter {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

        let (best_x, best_f) = &simplex[0];
        let x_spread = simplex[1..]
            .iter()
            .flat_map(|(x, _)| x.iter().zip(best_x).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);
        let f_spread = simplex[1..]
            .iter()
            .map(|(_, v)| (v - best_f).abs())
            .fold(0.0, f64::max);
        if x_spread <= options.xatol && f_spread <= options.fatol {
            break;
        }

        let centroid: Vec<f64> = (0..n)
            .map(|j| simplex[..n].iter().map(|(x, _)| x[j]).sum::<f64>() / n as f64)
            .collect();
        let worst = simplex[n].clone();
        let towards = |coef: f64| {
            let mut x: Vec<f64> = centroid
                .iter()
                .zip(&worst.0)
                .map(|(c, w)| c + coef * (c - w))
                .collect();
            clamp(&mut x, bounds);
            x
        };

        let xr = towards(REFLECT);
        let fr = eval(&xr);
        if fr < simplex[0].1 {
            let xe = towards(REFLECT * EXPAND);
            let fe = eval(&xe);
            simplex[n] = if fe < fr { (xe, fe) } else { (xr, fr) };
            continue;
        }
        if fr < simplex[n - 1].1 {
            simplex[n] = (xr, fr);
            continue;
        }

        let (xc, fc, accept) = if fr < worst.1 {
            let xc = towards(REFLECT * CONTRACT);
            let fc = eval(&xc);
            let accept = fc <= fr;
            (xc, fc, accept)
        } else {
            let xc = towards(-CONTRACT);
            let fc = eval(&xc);
            let accept = fc < worst.1;
            (xc, fc, accept)
        };
        if accept {
            simplex[n] = (xc, fc);
            continue;
        }

        let anchor = simplex[0].0.clone();
        for (x, v) in simplex.iter_mut().skip(1) {
            for (xi, ai) in x.iter_mut().zip(&anchor) {
                *xi = ai + SHRINK * (*xi - ai);
            }
            clamp(x, bounds);
            *v = eval(x.as_slice());
        }
    }

    simplex
        .into_iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap_or((start, f64::INFINITY))
}
