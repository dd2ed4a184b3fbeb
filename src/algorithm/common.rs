//! Shared configuration-level utilities used across multiple algorithms.

use core::cmp::Ordering;

use crate::error::Result;
use crate::parameter::Parameter;
use crate::results::ResultRow;
use crate::suggestion::Configuration;
use crate::types::Direction;

/// Sample one value for every parameter.
pub(crate) fn sample_configuration(
    parameters: &[Parameter],
    rng: &mut fastrand::Rng,
) -> Result<Configuration> {
    parameters
        .iter()
        .map(|p| Ok((p.name().to_owned(), p.sample(rng)?)))
        .collect()
}

/// Order two objectives best-first for `direction`. NaN sorts last.
pub(crate) fn compare_objectives(a: f64, b: f64, direction: Direction) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match direction {
            Direction::Minimize => a.total_cmp(&b),
            Direction::Maximize => b.total_cmp(&a),
        },
    }
}

/// Sort `rows` best-first and draw one uniformly from the first `top` entries.
///
/// `top` is clamped to `[1, rows.len()]`. Returns `None` for an empty slice.
pub(crate) fn pick_from_top<'a>(
    mut rows: Vec<&'a ResultRow>,
    top: usize,
    direction: Direction,
    rng: &mut fastrand::Rng,
) -> Option<&'a ResultRow> {
    if rows.is_empty() {
        return None;
    }
    rows.sort_by(|a, b| compare_objectives(a.objective, b.objective, direction));
    let top = top.clamp(1, rows.len());
    Some(rows[rng.usize(0..top)])
}

/// Returns `true` if `config` matches `other` on every declared parameter.
pub(crate) fn same_configuration(
    parameters: &[Parameter],
    config: &Configuration,
    other: &Configuration,
) -> bool {
    parameters
        .iter()
        .all(|p| match (config.get(p.name()), other.get(p.name())) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        })
}
