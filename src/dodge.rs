//! Label de-collision for one column of chart labels.
//!
//! Labels that share an x position are nudged apart vertically until every
//! pair of neighbours (in value order) is at least `separation` apart, or the
//! iteration budget is spent. The relaxation is approximate: residual overlaps
//! smaller than `max_error` are accepted.

use log::debug;
use thiserror::Error;

/// Default number of relaxation passes.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;
/// Default convergence threshold (largest single adjustment in a pass).
pub const DEFAULT_MAX_ERROR: f64 = 0.1;

#[derive(Debug, Error, PartialEq)]
pub enum DodgeError {
    /// A label position was NaN or infinite.
    #[error("invalid label position {value} at index {index}")]
    InvalidPosition { index: usize, value: f64 },
}

/// Tuning knobs for [`dodge_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DodgeOptions {
    /// Minimum gap between adjacent labels once sorted by position.
    pub separation: f64,
    /// Upper bound on relaxation passes.
    pub max_iterations: usize,
    /// A pass whose largest adjustment is below this value ends the run.
    pub max_error: f64,
}

impl DodgeOptions {
    pub fn new(separation: f64) -> Self {
        Self {
            separation,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_error: DEFAULT_MAX_ERROR,
        }
    }

    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn max_error(mut self, e: f64) -> Self {
        self.max_error = e;
        self
    }
}

/// Result of a relaxation run with diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct DodgeReport {
    /// Adjusted positions, same length and order as the input.
    pub positions: Vec<f64>,
    /// Number of passes actually performed.
    pub iterations: usize,
    /// Whether a pass fell below `max_error` before the budget ran out.
    pub converged: bool,
}

/// Spread `positions` apart by at least `separation` using the default budget.
///
/// ```
/// let out = travel_viz::dodge::dodge(&[0.0, 10.0, 20.0], 5.0)?;
/// assert_eq!(out, vec![0.0, 10.0, 20.0]);
/// # Ok::<(), travel_viz::dodge::DodgeError>(())
/// ```
pub fn dodge(positions: &[f64], separation: f64) -> Result<Vec<f64>, DodgeError> {
    dodge_with(positions, &DodgeOptions::new(separation))
}

/// Like [`dodge`] with explicit iteration and error limits.
pub fn dodge_with(positions: &[f64], opts: &DodgeOptions) -> Result<Vec<f64>, DodgeError> {
    dodge_report(positions, opts).map(|r| r.positions)
}

/// Run the relaxation and report how it ended.
pub fn dodge_report(positions: &[f64], opts: &DodgeOptions) -> Result<DodgeReport, DodgeError> {
    if let Some((index, &value)) = positions.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(DodgeError::InvalidPosition { index, value });
    }

    let mut values = positions.to_vec();
    let n = values.len();
    if n < 2 {
        return Ok(DodgeReport {
            positions: values,
            iterations: 0,
            converged: true,
        });
    }

    // Sorted view over `values`; re-sorted each pass. `sort_by` is stable, so
    // equal values keep the order they had after the previous pass.
    let mut order: Vec<usize> = (0..n).collect();
    let mut iterations = 0;
    let mut converged = false;

    while iterations < opts.max_iterations {
        iterations += 1;
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

        let mut error = 0.0f64;
        for w in 1..n {
            let (prev, next) = (order[w - 1], order[w]);
            let delta = values[next] - values[prev];
            if delta < opts.separation {
                let adjustment = (opts.separation - delta) / 2.0;
                error = error.max(adjustment);
                values[prev] -= adjustment;
                values[next] += adjustment;
            }
        }

        if error < opts.max_error {
            converged = true;
            break;
        }
    }

    debug!(
        "dodge: {} labels, separation {}, {} passes, converged={}",
        n, opts.separation, iterations, converged
    );

    Ok(DodgeReport {
        positions: values,
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_gaps(v: &[f64]) -> Vec<f64> {
        let mut s = v.to_vec();
        s.sort_by(f64::total_cmp);
        s.windows(2).map(|w| w[1] - w[0]).collect()
    }

    #[test]
    fn trivial_inputs_pass_through() {
        assert_eq!(dodge(&[], 5.0).unwrap(), Vec::<f64>::new());
        assert_eq!(dodge(&[42.0], 5.0).unwrap(), vec![42.0]);
    }

    #[test]
    fn already_separated_is_unchanged() {
        assert_eq!(dodge(&[0.0, 10.0, 20.0], 5.0).unwrap(), vec![0.0, 10.0, 20.0]);
        // unsorted input with wide gaps
        assert_eq!(dodge(&[30.0, -5.0, 12.0], 5.0).unwrap(), vec![30.0, -5.0, 12.0]);
    }

    #[test]
    fn rejects_non_finite() {
        let err = dodge(&[1.0, f64::NAN, 3.0], 5.0).unwrap_err();
        assert!(matches!(err, DodgeError::InvalidPosition { index: 1, .. }));
        assert!(dodge(&[f64::INFINITY], 5.0).is_err());
        assert!(dodge(&[0.0, f64::NEG_INFINITY], 5.0).is_err());
    }

    #[test]
    fn equal_positions_expand_around_center() {
        let report = dodge_report(&[10.0, 10.0, 10.0], &DodgeOptions::new(4.0)).unwrap();
        assert!(report.converged);
        let out = report.positions;
        for (got, want) in out.iter().zip([6.0, 10.0, 14.0]) {
            assert!((got - want).abs() < 0.2, "got {out:?}");
        }
        // symmetric pushes keep the sum
        assert!((out.iter().sum::<f64>() - 30.0).abs() < 1e-9);
        for g in sorted_gaps(&out) {
            assert!(g >= 4.0 - DEFAULT_MAX_ERROR);
        }
    }

    #[test]
    fn preserves_input_order() {
        let input = [50.0, 12.0, 11.0, 49.0];
        let out = dodge(&input, 6.0).unwrap();
        assert_eq!(out.len(), input.len());
        // the label that started highest stays highest, etc.
        assert!(out[0] > out[3]);
        assert!(out[1] > out[2]);
        assert!(out[3] > out[1]);
    }

    #[test]
    fn budget_exhaustion_is_best_effort() {
        let opts = DodgeOptions::new(1000.0).max_iterations(2).max_error(1e-9);
        let report = dodge_report(&[0.0, 1.0, 2.0, 3.0], &opts).unwrap();
        assert_eq!(report.iterations, 2);
        assert!(!report.converged);
        assert_eq!(report.positions.len(), 4);
    }

    #[test]
    fn converged_runs_meet_separation() {
        let cases: [&[f64]; 4] = [
            &[0.0, 1.0, 2.0],
            &[5.0, 5.0, 6.0, 30.0],
            &[100.0, 98.0, 103.0, 101.0, 99.5],
            &[-3.0, -3.0],
        ];
        for input in cases {
            let opts = DodgeOptions::new(4.0).max_iterations(200);
            let report = dodge_report(input, &opts).unwrap();
            assert!(report.converged, "{input:?} did not converge");
            for g in sorted_gaps(&report.positions) {
                assert!(g >= 4.0 - opts.max_error, "{input:?} -> {:?}", report.positions);
            }
        }
    }
}
