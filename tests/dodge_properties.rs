use travel_viz::dodge::{DodgeError, DodgeOptions, dodge, dodge_report, dodge_with};

fn sorted_gaps(v: &[f64]) -> Vec<f64> {
    let mut s = v.to_vec();
    s.sort_by(f64::total_cmp);
    s.windows(2).map(|w| w[1] - w[0]).collect()
}

#[test]
fn well_spaced_labels_do_not_move() {
    let input = [12.0, 80.0, 40.0, 200.0];
    let out = dodge(&input, 15.0).unwrap();
    for (a, b) in input.iter().zip(&out) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn output_keeps_length_and_label_identity() {
    let input = [300.0, 301.0, 120.0, 302.0, 119.0];
    let out = dodge(&input, 15.0).unwrap();
    assert_eq!(out.len(), input.len());
    // labels only shift, they keep their relative order
    let rank = |v: &[f64]| {
        let mut idx: Vec<usize> = (0..v.len()).collect();
        idx.sort_by(|&a, &b| v[a].total_cmp(&v[b]));
        idx
    };
    assert_eq!(rank(&input), rank(&out));
}

#[test]
fn three_equal_positions_spread_to_separation() {
    let out = dodge(&[10.0, 10.0, 10.0], 4.0).unwrap();
    let expected = [6.0, 10.0, 14.0];
    for (got, want) in out.iter().zip(expected) {
        assert!((got - want).abs() < 0.2, "{out:?}");
    }
    for g in sorted_gaps(&out) {
        assert!(g >= 4.0 - 0.1, "{out:?}");
    }
}

#[test]
fn nan_is_rejected_with_its_index() {
    let err = dodge(&[1.0, f64::NAN, 3.0], 5.0).unwrap_err();
    let DodgeError::InvalidPosition { index, value } = err;
    assert_eq!(index, 1);
    assert!(value.is_nan());
}

#[test]
fn oversized_separation_never_fails() {
    let opts = DodgeOptions::new(1e6);
    let report = dodge_report(&[1.0, 2.0, 3.0, 4.0, 5.0], &opts).unwrap();
    assert!(!report.converged);
    assert_eq!(report.iterations, opts.max_iterations);
    assert!(report.positions.iter().all(|v| v.is_finite()));
}

#[test]
fn custom_budget_is_honored() {
    let opts = DodgeOptions::new(4.0).max_iterations(1).max_error(1e-6);
    let report = dodge_report(&[0.0, 0.0, 0.0], &opts).unwrap();
    assert_eq!(report.iterations, 1);
    assert_eq!(
        dodge_with(&[0.0, 0.0, 0.0], &opts).unwrap(),
        report.positions
    );
}

#[test]
fn repeated_calls_are_identical() {
    let input = [50.0, 51.0, 49.0, 50.5, 120.0];
    let a = dodge(&input, 10.0).unwrap();
    let b = dodge(&input, 10.0).unwrap();
    assert_eq!(a, b);
}
