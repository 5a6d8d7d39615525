//! Reps/RPE load model shared by plan generation, set logging and the
//! dashboard. An Epley-family estimator parameterized by RPE-derived
//! reps-in-reserve instead of raw reps, with a per-lift slope constant.

use crate::models::BaseLift;

/// Empirical rep-to-fatigue slope per lift.
pub fn k_factor(lift: BaseLift) -> f64 {
    match lift {
        BaseLift::Squat => 30.0,
        BaseLift::Bench => 31.0,
        BaseLift::Deadlift => 28.0,
    }
}

/// Round to the nearest 2.5 kg plate increment, ties away from zero.
pub fn round_to_2p5(x: f64) -> f64 {
    (x / 2.5).round() * 2.5
}

fn rir_from_rpe(rpe: f64) -> f64 {
    10.0 - rpe
}

/// Weight to prescribe so that `reps` at `rpe` lands on the given 1RM.
///
/// Returns `None` on degenerate input; callers treat that as "no planned
/// weight" rather than an error.
pub fn required_weight(one_rm: f64, reps: f64, rpe: f64, lift: BaseLift) -> Option<f64> {
    if !one_rm.is_finite() || !reps.is_finite() || !rpe.is_finite() {
        return None;
    }
    if one_rm <= 0.0 || reps <= 0.0 || rpe <= 0.0 {
        return None;
    }
    let denom = 1.0 + (reps + rir_from_rpe(rpe)) / k_factor(lift);
    if denom <= 0.0 {
        return None;
    }
    Some(round_to_2p5(one_rm / denom))
}

/// Estimated 1RM from a performed set. Exact algebraic inverse of
/// `required_weight` (before rounding) for a fixed lift.
pub fn estimate_one_rep_max(weight: f64, reps: f64, rpe: f64, lift: BaseLift) -> Option<f64> {
    if !weight.is_finite() || !reps.is_finite() || !rpe.is_finite() {
        return None;
    }
    if weight <= 0.0 || reps <= 0.0 || rpe <= 0.0 {
        return None;
    }
    Some(weight * (1.0 + (reps + rir_from_rpe(rpe)) / k_factor(lift)))
}

/// RPE-free estimate used for planned-vs-actual dashboard series, where
/// planned rows carry no performed RPE.
pub fn estimate_one_rep_max_no_rpe(weight: f64, reps: f64, lift: BaseLift) -> Option<f64> {
    if !weight.is_finite() || !reps.is_finite() {
        return None;
    }
    if weight <= 0.0 || reps <= 0.0 {
        return None;
    }
    Some(weight * (1.0 + reps / k_factor(lift)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn squat_5_at_8_from_200() {
        // rir = 2, denom = 1 + 7/30 = 1.2333.., raw = 162.16.. -> 162.5
        let w = required_weight(200.0, 5.0, 8.0, BaseLift::Squat).unwrap();
        assert_eq!(w, 162.5);
    }

    #[test]
    fn output_is_a_multiple_of_2p5() {
        for one_rm in [87.5, 120.0, 142.5, 200.0, 260.0] {
            for reps in 1..=10 {
                let w = required_weight(one_rm, reps as f64, 7.5, BaseLift::Bench).unwrap();
                let rem = (w / 2.5) - (w / 2.5).round();
                assert!(rem.abs() < 1e-9, "weight {w} is not a 2.5 multiple");
            }
        }
    }

    #[test]
    fn rounding_ties_go_away_from_zero() {
        assert_eq!(round_to_2p5(1.25), 2.5);
        assert_eq!(round_to_2p5(3.75), 5.0);
        assert_eq!(round_to_2p5(1.24), 0.0);
    }

    #[test]
    fn degenerate_inputs_yield_none() {
        assert_eq!(required_weight(0.0, 5.0, 8.0, BaseLift::Squat), None);
        assert_eq!(required_weight(-100.0, 5.0, 8.0, BaseLift::Squat), None);
        assert_eq!(required_weight(200.0, 0.0, 8.0, BaseLift::Squat), None);
        assert_eq!(required_weight(200.0, 5.0, 0.0, BaseLift::Squat), None);
        assert_eq!(required_weight(f64::NAN, 5.0, 8.0, BaseLift::Squat), None);
        assert_eq!(estimate_one_rep_max(0.0, 5.0, 8.0, BaseLift::Bench), None);
        assert_eq!(estimate_one_rep_max_no_rpe(100.0, 0.0, BaseLift::Deadlift), None);
    }

    #[test]
    fn estimate_inverts_required_weight_within_rounding() {
        for lift in BaseLift::ALL {
            for one_rm in [110.0, 167.5, 222.5] {
                let w = required_weight(one_rm, 4.0, 7.5, lift).unwrap();
                let e = estimate_one_rep_max(w, 4.0, 7.5, lift).unwrap();
                // 2.5 of rounding on the weight scales by denom < 1.5
                assert!((e - one_rm).abs() <= 2.5 * 1.5, "{e} vs {one_rm}");
            }
        }
    }

    #[test]
    fn no_rpe_variant_matches_dashboard_formula() {
        let e = estimate_one_rep_max_no_rpe(150.0, 3.0, BaseLift::Squat).unwrap();
        assert!((e - 150.0 * (1.0 + 3.0 / 30.0)).abs() < 1e-9);
    }
}
