/// (minimum ratio, score), largest threshold first.
const EXPERIENCE_BUCKETS: &[(f64, f64)] = &[
    (1.5, 100.0),
    (1.0, 90.0),
    (0.8, 70.0),
    (0.6, 50.0),
    (0.4, 30.0),
];

const FLOOR_SCORE: f64 = 10.0;

/// Step score for candidate years against the job's requirement.
/// No requirement (≤ 0 years) is a perfect fit.
pub fn experience_score(candidate_years: i32, required_years: i32) -> f64 {
    if required_years <= 0 {
        return 100.0;
    }
    let ratio = f64::from(candidate_years) / f64::from(required_years);
    EXPERIENCE_BUCKETS
        .iter()
        .find(|(min_ratio, _)| ratio >= *min_ratio)
        .map(|(_, score)| *score)
        .unwrap_or(FLOOR_SCORE)
}
