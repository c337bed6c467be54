//! Deterministic sustainability scoring.
//!
//! The model is a fixed additive one: start from a neutral baseline of 50,
//! add bonuses for disclosed attributes, adjust for carbon and water bands,
//! then clamp into 0..=100. Absent subfields contribute zero, so a product
//! with no disclosure scores exactly the baseline.

use serde::{Deserialize, Serialize};

use crate::domain::product::SustainabilityProfile;

pub const BASELINE_SCORE: f64 = 50.0;
pub const RECYCLED_WEIGHT: f64 = 0.2;
pub const CERTIFICATION_BONUS: f64 = 5.0;
pub const ORGANIC_BONUS: f64 = 10.0;
pub const VEGAN_BONUS: f64 = 10.0;

/// One band of a tiered adjustment, evaluated in table order.
#[derive(Clone, Copy, Debug)]
enum Band {
    /// Matches values strictly below the threshold.
    Below(f64),
    /// Matches values strictly above the threshold.
    Above(f64),
}

impl Band {
    fn matches(self, value: f64) -> bool {
        match self {
            Self::Below(threshold) => value < threshold,
            Self::Above(threshold) => value > threshold,
        }
    }
}

// First match wins; values in the neutral band adjust by zero. The
// boundaries are exclusive on both ends: carbon 10 earns no bonus and
// carbon 100 earns no penalty.
const CARBON_BANDS: &[(Band, f64)] =
    &[(Band::Below(10.0), 10.0), (Band::Below(50.0), 5.0), (Band::Above(100.0), -10.0)];

const WATER_BANDS: &[(Band, f64)] =
    &[(Band::Below(100.0), 10.0), (Band::Below(500.0), 5.0), (Band::Above(1000.0), -10.0)];

fn band_adjustment(value: f64, bands: &[(Band, f64)]) -> f64 {
    bands.iter().find(|(band, _)| band.matches(value)).map_or(0.0, |(_, delta)| *delta)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTraceStep {
    pub stage: String,
    pub detail: String,
    pub delta: f64,
}

/// Step-by-step account of how a score was assembled, for the score
/// endpoint response and operator tooling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTrace {
    pub baseline: f64,
    pub steps: Vec<ScoreTraceStep>,
    /// Sum before clamping; may fall outside 0..=100.
    pub raw_total: f64,
    pub score: f64,
}

/// Compute the 0..=100 sustainability score for a profile.
///
/// Pure and total: a missing profile or missing subfields never fail,
/// they simply contribute nothing.
pub fn score_profile(profile: Option<&SustainabilityProfile>) -> f64 {
    score_profile_with_trace(profile).score
}

pub fn score_profile_with_trace(profile: Option<&SustainabilityProfile>) -> ScoreTrace {
    let mut steps = Vec::new();
    let mut total = BASELINE_SCORE;

    if let Some(profile) = profile {
        if let Some(recycled) = &profile.recycled_materials {
            let delta = recycled.percentage * RECYCLED_WEIGHT;
            total += delta;
            steps.push(ScoreTraceStep {
                stage: "recycled_materials".to_string(),
                detail: format!("{}% recycled content", recycled.percentage),
                delta,
            });
        }

        if !profile.certifications.is_empty() {
            let delta = profile.certifications.len() as f64 * CERTIFICATION_BONUS;
            total += delta;
            steps.push(ScoreTraceStep {
                stage: "certifications".to_string(),
                detail: format!("{} certifications", profile.certifications.len()),
                delta,
            });
        }

        if profile.is_organic {
            total += ORGANIC_BONUS;
            steps.push(ScoreTraceStep {
                stage: "organic".to_string(),
                detail: "organic product".to_string(),
                delta: ORGANIC_BONUS,
            });
        }

        if profile.is_vegan {
            total += VEGAN_BONUS;
            steps.push(ScoreTraceStep {
                stage: "vegan".to_string(),
                detail: "vegan product".to_string(),
                delta: VEGAN_BONUS,
            });
        }

        if let Some(carbon) = &profile.carbon_footprint {
            let delta = band_adjustment(carbon.value, CARBON_BANDS);
            total += delta;
            steps.push(ScoreTraceStep {
                stage: "carbon_footprint".to_string(),
                detail: format!("{} {}", carbon.value, carbon.unit),
                delta,
            });
        }

        if let Some(water) = &profile.water_usage {
            let delta = band_adjustment(water.value, WATER_BANDS);
            total += delta;
            steps.push(ScoreTraceStep {
                stage: "water_usage".to_string(),
                detail: format!("{} {}", water.value, water.unit),
                delta,
            });
        }
    }

    ScoreTrace { baseline: BASELINE_SCORE, steps, raw_total: total, score: total.clamp(0.0, 100.0) }
}

#[cfg(test)]
mod tests {
    use crate::domain::product::{Measurement, RecycledMaterials, SustainabilityProfile};

    use super::{score_profile, score_profile_with_trace, BASELINE_SCORE};

    fn measurement(value: f64, unit: &str) -> Option<Measurement> {
        Some(Measurement { value, unit: unit.to_string() })
    }

    fn profile(
        carbon: Option<f64>,
        water: Option<f64>,
        recycled_pct: Option<f64>,
        certs: usize,
        organic: bool,
        vegan: bool,
    ) -> SustainabilityProfile {
        SustainabilityProfile {
            carbon_footprint: carbon.and_then(|value| measurement(value, "kg CO2e")),
            water_usage: water.and_then(|value| measurement(value, "liters")),
            recycled_materials: recycled_pct
                .map(|percentage| RecycledMaterials { percentage, materials: Vec::new() }),
            certifications: (0..certs).map(|index| format!("cert-{index}")).collect(),
            is_organic: organic,
            is_vegan: vegan,
            ..SustainabilityProfile::default()
        }
    }

    #[test]
    fn absent_profile_scores_exactly_the_baseline() {
        assert_eq!(score_profile(None), BASELINE_SCORE);
        assert_eq!(score_profile(Some(&SustainabilityProfile::default())), BASELINE_SCORE);
    }

    #[test]
    fn organic_certified_low_impact_shirt_scores_95() {
        // carbon 2.1 (+10), water 400 (+5), 2 certs (+10), organic (+10), vegan (+10)
        let profile = profile(Some(2.1), Some(400.0), Some(0.0), 2, true, true);
        assert_eq!(score_profile(Some(&profile)), 95.0);
    }

    #[test]
    fn low_carbon_high_water_vegan_product_scores_60() {
        // carbon 5.4 (+10), water 2700 (-10), vegan (+10)
        let profile = profile(Some(5.4), Some(2700.0), Some(0.0), 0, false, true);
        assert_eq!(score_profile(Some(&profile)), 60.0);
    }

    #[test]
    fn mid_band_carbon_earns_the_smaller_bonus() {
        // carbon 54 sits in the neutral 50..=100 band, water 2700 penalizes
        let profile = profile(Some(54.0), Some(2700.0), Some(0.0), 0, false, true);
        assert_eq!(score_profile(Some(&profile)), 50.0);

        let profile = self::profile(Some(25.0), None, None, 0, false, false);
        assert_eq!(score_profile(Some(&profile)), BASELINE_SCORE + 5.0);
    }

    #[test]
    fn score_is_clamped_to_the_upper_bound() {
        let profile = profile(Some(1.0), Some(10.0), Some(100.0), 10, true, true);
        assert_eq!(score_profile(Some(&profile)), 100.0);
    }

    #[test]
    fn score_is_clamped_to_the_lower_bound() {
        // A malformed negative recycled percentage would otherwise drive the
        // sum far below zero; the clamp holds the floor.
        let profile = profile(Some(500.0), Some(5000.0), Some(-1000.0), 0, false, false);
        assert_eq!(score_profile(Some(&profile)), 0.0);
    }

    #[test]
    fn recycled_percentage_is_monotonic() {
        let mut last = f64::MIN;
        for percentage in [0.0, 10.0, 35.0, 70.0, 100.0] {
            let profile = profile(None, None, Some(percentage), 0, false, false);
            let score = score_profile(Some(&profile));
            assert!(score >= last, "score regressed at {percentage}%");
            last = score;
        }
    }

    #[test]
    fn carbon_band_boundaries_are_exclusive() {
        let at_ten = profile(Some(10.0), None, None, 0, false, false);
        assert_eq!(score_profile(Some(&at_ten)), BASELINE_SCORE + 5.0);

        let at_hundred = profile(Some(100.0), None, None, 0, false, false);
        assert_eq!(score_profile(Some(&at_hundred)), BASELINE_SCORE);
    }

    #[test]
    fn water_band_boundaries_are_exclusive() {
        let at_hundred = profile(None, Some(100.0), None, 0, false, false);
        assert_eq!(score_profile(Some(&at_hundred)), BASELINE_SCORE + 5.0);

        let at_thousand = profile(None, Some(1000.0), None, 0, false, false);
        assert_eq!(score_profile(Some(&at_thousand)), BASELINE_SCORE);
    }

    #[test]
    fn trace_raw_total_can_exceed_the_clamped_score() {
        let profile = profile(Some(1.0), Some(10.0), Some(100.0), 10, true, true);
        let trace = score_profile_with_trace(Some(&profile));
        assert!(trace.raw_total > 100.0);
        assert_eq!(trace.score, 100.0);
        assert_eq!(trace.steps.len(), 6);
    }

    #[test]
    fn scoring_is_deterministic() {
        let profile = profile(Some(42.0), Some(650.0), Some(55.0), 3, true, false);
        assert_eq!(score_profile(Some(&profile)), score_profile(Some(&profile)));
    }
}
