use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{RankStandard, RankTrack};
use super::error::{ValidationError, WeightWarning};

/// Raw scores (0..=100) keyed by dimension name, as entered by the evaluator.
pub type EvaluationSheet = BTreeMap<String, f64>;

/// Progress at or above which the employee is due for promotion.
pub const PROMOTION_THRESHOLD: f64 = 100.0;

/// Result of scoring an employee against the rubric of their next level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "score", rename_all = "snake_case")]
pub enum PromotionScore {
    /// No rubric is configured for the next level; nothing was evaluated.
    NoStandard,
    /// Weighted average rounded to one decimal place.
    Scored(f64),
}

impl PromotionScore {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::NoStandard => None,
            Self::Scored(value) => Some(value),
        }
    }
}

/// Rubric an employee at `(track, current_level)` is measured against.
pub fn standard_for_next_level(
    standards: &[RankStandard],
    track: RankTrack,
    current_level: u8,
) -> Option<&RankStandard> {
    let target = current_level.checked_add(1)?;
    standards
        .iter()
        .find(|standard| standard.track == track && standard.level == target)
}

/// `round(Σ score × weight / 100, 1)`; dimensions absent from the sheet count as zero.
pub fn weighted_score(standard: &RankStandard, sheet: &EvaluationSheet) -> f64 {
    let total: f64 = standard
        .dimensions
        .iter()
        .map(|dimension| {
            let score = sheet.get(&dimension.name).copied().unwrap_or(0.0);
            score * f64::from(dimension.weight) / 100.0
        })
        .sum();

    (total * 10.0).round() / 10.0
}

/// Every raw score must be a finite value within 0..=100.
pub fn validate_sheet(sheet: &EvaluationSheet) -> Result<(), ValidationError> {
    if sheet
        .values()
        .all(|score| score.is_finite() && (0.0..=100.0).contains(score))
    {
        Ok(())
    } else {
        Err(ValidationError::missing("scores"))
    }
}

pub fn score_promotion(
    standards: &[RankStandard],
    track: RankTrack,
    current_level: u8,
    sheet: &EvaluationSheet,
) -> PromotionScore {
    match standard_for_next_level(standards, track, current_level) {
        Some(standard) => PromotionScore::Scored(weighted_score(standard, sheet)),
        None => PromotionScore::NoStandard,
    }
}

/// Blank sheet with every dimension of the rubric set to zero.
pub fn blank_sheet(standard: &RankStandard) -> EvaluationSheet {
    standard
        .dimensions
        .iter()
        .map(|dimension| (dimension.name.clone(), 0.0))
        .collect()
}

pub fn weight_warning(standard: &RankStandard) -> Option<WeightWarning> {
    let total_weight = standard.total_weight();
    (total_weight != 100).then_some(WeightWarning {
        track: standard.track,
        level: standard.level,
        total_weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_scores_must_stay_within_bounds() {
        let sheet = |score: f64| EvaluationSheet::from([("专业深度".to_string(), score)]);
        assert!(validate_sheet(&sheet(0.0)).is_ok());
        assert!(validate_sheet(&sheet(100.0)).is_ok());
        for score in [500.0, -80.0, f64::NAN, f64::INFINITY] {
            let error = validate_sheet(&sheet(score)).expect_err("out of range");
            assert_eq!(error.field, "scores");
        }
    }
    use crate::portal::domain::{RankDimension, RecordId};

    fn dimension(name: &str, weight: u8) -> RankDimension {
        RankDimension {
            name: name.to_string(),
            weight,
            description: String::new(),
        }
    }

    fn f8_standard() -> RankStandard {
        RankStandard {
            id: RecordId::from("rs_f8"),
            track: RankTrack::F,
            level: 8,
            dimensions: vec![
                dimension("专业深度", 40),
                dimension("技术广度", 20),
                dimension("业务贡献", 30),
                dimension("人才培养", 10),
            ],
        }
    }

    fn uniform_sheet(standard: &RankStandard, value: f64) -> EvaluationSheet {
        standard
            .dimensions
            .iter()
            .map(|dim| (dim.name.clone(), value))
            .collect()
    }

    #[test]
    fn perfect_scores_yield_exactly_one_hundred() {
        let standard = f8_standard();
        let sheet = uniform_sheet(&standard, 100.0);
        assert_eq!(
            score_promotion(&[standard], RankTrack::F, 7, &sheet),
            PromotionScore::Scored(100.0)
        );
    }

    #[test]
    fn zero_scores_yield_zero_not_missing_standard() {
        let standard = f8_standard();
        let sheet = blank_sheet(&standard);
        assert_eq!(
            score_promotion(&[standard], RankTrack::F, 7, &sheet),
            PromotionScore::Scored(0.0)
        );
    }

    #[test]
    fn missing_rubric_is_reported_distinctly() {
        let standard = f8_standard();
        let sheet = EvaluationSheet::new();
        assert_eq!(
            score_promotion(&[standard.clone()], RankTrack::F, 8, &sheet),
            PromotionScore::NoStandard
        );
        assert_eq!(
            score_promotion(&[standard], RankTrack::Y, 7, &sheet),
            PromotionScore::NoStandard
        );
    }

    #[test]
    fn weighted_average_rounds_to_one_decimal() {
        let standard = f8_standard();
        let mut sheet = EvaluationSheet::new();
        sheet.insert("专业深度".to_string(), 87.0);
        sheet.insert("技术广度".to_string(), 73.0);
        sheet.insert("业务贡献".to_string(), 91.0);
        // 34.8 + 14.6 + 27.3 + 0 = 76.7
        assert_eq!(weighted_score(&standard, &sheet), 76.7);

        sheet.insert("人才培养".to_string(), 66.0);
        // 76.7 + 6.6
        assert_eq!(weighted_score(&standard, &sheet), 83.3);
    }

    #[test]
    fn scores_for_unknown_dimensions_are_ignored() {
        let standard = f8_standard();
        let mut sheet = uniform_sheet(&standard, 50.0);
        sheet.insert("出勤".to_string(), 100.0);
        assert_eq!(weighted_score(&standard, &sheet), 50.0);
    }

    #[test]
    fn weight_warning_only_when_sum_differs_from_hundred() {
        let mut standard = f8_standard();
        assert!(weight_warning(&standard).is_none());

        standard.dimensions.pop();
        let warning = weight_warning(&standard).expect("weights now sum to 90");
        assert_eq!(warning.total_weight, 90);
        assert_eq!(warning.level, 8);
    }

    #[test]
    fn level_nine_has_no_next_level_overflow() {
        assert!(standard_for_next_level(&[f8_standard()], RankTrack::F, u8::MAX).is_none());
    }
}
