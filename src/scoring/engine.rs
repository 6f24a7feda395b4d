//! Span scoring engine
//!
//! Combines lining defect points, surrounding-condition points and the
//! auxiliary facility weight into a defect index and safety grade.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::evaluator::{auxiliary_weight, evaluate_crack, grade_for_index, grade_to_score};
use super::grade::{DefectGrade, SafetyGrade};
use super::tables::ConstructionType;
use crate::entities::{InspectionData, Span};

/// Intermediate values behind a span result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    /// Crack + material + leakage + breakage points
    pub lining: f64,

    /// Sum of the five surrounding-condition scores
    pub surround: f64,

    /// Auxiliary facility weight
    pub weight: f64,

    /// (lining + surround) / total denominator, before weighting
    #[serde(default)]
    pub f_basic: f64,

    /// lining / lining denominator
    #[serde(default)]
    pub lining_index: f64,

    #[serde(default)]
    pub crack_grade: DefectGrade,

    /// Worst of the material deterioration channels
    #[serde(default)]
    pub material_grade: DefectGrade,
}

/// Scoring outcome for one span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanResult {
    /// Weighted defect index
    pub f_value: f64,

    pub grade: SafetyGrade,

    /// Critical-defect messages, in evaluation order
    #[serde(default)]
    pub alerts: Vec<String>,

    pub details: ScoreDetails,
}

/// Conditions that warrant attention regardless of the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    ProgressiveCrack { grade: DefectGrade },
    SevereRebarExposure { grade: DefectGrade },
    SoilOutflowWithLeakage { grade: DefectGrade },
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::ProgressiveCrack { grade } => {
                write!(f, "progressive crack grade '{}' (suspected major defect)", grade)
            }
            Alert::SevereRebarExposure { grade } => write!(
                f,
                "severe rebar exposure (grade '{}'); immediate reinforcement required",
                grade
            ),
            Alert::SoilOutflowWithLeakage { grade } => {
                write!(f, "leakage grade '{}' with soil particle outflow", grade)
            }
        }
    }
}

/// Score one set of observations. Pure; never fails on odd input.
pub fn score_inspection(data: &InspectionData, construction_type: ConstructionType) -> SpanResult {
    let crack = evaluate_crack(data.crack_width, construction_type);
    let material_grade = data.material.worst_grade().clone();

    let lining = crack.score
        + grade_to_score(&material_grade)
        + grade_to_score(&data.leakage)
        + grade_to_score(&data.breakage);
    let surround = data.surrounding_total();

    let f_basic = (lining + surround) / positive_denominator(construction_type.total_denominator());
    let lining_index = lining / positive_denominator(construction_type.lining_denominator());
    let weight = auxiliary_weight(data.aux_index);
    let f_value = f_basic * weight;

    let alerts = collect_alerts(data, &crack.grade)
        .into_iter()
        .map(|alert| alert.to_string())
        .collect();

    SpanResult {
        f_value,
        grade: grade_for_index(f_value),
        alerts,
        details: ScoreDetails {
            lining,
            surround,
            weight,
            f_basic,
            lining_index,
            crack_grade: crack.grade,
            material_grade,
        },
    }
}

/// Score a span and store the result as its cache
pub fn compute_span(span: &mut Span, construction_type: ConstructionType) -> SpanResult {
    let result = score_inspection(span.data(), construction_type);
    span.store_result(result.clone());
    result
}

fn collect_alerts(data: &InspectionData, crack_grade: &DefectGrade) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if crack_grade.at_least("d") {
        alerts.push(Alert::ProgressiveCrack {
            grade: crack_grade.clone(),
        });
    }
    if data.material.rebar.at_least("e") {
        alerts.push(Alert::SevereRebarExposure {
            grade: data.material.rebar.clone(),
        });
    }
    if data.soil_leak && data.leakage.at_least("d") {
        alerts.push(Alert::SoilOutflowWithLeakage {
            grade: data.leakage.clone(),
        });
    }

    alerts
}

fn positive_denominator(denominator: u32) -> f64 {
    if denominator == 0 {
        1.0
    } else {
        f64::from(denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MaterialDefects;

    fn worst_case_natm() -> InspectionData {
        // crack e (13) + material e (13) + leakage d (10) + breakage c (7) = 43
        InspectionData {
            crack_width: 2.0,
            leakage: "d".into(),
            breakage: "c".into(),
            material: MaterialDefects::new("a", "a", "e", "b"),
            aux_index: 0.10,
            ..InspectionData::default()
        }
    }

    #[test]
    fn test_natm_rc_full_denominator_scores_one() {
        let result = score_inspection(&worst_case_natm(), ConstructionType::NatmRc);
        assert_eq!(result.details.lining, 43.0);
        assert_eq!(result.details.surround, 0.0);
        assert_eq!(result.details.weight, 1.0);
        assert_eq!(result.details.f_basic, 1.0);
        assert_eq!(result.f_value, 1.0);
        assert_eq!(result.grade, SafetyGrade::E);
    }

    #[test]
    fn test_minimum_inputs_grade_a_for_every_type() {
        let data = InspectionData::default();
        for ty in ConstructionType::all() {
            let result = score_inspection(&data, ty);
            let expected = 4.0 / f64::from(ty.total_denominator());
            assert!((result.f_value - expected).abs() < 1e-12, "{:?}", ty);
            assert_eq!(result.grade, SafetyGrade::A, "{:?}", ty);
            assert!(result.alerts.is_empty());
        }
    }

    #[test]
    fn test_surroundings_and_weight() {
        let data = InspectionData {
            crack_width: 0.25,
            drainage: 2,
            ground: 1,
            portal: 1,
            utility: 0,
            special: 1,
            aux_index: 0.8,
            ..InspectionData::default()
        };
        let result = score_inspection(&data, ConstructionType::OpenCut);
        // crack b (4) + three a grades (3) = 7
        assert_eq!(result.details.lining, 7.0);
        assert_eq!(result.details.surround, 5.0);
        assert_eq!(result.details.weight, 1.10);
        assert!((result.details.f_basic - 12.0 / 42.0).abs() < 1e-12);
        assert!((result.f_value - 12.0 / 42.0 * 1.10).abs() < 1e-12);
        assert_eq!(result.grade, SafetyGrade::C);
        assert!((result.details.lining_index - 7.0 / 36.0).abs() < 1e-12);
        assert_eq!(result.details.crack_grade.as_str(), "b");
    }

    #[test]
    fn test_extreme_surrounding_scores_do_not_panic() {
        let data: InspectionData =
            serde_json::from_str(r#"{"drainage": 2147483647, "ground": 1}"#).unwrap();
        let result = score_inspection(&data, ConstructionType::NatmRc);
        assert_eq!(result.details.surround, 2147483648.0);
        assert!(result.f_value.is_finite());
        assert_eq!(result.grade, SafetyGrade::E);
    }

    #[test]
    fn test_unknown_grades_score_zero_instead_of_failing() {
        let data = InspectionData {
            leakage: "?".into(),
            breakage: "".into(),
            material: MaterialDefects::new("x", "x", "x", "x"),
            ..InspectionData::default()
        };
        let result = score_inspection(&data, ConstructionType::NatmRc);
        // Only the crack (grade a) scores.
        assert_eq!(result.details.lining, 1.0);
    }

    #[test]
    fn test_alerts_in_evaluation_order() {
        let mut data = worst_case_natm();
        data.soil_leak = true;
        let result = score_inspection(&data, ConstructionType::NatmRc);
        assert_eq!(result.alerts.len(), 3);
        assert!(result.alerts[0].contains("progressive crack"));
        assert!(result.alerts[1].contains("rebar"));
        assert!(result.alerts[2].contains("soil"));
    }

    #[test]
    fn test_soil_alert_needs_leakage_d_or_worse() {
        let data = InspectionData {
            soil_leak: true,
            leakage: "c".into(),
            ..InspectionData::default()
        };
        let result = score_inspection(&data, ConstructionType::NatmRc);
        assert!(result.alerts.is_empty());

        let data = InspectionData {
            soil_leak: false,
            leakage: "e".into(),
            ..InspectionData::default()
        };
        assert!(score_inspection(&data, ConstructionType::NatmRc).alerts.is_empty());
    }

    #[test]
    fn test_crack_alert_threshold_depends_on_type() {
        let data = InspectionData {
            crack_width: 0.8,
            ..InspectionData::default()
        };
        assert!(score_inspection(&data, ConstructionType::AssmPlain).alerts.is_empty());
        assert_eq!(score_inspection(&data, ConstructionType::NatmRc).alerts.len(), 1);
    }

    #[test]
    fn test_rebar_alert_only_for_grade_e() {
        let data = InspectionData {
            material: MaterialDefects::new("e", "e", "d", "e"),
            ..InspectionData::default()
        };
        assert!(score_inspection(&data, ConstructionType::NatmRc).alerts.is_empty());
    }

    #[test]
    fn test_compute_span_is_idempotent() {
        let mut span = Span::with_data(1, 20.0, worst_case_natm());
        let first = compute_span(&mut span, ConstructionType::TbmSegment);
        let second = compute_span(&mut span, ConstructionType::TbmSegment);
        assert_eq!(first.f_value.to_bits(), second.f_value.to_bits());
        assert_eq!(first.grade, second.grade);
        assert_eq!(first, second);
        assert_eq!(span.result(), Some(&second));
    }

    #[test]
    fn test_result_serialized_shape() {
        let result = score_inspection(&worst_case_natm(), ConstructionType::NatmRc);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["grade"], "E");
        assert_eq!(value["details"]["lining"], 43.0);
        assert!(value["alerts"].is_array());
    }

    #[test]
    fn test_positive_denominator_guard() {
        assert_eq!(positive_denominator(0), 1.0);
        assert_eq!(positive_denominator(43), 43.0);
    }
}
