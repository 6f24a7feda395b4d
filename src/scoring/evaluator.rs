//! Defect evaluator - raw measurements to point scores

use super::grade::{DefectGrade, SafetyGrade};
use super::tables::{
    ConstructionType, CrackGroup, AUXILIARY_WEIGHT_BANDS, AUXILIARY_WEIGHT_CEILING,
    REINFORCED_CRACK_LIMITS, SAFETY_GRADE_BOUNDS, UNREINFORCED_CRACK_LIMITS,
};

/// Graded crack observation
#[derive(Debug, Clone, PartialEq)]
pub struct CrackEvaluation {
    pub grade: DefectGrade,
    pub score: f64,
}

/// Grade a crack width (mm) against the thresholds for the construction type.
///
/// Each band is inclusive at its upper bound.
pub fn evaluate_crack(width_mm: f64, construction_type: ConstructionType) -> CrackEvaluation {
    let limits = match construction_type.crack_group() {
        CrackGroup::Unreinforced => &UNREINFORCED_CRACK_LIMITS,
        CrackGroup::Reinforced => &REINFORCED_CRACK_LIMITS,
    };

    let code = limits
        .iter()
        .find(|(_, limit)| width_mm <= *limit)
        .map_or('e', |(code, _)| *code);
    let grade = DefectGrade::from(code);
    let score = grade.score();

    CrackEvaluation { grade, score }
}

/// Points for a defect grade; 0.0 for anything outside `a`..`e`
pub fn grade_to_score(grade: &DefectGrade) -> f64 {
    grade.score()
}

/// Multiplier for the auxiliary facility defect index
pub fn auxiliary_weight(index: f64) -> f64 {
    AUXILIARY_WEIGHT_BANDS
        .iter()
        .find(|(bound, _)| index < *bound)
        .map_or(AUXILIARY_WEIGHT_CEILING, |(_, weight)| *weight)
}

/// Average defect index over several auxiliary facilities. No facilities
/// means no penalty (index 0.0).
pub fn mean_auxiliary_index(indices: &[f64]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().sum::<f64>() / indices.len() as f64
}

/// Safety grade for a defect index
pub fn grade_for_index(index: f64) -> SafetyGrade {
    const GRADES: [SafetyGrade; 4] = [SafetyGrade::A, SafetyGrade::B, SafetyGrade::C, SafetyGrade::D];
    SAFETY_GRADE_BOUNDS
        .iter()
        .zip(GRADES)
        .find(|(bound, _)| index < **bound)
        .map_or(SafetyGrade::E, |(_, grade)| grade)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNREINFORCED: [ConstructionType; 3] = [
        ConstructionType::AssmBrick,
        ConstructionType::AssmPlain,
        ConstructionType::NatmPlain,
    ];

    const REINFORCED: [ConstructionType; 3] = [
        ConstructionType::NatmRc,
        ConstructionType::TbmSegment,
        ConstructionType::OpenCut,
    ];

    fn crack(width: f64, ty: ConstructionType) -> (String, f64) {
        let eval = evaluate_crack(width, ty);
        (eval.grade.to_string(), eval.score)
    }

    #[test]
    fn test_unreinforced_crack_boundaries() {
        for ty in UNREINFORCED {
            assert_eq!(crack(0.10, ty), ("a".to_string(), 1.0));
            assert_eq!(crack(0.30, ty), ("b".to_string(), 4.0));
            assert_eq!(crack(1.00, ty), ("c".to_string(), 7.0));
            assert_eq!(crack(3.00, ty), ("d".to_string(), 10.0));
            assert_eq!(crack(3.01, ty), ("e".to_string(), 13.0));
        }
    }

    #[test]
    fn test_reinforced_crack_boundaries() {
        for ty in REINFORCED {
            assert_eq!(crack(0.0, ty), ("a".to_string(), 1.0));
            assert_eq!(crack(0.11, ty), ("b".to_string(), 4.0));
            assert_eq!(crack(0.50, ty), ("c".to_string(), 7.0));
            assert_eq!(crack(0.51, ty), ("d".to_string(), 10.0));
            assert_eq!(crack(1.00, ty), ("d".to_string(), 10.0));
            assert_eq!(crack(1.01, ty), ("e".to_string(), 13.0));
        }
    }

    #[test]
    fn test_same_width_grades_differently_by_group() {
        assert_eq!(crack(0.8, ConstructionType::AssmPlain).0, "c");
        assert_eq!(crack(0.8, ConstructionType::NatmRc).0, "d");
    }

    #[test]
    fn test_grade_to_score_is_monotonic() {
        let scores: Vec<f64> = ["a", "b", "c", "d", "e"]
            .into_iter()
            .map(|g| grade_to_score(&DefectGrade::from(g)))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(scores, [1.0, 4.0, 7.0, 10.0, 13.0]);
    }

    #[test]
    fn test_grade_to_score_unknown_is_zero() {
        assert_eq!(grade_to_score(&DefectGrade::from("x")), 0.0);
        assert_eq!(grade_to_score(&DefectGrade::from("")), 0.0);
    }

    #[test]
    fn test_auxiliary_weight_bands() {
        assert_eq!(auxiliary_weight(0.0), 1.00);
        assert_eq!(auxiliary_weight(0.10), 1.00);
        assert_eq!(auxiliary_weight(0.29), 1.00);
        assert_eq!(auxiliary_weight(0.30), 1.02);
        assert_eq!(auxiliary_weight(0.54), 1.02);
        assert_eq!(auxiliary_weight(0.55), 1.05);
        assert_eq!(auxiliary_weight(0.75), 1.10);
        assert_eq!(auxiliary_weight(1.0), 1.10);
    }

    #[test]
    fn test_auxiliary_weight_first_two_bands_coincide() {
        // Published table gives 1.00 both below 0.15 and between 0.15 and 0.30.
        assert_eq!(auxiliary_weight(0.14), auxiliary_weight(0.15));
        assert_eq!(auxiliary_weight(0.15), auxiliary_weight(0.29));
    }

    #[test]
    fn test_mean_auxiliary_index() {
        assert_eq!(mean_auxiliary_index(&[]), 0.0);
        assert!((mean_auxiliary_index(&[0.2, 0.4]) - 0.3).abs() < 1e-12);
        assert_eq!(mean_auxiliary_index(&[0.5]), 0.5);
        assert_eq!(auxiliary_weight(mean_auxiliary_index(&[])), 1.0);
    }

    #[test]
    fn test_grade_for_index_bands() {
        assert_eq!(grade_for_index(0.0), SafetyGrade::A);
        assert_eq!(grade_for_index(0.1499), SafetyGrade::A);
        assert_eq!(grade_for_index(0.15), SafetyGrade::B);
        assert_eq!(grade_for_index(0.30), SafetyGrade::C);
        assert_eq!(grade_for_index(0.54), SafetyGrade::C);
        assert_eq!(grade_for_index(0.55), SafetyGrade::D);
        assert_eq!(grade_for_index(0.75), SafetyGrade::E);
        assert_eq!(grade_for_index(1.4), SafetyGrade::E);
    }
}
