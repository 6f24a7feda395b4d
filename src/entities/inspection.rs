//! Raw field observations for one span

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::scoring::DefectGrade;

/// Material deterioration grades, scored by the worst channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDefects {
    /// Spalling / delamination
    pub spalling: DefectGrade,

    /// Efflorescence
    pub efflorescence: DefectGrade,

    /// Exposed reinforcement
    pub rebar: DefectGrade,

    /// Carbonation / chloride attack
    pub carbonation: DefectGrade,
}

impl Default for MaterialDefects {
    fn default() -> Self {
        Self {
            spalling: defaults::grade(),
            efflorescence: defaults::grade(),
            rebar: defaults::grade(),
            carbonation: defaults::grade(),
        }
    }
}

impl MaterialDefects {
    pub fn new(
        spalling: impl Into<DefectGrade>,
        efflorescence: impl Into<DefectGrade>,
        rebar: impl Into<DefectGrade>,
        carbonation: impl Into<DefectGrade>,
    ) -> Self {
        Self {
            spalling: spalling.into(),
            efflorescence: efflorescence.into(),
            rebar: rebar.into(),
            carbonation: carbonation.into(),
        }
    }

    /// Most severe of the four channels
    pub fn worst_grade(&self) -> &DefectGrade {
        [
            &self.spalling,
            &self.efflorescence,
            &self.rebar,
            &self.carbonation,
        ]
        .into_iter()
        .max()
        .unwrap_or(&self.spalling)
    }
}

/// Full observation record for one span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectionData {
    /// Damage location tag (e.g. crown, left wall)
    pub location: String,

    /// Maximum crack width (mm)
    pub crack_width: f64,

    /// Leakage grade
    pub leakage: DefectGrade,

    /// Breakage / damage grade
    pub breakage: DefectGrade,

    /// Soil particles are washing out with the leakage
    pub soil_leak: bool,

    /// Material deterioration channels
    pub material: MaterialDefects,

    /// Drainage condition score (0-4)
    pub drainage: i32,

    /// Surrounding ground score (0-4)
    pub ground: i32,

    /// Portal condition score (0-4)
    pub portal: i32,

    /// Utility duct score (0-4)
    pub utility: i32,

    /// Special condition score (0-3)
    pub special: i32,

    /// Auxiliary facility defect index (0.0-1.0)
    pub aux_index: f64,

    /// Photo reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Default for InspectionData {
    fn default() -> Self {
        Self {
            location: String::new(),
            crack_width: defaults::CRACK_WIDTH,
            leakage: defaults::grade(),
            breakage: defaults::grade(),
            soil_leak: false,
            material: MaterialDefects::default(),
            drainage: defaults::SURROUNDING_SCORE,
            ground: defaults::SURROUNDING_SCORE,
            portal: defaults::SURROUNDING_SCORE,
            utility: defaults::SURROUNDING_SCORE,
            special: defaults::SURROUNDING_SCORE,
            aux_index: defaults::AUXILIARY_INDEX,
            photo: None,
        }
    }
}

impl InspectionData {
    /// Sum of the five surrounding-condition scores
    pub fn surrounding_total(&self) -> f64 {
        [
            self.drainage,
            self.ground,
            self.portal,
            self.utility,
            self.special,
        ]
        .iter()
        .map(|&score| f64::from(score))
        .sum()
    }
}
