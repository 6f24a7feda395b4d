//! Defaults substituted for keys missing from saved records
//!
//! Every record type deserializes with `#[serde(default)]`, so an older file
//! that lacks a newer key loads with the value listed here. Unknown keys are
//! ignored.

use crate::scoring::{ConstructionType, DefectGrade};

/// Nominal sub-span length (m)
pub const UNIT_LENGTH: f64 = 20.0;

/// Nominal section length (m)
pub const TOTAL_LENGTH: f64 = 100.0;

/// First section id handed out in a new project
pub const NEXT_SECTION_ID: u32 = 1;

/// First span number in a section
pub const SPAN_NO: u32 = 1;

/// Length of a span record missing its `length` key (m)
pub const SPAN_LENGTH: f64 = UNIT_LENGTH;

/// Project opinion text
pub const OPINION: &str = "";

/// Crack width (mm)
pub const CRACK_WIDTH: f64 = 0.0;

/// Surrounding-condition score (drainage, ground, portal, utility, special)
pub const SURROUNDING_SCORE: i32 = 0;

/// Auxiliary facility defect index
pub const AUXILIARY_INDEX: f64 = 0.0;

/// Grade of any defect channel (leakage, breakage, material)
pub fn grade() -> DefectGrade {
    DefectGrade::a()
}

/// Construction type of a section record missing its `type` key
pub fn construction_type() -> ConstructionType {
    ConstructionType::default()
}
