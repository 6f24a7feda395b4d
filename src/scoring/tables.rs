//! Classification tables
//!
//! Static lookup data for tunnel inspections: construction types and their
//! scoring denominators, the defect grade point table, crack width thresholds
//! per reinforcement group, and the index bands used for weights and grades.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Tunnel construction method
///
/// Each variant carries two fixed denominators: one for the lining-only
/// sub-score and one for the combined lining + surroundings score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ConstructionType {
    /// Conventional method, masonry lining
    AssmBrick,
    /// Conventional method, plain concrete lining
    AssmPlain,
    /// NATM, plain concrete lining
    NatmPlain,
    /// NATM, reinforced concrete lining
    #[default]
    NatmRc,
    /// Shield TBM, segmental lining
    TbmSegment,
    /// Cut-and-cover box structure
    OpenCut,
}

/// Crack width group that selects the threshold table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrackGroup {
    Unreinforced,
    Reinforced,
}

#[derive(Clone, Copy)]
struct TypeRow {
    ty: ConstructionType,
    key: &'static str,
    label: &'static str,
    name: &'static str,
    lining_denominator: u32,
    total_denominator: u32,
    group: CrackGroup,
}

static TYPE_TABLE: [TypeRow; 6] = [
    TypeRow {
        ty: ConstructionType::AssmBrick,
        key: "assm-brick",
        label: "재래식 (조적)",
        name: "Conventional (masonry)",
        lining_denominator: 26,
        total_denominator: 33,
        group: CrackGroup::Unreinforced,
    },
    TypeRow {
        ty: ConstructionType::AssmPlain,
        key: "assm-plain",
        label: "재래식 (무근)",
        name: "Conventional (plain concrete)",
        lining_denominator: 27,
        total_denominator: 34,
        group: CrackGroup::Unreinforced,
    },
    TypeRow {
        ty: ConstructionType::NatmPlain,
        key: "natm-plain",
        label: "NATM (무근)",
        name: "NATM (plain concrete)",
        lining_denominator: 27,
        total_denominator: 34,
        group: CrackGroup::Unreinforced,
    },
    TypeRow {
        ty: ConstructionType::NatmRc,
        key: "natm-rc",
        label: "NATM (철근)",
        name: "NATM (reinforced concrete)",
        lining_denominator: 36,
        total_denominator: 43,
        group: CrackGroup::Reinforced,
    },
    TypeRow {
        ty: ConstructionType::TbmSegment,
        key: "tbm-segment",
        label: "TBM (세그먼트)",
        name: "TBM (segmental lining)",
        lining_denominator: 36,
        total_denominator: 43,
        group: CrackGroup::Reinforced,
    },
    TypeRow {
        ty: ConstructionType::OpenCut,
        key: "open-cut",
        label: "개착식 (BOX)",
        name: "Cut-and-cover (box)",
        lining_denominator: 36,
        total_denominator: 42,
        group: CrackGroup::Reinforced,
    },
];

impl ConstructionType {
    /// All construction types in table order
    pub fn all() -> [ConstructionType; 6] {
        TYPE_TABLE.map(|row| row.ty)
    }

    fn row(&self) -> &'static TypeRow {
        // Table order matches declaration order.
        &TYPE_TABLE[*self as usize]
    }

    /// Short slug used on the command line (e.g. `natm-rc`)
    pub fn key(&self) -> &'static str {
        self.row().key
    }

    /// Label stored in saved projects
    pub fn label(&self) -> &'static str {
        self.row().label
    }

    /// English display name
    pub fn name(&self) -> &'static str {
        self.row().name
    }

    /// Divisor for the lining-only score
    pub fn lining_denominator(&self) -> u32 {
        self.row().lining_denominator
    }

    /// Divisor for the combined lining + surroundings score
    pub fn total_denominator(&self) -> u32 {
        self.row().total_denominator
    }

    /// Which crack threshold table applies
    pub fn crack_group(&self) -> CrackGroup {
        self.row().group
    }
}

impl fmt::Display for ConstructionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ConstructionType {
    type Err = String;

    /// Accepts the slug, the stored label, or the upper-case variant name
    /// (`NATM_RC`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let slug = trimmed.to_lowercase().replace('_', "-");
        TYPE_TABLE
            .iter()
            .find(|row| row.key == slug || row.label == trimmed)
            .map(|row| row.ty)
            .ok_or_else(|| format!("Unknown construction type: {}", s))
    }
}

impl Serialize for ConstructionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ConstructionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|_| {
            tracing::warn!(label = %raw, "unknown construction type, using default");
            ConstructionType::default()
        }))
    }
}

/// Points awarded per defect grade. Anything else scores 0.0.
pub const GRADE_SCORES: [(char, f64); 5] =
    [('a', 1.0), ('b', 4.0), ('c', 7.0), ('d', 10.0), ('e', 13.0)];

/// Inclusive upper crack widths (mm) for grades a–d; wider cracks are grade e.
pub const UNREINFORCED_CRACK_LIMITS: [(char, f64); 4] =
    [('a', 0.1), ('b', 0.3), ('c', 1.0), ('d', 3.0)];

/// Inclusive upper crack widths (mm) for grades a–d; wider cracks are grade e.
pub const REINFORCED_CRACK_LIMITS: [(char, f64); 4] =
    [('a', 0.1), ('b', 0.3), ('c', 0.5), ('d', 1.0)];

/// Exclusive upper bounds of the auxiliary defect index and the weight
/// applied below each bound. Indices at or above the last bound use
/// [`AUXILIARY_WEIGHT_CEILING`].
///
/// The first two bands share weight 1.00; kept as published.
pub const AUXILIARY_WEIGHT_BANDS: [(f64, f64); 4] =
    [(0.15, 1.00), (0.30, 1.00), (0.55, 1.02), (0.75, 1.05)];

pub const AUXILIARY_WEIGHT_CEILING: f64 = 1.10;

/// Exclusive upper bounds of the defect index for grades A–D; anything
/// higher is grade E.
pub const SAFETY_GRADE_BOUNDS: [f64; 4] = [0.15, 0.30, 0.55, 0.75];
