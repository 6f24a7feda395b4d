//! Defect grades, safety grades and severity

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::tables::GRADE_SCORES;

/// Field grade for a single defect channel, nominally one of `a`..`e`
///
/// Stored as given. Ordering is plain string ordering, which matches
/// severity for the single letters `a` < `b` < ... < `e`. Codes outside that
/// set are kept and score 0.0 instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefectGrade(String);

impl DefectGrade {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn a() -> Self {
        Self::new("a")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Point score from the grade table; unrecognized codes give 0.0
    pub fn score(&self) -> f64 {
        let lowered = self.0.to_lowercase();
        let mut chars = lowered.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => GRADE_SCORES
                .iter()
                .find(|(code, _)| *code == c)
                .map_or(0.0, |(_, points)| *points),
            _ => 0.0,
        }
    }

    /// True when this grade compares at or above `threshold`
    pub fn at_least(&self, threshold: &str) -> bool {
        self.0.as_str() >= threshold
    }
}

impl Default for DefectGrade {
    fn default() -> Self {
        Self::a()
    }
}

impl fmt::Display for DefectGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DefectGrade {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DefectGrade {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<char> for DefectGrade {
    fn from(value: char) -> Self {
        Self(value.to_string())
    }
}

/// Overall safety grade derived from the defect index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SafetyGrade {
    A,
    B,
    C,
    D,
    E,
}

impl SafetyGrade {
    pub fn letter(&self) -> char {
        match self {
            SafetyGrade::A => 'A',
            SafetyGrade::B => 'B',
            SafetyGrade::C => 'C',
            SafetyGrade::D => 'D',
            SafetyGrade::E => 'E',
        }
    }

    /// Letter with its descriptor, e.g. `C (보통)`
    pub fn label(&self) -> &'static str {
        match self {
            SafetyGrade::A => "A (우수)",
            SafetyGrade::B => "B (양호)",
            SafetyGrade::C => "C (보통)",
            SafetyGrade::D => "D (미흡)",
            SafetyGrade::E => "E (불량)",
        }
    }

    /// English descriptor
    pub fn descriptor(&self) -> &'static str {
        match self {
            SafetyGrade::A => "excellent",
            SafetyGrade::B => "good",
            SafetyGrade::C => "fair",
            SafetyGrade::D => "poor",
            SafetyGrade::E => "bad",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            SafetyGrade::A | SafetyGrade::B => Severity::Informational,
            SafetyGrade::C => Severity::Caution,
            SafetyGrade::D | SafetyGrade::E => Severity::Critical,
        }
    }

    /// Standard overall opinion for an assessment ending in this grade
    pub fn recommended_opinion(&self) -> &'static str {
        match self.severity() {
            Severity::Informational => {
                "The structure is in generally good condition; continue the current level of maintenance."
            }
            Severity::Caution => {
                "Minor defects were found in primary members without affecting safety; \
                 preventive repair is recommended to improve durability."
            }
            Severity::Critical => {
                "Serious defects were found in primary members; urgent repair or strengthening \
                 is required and restricting use should be considered."
            }
        }
    }
}

impl fmt::Display for SafetyGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for SafetyGrade {
    type Err = String;

    /// Accepts a bare letter or a full label such as `B (양호)`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || format!("Unknown safety grade: {}", s);
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars.next().ok_or_else(unknown)?;
        let rest = chars.as_str();
        if !rest.is_empty() && !rest.trim_start().starts_with('(') {
            return Err(unknown());
        }

        match letter.to_ascii_uppercase() {
            'A' => Ok(SafetyGrade::A),
            'B' => Ok(SafetyGrade::B),
            'C' => Ok(SafetyGrade::C),
            'D' => Ok(SafetyGrade::D),
            'E' => Ok(SafetyGrade::E),
            _ => Err(unknown()),
        }
    }
}

impl Serialize for SafetyGrade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SafetyGrade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Display severity for color-coding grades
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Informational,
    Caution,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Informational => write!(f, "informational"),
            Severity::Caution => write!(f, "caution"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}
