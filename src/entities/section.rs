//! Section entity - a contiguous stretch of one construction type

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::defaults;
use super::span::Span;
use crate::scoring::ConstructionType;

/// Remainders shorter than this are treated as float noise when subdividing
const LENGTH_EPSILON: f64 = 1e-6;

/// Upper bound on the number of spans one section may be subdivided into
pub const MAX_SPANS: u32 = 10_000;

/// A structural section, subdivided into spans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    /// Section id, unique within its project
    pub id: u32,

    /// Construction method
    #[serde(rename = "type")]
    construction_type: ConstructionType,

    /// Nominal section length (m). Tracks the sum of span lengths after
    /// explicit length edits.
    pub total_length: f64,

    /// Nominal span length (m) used when subdividing
    pub unit_length: f64,

    spans: Vec<Span>,
}

impl Default for Section {
    fn default() -> Self {
        Self {
            id: 0,
            construction_type: defaults::construction_type(),
            total_length: defaults::TOTAL_LENGTH,
            unit_length: defaults::UNIT_LENGTH,
            spans: Vec::new(),
        }
    }
}

impl Section {
    /// Create a section and subdivide it into spans of `unit_length`, with
    /// a final shorter span for any remainder.
    ///
    /// Fails with [`SectionError::TooManySpans`] when the lengths would
    /// need more than [`MAX_SPANS`] spans.
    pub fn new(
        id: u32,
        construction_type: ConstructionType,
        total_length: f64,
        unit_length: f64,
    ) -> Result<Self, SectionError> {
        Ok(Self {
            id,
            construction_type,
            total_length,
            unit_length,
            spans: subdivide(total_length, unit_length)?,
        })
    }

    pub fn construction_type(&self) -> ConstructionType {
        self.construction_type
    }

    /// Change the construction type. Every span result depends on it, so
    /// all caches are dropped.
    pub fn set_construction_type(&mut self, construction_type: ConstructionType) {
        if self.construction_type != construction_type {
            self.construction_type = construction_type;
            self.spans.iter_mut().for_each(Span::invalidate);
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn spans_mut(&mut self) -> &mut [Span] {
        &mut self.spans
    }

    pub fn span(&self, span_no: u32) -> Option<&Span> {
        self.spans.iter().find(|s| s.span_no() == span_no)
    }

    pub fn span_mut(&mut self, span_no: u32) -> Option<&mut Span> {
        self.spans.iter_mut().find(|s| s.span_no() == span_no)
    }

    /// Sum of span lengths
    pub fn measured_length(&self) -> f64 {
        self.spans.iter().map(Span::length).sum()
    }

    /// Change one span's length and roll the section total up to match.
    pub fn set_span_length(&mut self, span_no: u32, length: f64) -> Result<(), SectionError> {
        if !length.is_finite() || length <= 0.0 {
            return Err(SectionError::InvalidLength(length));
        }

        let section = self.id;
        let span = self
            .span_mut(span_no)
            .ok_or(SectionError::SpanNotFound {
                section,
                span: span_no,
            })?;
        span.set_length(length);
        self.total_length = self.measured_length();
        Ok(())
    }
}

fn subdivide(total_length: f64, unit_length: f64) -> Result<Vec<Span>, SectionError> {
    if !(total_length > 0.0) {
        return Ok(Vec::new());
    }
    if !(unit_length > 0.0) {
        return Ok(vec![Span::new(1, total_length)]);
    }

    let ratio = ((total_length + LENGTH_EPSILON) / unit_length).floor();
    // One more span may be needed for the remainder.
    if !ratio.is_finite() || ratio >= f64::from(MAX_SPANS) {
        return Err(SectionError::TooManySpans {
            total_length,
            unit_length,
        });
    }
    let full = ratio as u32;
    let mut spans: Vec<Span> = (1..=full).map(|no| Span::new(no, unit_length)).collect();

    let remainder = total_length - f64::from(full) * unit_length;
    if remainder > LENGTH_EPSILON {
        spans.push(Span::new(full + 1, remainder));
    }
    Ok(spans)
}

/// Errors from section edits
#[derive(Debug, Error, PartialEq)]
pub enum SectionError {
    #[error("span {span} not found in section {section}")]
    SpanNotFound { section: u32, span: u32 },

    #[error("span length must be a positive number of meters, got {0}")]
    InvalidLength(f64),

    #[error(
        "{total_length} m in spans of {unit_length} m needs more than {max} spans",
        max = MAX_SPANS
    )]
    TooManySpans { total_length: f64, unit_length: f64 },

    #[error("no section ids left in this project")]
    IdsExhausted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::compute_span;

    #[test]
    fn test_even_subdivision() {
        let section = Section::new(1, ConstructionType::NatmRc, 100.0, 20.0).unwrap();
        assert_eq!(section.spans().len(), 5);
        assert!(section.spans().iter().all(|s| s.length() == 20.0));
        let numbers: Vec<u32> = section.spans().iter().map(Span::span_no).collect();
        assert_eq!(numbers, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_subdivision_with_remainder() {
        let section = Section::new(1, ConstructionType::NatmRc, 105.0, 20.0).unwrap();
        assert_eq!(section.spans().len(), 6);
        assert_eq!(section.spans()[5].span_no(), 6);
        assert!((section.spans()[5].length() - 5.0).abs() < 1e-9);
        assert!((section.measured_length() - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_subdivision_shorter_than_unit() {
        let section = Section::new(1, ConstructionType::OpenCut, 12.5, 20.0).unwrap();
        assert_eq!(section.spans().len(), 1);
        assert_eq!(section.spans()[0].length(), 12.5);
    }

    #[test]
    fn test_subdivision_tolerates_float_noise() {
        let section = Section::new(1, ConstructionType::NatmRc, 0.3, 0.1).unwrap();
        assert_eq!(section.spans().len(), 3);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(Section::new(1, ConstructionType::NatmRc, 0.0, 20.0).unwrap().spans().is_empty());
        let single = Section::new(1, ConstructionType::NatmRc, 50.0, 0.0).unwrap();
        assert_eq!(single.spans().len(), 1);
        assert_eq!(single.spans()[0].length(), 50.0);
    }

    #[test]
    fn test_span_count_is_capped() {
        let at_limit = Section::new(1, ConstructionType::NatmRc, 9_999.0, 1.0).unwrap();
        assert_eq!(at_limit.spans().len(), 9_999);

        let with_remainder = Section::new(1, ConstructionType::NatmRc, 9_999.5, 1.0).unwrap();
        assert_eq!(with_remainder.spans().len(), 10_000);

        assert!(matches!(
            Section::new(1, ConstructionType::NatmRc, 10_000.0, 1.0),
            Err(SectionError::TooManySpans { .. })
        ));
        assert!(matches!(
            Section::new(1, ConstructionType::NatmRc, 1e10, 1.0),
            Err(SectionError::TooManySpans { .. })
        ));
        assert!(Section::new(1, ConstructionType::NatmRc, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_set_span_length_rolls_up_total() {
        let mut section = Section::new(1, ConstructionType::NatmRc, 100.0, 20.0).unwrap();
        section.set_span_length(2, 35.0).unwrap();
        assert_eq!(section.span(2).unwrap().length(), 35.0);
        assert_eq!(section.total_length, 115.0);
    }

    #[test]
    fn test_set_span_length_rejects_bad_input() {
        let mut section = Section::new(4, ConstructionType::NatmRc, 100.0, 20.0).unwrap();
        assert_eq!(
            section.set_span_length(9, 10.0),
            Err(SectionError::SpanNotFound { section: 4, span: 9 })
        );
        assert!(matches!(
            section.set_span_length(1, 0.0),
            Err(SectionError::InvalidLength(_))
        ));
        assert!(section.set_span_length(1, f64::NAN).is_err());
        assert_eq!(section.total_length, 100.0);
    }

    #[test]
    fn test_changing_type_invalidates_spans() {
        let mut section = Section::new(1, ConstructionType::NatmRc, 40.0, 20.0).unwrap();
        let ty = section.construction_type();
        for span in section.spans_mut() {
            compute_span(span, ty);
        }
        assert!(section.spans().iter().all(|s| s.result().is_some()));

        section.set_construction_type(ConstructionType::AssmBrick);
        assert!(section.spans().iter().all(|s| s.result().is_none()));
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let section: Section = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(section.id, 7);
        assert_eq!(section.construction_type(), ConstructionType::NatmRc);
        assert_eq!(section.total_length, 100.0);
        assert_eq!(section.unit_length, 20.0);
        assert!(section.spans().is_empty());
    }

    #[test]
    fn test_type_key_uses_label() {
        let section = Section::new(2, ConstructionType::TbmSegment, 20.0, 20.0).unwrap();
        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(value["type"], "TBM (세그먼트)");
        assert_eq!(value["spans"][0]["span_no"], 1);
    }
}
