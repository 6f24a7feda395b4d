//! Span entity - the smallest inspected unit of a section

use serde::{Deserialize, Deserializer, Serialize};

use super::defaults;
use super::inspection::InspectionData;
use crate::scoring::SpanResult;

/// One physical sub-segment of a section
///
/// Owns its inspection data and a memoized scoring result. The result is
/// never authoritative: it is dropped whenever the data is borrowed mutably
/// and can always be rebuilt by the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Span {
    span_no: u32,

    /// Length in meters
    length: f64,

    data: InspectionData,

    #[serde(deserialize_with = "lenient_cache")]
    result_cache: Option<SpanResult>,
}

impl Default for Span {
    fn default() -> Self {
        Self::new(defaults::SPAN_NO, defaults::SPAN_LENGTH)
    }
}

impl Span {
    /// Create an uninspected span
    pub fn new(span_no: u32, length: f64) -> Self {
        Self::with_data(span_no, length, InspectionData::default())
    }

    pub fn with_data(span_no: u32, length: f64, data: InspectionData) -> Self {
        Self {
            span_no,
            length,
            data,
            result_cache: None,
        }
    }

    pub fn span_no(&self) -> u32 {
        self.span_no
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub(crate) fn set_length(&mut self, length: f64) {
        self.length = length;
    }

    pub fn data(&self) -> &InspectionData {
        &self.data
    }

    /// Mutable access to the observations. Invalidates the cached result.
    pub fn data_mut(&mut self) -> &mut InspectionData {
        self.result_cache = None;
        &mut self.data
    }

    /// Last computed result, if still valid
    pub fn result(&self) -> Option<&SpanResult> {
        self.result_cache.as_ref()
    }

    pub(crate) fn store_result(&mut self, result: SpanResult) {
        self.result_cache = Some(result);
    }

    pub fn invalidate(&mut self) {
        self.result_cache = None;
    }
}

/// Reads a cached result, discarding it if it no longer matches the
/// current result shape.
fn lenient_cache<'de, D>(deserializer: D) -> Result<Option<SpanResult>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}
