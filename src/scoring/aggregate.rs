//! Project aggregation
//!
//! Rolls every span of every section up into one length-weighted defect
//! index. Each span is rescored on the way so no stale cache is read.

use serde::{Deserialize, Serialize};

use super::engine::{compute_span, SpanResult};
use super::evaluator::grade_for_index;
use super::grade::SafetyGrade;
use crate::entities::{InspectionData, Section};

/// Per-span row of an assessment, in section/span traversal order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanReport {
    pub section_id: u32,

    /// Construction type label of the owning section
    pub construction_type: String,

    pub span_no: u32,
    pub length: f64,
    pub data: InspectionData,
    pub result: SpanResult,
}

/// A span alert tagged with where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedAlert {
    pub section_id: u32,
    pub span_no: u32,
    pub message: String,
}

/// Project-level rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub final_f: f64,
    pub final_grade: SafetyGrade,
    pub total_length: f64,
    pub span_results: Vec<SpanReport>,
    pub alerts: Vec<TaggedAlert>,
}

/// Outcome of [`assess_sections`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProjectAssessment {
    /// No sections, or sections without spans
    NoData,
    Assessed(ProjectSummary),
}

impl ProjectAssessment {
    pub fn summary(&self) -> Option<&ProjectSummary> {
        match self {
            ProjectAssessment::NoData => None,
            ProjectAssessment::Assessed(summary) => Some(summary),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ProjectAssessment::NoData)
    }
}

/// Rescore every span and compute the length-weighted project index.
pub fn assess_sections(sections: &mut [Section]) -> ProjectAssessment {
    let mut span_results = Vec::new();
    let mut alerts = Vec::new();

    for section in sections.iter_mut() {
        let section_id = section.id;
        let construction_type = section.construction_type();

        for span in section.spans_mut() {
            let result = compute_span(span, construction_type);
            alerts.extend(result.alerts.iter().map(|message| TaggedAlert {
                section_id,
                span_no: span.span_no(),
                message: message.clone(),
            }));
            span_results.push(SpanReport {
                section_id,
                construction_type: construction_type.label().to_string(),
                span_no: span.span_no(),
                length: span.length(),
                data: span.data().clone(),
                result,
            });
        }
    }

    if span_results.is_empty() {
        tracing::debug!(sections = sections.len(), "no spans to assess");
        return ProjectAssessment::NoData;
    }

    let (final_f, total_length) = length_weighted_index(
        span_results
            .iter()
            .map(|report| (report.result.f_value, report.length)),
    )
    .unwrap_or((0.0, 0.0));

    tracing::debug!(
        spans = span_results.len(),
        alerts = alerts.len(),
        total_length,
        final_f,
        "project assessed"
    );

    ProjectAssessment::Assessed(ProjectSummary {
        final_f,
        final_grade: grade_for_index(final_f),
        total_length,
        span_results,
        alerts,
    })
}

/// Σ(f·len) / Σlen over `(f_value, length)` pairs.
///
/// Returns `(index, total_length)`, or `None` for an empty input. A zero
/// total length gives an index of 0.
pub fn length_weighted_index<I>(spans: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut count = 0usize;
    let mut weighted = 0.0;
    let mut total = 0.0;
    for (f_value, length) in spans {
        count += 1;
        weighted += f_value * length;
        total += length;
    }

    if count == 0 {
        return None;
    }
    let index = if total == 0.0 { 0.0 } else { weighted / total };
    Some((index, total))
}
