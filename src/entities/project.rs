//! Project entity - the top-level persisted unit

use serde::{Deserialize, Serialize};

use super::defaults;
use super::section::{Section, SectionError};
use crate::core::identity::ProjectId;
use crate::scoring::ConstructionType;

/// An inspection project: who inspected what, when, and the sections found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    /// Unique identifier
    pub id: ProjectId,

    /// Facility name
    pub name: String,

    /// Responsible inspector
    pub inspector: String,

    /// Inspector's position / grade
    pub position: String,

    /// Inspector's company
    pub company: String,

    /// Inspection date as entered (YYYY-MM-DD)
    pub date_str: String,

    /// Final opinion text
    pub opinion: String,

    /// Next id to hand out in [`Project::add_section`]
    next_section_id: u32,

    sections: Vec<Section>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: ProjectId::default(),
            name: String::new(),
            inspector: String::new(),
            position: String::new(),
            company: String::new(),
            date_str: String::new(),
            opinion: defaults::OPINION.to_string(),
            next_section_id: defaults::NEXT_SECTION_ID,
            sections: Vec::new(),
        }
    }
}

impl Project {
    /// Create an empty project with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::generate(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn next_section_id(&self) -> u32 {
        self.next_section_id
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    pub fn section(&self, id: u32) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: u32) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Append a new subdivided section and return its id
    pub fn add_section(
        &mut self,
        construction_type: ConstructionType,
        total_length: f64,
        unit_length: f64,
    ) -> Result<u32, SectionError> {
        let id = self.peek_section_id()?;
        let section = Section::new(id, construction_type, total_length, unit_length)?;
        self.next_section_id = id.saturating_add(1);
        self.sections.push(section);
        Ok(id)
    }

    /// Remove a section. Its id is not reused.
    pub fn remove_section(&mut self, id: u32) -> Option<Section> {
        let index = self.sections.iter().position(|s| s.id == id)?;
        Some(self.sections.remove(index))
    }

    /// Total number of spans across all sections
    pub fn span_count(&self) -> usize {
        self.sections.iter().map(|s| s.spans().len()).sum()
    }

    fn peek_section_id(&self) -> Result<u32, SectionError> {
        // Records from older files may carry a counter behind their
        // section ids.
        let after_highest = match self.sections.iter().map(|s| s.id).max() {
            Some(highest) => highest.checked_add(1).ok_or(SectionError::IdsExhausted)?,
            None => 1,
        };
        let id = self.next_section_id.max(after_highest);
        if self.sections.iter().any(|s| s.id == id) {
            return Err(SectionError::IdsExhausted);
        }
        Ok(id)
    }
}
