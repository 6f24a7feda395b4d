//! Entity type definitions
//!
//! The persisted project graph:
//!
//! - [`Project`] - one inspection of one facility, owning its sections
//! - [`Section`] - a contiguous stretch of a single construction type
//! - [`Span`] - the smallest inspected unit, with a memoized score
//! - [`InspectionData`] / [`MaterialDefects`] - raw field observations
//!
//! Missing keys in saved records fall back to the values in [`defaults`].

pub mod defaults;
pub mod inspection;
pub mod project;
pub mod section;
pub mod span;

pub use inspection::{InspectionData, MaterialDefects};
pub use project::Project;
pub use section::{Section, SectionError};
pub use span::Span;
