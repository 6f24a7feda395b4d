//! TSA: Tunnel Safety Assessment
//!
//! Scores tunnel lining inspections into a weighted defect index and
//! safety grade, rolls spans up into a length-weighted project grade, and
//! keeps inspection projects in a local JSON store.

pub mod cli;
pub mod core;
pub mod entities;
pub mod scoring;
