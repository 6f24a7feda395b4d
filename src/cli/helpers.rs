//! Shared helper functions for CLI commands
//!
//! Workspace session handling, project lookup, argument parsers and the
//! tabular output used by list commands.

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::ProjectStore;
use crate::core::{Config, ConfigError, JsonFileStore, ProjectId, ProjectMap, Workspace};
use crate::entities::Project;
use crate::scoring::{SafetyGrade, Severity};

/// Locate the workspace named by `--workspace`, or search upwards from the
/// current directory
pub fn find_workspace(global: &GlobalOpts) -> Result<Workspace> {
    let found = match &global.workspace {
        Some(path) => Workspace::discover_from(path),
        None => Workspace::discover(),
    };
    found.map_err(|e| miette::miette!("{}", e))
}

/// Configuration for this invocation, plus any config files that were
/// skipped. Works outside a workspace too.
pub fn load_config(global: &GlobalOpts) -> (Config, Vec<ConfigError>) {
    let workspace = find_workspace(global).ok();
    Config::load(workspace.map(|w| w.config_path()).as_deref())
}

/// One command's view of the workspace: everything loaded up front, saved
/// back explicitly.
pub struct Session {
    pub workspace: Workspace,
    pub config: Config,
    pub projects: ProjectMap,
    store: JsonFileStore,
}

impl Session {
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let workspace = find_workspace(global)?;
        let config = global.config.clone();
        let store = workspace.store();
        let projects = store.load_all();
        tracing::debug!(count = projects.len(), "projects loaded");
        Ok(Self {
            workspace,
            config,
            projects,
            store,
        })
    }

    /// Resolve a project by exact id, exact name, or unique id prefix
    pub fn resolve(&self, query: &str) -> Result<ProjectId> {
        resolve_project(&self.projects, query)
    }

    pub fn project(&self, query: &str) -> Result<&Project> {
        let id = self.resolve(query)?;
        self.projects
            .get(&id)
            .ok_or_else(|| miette::miette!("Project not found: {}", query))
    }

    pub fn project_mut(&mut self, query: &str) -> Result<&mut Project> {
        let id = self.resolve(query)?;
        self.projects
            .get_mut(&id)
            .ok_or_else(|| miette::miette!("Project not found: {}", query))
    }

    pub fn save(&self) -> Result<()> {
        self.store.save_all(&self.projects)?;
        Ok(())
    }
}

/// Match a project by exact id, then exact name, then unique id prefix
pub fn resolve_project(projects: &ProjectMap, query: &str) -> Result<ProjectId> {
    let query = query.trim();
    if query.is_empty() {
        return Err(miette::miette!("Project id must not be empty"));
    }

    let exact = ProjectId::from(query);
    if projects.contains_key(&exact) {
        return Ok(exact);
    }

    let by_name: Vec<&ProjectId> = projects
        .values()
        .filter(|p| p.name == query)
        .map(|p| &p.id)
        .collect();
    if let [id] = by_name.as_slice() {
        return Ok((*id).clone());
    }

    let by_prefix: Vec<&ProjectId> = projects.keys().filter(|id| id.starts_with(query)).collect();
    match by_prefix.as_slice() {
        [id] => Ok((*id).clone()),
        [] if by_name.is_empty() => Err(miette::miette!("No project matches '{}'", query)),
        _ => {
            let candidates: Vec<String> = by_name
                .iter()
                .chain(by_prefix.iter())
                .map(|id| id.to_string())
                .collect();
            Err(miette::miette!(
                "'{}' is ambiguous, matches: {}",
                query,
                candidates.join(", ")
            ))
        }
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Color a safety grade by its severity
pub fn styled_grade(grade: SafetyGrade) -> String {
    let label = grade.label();
    match grade.severity() {
        Severity::Informational => style(label).green().to_string(),
        Severity::Caution => style(label).yellow().to_string(),
        Severity::Critical => style(label).red().bold().to_string(),
    }
}

/// Parse a value in 0.0..=1.0
pub fn parse_unit_interval(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is outside 0.0..=1.0", value))
    }
}

/// Parse a finite value >= 0
pub fn parse_non_negative(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{} must be zero or positive", value))
    }
}

/// Parse a finite value > 0
pub fn parse_positive(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{} must be positive", value))
    }
}

/// Parse a defect grade letter a-e
pub fn parse_defect_grade(s: &str) -> std::result::Result<String, String> {
    let lower = s.trim().to_lowercase();
    match lower.as_str() {
        "a" | "b" | "c" | "d" | "e" => Ok(lower),
        _ => Err(format!("'{}' is not a grade (expected a, b, c, d or e)", s)),
    }
}

/// Write a report to a file, or stdout when no path is given
pub fn write_output(content: &str, output_path: Option<PathBuf>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            println!("Report written to: {}", path.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

/// Render rows as a markdown table
pub fn markdown_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for row in rows {
        builder.push_record(row.iter().cloned());
    }
    builder.build().with(Style::markdown()).to_string()
}

/// Print rows in one of the tabular formats. Json and Yaml are handled by
/// the caller, which serializes its own records.
pub fn print_rows(format: OutputFormat, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(headers).into_diagnostic()?;
            for row in rows {
                writer.write_record(row).into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Md => {
            println!("{}", markdown_table(headers, rows));
        }
        _ => {
            let widths: Vec<usize> = headers
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    rows.iter()
                        .filter_map(|r| r.get(i))
                        .map(|c| c.chars().count())
                        .chain(std::iter::once(h.len()))
                        .max()
                        .unwrap_or(0)
                })
                .collect();

            let header_line: Vec<String> = headers
                .iter()
                .zip(&widths)
                .map(|(h, w)| style(format!("{:<w$}", h, w = *w)).bold().to_string())
                .collect();
            println!("{}", header_line.join("  "));
            println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len()));

            for row in rows {
                let line: Vec<String> = row
                    .iter()
                    .zip(&widths)
                    .map(|(c, w)| format!("{:<w$}", c, w = *w))
                    .collect();
                println!("{}", line.join("  ").trim_end());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects() -> ProjectMap {
        let mut map = ProjectMap::new();
        for (id, name) in [
            ("PRJ-01AAA", "North Portal"),
            ("PRJ-01AAB", "South Portal"),
            ("PRJ-02XYZ", "Bypass"),
        ] {
            let mut project = Project::new(name);
            project.id = ProjectId::from(id);
            map.insert(project.id.clone(), project);
        }
        map
    }

    #[test]
    fn test_resolve_exact_id_and_name() {
        let map = projects();
        assert_eq!(resolve_project(&map, "PRJ-01AAB").unwrap().as_str(), "PRJ-01AAB");
        assert_eq!(resolve_project(&map, "Bypass").unwrap().as_str(), "PRJ-02XYZ");
    }

    #[test]
    fn test_resolve_unique_prefix() {
        let map = projects();
        assert_eq!(resolve_project(&map, "prj-02").unwrap().as_str(), "PRJ-02XYZ");
    }

    #[test]
    fn test_resolve_ambiguous_or_missing() {
        let map = projects();
        assert!(resolve_project(&map, "PRJ-01").is_err());
        assert!(resolve_project(&map, "PRJ-09").is_err());
        assert!(resolve_project(&map, "  ").is_err());
    }

    #[test]
    fn test_truncate_str_counts_chars() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("재래식 (조적) 터널", 6), "재래식...");
    }

    #[test]
    fn test_value_parsers() {
        assert_eq!(parse_unit_interval("0.5"), Ok(0.5));
        assert!(parse_unit_interval("1.5").is_err());
        assert!(parse_unit_interval("x").is_err());
        assert_eq!(parse_non_negative("0"), Ok(0.0));
        assert!(parse_non_negative("-0.1").is_err());
        assert!(parse_positive("0").is_err());
        assert_eq!(parse_defect_grade("D"), Ok("d".to_string()));
        assert!(parse_defect_grade("f").is_err());
    }

    #[test]
    fn test_markdown_table() {
        let table = markdown_table(&["A", "B"], &[vec!["1".to_string(), "2".to_string()]]);
        assert!(table.contains("| A | B |"));
        assert!(table.contains("| 1 | 2 |"));
    }
}
