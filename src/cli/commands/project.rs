//! `tsa project` command - Inspection project management

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{print_rows, styled_grade, truncate_str, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::Project;

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a new inspection project
    New(NewArgs),

    /// List all projects
    List,

    /// Show a project's details
    Show(ShowArgs),

    /// Edit project header fields
    Edit(EditArgs),

    /// Delete a project
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Facility name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Responsible inspector (default: config `inspector`)
    #[arg(long)]
    pub inspector: Option<String>,

    /// Inspector position (default: config `position`)
    #[arg(long)]
    pub position: Option<String>,

    /// Inspector company (default: config `company`)
    #[arg(long)]
    pub company: Option<String>,

    /// Inspection date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,

    /// Final opinion text
    #[arg(long)]
    pub opinion: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Project id, id prefix or exact name
    pub project: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Project id, id prefix or exact name
    pub project: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub inspector: Option<String>,

    #[arg(long)]
    pub position: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    /// Inspection date, YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub opinion: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Project id, id prefix or exact name
    pub project: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: ProjectCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProjectCommands::New(args) => run_new(args, global),
        ProjectCommands::List => run_list(global),
        ProjectCommands::Show(args) => run_show(args, global),
        ProjectCommands::Edit(args) => run_edit(args, global),
        ProjectCommands::Delete(args) => run_delete(args, global),
    }
}

fn validate_date(date: &str) -> Result<String> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| miette::miette!("Invalid date '{}' (expected YYYY-MM-DD)", date))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;

    let mut project = Project::new(args.name.trim());
    project.inspector = args
        .inspector
        .or_else(|| session.config.inspector.clone())
        .unwrap_or_default();
    project.position = args
        .position
        .or_else(|| session.config.position.clone())
        .unwrap_or_default();
    project.company = args
        .company
        .or_else(|| session.config.company.clone())
        .unwrap_or_default();
    project.date_str = match args.date {
        Some(date) => validate_date(&date)?,
        None => chrono::Local::now().format("%Y-%m-%d").to_string(),
    };
    if let Some(opinion) = args.opinion {
        project.opinion = opinion;
    }

    let id = project.id.clone();
    let name = project.name.clone();
    session.projects.insert(id.clone(), project);
    session.save()?;

    tracing::info!(project = %id, "project created");
    println!(
        "{} Created project {} ({})",
        style("✓").green(),
        style(&id).cyan(),
        name
    );
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let projects: Vec<&Project> = session.projects.values().collect();

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&projects).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&projects).into_diagnostic()?);
        }
        _ => {
            if projects.is_empty() {
                if !global.quiet {
                    println!("No projects found.");
                }
                return Ok(());
            }
            let rows: Vec<Vec<String>> = projects
                .iter()
                .map(|p| {
                    vec![
                        p.id.to_string(),
                        truncate_str(&p.name, 30),
                        p.inspector.clone(),
                        p.date_str.clone(),
                        p.sections().len().to_string(),
                        p.span_count().to_string(),
                    ]
                })
                .collect();
            print_rows(
                format,
                &["ID", "NAME", "INSPECTOR", "DATE", "SECTIONS", "SPANS"],
                &rows,
            )?;
            if format == OutputFormat::Tsv && !global.quiet {
                println!();
                println!("{} project(s) found.", style(projects.len()).cyan());
            }
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.project(&args.project)?;

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Yaml,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(project).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(project).into_diagnostic()?);
        }
        _ => {
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("ID").bold(), style(&project.id).cyan());
            println!("{}: {}", style("Name").bold(), style(&project.name).yellow());
            println!(
                "{}: {} {} ({})",
                style("Inspector").bold(),
                project.inspector,
                project.position,
                project.company
            );
            println!("{}: {}", style("Date").bold(), project.date_str);
            if let Some(created) = project.id.created() {
                println!(
                    "{}: {}",
                    style("Created").bold(),
                    created.format("%Y-%m-%d %H:%M UTC")
                );
            }
            println!("{}", style("─".repeat(60)).dim());

            println!();
            println!("{}", style("Sections:").bold());
            if project.sections().is_empty() {
                println!("  {}", style("(none)").dim());
            }
            for section in project.sections() {
                let cached: Vec<_> = section.spans().iter().filter_map(|s| s.result()).collect();
                let worst = cached.iter().map(|r| r.grade).max();
                println!(
                    "  #{} {} {:.1} m, {} span(s){}",
                    section.id,
                    section.construction_type().label(),
                    section.total_length,
                    section.spans().len(),
                    worst
                        .map(|g| format!(", worst {}", styled_grade(g)))
                        .unwrap_or_default()
                );
            }

            if !project.opinion.is_empty() {
                println!();
                println!("{}", style("Opinion:").bold());
                println!("{}", project.opinion);
            }
        }
    }
    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let date = args.date.as_deref().map(validate_date).transpose()?;
    let project = session.project_mut(&args.project)?;

    let mut changed = Vec::new();
    if let Some(name) = args.name {
        project.name = name;
        changed.push("name");
    }
    if let Some(inspector) = args.inspector {
        project.inspector = inspector;
        changed.push("inspector");
    }
    if let Some(position) = args.position {
        project.position = position;
        changed.push("position");
    }
    if let Some(company) = args.company {
        project.company = company;
        changed.push("company");
    }
    if let Some(date) = date {
        project.date_str = date;
        changed.push("date");
    }
    if let Some(opinion) = args.opinion {
        project.opinion = opinion;
        changed.push("opinion");
    }

    if changed.is_empty() {
        println!("{} Nothing to change", style("!").yellow());
        return Ok(());
    }

    let id = project.id.clone();
    session.save()?;
    println!(
        "{} Updated {} of {}",
        style("✓").green(),
        changed.join(", "),
        style(&id).cyan()
    );
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let id = session.resolve(&args.project)?;

    if !args.yes && console::user_attended() {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete project {} and all its sections?", id))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("{} Cancelled", style("!").yellow());
            return Ok(());
        }
    }

    let removed = session
        .projects
        .remove(&id)
        .ok_or_else(|| miette::miette!("Project not found: {}", args.project))?;
    session.save()?;

    tracing::info!(project = %id, "project deleted");
    println!(
        "{} Deleted project {} ({})",
        style("✓").green(),
        style(&id).cyan(),
        removed.name
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert_eq!(validate_date("2026-03-14").unwrap(), "2026-03-14");
        assert!(validate_date("14/03/2026").is_err());
        assert!(validate_date("2026-02-30").is_err());
    }
}
