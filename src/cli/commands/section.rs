//! `tsa section` command - Structural section management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{parse_positive, print_rows, styled_grade, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::scoring::ConstructionType;

#[derive(Subcommand, Debug)]
pub enum SectionCommands {
    /// Add a section, subdivided into spans
    Add(AddArgs),

    /// List a project's sections
    List(ListArgs),

    /// Remove a section and its spans
    Remove(RemoveArgs),

    /// Change a section's construction type (clears span results)
    SetType(SetTypeArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Project id, id prefix or exact name
    pub project: String,

    /// Construction type: key (natm-rc), label, or name (NATM_RC)
    /// (default: config `default_type`, else natm-rc)
    #[arg(long = "type", short = 't')]
    pub construction_type: Option<ConstructionType>,

    /// Section length in meters
    #[arg(long, value_parser = parse_positive, default_value = "100")]
    pub total: f64,

    /// Span length in meters (default: config `unit_length`, else 20)
    #[arg(long, value_parser = parse_positive)]
    pub unit: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Project id, id prefix or exact name
    pub project: String,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Project id, id prefix or exact name
    pub project: String,

    /// Section id
    pub section: u32,
}

#[derive(clap::Args, Debug)]
pub struct SetTypeArgs {
    /// Project id, id prefix or exact name
    pub project: String,

    /// Section id
    pub section: u32,

    /// New construction type
    pub construction_type: ConstructionType,
}

pub fn run(cmd: SectionCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SectionCommands::Add(args) => run_add(args, global),
        SectionCommands::List(args) => run_list(args, global),
        SectionCommands::Remove(args) => run_remove(args, global),
        SectionCommands::SetType(args) => run_set_type(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let construction_type = args
        .construction_type
        .unwrap_or_else(|| session.config.construction_type());
    let unit = args.unit.unwrap_or_else(|| session.config.unit_length());

    let project = session.project_mut(&args.project)?;
    let id = project
        .add_section(construction_type, args.total, unit)
        .into_diagnostic()?;
    let spans = project.section(id).map_or(0, |s| s.spans().len());
    let project_id = project.id.clone();
    session.save()?;

    tracing::info!(project = %project_id, section = id, spans, "section added");
    println!(
        "{} Added section {} ({}, {} m, {} span(s)) to {}",
        style("✓").green(),
        style(id).cyan(),
        construction_type.label(),
        args.total,
        spans,
        style(&project_id).cyan()
    );
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let project = session.project(&args.project)?;

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(project.sections()).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&project.sections()).into_diagnostic()?);
        }
        _ => {
            if project.sections().is_empty() {
                if !global.quiet {
                    println!("No sections in {}.", project.id);
                }
                return Ok(());
            }
            let rows: Vec<Vec<String>> = project
                .sections()
                .iter()
                .map(|s| {
                    let scored = s.spans().iter().filter(|sp| sp.result().is_some()).count();
                    let worst = s.spans().iter().filter_map(|sp| sp.result()).map(|r| r.grade).max();
                    let worst = match (worst, format) {
                        (Some(g), OutputFormat::Tsv) => styled_grade(g),
                        (Some(g), _) => g.label().to_string(),
                        (None, _) => "-".to_string(),
                    };
                    vec![
                        s.id.to_string(),
                        s.construction_type().label().to_string(),
                        format!("{:.2}", s.total_length),
                        format!("{:.2}", s.unit_length),
                        s.spans().len().to_string(),
                        scored.to_string(),
                        worst,
                    ]
                })
                .collect();
            print_rows(
                format,
                &["SECTION", "TYPE", "TOTAL_M", "UNIT_M", "SPANS", "SCORED", "WORST"],
                &rows,
            )?;
        }
    }
    Ok(())
}

fn run_remove(args: RemoveArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let project = session.project_mut(&args.project)?;
    let removed = project
        .remove_section(args.section)
        .ok_or_else(|| miette::miette!("Section {} not found in {}", args.section, project.id))?;
    session.save()?;

    println!(
        "{} Removed section {} ({} span(s))",
        style("✓").green(),
        style(removed.id).cyan(),
        removed.spans().len()
    );
    Ok(())
}

fn run_set_type(args: SetTypeArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let project = session.project_mut(&args.project)?;
    let project_id = project.id.clone();
    let section = project
        .section_mut(args.section)
        .ok_or_else(|| miette::miette!("Section {} not found in {}", args.section, project_id))?;
    section.set_construction_type(args.construction_type);
    session.save()?;

    println!(
        "{} Section {} is now {} (span results cleared)",
        style("✓").green(),
        style(args.section).cyan(),
        args.construction_type.label()
    );
    Ok(())
}
