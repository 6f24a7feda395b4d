//! `tsa assess` command - Project-level safety grade

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{print_rows, styled_grade, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::scoring::{assess_sections, ProjectAssessment, ProjectSummary};

#[derive(clap::Args, Debug)]
pub struct AssessArgs {
    /// Project id, id prefix or exact name
    pub project: String,

    /// Print only the summary line, not the per-span table
    #[arg(long)]
    pub summary_only: bool,
}

pub fn run(args: AssessArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let project = session.project_mut(&args.project)?;
    let project_id = project.id.clone();
    let assessment = assess_sections(project.sections_mut());
    // Every span cache was refreshed
    session.save()?;

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&assessment).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&assessment).into_diagnostic()?);
            return Ok(());
        }
        _ => {}
    }

    let summary = match &assessment {
        ProjectAssessment::NoData => {
            println!(
                "{} No data: {} has no spans to assess. Add a section with {}",
                style("!").yellow(),
                style(&project_id).cyan(),
                style("tsa section add").yellow()
            );
            return Ok(());
        }
        ProjectAssessment::Assessed(summary) => summary,
    };

    if !args.summary_only {
        print_span_table(summary, global.format)?;
        println!();
    }

    println!(
        "{}: {:.4} over {:.1} m  {}: {}",
        style("Final defect index").bold(),
        summary.final_f,
        summary.total_length,
        style("Grade").bold(),
        styled_grade(summary.final_grade)
    );

    if summary.alerts.is_empty() {
        if !global.quiet {
            println!("{} No critical defects flagged", style("✓").green());
        }
    } else {
        println!();
        println!("{} ({}):", style("Alerts").red().bold(), summary.alerts.len());
        for alert in &summary.alerts {
            println!(
                "  {} section {} span {}: {}",
                style("⚠").red(),
                alert.section_id,
                alert.span_no,
                alert.message
            );
        }
    }
    Ok(())
}

fn print_span_table(summary: &ProjectSummary, format: OutputFormat) -> Result<()> {
    let format = match format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };
    let rows: Vec<Vec<String>> = summary
        .span_results
        .iter()
        .map(|r| {
            vec![
                r.section_id.to_string(),
                r.span_no.to_string(),
                r.construction_type.clone(),
                format!("{:.2}", r.length),
                format!("{:.4}", r.result.f_value),
                r.result.grade.letter().to_string(),
                r.result.alerts.len().to_string(),
            ]
        })
        .collect();
    print_rows(
        format,
        &["SECTION", "SPAN", "TYPE", "LENGTH_M", "F", "GRADE", "ALERTS"],
        &rows,
    )
}
