//! `tsa report` command - Markdown assessment report

use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{markdown_table, write_output, Session};
use crate::cli::GlobalOpts;
use crate::entities::Project;
use crate::scoring::{assess_sections, ProjectAssessment};

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Project id, id prefix or exact name
    pub project: String,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ReportArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let project = session.project_mut(&args.project)?;
    let assessment = assess_sections(project.sections_mut());
    let content = render_report(project, &assessment);
    session.save()?;

    write_output(&content, args.output)
}

/// Render the full report for a project and its assessment
pub fn render_report(project: &Project, assessment: &ProjectAssessment) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Tunnel Safety Assessment: {}\n\n", project.name));

    let header = vec![
        vec!["Project ID".to_string(), project.id.to_string()],
        vec!["Facility".to_string(), project.name.clone()],
        vec!["Inspector".to_string(), project.inspector.clone()],
        vec!["Position".to_string(), project.position.clone()],
        vec!["Company".to_string(), project.company.clone()],
        vec!["Inspection date".to_string(), project.date_str.clone()],
    ];
    out.push_str(&markdown_table(&["Field", "Value"], &header));
    out.push_str("\n\n");

    let summary = match assessment {
        ProjectAssessment::NoData => {
            out.push_str("## Result\n\n");
            out.push_str("No data: the project has no inspected spans.\n");
            return out;
        }
        ProjectAssessment::Assessed(summary) => summary,
    };

    out.push_str("## Span Results\n\n");
    let rows: Vec<Vec<String>> = summary
        .span_results
        .iter()
        .map(|r| {
            vec![
                format!("{}-{}", r.section_id, r.span_no),
                r.construction_type.clone(),
                format!("{:.2}", r.length),
                format!("{:.2}", r.data.crack_width),
                r.result.details.crack_grade.to_string(),
                r.result.details.material_grade.to_string(),
                r.data.leakage.to_string(),
                r.data.breakage.to_string(),
                format!("{:.4}", r.result.f_value),
                r.result.grade.letter().to_string(),
            ]
        })
        .collect();
    out.push_str(&markdown_table(
        &[
            "Span", "Type", "Length (m)", "Crack (mm)", "Crack", "Material", "Leakage",
            "Breakage", "F", "Grade",
        ],
        &rows,
    ));
    out.push_str("\n\n");

    out.push_str("## Stage Breakdown\n\n");
    let rows: Vec<Vec<String>> = summary
        .span_results
        .iter()
        .map(|r| {
            let d = &r.result.details;
            vec![
                format!("{}-{}", r.section_id, r.span_no),
                format!("{}", d.lining),
                format!("{:.4}", d.lining_index),
                format!("{}", d.surround),
                format!("{:.4}", d.f_basic),
                format!("{:.2}", d.weight),
                format!("{:.4}", r.result.f_value),
            ]
        })
        .collect();
    out.push_str(&markdown_table(
        &["Span", "Lining", "Lining index", "Surroundings", "F basic", "Weight", "F"],
        &rows,
    ));
    out.push_str("\n\n");

    out.push_str("## Alerts\n\n");
    if summary.alerts.is_empty() {
        out.push_str("None.\n\n");
    } else {
        for alert in &summary.alerts {
            out.push_str(&format!(
                "- Section {} span {}: {}\n",
                alert.section_id, alert.span_no, alert.message
            ));
        }
        out.push('\n');
    }

    out.push_str("## Result\n\n");
    out.push_str(&format!("- Total length: {:.2} m\n", summary.total_length));
    out.push_str(&format!("- Final defect index: {:.4}\n", summary.final_f));
    out.push_str(&format!(
        "- Safety grade: **{}** ({})\n\n",
        summary.final_grade.label(),
        summary.final_grade.descriptor()
    ));

    out.push_str("## Opinion\n\n");
    let opinion = if project.opinion.trim().is_empty() {
        summary.final_grade.recommended_opinion()
    } else {
        project.opinion.trim()
    };
    out.push_str(opinion);
    out.push('\n');

    out
}
