//! `tsa span` command - Span inspection data

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    parse_defect_grade, parse_non_negative, parse_positive, parse_unit_interval, styled_grade,
    Session,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::InspectionData;
use crate::scoring::{compute_span, SpanResult};

#[derive(Subcommand, Debug)]
pub enum SpanCommands {
    /// Record inspection findings for a span and rescore it
    Inspect(InspectArgs),

    /// Change a span's length (the section total follows)
    Length(LengthArgs),

    /// Show a span's inspection data and result
    Show(ShowArgs),
}

/// Span address shared by every span subcommand
#[derive(clap::Args, Debug)]
pub struct SpanRef {
    /// Project id, id prefix or exact name
    pub project: String,

    /// Section id
    pub section: u32,

    /// Span number
    pub span: u32,
}

/// Observation fields. Only the ones given are applied.
#[derive(clap::Args, Debug, Default)]
pub struct InspectionArgs {
    /// Maximum crack width (mm)
    #[arg(long, value_parser = parse_non_negative)]
    pub crack: Option<f64>,

    /// Leakage grade (a-e)
    #[arg(long, value_parser = parse_defect_grade)]
    pub leakage: Option<String>,

    /// Breakage grade (a-e)
    #[arg(long, value_parser = parse_defect_grade)]
    pub breakage: Option<String>,

    /// Soil particles flow out with the leakage
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub soil_leak: Option<bool>,

    /// Spalling grade (a-e)
    #[arg(long, value_parser = parse_defect_grade)]
    pub spalling: Option<String>,

    /// Efflorescence grade (a-e)
    #[arg(long, value_parser = parse_defect_grade)]
    pub efflorescence: Option<String>,

    /// Exposed reinforcement grade (a-e)
    #[arg(long, value_parser = parse_defect_grade)]
    pub rebar: Option<String>,

    /// Carbonation / chloride grade (a-e)
    #[arg(long, value_parser = parse_defect_grade)]
    pub carbonation: Option<String>,

    /// Drainage condition score (0-4)
    #[arg(long, value_parser = clap::value_parser!(i32).range(0..=4))]
    pub drainage: Option<i32>,

    /// Surrounding ground score (0-4)
    #[arg(long, value_parser = clap::value_parser!(i32).range(0..=4))]
    pub ground: Option<i32>,

    /// Portal condition score (0-4)
    #[arg(long, value_parser = clap::value_parser!(i32).range(0..=4))]
    pub portal: Option<i32>,

    /// Utility duct score (0-4)
    #[arg(long, value_parser = clap::value_parser!(i32).range(0..=4))]
    pub utility: Option<i32>,

    /// Special condition score (0-3)
    #[arg(long, value_parser = clap::value_parser!(i32).range(0..=3))]
    pub special: Option<i32>,

    /// Damage location tag
    #[arg(long)]
    pub location: Option<String>,

    /// Photo reference
    #[arg(long)]
    pub photo: Option<String>,
}

impl InspectionArgs {
    /// Copy the given fields onto `data`; returns the names changed
    pub fn apply(self, data: &mut InspectionData) -> Vec<&'static str> {
        let mut changed = Vec::new();
        let material = &mut data.material;

        macro_rules! set {
            ($arg:expr, $field:expr, $name:literal) => {
                if let Some(value) = $arg {
                    $field = value.into();
                    changed.push($name);
                }
            };
        }

        set!(self.spalling, material.spalling, "spalling");
        set!(self.efflorescence, material.efflorescence, "efflorescence");
        set!(self.rebar, material.rebar, "rebar");
        set!(self.carbonation, material.carbonation, "carbonation");
        set!(self.crack, data.crack_width, "crack");
        set!(self.leakage, data.leakage, "leakage");
        set!(self.breakage, data.breakage, "breakage");
        set!(self.soil_leak, data.soil_leak, "soil_leak");
        set!(self.drainage, data.drainage, "drainage");
        set!(self.ground, data.ground, "ground");
        set!(self.portal, data.portal, "portal");
        set!(self.utility, data.utility, "utility");
        set!(self.special, data.special, "special");
        set!(self.location, data.location, "location");
        if let Some(photo) = self.photo {
            data.photo = if photo.is_empty() { None } else { Some(photo) };
            changed.push("photo");
        }
        changed
    }
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub at: SpanRef,

    #[command(flatten)]
    pub inspection: InspectionArgs,

    /// Auxiliary facility defect index (0-1)
    #[arg(long, value_parser = parse_unit_interval)]
    pub aux: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct LengthArgs {
    #[command(flatten)]
    pub at: SpanRef,

    /// New length in meters
    #[arg(value_parser = parse_positive)]
    pub meters: f64,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub at: SpanRef,
}

pub fn run(cmd: SpanCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SpanCommands::Inspect(args) => run_inspect(args, global),
        SpanCommands::Length(args) => run_length(args, global),
        SpanCommands::Show(args) => run_show(args, global),
    }
}

fn run_inspect(args: InspectArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let at = &args.at;
    let project = session.project_mut(&at.project)?;
    let project_id = project.id.clone();
    let section = project
        .section_mut(at.section)
        .ok_or_else(|| miette::miette!("Section {} not found in {}", at.section, project_id))?;
    let construction_type = section.construction_type();
    let span = section
        .span_mut(at.span)
        .ok_or_else(|| miette::miette!("Span {} not found in section {}", at.span, at.section))?;

    let mut changed = args.inspection.apply(span.data_mut());
    if let Some(aux) = args.aux {
        span.data_mut().aux_index = aux;
        changed.push("aux");
    }
    let result = compute_span(span, construction_type);
    session.save()?;

    tracing::info!(
        project = %project_id,
        section = at.section,
        span = at.span,
        fields = changed.len(),
        "span inspected"
    );
    if !global.quiet {
        println!(
            "{} Span {}-{} updated ({})",
            style("✓").green(),
            at.section,
            at.span,
            if changed.is_empty() {
                "no fields changed".to_string()
            } else {
                changed.join(", ")
            }
        );
    }
    print_result(&result, global.format)
}

fn run_length(args: LengthArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let at = &args.at;
    let project = session.project_mut(&at.project)?;
    let project_id = project.id.clone();
    let section = project
        .section_mut(at.section)
        .ok_or_else(|| miette::miette!("Section {} not found in {}", at.section, project_id))?;
    section.set_span_length(at.span, args.meters).into_diagnostic()?;
    let total = section.total_length;
    session.save()?;

    println!(
        "{} Span {}-{} is now {} m (section total {:.2} m)",
        style("✓").green(),
        at.section,
        at.span,
        args.meters,
        total
    );
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let at = &args.at;
    let project = session.project(&at.project)?;
    let section = project
        .section(at.section)
        .ok_or_else(|| miette::miette!("Section {} not found in {}", at.section, project.id))?;
    let span = section
        .span(at.span)
        .ok_or_else(|| miette::miette!("Span {} not found in section {}", at.span, at.section))?;

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Yaml,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(span).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(span).into_diagnostic()?);
        }
        _ => {
            let data = span.data();
            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}-{} ({}, {} m)",
                style("Span").bold(),
                section.id,
                span.span_no(),
                section.construction_type().label(),
                span.length()
            );
            if !data.location.is_empty() {
                println!("{}: {}", style("Location").bold(), data.location);
            }
            println!("{}", style("─".repeat(60)).dim());
            println!("  {}: {} mm", style("Crack").dim(), data.crack_width);
            println!(
                "  {}: {} / {}",
                style("Leakage / breakage").dim(),
                data.leakage,
                data.breakage
            );
            println!("  {}: {}", style("Soil outflow").dim(), data.soil_leak);
            println!(
                "  {}: spalling {}, efflorescence {}, rebar {}, carbonation {}",
                style("Material").dim(),
                data.material.spalling,
                data.material.efflorescence,
                data.material.rebar,
                data.material.carbonation
            );
            println!(
                "  {}: drainage {}, ground {}, portal {}, utility {}, special {}",
                style("Surroundings").dim(),
                data.drainage,
                data.ground,
                data.portal,
                data.utility,
                data.special
            );
            println!("  {}: {}", style("Auxiliary index").dim(), data.aux_index);
            if let Some(photo) = &data.photo {
                println!("  {}: {}", style("Photo").dim(), photo);
            }
            println!();
            match span.result() {
                Some(result) => print_result(result, OutputFormat::Tsv)?,
                None => println!(
                    "{} Not scored yet. Run {} to compute.",
                    style("!").yellow(),
                    style("tsa assess").yellow()
                ),
            }
        }
    }
    Ok(())
}

/// Print one span result in the requested format
pub fn print_result(result: &SpanResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(result).into_diagnostic()?);
        }
        _ => {
            let d = &result.details;
            println!(
                "{}: {:.4}  {}: {}",
                style("Defect index").bold(),
                result.f_value,
                style("Grade").bold(),
                styled_grade(result.grade)
            );
            println!(
                "  lining {} (index {:.4}, crack {}, material {}), surroundings {}, f_basic {:.4}, weight {:.2}",
                d.lining, d.lining_index, d.crack_grade, d.material_grade, d.surround, d.f_basic, d.weight
            );
            for alert in &result.alerts {
                println!("  {} {}", style("⚠").red(), style(alert).red());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_only_given_fields() {
        let mut data = InspectionData {
            drainage: 3,
            location: "crown".to_string(),
            ..InspectionData::default()
        };
        let args = InspectionArgs {
            crack: Some(0.4),
            rebar: Some("d".to_string()),
            soil_leak: Some(true),
            ..InspectionArgs::default()
        };
        let changed = args.apply(&mut data);

        assert_eq!(changed, ["rebar", "crack", "soil_leak"]);
        assert_eq!(data.crack_width, 0.4);
        assert_eq!(data.material.rebar.as_str(), "d");
        assert!(data.soil_leak);
        assert_eq!(data.drainage, 3);
        assert_eq!(data.location, "crown");
    }

    #[test]
    fn test_empty_photo_clears_reference() {
        let mut data = InspectionData {
            photo: Some("a.jpg".to_string()),
            ..InspectionData::default()
        };
        let args = InspectionArgs {
            photo: Some(String::new()),
            ..InspectionArgs::default()
        };
        args.apply(&mut data);
        assert!(data.photo.is_none());
    }
}
