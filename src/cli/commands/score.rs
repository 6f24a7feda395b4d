//! `tsa score` command - Stateless single-span evaluation

use console::style;
use miette::Result;

use super::span::{print_result, InspectionArgs};
use crate::cli::helpers::parse_unit_interval;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::InspectionData;
use crate::scoring::{mean_auxiliary_index, score_inspection, ConstructionType};

#[derive(clap::Args, Debug)]
pub struct ScoreArgs {
    /// Construction type (default: config `default_type`, else natm-rc)
    #[arg(long = "type", short = 't')]
    pub construction_type: Option<ConstructionType>,

    #[command(flatten)]
    pub inspection: InspectionArgs,

    /// Auxiliary facility defect index (0-1). Repeat for several
    /// facilities; their mean is used.
    #[arg(long, value_parser = parse_unit_interval)]
    pub aux: Vec<f64>,
}

pub fn run(args: ScoreArgs, global: &GlobalOpts) -> Result<()> {
    let construction_type = match args.construction_type {
        Some(ty) => ty,
        None => global.config.construction_type(),
    };

    let mut data = InspectionData::default();
    args.inspection.apply(&mut data);
    data.aux_index = mean_auxiliary_index(&args.aux);

    let result = score_inspection(&data, construction_type);

    let human = matches!(
        global.format,
        OutputFormat::Auto | OutputFormat::Tsv | OutputFormat::Csv | OutputFormat::Md
    );
    if human && !global.quiet {
        println!(
            "{} {} (lining /{}, total /{})",
            style("Type:").bold(),
            construction_type.label(),
            construction_type.lining_denominator(),
            construction_type.total_denominator()
        );
        if args.aux.len() > 1 {
            println!(
                "{} mean of {} facilities = {:.4}",
                style("Auxiliary index:").bold(),
                args.aux.len(),
                data.aux_index
            );
        }
    }
    print_result(&result, global.format)
}
