use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use serde::Serialize;
use std::path::PathBuf;

use orchard_rust::config::ViewerConfig;
use orchard_rust::io::export::default_export_name;
use orchard_rust::services::GroupKey;
use orchard_rust::session::SessionContext;
use orchard_rust::transformations::{Choice, FilterSelection};

/// Orchard index reports from the command line
#[derive(Parser, Debug)]
#[command(name = "orchard-report", version, about, propagate_version = true)]
struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    selection: SelectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Point table (CSV)
    #[arg(value_hint = ValueHint::FilePath)]
    points: PathBuf,

    /// Configuration file (defaults to orchard.toml lookup)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Block polygon attribute table (CSV)
    #[arg(long, value_hint = ValueHint::FilePath)]
    blocks: Option<PathBuf>,

    /// Management zone attribute table (CSV)
    #[arg(long, value_hint = ValueHint::FilePath)]
    zones: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SelectionArgs {
    #[arg(long, global = true)]
    crop: Option<String>,

    #[arg(long, global = true)]
    flight_date: Option<String>,

    #[arg(long, global = true)]
    species: Option<String>,

    #[arg(long, global = true)]
    variety: Option<String>,

    /// Restrict to these blocks (repeatable)
    #[arg(id = "selection_blocks", long = "block", value_name = "BLOCKS", global = true)]
    blocks: Vec<String>,
}

impl SelectionArgs {
    fn to_selection(&self) -> FilterSelection {
        FilterSelection {
            crop: Choice::from(self.crop.clone()),
            flight_date: Choice::from(self.flight_date.clone()),
            species: Choice::from(self.species.clone()),
            variety: Choice::from(self.variety.clone()),
            blocks: self.blocks.clone(),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum GroupBy {
    Block,
    FlightDate,
}

impl From<GroupBy> for GroupKey {
    fn from(group: GroupBy) -> Self {
        match group {
            GroupBy::Block => GroupKey::Block,
            GroupBy::FlightDate => GroupKey::FlightDate,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum ExportKind {
    Points,
    Blocks,
    Breakdown,
    Zones,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// KPIs and class distribution of an index
    Summary {
        #[arg(short, long, default_value = "ndvi")]
        index: String,
    },

    /// Per-block or per-flight statistics
    Breakdown {
        #[arg(short, long, default_value = "ndvi")]
        index: String,

        #[arg(long, value_enum, default_value_t = GroupBy::Block)]
        by: GroupBy,
    },

    /// Compare two flights (the first two when no dates are given)
    Compare {
        #[arg(short, long, default_value = "ndvi")]
        index: String,

        #[arg(long, requires = "after")]
        before: Option<String>,

        #[arg(long, requires = "before")]
        after: Option<String>,
    },

    /// Area per management-zone level
    Zones {
        #[arg(short, long, default_value = "ndvi")]
        index: String,
    },

    /// Status, weak blocks and recommendations
    Insights {
        #[arg(short, long, default_value = "ndvi")]
        index: String,
    },

    /// Write a table as CSV
    Export {
        #[arg(value_enum)]
        what: ExportKind,

        #[arg(short, long, default_value = "ndvi")]
        index: String,

        /// Grouping of a breakdown export
        #[arg(long, value_enum, default_value_t = GroupBy::Block)]
        by: GroupBy,

        /// Output file (defaults to a timestamped name in the working directory)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open_session(cli: &Cli) -> Result<SessionContext> {
    let config = match &cli.input.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::from_default_location()?,
    };
    let mut session = SessionContext::new(config)?;

    session
        .load_points(&cli.input.points)
        .with_context(|| format!("Cannot load {}", cli.input.points.display()))?;
    if let Some(path) = &cli.input.blocks {
        session.load_blocks(path);
    }
    if let Some(path) = &cli.input.zones {
        session.load_zones(path);
    }
    session.set_selection(cli.selection.to_selection());
    Ok(session)
}

fn export_prefix(what: ExportKind, index: &str, by: GroupBy) -> String {
    match what {
        ExportKind::Points => format!("{}_points", index),
        ExportKind::Blocks => format!("{}_blocks", index),
        ExportKind::Breakdown => match by {
            GroupBy::Block => format!("{}_breakdown", index),
            GroupBy::FlightDate => format!("{}_breakdown_by_flight", index),
        },
        ExportKind::Zones => format!("{}_zones", index),
    }
}

fn export(
    session: &SessionContext,
    what: ExportKind,
    index: &str,
    by: GroupBy,
    output: Option<PathBuf>,
) -> Result<()> {
    let prefix = export_prefix(what, index, by);
    let path = output.unwrap_or_else(|| PathBuf::from(default_export_name(&prefix)));

    match what {
        ExportKind::Points => session.export_points(&path)?,
        ExportKind::Blocks => session.export_block_table(index, &path)?,
        ExportKind::Breakdown => session.export_breakdown(index, by.into(), &path)?,
        ExportKind::Zones => session.export_zone_summary(index, &path)?,
    }
    println!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let session = open_session(&cli)?;

    match &cli.command {
        Commands::Summary { index } => {
            print_json(&session.summary(index)?)?;
            if let Some(surface) = session.surface()? {
                print_json(&surface)?;
            }
        }
        Commands::Breakdown { index, by } => print_json(&session.breakdown(index, (*by).into())?)?,
        Commands::Compare { index, before, after } => match (before, after) {
            (Some(before), Some(after)) => print_json(&session.compare(index, before, after)?)?,
            _ => match session.compare_first(index)? {
                Some(comparison) => print_json(&comparison)?,
                None => println!("The selection holds fewer than two flights"),
            },
        },
        Commands::Zones { index } => match session.zone_summary(index) {
            Some(summary) => print_json(&summary)?,
            None => println!("No management zones loaded"),
        },
        Commands::Insights { index } => print_json(&session.insights(index)?)?,
        Commands::Export {
            what,
            index,
            by,
            output,
        } => export(&session, *what, index, *by, output.clone())?,
    }

    Ok(())
}
