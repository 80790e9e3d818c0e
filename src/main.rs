use clap::{Parser, Subcommand};
use log::LevelFilter;

mod cmd;
mod core;
mod server;
mod utils;

#[derive(Debug, Parser)]
#[command(version, about = "Straight-line depreciation for organisational asset registers")]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Depreciation and book value of a single asset
    Calc(cmd::calc::CalcCommand),
    /// Month-by-month depreciation schedule of a single asset
    Schedule(cmd::schedule::ScheduleCommand),
    /// Book values of every asset in a register
    Register(cmd::register::RegisterCommand),
    /// Register totals grouped by category or location
    Summary(cmd::summary::SummaryCommand),
    /// Check a register for data quality issues
    Validate(cmd::validate::ValidateCommand),
    /// Print the register input formats
    Schema(cmd::schema::SchemaCommand),
    /// Interactive HTML register report
    Html(cmd::html_report::HtmlCommand),
    /// Serve the depreciation HTTP endpoint
    Serve(cmd::serve::ServeCommand),
}

fn init_logging(verbose: bool, default_level: LevelFilter) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        default_level
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Command::Serve(_) => LevelFilter::Info,
        _ => LevelFilter::Warn,
    };
    init_logging(cli.verbose, default_level);

    match cli.command {
        Command::Calc(calc) => calc.exec(),
        Command::Schedule(schedule) => schedule.exec(),
        Command::Register(register) => register.exec(),
        Command::Summary(summary) => summary.exec(),
        Command::Validate(validate) => validate.exec(),
        Command::Schema(schema) => schema.exec(),
        Command::Html(html) => html.exec(),
        Command::Serve(serve) => serve.exec(),
    }
}
