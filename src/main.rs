mod commands;
mod render;

use std::io::IsTerminal;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use semcal_core::ViewMode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "semcal", version)]
#[command(about = "Show semester, week and month views of your iCalendar feeds")]
struct Cli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the view commands.
#[derive(Args)]
pub struct ViewArgs {
    /// Show the view containing this date (YYYY-MM-DD) instead of today
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Move this many terms, weeks or months from the date
    #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
    offset: i32,

    /// Print the view as JSON
    #[arg(long)]
    json: bool,

    /// Keep running and redraw when the date changes
    #[arg(long)]
    watch: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the events of a semester
    Semester {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Show a week, Monday to Sunday
    Week {
        #[command(flatten)]
        view: ViewArgs,

        /// Category selection as a query string, e.g. "Algebra=0"
        #[arg(long)]
        query: Option<String>,
    },
    /// Show a month grid
    Month {
        #[command(flatten)]
        view: ViewArgs,

        /// Category selection as a query string, e.g. "Algebra=0"
        #[arg(long)]
        query: Option<String>,
    },
    /// Print the query string for a category selection
    Query {
        /// Start from this query string instead of all categories
        #[arg(long)]
        query: Option<String>,

        /// Hide a category
        #[arg(long, action = ArgAction::Append)]
        hide: Vec<String>,

        /// Show a category
        #[arg(long, action = ArgAction::Append)]
        show: Vec<String>,

        /// Encode the month view instead of the week view
        #[arg(long)]
        month: bool,
    },
    /// Show the details of one event
    Event {
        /// Number of the event as shown in a view
        index: usize,

        /// Look the event up in the semester list instead of the grid
        #[arg(long)]
        semester: bool,
    },
}

fn init_tracing(verbose: u8, quiet: u8) -> Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(verbose >= 2)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::Semester { view } => commands::view::run(ViewMode::Semester, view, None).await,
        Commands::Week { view, query } => commands::view::run(ViewMode::Week, view, query).await,
        Commands::Month { view, query } => commands::view::run(ViewMode::Month, view, query).await,
        Commands::Query {
            query,
            hide,
            show,
            month,
        } => commands::query::run(query.as_deref(), &hide, &show, month),
        Commands::Event { index, semester } => commands::event::run(index, semester).await,
    }
}
