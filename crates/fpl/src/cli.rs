use clap::{Args, Parser, Subcommand, ValueEnum};
use fpl_spider::Resource;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load Fantasy Premier League tables into a sink, replacing what was there.
    Load {
        /// Specify the resources to load.
        ///
        /// If no resources are provided, every resource whose ids are known is loaded.
        #[arg(short, long)]
        resources: Option<Vec<Resource>>,

        #[command(flatten)]
        ids: IdArgs,

        /// Where the tables go.
        #[arg(short, long, value_enum, default_value_t = SinkKind::Postgres)]
        sink: SinkKind,

        /// Output directory for the json sink.
        #[arg(short, long, default_value = "./buffer/fpl")]
        out: PathBuf,
    },

    /// Load one resource and print its rows as JSON lines.
    Show {
        resource: Resource,

        #[command(flatten)]
        ids: IdArgs,
    },

    /// Check the API is reachable.
    Check,

    /// List the endpoint catalog.
    Resources,
}

/// Ids on the command line; each overrides its environment variable.
#[derive(Args, Debug, Default)]
pub struct IdArgs {
    /// Classic league ids [env: FPL_LEAGUE_IDS].
    #[arg(long = "league", value_delimiter = ',')]
    pub leagues: Vec<u32>,

    /// Entry (team) ids [env: FPL_ENTRY_IDS].
    #[arg(long = "entry", value_delimiter = ',')]
    pub entries: Vec<u32>,

    /// Event (gameweek) ids [env: FPL_EVENT_IDS].
    #[arg(long = "event", value_delimiter = ',')]
    pub events: Vec<u32>,

    /// Element (player) ids [env: FPL_ELEMENT_IDS].
    #[arg(long = "element", value_delimiter = ',')]
    pub elements: Vec<u32>,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum SinkKind {
    /// PostgreSQL database at FPL_DATABASE_URL.
    Postgres,

    /// One `.jsonl` file per table.
    Json,
}
