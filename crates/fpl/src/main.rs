mod cli;
mod commands;
mod config;

// remote imports
use clap::Parser;
use cli::{Cli, TraceLevel};
use tracing::{subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

////////////////////////////////////////////////////////////////////////////

// install the subscriber at the requested trace level
fn preprocess(trace_level: Level) -> anyhow::Result<()> {
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // set the trace level
    if let Some(trace_level) = cli.trace {
        preprocess(match trace_level {
            TraceLevel::DEBUG => Level::DEBUG,
            TraceLevel::ERROR => Level::ERROR,
            TraceLevel::INFO => Level::INFO,
            TraceLevel::TRACE => Level::TRACE,
            TraceLevel::WARN => Level::WARN,
        })?;
    }
    trace!("command line input recorded: {cli:?}");

    // if no trace level provided, use tui
    let tui = cli.trace.is_none();

    let config = config::Config::from_env()?;

    // read cli inputs
    use cli::Commands::*;
    match cli.command {
        // `fpl load [-r <resource>...]`: load tables into the sink
        Load {
            resources,
            ids,
            sink,
            out,
        } => commands::load(&config, resources, ids, sink, out, tui).await?,

        // `fpl show <resource>`: print one table
        Show { resource, ids } => commands::show(&config, resource, ids).await?,

        Check => commands::check(&config).await?,

        Resources => commands::resources(),
    }

    Ok(())
}
