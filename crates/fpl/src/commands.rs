use crate::cli::{IdArgs, SinkKind};
use crate::config::Config;
use deadpool_postgres::{ManagerConfig, RecyclingMethod};
use fpl_spider::batch::{self, Plan};
use fpl_spider::sink::{JsonDirSink, PgSink, Sink};
use fpl_spider::{HttpFetcher, Loader, Params, Report, Resource};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, error, info, trace};

fn build_loader(config: &Config) -> anyhow::Result<Loader<HttpFetcher>> {
    let fetcher = HttpFetcher::build(config.access_token.as_deref(), config.timeout)?;
    Ok(Loader::with_base_url(fetcher, config.base_url.clone()))
}

fn build_pg_sink(config: &Config) -> anyhow::Result<PgSink> {
    let url = config
        .database_url
        .clone()
        .ok_or_else(|| anyhow::anyhow!("environment variable FPL_DATABASE_URL is not set"))?;

    trace!("creating postgres connection pool config");
    let mut pg_config = deadpool_postgres::Config::new();
    pg_config.url = Some(url);
    pg_config.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });

    trace!("creating connection pool");
    let pool = pg_config.create_pool(
        Some(deadpool_postgres::Runtime::Tokio1),
        tokio_postgres::NoTls,
    )?;
    debug!("connection pool established");

    Ok(PgSink::new(pool, config.schema.clone()))
}

/// `fpl load`: run the batch and write every table.
pub(crate) async fn load(
    config: &Config,
    resources: Option<Vec<Resource>>,
    ids: IdArgs,
    sink: SinkKind,
    out: PathBuf,
    tui: bool,
) -> anyhow::Result<()> {
    let ids = config.ids(ids)?;
    let plan = match resources {
        Some(resources) => Plan::new(resources, ids),
        None => Plan::available(ids),
    }
    .with_concurrency(config.concurrency);
    debug!("plan: {:?}", plan.resources);

    let loader = build_loader(config)?;
    let report = match sink {
        SinkKind::Postgres => run(&loader, &mut build_pg_sink(config)?, &plan, tui).await,
        SinkKind::Json => run(&loader, &mut JsonDirSink::new(out), &plan, tui).await,
    };

    if tui {
        println!("{report}");
    }

    match report.is_success() {
        true => Ok(()),
        false => Err(anyhow::anyhow!(
            "{} of {} resources failed",
            report.failures().count(),
            report.outcomes.len()
        )),
    }
}

async fn run<S: Sink>(loader: &Loader<HttpFetcher>, sink: &mut S, plan: &Plan, tui: bool) -> Report {
    let time = std::time::Instant::now();
    let report = batch::run(loader, sink, plan, tui).await;
    info!(
        "loaded {} rows into {} tables, time elapsed: {:?}",
        report.rows_written(),
        report.outcomes.len() - report.failures().count(),
        time.elapsed()
    );
    report
}

/// `fpl show`: load one resource and print it as JSON lines.
pub(crate) async fn show(config: &Config, resource: Resource, ids: IdArgs) -> anyhow::Result<()> {
    let ids = config.ids(ids)?;

    // first id of each list; missing ones are reported by the loader
    let mut params = Params::new();
    for &param in resource.descriptor().params {
        if let Some(&id) = ids.get(param).first() {
            params.set(param, id);
        }
    }

    let loader = build_loader(config)?;
    let table = loader.load(resource.descriptor(), &params).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for row in &table.rows {
        serde_json::to_writer(&mut out, row)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    Ok(())
}

/// `fpl check`: one request to `bootstrap-static/`.
pub(crate) async fn check(config: &Config) -> anyhow::Result<()> {
    let loader = build_loader(config)?;
    match loader.bootstrap().await {
        Ok(_) => {
            println!("{} is reachable", loader.base_url());
            Ok(())
        }
        Err(err) => {
            error!("connection check failed, error({err})");
            Err(err.into())
        }
    }
}

/// `fpl resources`: the endpoint catalog.
pub(crate) fn resources() {
    println!("{:<18} {:<44} {:<20} ENRICHMENT", "RESOURCE", "PATH", "KEY");
    for resource in Resource::ALL {
        let descriptor = resource.descriptor();
        let enrich = descriptor
            .enrich
            .iter()
            .map(|(column, _)| *column)
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:<18} {:<44} {:<20} {}",
            descriptor.name,
            descriptor.template,
            descriptor.key_path(),
            if enrich.is_empty() { "-" } else { enrich.as_str() }
        );
    }
}
