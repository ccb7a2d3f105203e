use crate::endpoint::{Param, Params, Resource};
use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::loader::{Bootstrap, Loader};
use crate::sink::Sink;
use crate::table::Table;
use chrono::{DateTime, Utc};
use futures::{stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, trace};

/// Ids a batch run draws its parameters from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ids {
    pub leagues: Vec<u32>,
    pub entries: Vec<u32>,
    pub events: Vec<u32>,
    pub elements: Vec<u32>,
}

impl Ids {
    pub fn get(&self, param: Param) -> &[u32] {
        match param {
            Param::LeagueId => &self.leagues,
            Param::EntryId => &self.entries,
            Param::EventId => &self.events,
            Param::ElementId => &self.elements,
        }
    }

    /// Whether every parameter `resource` needs has at least one id.
    pub fn covers(&self, resource: Resource) -> bool {
        resource
            .descriptor()
            .params
            .iter()
            .all(|&param| !self.get(param).is_empty())
    }
}

/// Which resources to load, and with which ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    pub resources: Vec<Resource>,
    pub ids: Ids,
    /// Upper bound on requests in flight for one resource.
    pub concurrency: usize,
}

impl Plan {
    pub fn new(resources: Vec<Resource>, ids: Ids) -> Self {
        Self {
            resources,
            ids,
            concurrency: num_cpus::get(),
        }
    }

    /// Every resource whose parameters `ids` can supply, bootstrap-family included.
    pub fn available(ids: Ids) -> Self {
        let resources = Resource::ALL
            .into_iter()
            .filter(|&resource| ids.covers(resource))
            .collect();
        Self::new(resources, ids)
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Parameter sets for `resource`: the cross product of the ids each of its parameters
    /// draws from. Fails when one of those id lists is empty.
    pub fn jobs(&self, resource: Resource) -> Result<Vec<Params>> {
        let mut jobs = vec![Params::new()];
        for &param in resource.descriptor().params {
            let ids = self.ids.get(param);
            if ids.is_empty() {
                return Err(Error::MissingParam { resource, param });
            }

            jobs = jobs
                .into_iter()
                .flat_map(|params| {
                    ids.iter().map(move |&id| {
                        let mut params = params;
                        params.set(param, id);
                        params
                    })
                })
                .collect();
        }
        Ok(jobs)
    }
}

/// What happened to one resource in a batch run.
#[derive(Debug)]
pub struct Outcome {
    pub resource: Resource,
    /// Rows written, or why nothing was written.
    pub result: std::result::Result<usize, Arc<Error>>,
}

/// Summary of a batch run.
#[derive(Debug)]
pub struct Report {
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    pub outcomes: Vec<Outcome>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (Resource, &Error)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.result {
            Ok(_) => None,
            Err(err) => Some((outcome.resource, err.as_ref())),
        })
    }

    pub fn rows_written(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .sum()
    }

    pub fn outcome(&self, resource: Resource) -> Option<&Outcome> {
        self.outcomes.iter().find(|outcome| outcome.resource == resource)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(rows) => writeln!(f, "{:<18} {rows} rows", outcome.resource.name())?,
                Err(err) => writeln!(f, "{:<18} FAILED: {err}", outcome.resource.name())?,
            }
        }
        write!(
            f,
            "{} rows written, {} failures, {} ms",
            self.rows_written(),
            self.failures().count(),
            (self.finished - self.started).num_milliseconds()
        )
    }
}

/// Loads every resource of `plan` and hands each table to `sink` under the resource name.
///
/// `bootstrap-static/` is fetched at most once per run. A resource is written only when all of
/// its requests succeed, and a failed resource never stops the ones after it.
pub async fn run<F, S>(loader: &Loader<F>, sink: &mut S, plan: &Plan, tui: bool) -> Report
where
    F: Fetch,
    S: Sink,
{
    let started = Utc::now();
    let time = std::time::Instant::now();

    let pb = if tui {
        progress_bar(plan.resources.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let mut bootstrap: Option<std::result::Result<Bootstrap, Arc<Error>>> = None;
    let mut outcomes = Vec::with_capacity(plan.resources.len());

    for &resource in &plan.resources {
        pb.set_message(format!("loading {resource} ..."));

        let table = if resource.descriptor().is_bootstrap() {
            let shared = match bootstrap.take() {
                Some(shared) => shared,
                None => {
                    trace!("fetching bootstrap-static for this run");
                    loader.bootstrap().await.map_err(Arc::new)
                }
            };
            let table = match &shared {
                Ok(shared) => shared.table(resource).map_err(Arc::new),
                Err(err) => Err(err.clone()),
            };
            bootstrap = Some(shared);
            table
        } else {
            load_all(loader, plan, resource).await.map_err(Arc::new)
        };

        let result = match table {
            Ok(table) => match sink.replace(resource.name(), &table).await {
                Ok(rows) => {
                    info!("{resource}: {rows} rows written");
                    Ok(rows)
                }
                Err(err) => Err(Arc::new(err)),
            },
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            error!("failed to load {resource}, error({err})");
        }

        outcomes.push(Outcome { resource, result });
        pb.inc(1);
    }

    pb.finish_and_clear();
    if tui {
        println!("loading resources ... done");
    }

    debug!("batch run finished, {}", crate::time_elapsed(time));

    Report {
        started,
        finished: Utc::now(),
        outcomes,
    }
}

// every parameter set of one resource, concatenated in plan order
async fn load_all<F: Fetch>(loader: &Loader<F>, plan: &Plan, resource: Resource) -> Result<Table> {
    let descriptor = resource.descriptor();
    let jobs = plan.jobs(resource)?;

    let results: Vec<Result<Table>> = stream::iter(jobs)
        .map(|params| async move { loader.load(descriptor, &params).await })
        .buffered(plan.concurrency.max(1))
        .collect()
        .await;

    let mut combined = Table::default();
    for result in results {
        combined.append(result?);
    }
    Ok(combined)
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{msg} {spinner:.magenta}\n\
        [{elapsed_precise:.magenta}] |{bar:40.cyan/blue}| {human_pos}/{human_len} \
        [Rate: {per_sec:.magenta}, ETA: {eta:.blue}]",
    ) {
        pb.set_style(style.progress_chars("##-"));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
