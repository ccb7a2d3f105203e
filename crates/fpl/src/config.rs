use crate::cli::IdArgs;
use dotenv::var;
use fpl_spider::batch::Ids;
use fpl_spider::sink::postgres::DEFAULT_SCHEMA;
use fpl_spider::{Error, Param};
use std::time::Duration;
use tracing::trace;

/// League loaded when neither `--league` nor `FPL_LEAGUE_IDS` is given.
const DEFAULT_LEAGUE: u32 = 741068;

/// Settings read from the environment (and `.env`).
pub(crate) struct Config {
    pub base_url: String,
    pub access_token: Option<String>,
    pub database_url: Option<String>,
    pub schema: String,
    pub ids: Ids,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl Config {
    pub(crate) fn from_env() -> anyhow::Result<Self> {
        let ids = Ids {
            leagues: match var("FPL_LEAGUE_IDS").ok() {
                Some(list) => parse_ids(Param::LeagueId, &list)?,
                None => vec![DEFAULT_LEAGUE],
            },
            entries: ids_from_env("FPL_ENTRY_IDS", Param::EntryId)?,
            events: ids_from_env("FPL_EVENT_IDS", Param::EventId)?,
            elements: ids_from_env("FPL_ELEMENT_IDS", Param::ElementId)?,
        };

        let config = Self {
            base_url: var("FPL_BASE_URL").unwrap_or_else(|_| fpl_spider::BASE_URL.to_string()),
            access_token: var("FPL_ACCESS_TOKEN").ok().filter(|token| !token.is_empty()),
            database_url: var("FPL_DATABASE_URL").ok(),
            schema: var("FPL_SCHEMA").unwrap_or_else(|_| DEFAULT_SCHEMA.to_string()),
            ids,
            concurrency: match var("FPL_CONCURRENCY") {
                Ok(n) => parse_positive("FPL_CONCURRENCY", &n)? as usize,
                Err(_) => num_cpus::get(),
            },
            timeout: match var("FPL_TIMEOUT_SECS") {
                Ok(secs) => Duration::from_secs(parse_positive("FPL_TIMEOUT_SECS", &secs)?),
                Err(_) => fpl_spider::fetch::DEFAULT_TIMEOUT,
            },
        };
        trace!(
            "configuration read: base_url={}, schema={}, ids={:?}, concurrency={}, timeout={:?}",
            config.base_url,
            config.schema,
            config.ids,
            config.concurrency,
            config.timeout
        );

        Ok(config)
    }

    /// Ids from the environment, each list replaced by its command-line counterpart when one
    /// was given.
    pub(crate) fn ids(&self, args: IdArgs) -> anyhow::Result<Ids> {
        let pick = |cli: Vec<u32>, env: &[u32], param: Param| -> anyhow::Result<Vec<u32>> {
            let ids = match cli.is_empty() {
                true => env.to_vec(),
                false => cli,
            };
            if ids.contains(&0) {
                return Err(Error::InvalidParam {
                    param,
                    value: "0".to_string(),
                }
                .into());
            }
            Ok(ids)
        };

        Ok(Ids {
            leagues: pick(args.leagues, &self.ids.leagues, Param::LeagueId)?,
            entries: pick(args.entries, &self.ids.entries, Param::EntryId)?,
            events: pick(args.events, &self.ids.events, Param::EventId)?,
            elements: pick(args.elements, &self.ids.elements, Param::ElementId)?,
        })
    }
}

fn ids_from_env(key: &str, param: Param) -> anyhow::Result<Vec<u32>> {
    match var(key) {
        Ok(list) => Ok(parse_ids(param, &list)?),
        Err(_) => Ok(Vec::new()),
    }
}

// a count or duration that must be at least 1
fn parse_positive(key: &str, value: &str) -> anyhow::Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(anyhow::anyhow!("{key} must be a positive integer, got {value:?}")),
    }
}

/// Parses a comma-separated list of positive ids.
fn parse_ids(param: Param, list: &str) -> Result<Vec<u32>, Error> {
    list.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| match id.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(Error::InvalidParam {
                param,
                value: id.to_string(),
            }),
        })
        .collect()
}
