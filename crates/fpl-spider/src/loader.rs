use crate::endpoint::{join_url, Descriptor, Params, Resource, BOOTSTRAP_PATH};
use crate::error::{Error, Result};
use crate::extract::{extract, extract_ref, Fragment};
use crate::fetch::Fetch;
use crate::table::Table;
use serde_json::Value;
use tracing::{debug, trace};

/// Fetch → extract → tabulate → enrich, for any [`Descriptor`].
///
/// Holds no state between calls beyond the fetcher and the API root.
#[derive(Clone, Debug)]
pub struct Loader<F> {
    fetcher: F,
    base_url: String,
}

impl<F: Fetch> Loader<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_base_url(fetcher, crate::BASE_URL)
    }

    pub fn with_base_url(fetcher: F, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Loads one table. Exactly one request is made, and only after every parameter the
    /// descriptor needs has been found in `params`.
    pub async fn load(&self, descriptor: &Descriptor, params: &Params) -> Result<Table> {
        let time = std::time::Instant::now();

        let url = descriptor.url(&self.base_url, params)?;
        let enrichment = descriptor.enrichment(params)?;

        let json = self.fetcher.get_json(&url).await?;
        let fragment = extract(json, descriptor.key, &url)?;
        let table = tabulate(descriptor, fragment, &enrichment);

        debug!(
            "loaded {} rows of {} from {url}, {}",
            table.len(),
            descriptor.name,
            crate::time_elapsed(time)
        );

        Ok(table)
    }

    /// Fetches `bootstrap-static/` once, for any number of bootstrap-family tables.
    pub async fn bootstrap(&self) -> Result<Bootstrap> {
        let url = join_url(&self.base_url, BOOTSTRAP_PATH);
        let json = self.fetcher.get_json(&url).await?;
        trace!("bootstrap-static fetched");
        Ok(Bootstrap { url, json })
    }
}

/// A fetched `bootstrap-static/` response.
#[derive(Clone, Debug)]
pub struct Bootstrap {
    url: String,
    json: Value,
}

impl Bootstrap {
    /// Table for one bootstrap-family resource.
    pub fn table(&self, resource: Resource) -> Result<Table> {
        let descriptor = resource.descriptor();
        if !descriptor.is_bootstrap() {
            return Err(Error::NotBootstrap(resource));
        }

        let fragment = extract_ref(&self.json, descriptor.key, &self.url)?;
        Ok(tabulate(descriptor, fragment, &[]))
    }
}

fn tabulate(descriptor: &Descriptor, fragment: Fragment, enrichment: &[(&str, Value)]) -> Table {
    let name = descriptor.key.last().copied().unwrap_or(descriptor.name);
    let mut table = Table::from_fragment(fragment, name);
    for (column, value) in enrichment {
        table.enrich(column, value);
    }
    table
}
