use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Path shared by every bootstrap-family resource.
pub const BOOTSTRAP_PATH: &str = "bootstrap-static/";

/// An identifying parameter substituted into a URL template, and possibly appended to every
/// row as an enrichment column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    LeagueId,
    EntryId,
    EventId,
    ElementId,
}

impl Param {
    /// Placeholder name as it appears in a URL template, without braces.
    pub const fn placeholder(self) -> &'static str {
        match self {
            Param::LeagueId => "league_id",
            Param::EntryId => "entry_id",
            Param::EventId => "event_id",
            Param::ElementId => "element_id",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.placeholder())
    }
}

/// Parameter values for one load. Unset values are `None`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Params {
    pub league_id: Option<u32>,
    pub entry_id: Option<u32>,
    pub event_id: Option<u32>,
    pub element_id: Option<u32>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn league(mut self, id: u32) -> Self {
        self.league_id = Some(id);
        self
    }

    pub fn entry(mut self, id: u32) -> Self {
        self.entry_id = Some(id);
        self
    }

    pub fn event(mut self, id: u32) -> Self {
        self.event_id = Some(id);
        self
    }

    pub fn element(mut self, id: u32) -> Self {
        self.element_id = Some(id);
        self
    }

    pub fn get(&self, param: Param) -> Option<u32> {
        match param {
            Param::LeagueId => self.league_id,
            Param::EntryId => self.entry_id,
            Param::EventId => self.event_id,
            Param::ElementId => self.element_id,
        }
    }

    pub fn set(&mut self, param: Param, value: u32) {
        match param {
            Param::LeagueId => self.league_id = Some(value),
            Param::EntryId => self.entry_id = Some(value),
            Param::EventId => self.event_id = Some(value),
            Param::ElementId => self.element_id = Some(value),
        }
    }

    /// Value of `param` for `resource`, failing when it is unset or zero.
    pub fn require(&self, resource: Resource, param: Param) -> Result<u32> {
        match self.get(param) {
            None => Err(Error::MissingParam { resource, param }),
            Some(0) => Err(Error::InvalidParam {
                param,
                value: "0".to_string(),
            }),
            Some(id) => Ok(id),
        }
    }
}

/// Every resource the API exposes to this crate; also the destination table name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Standings,
    EntryHistory,
    Picks,
    ElementFixtures,
    ElementHistory,
    Events,
    Phases,
    Teams,
    TotalPlayers,
    Elements,
    ElementStats,
    ElementTypes,
}

impl Resource {
    pub const ALL: [Resource; 12] = [
        Resource::Standings,
        Resource::EntryHistory,
        Resource::Picks,
        Resource::ElementFixtures,
        Resource::ElementHistory,
        Resource::Events,
        Resource::Phases,
        Resource::Teams,
        Resource::TotalPlayers,
        Resource::Elements,
        Resource::ElementStats,
        Resource::ElementTypes,
    ];

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn descriptor(self) -> &'static Descriptor {
        &CATALOG[self as usize]
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|resource| resource.name() == s)
            .ok_or_else(|| format!("unknown resource `{s}`"))
    }
}

/// Static description of one endpoint: where it lives, which part of the response to keep, and
/// which identifying columns to add to every row.
#[derive(Debug, PartialEq, Eq)]
pub struct Descriptor {
    pub resource: Resource,
    pub name: &'static str,
    /// Path relative to the API root, with `{placeholder}` segments.
    pub template: &'static str,
    /// Parameters the template and enrichment columns need.
    pub params: &'static [Param],
    /// Path of object keys into the response.
    pub key: &'static [&'static str],
    /// `(column, param)` pairs appended to each row.
    pub enrich: &'static [(&'static str, Param)],
}

impl Descriptor {
    pub fn is_bootstrap(&self) -> bool {
        self.template == BOOTSTRAP_PATH
    }

    /// Dotted form of the extraction key, e.g. `standings.results`.
    pub fn key_path(&self) -> String {
        self.key.join(".")
    }

    /// Fills the template and joins it onto `base`. Fails before any request is made when a
    /// parameter is missing.
    pub fn url(&self, base: &str, params: &Params) -> Result<String> {
        let mut path = self.template.to_string();
        for &param in self.params {
            let id = params.require(self.resource, param)?;
            path = path.replace(&format!("{{{}}}", param.placeholder()), &id.to_string());
        }

        Ok(join_url(base, &path))
    }

    /// The `(column, value)` pairs to append to every row.
    pub fn enrichment(&self, params: &Params) -> Result<Vec<(&'static str, Value)>> {
        self.enrich
            .iter()
            .map(|&(column, param)| {
                params
                    .require(self.resource, param)
                    .map(|id| (column, Value::from(id)))
            })
            .collect()
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    match base.ends_with('/') {
        true => format!("{base}{path}"),
        false => format!("{base}/{path}"),
    }
}

macro_rules! bootstrap {
    ($resource:expr, $name:literal) => {
        Descriptor {
            resource: $resource,
            name: $name,
            template: BOOTSTRAP_PATH,
            params: &[],
            key: &[$name],
            enrich: &[],
        }
    };
}

/// One descriptor per [`Resource`], in declaration order.
pub static CATALOG: [Descriptor; 12] = [
    Descriptor {
        resource: Resource::Standings,
        name: "standings",
        template: "leagues-classic/{league_id}/standings/",
        params: &[Param::LeagueId],
        key: &["standings", "results"],
        enrich: &[("league_id", Param::LeagueId)],
    },
    Descriptor {
        resource: Resource::EntryHistory,
        name: "entry_history",
        template: "entry/{entry_id}/history/",
        params: &[Param::EntryId],
        key: &["current"],
        enrich: &[("entry", Param::EntryId)],
    },
    Descriptor {
        resource: Resource::Picks,
        name: "picks",
        template: "entry/{entry_id}/event/{event_id}/picks/",
        params: &[Param::EntryId, Param::EventId],
        key: &["picks"],
        enrich: &[("entry", Param::EntryId), ("event", Param::EventId)],
    },
    Descriptor {
        resource: Resource::ElementFixtures,
        name: "element_fixtures",
        template: "element-summary/{element_id}/",
        params: &[Param::ElementId],
        key: &["fixtures"],
        enrich: &[("element_id", Param::ElementId)],
    },
    Descriptor {
        resource: Resource::ElementHistory,
        name: "element_history",
        template: "element-summary/{element_id}/",
        params: &[Param::ElementId],
        key: &["history"],
        enrich: &[("element_id", Param::ElementId)],
    },
    bootstrap!(Resource::Events, "events"),
    bootstrap!(Resource::Phases, "phases"),
    bootstrap!(Resource::Teams, "teams"),
    bootstrap!(Resource::TotalPlayers, "total_players"),
    bootstrap!(Resource::Elements, "elements"),
    bootstrap!(Resource::ElementStats, "element_stats"),
    bootstrap!(Resource::ElementTypes, "element_types"),
];
