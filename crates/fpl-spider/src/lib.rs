pub mod batch;
pub mod endpoint;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod fs;
pub mod loader;
pub mod sink;
pub mod table;

mod sql;

pub use batch::{Plan, Report};
pub use endpoint::{Descriptor, Param, Params, Resource};
pub use error::{Error, ErrorKind, Result};
pub use fetch::{Fetch, HttpFetcher};
pub use loader::Loader;
pub use sink::Sink;
pub use table::{Row, Table};

/// Root of the public Fantasy Premier League API.
pub const BASE_URL: &str = "https://fantasy.premierleague.com/api/";

/// Shortcut for required API elements.
pub(crate) mod http {
    pub(crate) use reqwest::Client as HttpClient;
}

/// Formats the time since `time` for debug logs.
pub(crate) fn time_elapsed(time: std::time::Instant) -> String {
    format!(
        "\x1b[38;5;208melapsed time: {} ms\x1b[0m",
        time.elapsed().as_millis()
    )
}
