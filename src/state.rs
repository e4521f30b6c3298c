use crate::cart::SessionCarts;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::upstream::Upstream;
use chrono::{NaiveDateTime, Utc};

/// Everything a request handler may touch.
///
/// The server owns exactly one of these behind a mutex; handlers run one at
/// a time against it, which is all the coordination cart state needs (one
/// logical writer per session, no background writers).
pub struct AppState {
    pub config: Config,
    pub catalog: Box<dyn Catalog + Send>,
    pub carts: SessionCarts,
    pub upstream: Box<dyn Upstream + Send>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Box<dyn Catalog + Send>,
        upstream: Box<dyn Upstream + Send>,
    ) -> AppState {
        AppState {
            config,
            catalog,
            carts: SessionCarts::new(),
            upstream,
        }
    }

    /// Wall clock in the restaurant's timezone. The only place "now" is
    /// read; scheduling functions take it as a parameter.
    pub fn now(&self) -> NaiveDateTime {
        Utc::now()
            .with_timezone(&self.config.hours.timezone)
            .naive_local()
    }
}
