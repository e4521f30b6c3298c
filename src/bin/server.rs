use common::catalog::{sqlite::SqliteCatalog, Catalog};
use common::config::Config;
use common::endpoints::{create_http_router, error_response};
use common::errors::Result;
use common::http::HttpServer;
use common::state::AppState;
use common::upstream::{HttpUpstream, Upstream};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let upstream = HttpUpstream::new(&config.upstream_address);
    let mut catalog = SqliteCatalog::new()?;

    // Seed the catalog from upstream. An unreachable upstream is not fatal:
    // the site starts with an empty menu and a revalidation fills it later.
    match upstream.fetch_menu_items() {
        Ok(items) => catalog.replace_menu(items)?,
        Err(err) => warn!("Could not seed the menu: {}", err),
    }
    match upstream.fetch_offers() {
        Ok(offers) => catalog.replace_offers(offers)?,
        Err(err) => warn!("Could not seed the offers: {}", err),
    }

    let router = Arc::new(create_http_router()?);
    let listen_address = config.listen_address.clone();
    let state = Arc::new(Mutex::new(AppState::new(
        config,
        Box::new(catalog),
        Box::new(upstream),
    )));

    let server = HttpServer::new(&listen_address)?;
    info!("Listening on {}", listen_address);

    server.serve(move |request| {
        let mut state = state.lock().unwrap();
        match router.route(request, &mut state) {
            Ok(response) => response,
            Err(err) => error_response(err),
        }
    });

    Ok(())
}
