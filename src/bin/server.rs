use std::{net::SocketAddr, process::exit};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tesouraria::{AppState, Config, build_router, graceful_shutdown, logging_middleware};

#[tokio::main]
async fn main() {
    // Variables from `.env` must be set before clap reads the environment.
    dotenvy::dotenv().ok();

    let config = Config::parse();
    setup_logging(config.debug);

    let database_path = config.database_path();
    let connection = match Connection::open(database_path) {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not open the database at {database_path}: {error}");
            exit(1);
        }
    };

    let admin_token = config.admin_token();
    if admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN is not set, user management endpoints are open.");
    }

    let state = match AppState::new(connection, config.password_cost, admin_token) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not initialize the database at {database_path}: {error}");
            exit(1);
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state);
    let router = if config.debug {
        router.layer(middleware::from_fn(logging_middleware))
    } else {
        router
    };
    let router = add_tracing_layer(router);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("HTTP server listening on {addr}, database {database_path}");

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        exit(1);
    }
}

fn setup_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
