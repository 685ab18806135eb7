//! `projectdesk` -- print the project catalog from the command line.
//!
//! Loads the catalog from the project backend and prints the rows matching
//! the given filters, one per line.
//!
//! # Environment variables
//!
//! | Variable                           | Default                     | Description            |
//! |------------------------------------|-----------------------------|------------------------|
//! | `PROJECTDESK_BASE_URL`             | `http://localhost:5000/api` | Project backend URL    |
//! | `PROJECTDESK_REQUEST_TIMEOUT_SECS` | `30`                        | HTTP timeout           |
//! | `PROJECTDESK_LOGO_MAX_BYTES`       | `5242880`                   | Logo size ceiling      |

use std::sync::Arc;

use clap::Parser;
use projectdesk_client::ProjectDeskApi;
use projectdesk_session::cli::{self, CliArgs};
use projectdesk_session::config::SessionConfig;
use projectdesk_session::confirm::FixedAnswer;
use projectdesk_session::roster_cache::RosterCache;
use projectdesk_session::DraftController;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "projectdesk=info,projectdesk_session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = SessionConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let (criteria, sort) = (args.criteria(), args.sort_spec());

    let api = ProjectDeskApi::new(config.base_url.clone(), config.request_timeout())
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build HTTP client");
            std::process::exit(1);
        });

    tracing::info!(base_url = %config.base_url, "Starting projectdesk");

    // Read-only front end: nothing is ever deleted or discarded from here.
    let mut controller = DraftController::new(
        Arc::new(api),
        Arc::new(FixedAnswer(false)),
        Arc::new(RosterCache::new()),
        config.logo_policy(),
    );

    match controller.load_catalog().await {
        Ok(true) => {}
        Ok(false) | Err(_) => {
            for notification in controller.drain_notifications() {
                eprintln!("{}", notification.message);
            }
            std::process::exit(1);
        }
    }

    let rows = controller.rows(&criteria, sort);
    tracing::info!(
        shown = rows.len(),
        total = controller.catalog().len(),
        "Catalog query complete"
    );
    for row in &rows {
        println!("{}", cli::format_row(row));
    }
}
