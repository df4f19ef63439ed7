//! The catalog query runner.
//!
//! Connects to the local document database, runs the fixed operation sequence
//! against the `bookstore`/`books` collection, logs every result, and
//! releases the connection whether or not an error occurred. There are no
//! flags and no environment configuration; the connection target and the
//! database/collection selectors are fixed.

use std::process::ExitCode;

use log::{error, info};

use bookcat::{
    mongodb::MongoDbStore,
    ops,
    prelude::{CatalogBackendBuilder, CatalogStore},
};

/// Connection target: the standard local document-database endpoint.
const DSN: &str = "mongodb://localhost:27017";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let store = match MongoDbStore::builder(DSN, ops::DATABASE_NAME)
        .build()
        .await
    {
        Ok(backend) => CatalogStore::new(backend),
        Err(err) => {
            error!("failed to set up connection to {DSN}: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!("connected to {DSN}, database {}", ops::DATABASE_NAME);

    // The first failing operation aborts the rest of the sequence; the
    // release step below runs either way.
    let run = ops::run_catalog(&store).await;
    if let Err(err) = &run {
        error!("catalog run aborted: {err}");
    }

    if let Err(err) = store.shutdown().await {
        error!("failed to close connection: {err}");
        return ExitCode::FAILURE;
    }
    info!("connection closed");

    match run {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
