//! Shop API - catalog, accounts and administration over REST

use axum_helpers::server::{create_production_app, create_router, health_router};
use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::MongoProductRepository;
use domain_users::MongoUserRepository;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod seed;
mod state;

use config::Config;
use state::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about = "Shop REST API")]
struct Args {
    /// Replace the products collection with this JSON fixture, then exit
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let args = Args::parse();
    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to MongoDB database: {}", config.mongodb.database);

    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(&config.mongodb.database);

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database
    );

    MongoProductRepository::new(&db).init_indexes().await?;
    MongoUserRepository::new(&db).init_indexes().await?;

    let auth = axum_helpers::JwtAuth::new(&config.jwt);
    let state = AppState {
        config,
        mongo_client,
        db,
        auth,
    };

    if let Some(path) = args.seed {
        let inserted = seed::seed_from_file(&path, &api::products::service(&state)).await?;
        info!(inserted, "Seeded products from {}", path.display());
        return Ok(());
    }

    let app = create_router(api::routes(&state))?
        .merge(health_router(state.config.app.clone()))
        .merge(api::health::router(state.clone()));

    info!(
        "Starting {} v{} ({:?})",
        state.config.app.name, state.config.app.version, state.config.environment
    );

    let server = state.config.server.clone();
    let mongo_client = state.mongo_client.clone();
    drop(state);

    create_production_app(
        app,
        &server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed successfully");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Shop API shutdown complete");
    Ok(())
}
