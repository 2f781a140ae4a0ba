use gf_server::{ServerState, build_router, initialize_streams, load_boundaries, logger};
use gf_ws::{Metrics, ShutdownCoordinator};

use std::error::Error;

use log::{error, info, warn};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    if let Err(e) = dotenvy::dotenv() {
        // A missing .env is normal; anything else is worth knowing about
        if !e.not_found() {
            eprintln!("Failed to load .env: {e}");
        }
    }

    // Load and validate configuration
    let config = gf_config::Config::load()?;
    config.validate()?;

    // Initialize logger (before any other logging)
    logger::initialize(
        config.logging.level,
        config.log_file_path()?,
        config.logging.colored,
    )?;

    info!("Starting gf-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| gf_server::ServerError::Metrics {
            message: e.to_string(),
        })?;

    // Initialize database pool (runs migrations)
    let database_path = config.database_path()?;
    info!("Connecting to database: {}", database_path.display());
    let pool = gf_db::create_pool(
        &database_path,
        config.database.max_connections,
        config.database.busy_timeout(),
    )
    .await?;

    let boundaries_path = config.boundaries_path()?;
    info!("Loading boundaries from {}", boundaries_path.display());
    let catalog = load_boundaries(&boundaries_path).await?;

    let metrics = Metrics::new();
    let shutdown = ShutdownCoordinator::new();

    let runtimes = initialize_streams(&config, &catalog, &pool, &shutdown, &metrics).await?;

    let mut routes = Vec::with_capacity(runtimes.len());
    let mut entries = Vec::with_capacity(runtimes.len());
    let mut loops = Vec::with_capacity(runtimes.len());
    for runtime in runtimes {
        routes.push((runtime.entry.path.clone(), runtime.state));
        entries.push(runtime.entry);
        loops.push(tokio::spawn(
            runtime.broadcast_loop.run(shutdown.subscribe_guard()),
        ));
    }

    let hubs: Vec<_> = entries.iter().map(|entry| entry.hub.clone()).collect();

    let app = build_router(
        ServerState {
            streams: entries,
            shutdown: shutdown.clone(),
            prometheus,
        },
        routes,
    );

    // Create TCP listener
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
                for hub in &hubs {
                    hub.close_all().await;
                }
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    // Start server with graceful shutdown
    info!("Server ready to accept connections");
    let shutdown_for_serve = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_for_serve.subscribe_guard().wait().await;
        })
        .await?;

    // Let every loop finish its in-flight tick
    shutdown.shutdown();
    for handle in loops {
        if let Err(e) = handle.await {
            warn!("Broadcast loop ended abnormally: {}", e);
        }
    }

    pool.close().await;
    info!("Graceful shutdown complete");

    Ok(())
}
