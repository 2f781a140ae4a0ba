use crate::{Result as ServerErrorResult, ServerError, StreamEntry};

use gf_config::Config;
use gf_core::{BoundaryCatalog, CursorStore, PredicateCache, ReportStore};
use gf_db::{SqliteCursorStore, SqliteReportStore};
use gf_ws::{
    BroadcastLoop, BroadcastLoopConfig, ConnectionConfig, Hub, HubConfig, Metrics, ReportFeed,
    ShutdownCoordinator, StreamState,
};

use std::path::Path;
use std::sync::Arc;

use log::info;
use sqlx::SqlitePool;

/// Everything one configured stream needs: its routes' state and its loop,
/// ready to spawn.
pub struct StreamRuntime {
    pub entry: StreamEntry,
    pub state: StreamState,
    pub broadcast_loop: BroadcastLoop,
}

/// Read the boundary catalog from a GeoJSON FeatureCollection file.
pub async fn load_boundaries(path: &Path) -> ServerErrorResult<BoundaryCatalog> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ServerError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(BoundaryCatalog::from_geojson(&json)?)
}

/// Build a hub and an initialized broadcast loop for every `[[streams]]`
/// entry. Any unknown or invalid boundary fails startup.
pub async fn initialize_streams(
    config: &Config,
    catalog: &BoundaryCatalog,
    pool: &SqlitePool,
    shutdown: &ShutdownCoordinator,
    metrics: &Metrics,
) -> ServerErrorResult<Vec<StreamRuntime>> {
    let reports: Arc<dyn ReportStore> = Arc::new(SqliteReportStore::new(pool.clone()));
    let cursors: Arc<dyn CursorStore> =
        Arc::new(SqliteCursorStore::new(pool.clone(), reports.clone()));
    let predicates = PredicateCache::new();
    let connection_config = ConnectionConfig::from(&config.websocket);

    let mut runtimes = Vec::with_capacity(config.streams.len());
    for stream in &config.streams {
        let hub = Hub::new(
            HubConfig::new(&stream.stream_id, config.server.max_connections),
            metrics.clone(),
        );

        let broadcast_loop = BroadcastLoop::initialize(
            BroadcastLoopConfig {
                stream_id: stream.stream_id.clone(),
                boundary_id: stream.boundary_id.clone(),
                tick_interval: config.broadcast.tick_interval(),
            },
            catalog,
            &predicates,
            ReportFeed::new(Arc::clone(&reports), config.broadcast.batch_limit),
            Arc::clone(&cursors),
            hub.clone(),
            metrics.clone(),
        )
        .await?;

        let state = StreamState {
            hub: hub.clone(),
            metrics: metrics.clone(),
            shutdown: shutdown.clone(),
            config: connection_config.clone(),
        };

        info!(
            "Stream {} ready at {} (health at {})",
            stream.stream_id,
            stream.path,
            stream.health_path()
        );

        runtimes.push(StreamRuntime {
            entry: StreamEntry {
                stream_id: stream.stream_id.clone(),
                boundary_id: stream.boundary_id.clone(),
                path: stream.path.clone(),
                hub,
            },
            state,
            broadcast_loop,
        });
    }

    Ok(runtimes)
}
