use aquaview_schemas::settings::MIN_REFRESH_INTERVAL_MS;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AquaViewError {
    #[error("refresh interval {0} ms is below the {min} ms minimum", min = MIN_REFRESH_INTERVAL_MS)]
    IntervalTooShort(u64),

    #[error("I/O error for settings file '{0}': {1}")]
    SettingsIo(String, #[source] std::io::Error),

    #[error("failed to encode settings: {0}")]
    SettingsEncode(#[from] serde_json::Error),

    #[error("simulation worker thread could not be spawned: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}
