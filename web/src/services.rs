use std::sync::OnceLock;

use geezer_core::{PubStore, StoreError};
use thiserror::Error;

use crate::config::AppConfig;
use crate::geocoder::{GeocodeError, NominatimGeocoder};
use crate::workflow::WorkflowSettings;

static SERVICES: OnceLock<Services> = OnceLock::new();

/// Process-wide collaborators shared by every visitor. Sessions are not kept
/// here; each page owns its own.
pub struct Services {
    pub store: PubStore,
    pub geocoder: NominatimGeocoder,
    pub settings: WorkflowSettings,
}

#[derive(Debug, Error)]
pub enum InitError {
    #[error("could not open the pub store: {0}")]
    Store(#[from] StoreError),
    #[error("could not build the geocoder client: {0}")]
    Geocoder(#[from] GeocodeError),
    #[error("services already initialized")]
    AlreadyInitialized,
}

pub async fn init_services(config: &AppConfig) -> Result<(), InitError> {
    let store = PubStore::connect(&config.database_url).await?;

    let settings = WorkflowSettings {
        geofence_enabled: config.geofence_enabled,
        ..Default::default()
    };

    let mut geocoder = NominatimGeocoder::new(&config.geocoder)?;
    if settings.geofence_enabled {
        geocoder = geocoder.bounded_to(settings.region.bounding_box());
    }

    let pub_count = store.count().await?;
    tracing::info!(
        database_url = %config.database_url,
        pub_count,
        geofence_enabled = settings.geofence_enabled,
        geocoder = %config.geocoder.base_url,
        "services initialized"
    );

    SERVICES
        .set(Services {
            store,
            geocoder,
            settings,
        })
        .map_err(|_| InitError::AlreadyInitialized)
}

pub fn services() -> Option<&'static Services> {
    SERVICES.get()
}
