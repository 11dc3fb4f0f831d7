use geezer_core::{AddressCandidate, NewPub, Pub};
use leptos::prelude::*;
use leptos::server;

use crate::error::WorkflowError;
use crate::workflow::WorkflowSettings;

#[cfg(feature = "ssr")]
fn services() -> Result<&'static crate::services::Services, ServerFnError> {
    crate::services::services().ok_or_else(|| ServerFnError::new("Server is still starting up"))
}

#[server]
pub async fn get_workflow_settings() -> Result<WorkflowSettings, ServerFnError> {
    Ok(services()?.settings.clone())
}

#[server]
pub async fn list_pubs() -> Result<Vec<Pub>, ServerFnError> {
    match services()?.store.load_all().await {
        Ok(pubs) => Ok(pubs),
        Err(e) => {
            tracing::error!(error = %e, "failed to load pubs");
            Err(ServerFnError::new(format!("Database error: {}", e)))
        }
    }
}

#[server]
pub async fn search_address(query: String) -> Result<Vec<AddressCandidate>, ServerFnError> {
    match services()?.geocoder.lookup(&query).await {
        Ok(candidates) => Ok(candidates),
        Err(e) => {
            tracing::warn!(error = %e, query = %query, "geocoder lookup failed");
            Err(ServerFnError::new(e.to_string()))
        }
    }
}

/// A pub the server refused carries its workflow error in the inner result so
/// the page can tell a rejection from a transport failure.
#[server]
pub async fn add_pub(new_pub: NewPub) -> Result<Result<Pub, WorkflowError>, ServerFnError> {
    let services = services()?;
    Ok(insert_checked(&services.store, &services.settings, &new_pub).await)
}

/// Last guard before a row is written: the pub must validate and, with
/// geofencing on, lie inside the region.
#[cfg(feature = "ssr")]
pub async fn insert_checked(
    store: &geezer_core::PubStore,
    settings: &WorkflowSettings,
    new_pub: &NewPub,
) -> Result<Pub, WorkflowError> {
    use geezer_core::StoreError;

    new_pub
        .validate()
        .map_err(|e| WorkflowError::validation(e.to_string()))?;

    if settings.geofence_enabled && !settings.region.contains(new_pub.latitude, new_pub.longitude) {
        tracing::warn!(
            latitude = new_pub.latitude,
            longitude = new_pub.longitude,
            "rejected pub outside the service area"
        );
        return Err(WorkflowError::OutsideServiceArea {
            latitude: new_pub.latitude,
            longitude: new_pub.longitude,
        });
    }

    store.insert(new_pub).await.map_err(|e| match e {
        StoreError::Invalid(invalid) => WorkflowError::validation(invalid.to_string()),
        other => {
            tracing::error!(error = %other, "failed to insert pub");
            WorkflowError::Store(other.to_string())
        }
    })
}
