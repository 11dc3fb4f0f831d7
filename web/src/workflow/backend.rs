use geezer_core::{AddressCandidate, NewPub, Pub};
use leptos::prelude::ServerFnError;

use super::controller::{Geocoder, PubStore};
use crate::error::WorkflowError;
use crate::server::{add_pub, list_pubs, search_address};

/// Reaches the store and geocoder through the server functions.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerBackend;

impl PubStore for ServerBackend {
    async fn load_all(&self) -> Result<Vec<Pub>, WorkflowError> {
        list_pubs()
            .await
            .map_err(|e| WorkflowError::Store(server_message(e)))
    }

    async fn insert(&self, new_pub: NewPub) -> Result<Pub, WorkflowError> {
        add_pub(new_pub)
            .await
            .map_err(|e| WorkflowError::Store(server_message(e)))?
    }
}

impl Geocoder for ServerBackend {
    async fn lookup(&self, query: &str) -> Result<Vec<AddressCandidate>, WorkflowError> {
        search_address(query.to_string())
            .await
            .map_err(|e| WorkflowError::GeocoderUnavailable(server_message(e)))
    }
}

fn server_message(err: ServerFnError) -> String {
    match err {
        ServerFnError::ServerError(message) => message,
        other => other.to_string(),
    }
}
