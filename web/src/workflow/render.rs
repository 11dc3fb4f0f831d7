use geezer_core::{AddressCandidate, Pub};
use serde::{Deserialize, Serialize};

use super::session::{LatLon, Stage, WorkflowSession};

/// Trafalgar Square.
pub const DEFAULT_CENTER: LatLon = LatLon {
    lat: 51.5074,
    lon: -0.1278,
};
pub const DEFAULT_ZOOM: f64 = 11.0;
pub const FOCUS_ZOOM: f64 = 15.0;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PubMarker {
    pub id: i64,
    pub position: LatLon,
    pub label: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PreviewMarker {
    pub position: LatLon,
    pub label: String,
}

/// Everything the page needs to draw one frame.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RenderModel {
    pub center: LatLon,
    pub zoom: f64,
    pub markers: Vec<PubMarker>,
    pub preview: Option<PreviewMarker>,
    pub candidates: Vec<AddressCandidate>,
    pub stage: Stage,
    pub confirmed_name: Option<String>,
}

impl Default for RenderModel {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            markers: Vec::new(),
            preview: None,
            candidates: Vec::new(),
            stage: Stage::Idle,
            confirmed_name: None,
        }
    }
}

impl RenderModel {
    pub fn shows_details_form(&self) -> bool {
        self.stage == Stage::Confirmed
    }

    pub fn shows_confirm(&self) -> bool {
        self.stage == Stage::Previewing
    }
}

/// Builds the frame for `session` and `pubs`. Centering prefers, in order, a
/// pending recenter (taken from the session), the preview, the newest pub,
/// then the default.
pub fn render_model(session: &mut WorkflowSession, pubs: &[Pub]) -> RenderModel {
    let (center, zoom) = if let Some(target) = session.take_recenter() {
        (target, FOCUS_ZOOM)
    } else if let Some(preview) = &session.preview {
        (LatLon::new(preview.lat, preview.lon), FOCUS_ZOOM)
    } else if let Some(newest) = pubs.last() {
        (LatLon::new(newest.latitude, newest.longitude), DEFAULT_ZOOM)
    } else {
        (DEFAULT_CENTER, DEFAULT_ZOOM)
    };

    RenderModel {
        center,
        zoom,
        markers: pubs
            .iter()
            .map(|p| PubMarker {
                id: p.id,
                position: LatLon::new(p.latitude, p.longitude),
                label: p.summary(),
            })
            .collect(),
        preview: session.preview.as_ref().map(|p| PreviewMarker {
            position: LatLon::new(p.lat, p.lon),
            label: p.address_text.clone(),
        }),
        candidates: session.candidates.clone().unwrap_or_default(),
        stage: session.stage(),
        confirmed_name: session.confirmed_name.clone(),
    }
}

/// Adds a just committed pub to the page's list without reloading it. A
/// reload would rebuild the frame and drop the focus on the new pub.
pub fn record_commit(pubs: &mut Vec<Pub>, stored: Pub) {
    if !pubs.iter().any(|p| p.id == stored.id) {
        pubs.push(stored);
    }
}
