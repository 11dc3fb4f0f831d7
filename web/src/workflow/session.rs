use geezer_core::{derive_name, AddressCandidate, Amenities, Commentary, NewPub, Pub, Region, YesNo};
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

/// Most candidates kept from one search.
pub const MAX_CANDIDATES: usize = 5;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// The tentative, not yet persisted address shown on the map.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Preview {
    pub lat: f64,
    pub lon: f64,
    pub address_text: String,
    pub suggested_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WorkflowSettings {
    pub geofence_enabled: bool,
    pub region: Region,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            geofence_enabled: true,
            region: Region::greater_london(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ChoosingCandidate,
    Previewing,
    Confirmed,
}

/// Per-visitor state of the search, preview, confirm and submit flow.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct WorkflowSession {
    pub preview: Option<Preview>,
    pub confirmed_name: Option<String>,
    pub pending_recenter: Option<LatLon>,
    pub candidates: Option<Vec<AddressCandidate>>,
}

/// Detail inputs as typed into the form. The price stays text until submit.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct PubForm {
    pub name: String,
    pub pool_table: YesNo,
    pub darts: YesNo,
    pub commentary: Commentary,
    pub fosters_carling: YesNo,
    pub pint_price: String,
    pub lock_ins: YesNo,
}

impl PubForm {
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn into_new_pub(self, position: LatLon) -> Result<NewPub, WorkflowError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(WorkflowError::validation("Please enter the pub's name"));
        }

        let pint_price = self
            .pint_price
            .trim()
            .trim_start_matches('£')
            .parse::<f64>()
            .map_err(|_| WorkflowError::validation("Pint price must be a number, e.g. 4.50"))?;

        let new_pub = NewPub {
            name,
            latitude: position.lat,
            longitude: position.lon,
            amenities: Amenities {
                pool_table: self.pool_table,
                darts: self.darts,
                commentary: self.commentary,
                fosters_carling: self.fosters_carling,
                pint_price,
                lock_ins: self.lock_ins,
            },
        };
        new_pub
            .validate()
            .map_err(|e| WorkflowError::validation(e.to_string()))?;

        Ok(new_pub)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    CandidatesFound {
        query: String,
        candidates: Vec<AddressCandidate>,
    },
    SelectCandidate(usize),
    ConfirmAddress,
    Submit(PubForm),
    Committed(Pub),
    ClearPreview,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    InsertPub(NewPub),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub session: WorkflowSession,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(session: WorkflowSession) -> Self {
        Self {
            session,
            effects: Vec::new(),
        }
    }
}

impl WorkflowSession {
    pub fn stage(&self) -> Stage {
        if self.confirmed_name.is_some() {
            Stage::Confirmed
        } else if self.preview.is_some() {
            Stage::Previewing
        } else if self.candidates.is_some() {
            Stage::ChoosingCandidate
        } else {
            Stage::Idle
        }
    }

    /// Computes the session that follows `event`. An error leaves `self` as
    /// the current session.
    pub fn apply(
        &self,
        event: Event,
        settings: &WorkflowSettings,
    ) -> Result<Transition, WorkflowError> {
        match event {
            Event::CandidatesFound { query, candidates } => {
                let kept: Vec<AddressCandidate> = candidates
                    .into_iter()
                    .filter(|c| {
                        !settings.geofence_enabled
                            || settings.region.contains(c.latitude, c.longitude)
                    })
                    .take(MAX_CANDIDATES)
                    .collect();

                if kept.is_empty() {
                    return Err(WorkflowError::NoResultsFound { query });
                }

                let mut next = self.clone();
                next.candidates = Some(kept);
                Ok(Transition::to(next))
            }
            Event::SelectCandidate(index) => {
                let candidate = self
                    .candidates
                    .as_ref()
                    .and_then(|c| c.get(index))
                    .ok_or_else(|| WorkflowError::validation("Pick one of the search results"))?;

                let mut next = self.clone();
                next.preview = Some(Preview {
                    lat: candidate.latitude,
                    lon: candidate.longitude,
                    address_text: candidate.full_address.clone(),
                    suggested_name: derive_name(&candidate.full_address),
                });
                next.confirmed_name = None;
                Ok(Transition::to(next))
            }
            Event::ConfirmAddress => {
                let preview = self
                    .preview
                    .as_ref()
                    .ok_or_else(|| WorkflowError::validation("Search for an address first"))?;

                if !settings.region.contains(preview.lat, preview.lon) {
                    return Err(WorkflowError::OutsideServiceArea {
                        latitude: preview.lat,
                        longitude: preview.lon,
                    });
                }

                let mut next = self.clone();
                next.confirmed_name = Some(preview.suggested_name.clone());
                Ok(Transition::to(next))
            }
            Event::Submit(form) => {
                let preview = match (&self.preview, &self.confirmed_name) {
                    (Some(preview), Some(_)) => preview,
                    _ => return Err(WorkflowError::validation("Confirm the address first")),
                };

                let new_pub = form.into_new_pub(LatLon::new(preview.lat, preview.lon))?;

                if settings.geofence_enabled
                    && !settings.region.contains(new_pub.latitude, new_pub.longitude)
                {
                    return Err(WorkflowError::OutsideServiceArea {
                        latitude: new_pub.latitude,
                        longitude: new_pub.longitude,
                    });
                }

                Ok(Transition {
                    session: self.clone(),
                    effects: vec![Effect::InsertPub(new_pub)],
                })
            }
            Event::Committed(stored) => {
                if self.stage() != Stage::Confirmed {
                    return Err(WorkflowError::validation("Nothing is waiting to be saved"));
                }

                Ok(Transition::to(WorkflowSession {
                    preview: None,
                    confirmed_name: None,
                    candidates: None,
                    pending_recenter: Some(LatLon::new(stored.latitude, stored.longitude)),
                }))
            }
            Event::ClearPreview => Ok(Transition::to(WorkflowSession {
                preview: None,
                confirmed_name: None,
                candidates: None,
                pending_recenter: self.pending_recenter,
            })),
        }
    }

    pub fn take_recenter(&mut self) -> Option<LatLon> {
        self.pending_recenter.take()
    }
}
