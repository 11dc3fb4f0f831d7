use geezer_core::{AddressCandidate, NewPub, Pub};

use super::session::{Effect, Event, PubForm, WorkflowSession, WorkflowSettings};
use crate::error::WorkflowError;

/// Where confirmed pubs are kept.
#[allow(async_fn_in_trait)]
pub trait PubStore {
    async fn load_all(&self) -> Result<Vec<Pub>, WorkflowError>;
    async fn insert(&self, new_pub: NewPub) -> Result<Pub, WorkflowError>;
}

/// Turns free text into address candidates.
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    async fn lookup(&self, query: &str) -> Result<Vec<AddressCandidate>, WorkflowError>;
}

/// Drives a [`WorkflowSession`] through user actions, running the store and
/// geocoder calls the transitions ask for. The session is only replaced once
/// an action has fully succeeded.
#[derive(Clone, Copy, Debug)]
pub struct WorkflowController<'a, S, G> {
    store: S,
    geocoder: G,
    settings: &'a WorkflowSettings,
}

impl<'a, S: PubStore, G: Geocoder> WorkflowController<'a, S, G> {
    pub fn new(store: S, geocoder: G, settings: &'a WorkflowSettings) -> Self {
        Self {
            store,
            geocoder,
            settings,
        }
    }

    pub fn settings(&self) -> &WorkflowSettings {
        self.settings
    }

    pub async fn load_pubs(&self) -> Result<Vec<Pub>, WorkflowError> {
        self.store.load_all().await
    }

    /// Looks `query` up and stores the usable candidates. Returns how many
    /// were kept.
    pub async fn search(
        &self,
        session: &mut WorkflowSession,
        query: &str,
    ) -> Result<usize, WorkflowError> {
        let found = self.lookup(query).await?;
        self.accept_candidates(session, found)
    }

    /// The geocoder half of a search. Nothing in the session is read, so the
    /// result can be applied to whatever the session is once it arrives.
    pub async fn lookup(&self, query: &str) -> Result<Event, WorkflowError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WorkflowError::validation("Type an address to search for"));
        }

        let candidates = self.geocoder.lookup(query).await?;
        Ok(Event::CandidatesFound {
            query: query.to_string(),
            candidates,
        })
    }

    pub fn accept_candidates(
        &self,
        session: &mut WorkflowSession,
        found: Event,
    ) -> Result<usize, WorkflowError> {
        if !matches!(found, Event::CandidatesFound { .. }) {
            return Err(WorkflowError::validation("Search for an address first"));
        }
        self.apply(session, found)?;
        Ok(session.candidates.as_ref().map_or(0, Vec::len))
    }

    pub fn select(&self, session: &mut WorkflowSession, index: usize) -> Result<(), WorkflowError> {
        self.apply(session, Event::SelectCandidate(index))
    }

    /// Confirms the previewed address and returns the suggested pub name.
    pub fn confirm(&self, session: &mut WorkflowSession) -> Result<String, WorkflowError> {
        self.apply(session, Event::ConfirmAddress)?;
        Ok(session.confirmed_name.clone().unwrap_or_default())
    }

    /// Validates `form`, writes the pub and returns the session to idle.
    /// Nothing changes if any step fails.
    pub async fn submit(
        &self,
        session: &mut WorkflowSession,
        form: PubForm,
    ) -> Result<Pub, WorkflowError> {
        let transition = session.apply(Event::Submit(form), self.settings)?;

        let mut stored = None;
        for effect in transition.effects {
            match effect {
                Effect::InsertPub(new_pub) => {
                    stored = Some(self.store.insert(new_pub).await?);
                }
            }
        }
        let stored = stored.ok_or_else(|| WorkflowError::Store("nothing was written".to_string()))?;

        self.apply(session, Event::Committed(stored.clone()))?;
        Ok(stored)
    }

    pub fn clear_preview(&self, session: &mut WorkflowSession) {
        // ClearPreview cannot fail
        if let Ok(transition) = session.apply(Event::ClearPreview, self.settings) {
            *session = transition.session;
        }
    }

    fn apply(&self, session: &mut WorkflowSession, event: Event) -> Result<(), WorkflowError> {
        let transition = session.apply(event, self.settings)?;
        *session = transition.session;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::session::{LatLon, Stage};
    use geezer_core::YesNo;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct MemoryStore {
        pubs: RefCell<Vec<Pub>>,
        fail_inserts: Cell<bool>,
    }

    impl PubStore for &MemoryStore {
        async fn load_all(&self) -> Result<Vec<Pub>, WorkflowError> {
            Ok(self.pubs.borrow().clone())
        }

        async fn insert(&self, new_pub: NewPub) -> Result<Pub, WorkflowError> {
            if self.fail_inserts.get() {
                return Err(WorkflowError::Store("disk full".to_string()));
            }
            let id = self.pubs.borrow().len() as i64 + 1;
            let stored = new_pub.into_pub(id);
            self.pubs.borrow_mut().push(stored.clone());
            Ok(stored)
        }
    }

    enum FixedGeocoder {
        Returns(Vec<AddressCandidate>),
        Down,
    }

    impl Geocoder for &FixedGeocoder {
        async fn lookup(&self, _query: &str) -> Result<Vec<AddressCandidate>, WorkflowError> {
            match self {
                FixedGeocoder::Returns(candidates) => Ok(candidates.clone()),
                FixedGeocoder::Down => Err(WorkflowError::GeocoderUnavailable(
                    "connection refused".to_string(),
                )),
            }
        }
    }

    fn candidate(address: &str, lat: f64, lon: f64) -> AddressCandidate {
        AddressCandidate {
            full_address: address.to_string(),
            latitude: lat,
            longitude: lon,
        }
    }

    fn red_lions() -> FixedGeocoder {
        FixedGeocoder::Returns(vec![
            candidate("Red Lion, Crown Passage, London", 51.5060, -0.1370),
            candidate("Red Lion, 48 Parliament Street, London", 51.5027, -0.1262),
            candidate("Red Lion, Duke of York Street, London", 51.5083, -0.1353),
        ])
    }

    fn red_lion_form() -> PubForm {
        PubForm {
            pint_price: "4.50".to_string(),
            pool_table: YesNo::Yes,
            ..PubForm::with_name("Red Lion")
        }
    }

    #[tokio::test]
    async fn search_select_confirm_submit_stores_one_pub() {
        let store = MemoryStore::default();
        let geocoder = red_lions();
        let settings = WorkflowSettings::default();
        let controller = WorkflowController::new(&store, &geocoder, &settings);
        let mut session = WorkflowSession::default();

        assert_eq!(controller.search(&mut session, "Red Lion").await, Ok(3));
        controller.select(&mut session, 1).unwrap();
        assert_eq!(controller.confirm(&mut session).unwrap(), "Red Lion");
        let stored = controller.submit(&mut session, red_lion_form()).await.unwrap();

        let pubs = controller.load_pubs().await.unwrap();
        assert_eq!(pubs, vec![stored]);
        assert_eq!(pubs[0].name, "Red Lion");
        assert_eq!((pubs[0].latitude, pubs[0].longitude), (51.5027, -0.1262));
        match &pubs[0].details {
            geezer_core::PubDetails::Amenities(a) => {
                assert_eq!(a.pint_price, 4.50);
                assert_eq!(a.pool_table, YesNo::Yes);
            }
            other => panic!("unexpected details {other:?}"),
        }

        assert_eq!(session.stage(), Stage::Idle);
        assert_eq!(session.preview, None);
        assert_eq!(session.confirmed_name, None);
        assert_eq!(session.candidates, None);
        assert_eq!(session.pending_recenter, Some(LatLon::new(51.5027, -0.1262)));
    }

    #[tokio::test]
    async fn outside_candidate_cannot_be_confirmed_or_stored() {
        let store = MemoryStore::default();
        let geocoder = FixedGeocoder::Returns(vec![candidate("The Swan, Bedford", 52.0, -0.46)]);
        let settings = WorkflowSettings {
            geofence_enabled: false,
            ..Default::default()
        };
        let controller = WorkflowController::new(&store, &geocoder, &settings);
        let mut session = WorkflowSession::default();

        controller.search(&mut session, "The Swan").await.unwrap();
        controller.select(&mut session, 0).unwrap();
        let err = controller.confirm(&mut session).unwrap_err();

        assert!(matches!(err, WorkflowError::OutsideServiceArea { .. }));
        assert_eq!(session.stage(), Stage::Previewing);
        assert!(matches!(
            controller.submit(&mut session, red_lion_form()).await,
            Err(WorkflowError::ValidationFailed(_))
        ));
        assert!(store.pubs.borrow().is_empty());
    }

    #[tokio::test]
    async fn geofenced_search_with_only_outside_results_finds_nothing() {
        let store = MemoryStore::default();
        let geocoder = FixedGeocoder::Returns(vec![candidate("The Swan, Bedford", 52.0, -0.46)]);
        let settings = WorkflowSettings::default();
        let controller = WorkflowController::new(&store, &geocoder, &settings);
        let mut session = WorkflowSession::default();

        let err = controller.search(&mut session, "The Swan").await.unwrap_err();

        assert_eq!(
            err,
            WorkflowError::NoResultsFound {
                query: "The Swan".to_string()
            }
        );
        assert_eq!(session, WorkflowSession::default());
    }

    #[tokio::test]
    async fn geocoder_outage_is_recoverable() {
        let store = MemoryStore::default();
        let geocoder = FixedGeocoder::Down;
        let settings = WorkflowSettings::default();
        let controller = WorkflowController::new(&store, &geocoder, &settings);
        let mut session = WorkflowSession::default();

        let err = controller.search(&mut session, "Red Lion").await.unwrap_err();

        assert!(matches!(err, WorkflowError::GeocoderUnavailable(_)));
        assert_eq!(session.stage(), Stage::Idle);
    }

    #[tokio::test]
    async fn blank_query_never_reaches_geocoder() {
        let store = MemoryStore::default();
        let geocoder = FixedGeocoder::Down;
        let settings = WorkflowSettings::default();
        let controller = WorkflowController::new(&store, &geocoder, &settings);
        let mut session = WorkflowSession::default();

        assert!(matches!(
            controller.search(&mut session, "   ").await,
            Err(WorkflowError::ValidationFailed(_))
        ));
    }

    #[tokio::test]
    async fn lookup_result_lands_on_the_session_as_it_is_now() {
        let store = MemoryStore::default();
        let geocoder = red_lions();
        let settings = WorkflowSettings::default();
        let controller = WorkflowController::new(&store, &geocoder, &settings);
        let mut session = WorkflowSession::default();
        controller.search(&mut session, "Red Lion").await.unwrap();
        controller.select(&mut session, 2).unwrap();

        let found = controller.lookup("Red Lion").await.unwrap();
        // the visitor clears the preview while the lookup is in flight
        controller.clear_preview(&mut session);
        assert_eq!(controller.accept_candidates(&mut session, found), Ok(3));

        assert_eq!(session.preview, None);
        assert_eq!(session.stage(), Stage::ChoosingCandidate);
    }

    #[tokio::test]
    async fn only_search_results_are_accepted() {
        let store = MemoryStore::default();
        let geocoder = red_lions();
        let settings = WorkflowSettings::default();
        let controller = WorkflowController::new(&store, &geocoder, &settings);
        let mut session = WorkflowSession::default();

        assert!(matches!(
            controller.accept_candidates(&mut session, Event::ClearPreview),
            Err(WorkflowError::ValidationFailed(_))
        ));
        assert_eq!(session, WorkflowSession::default());
    }

    #[tokio::test]
    async fn failed_insert_keeps_session_for_retry() {
        let store = MemoryStore::default();
        let geocoder = red_lions();
        let settings = WorkflowSettings::default();
        let controller = WorkflowController::new(&store, &geocoder, &settings);
        let mut session = WorkflowSession::default();

        controller.search(&mut session, "Red Lion").await.unwrap();
        controller.select(&mut session, 0).unwrap();
        controller.confirm(&mut session).unwrap();
        let before = session.clone();

        store.fail_inserts.set(true);
        let err = controller.submit(&mut session, red_lion_form()).await.unwrap_err();
        assert_eq!(err, WorkflowError::Store("disk full".to_string()));
        assert_eq!(session, before);

        store.fail_inserts.set(false);
        controller.submit(&mut session, red_lion_form()).await.unwrap();
        assert_eq!(store.pubs.borrow().len(), 1);
    }

    #[tokio::test]
    async fn identical_submissions_make_two_rows() {
        let store = MemoryStore::default();
        let geocoder = red_lions();
        let settings = WorkflowSettings::default();
        let controller = WorkflowController::new(&store, &geocoder, &settings);
        let mut session = WorkflowSession::default();

        for _ in 0..2 {
            controller.search(&mut session, "Red Lion").await.unwrap();
            controller.select(&mut session, 1).unwrap();
            controller.confirm(&mut session).unwrap();
            controller.submit(&mut session, red_lion_form()).await.unwrap();
        }

        let pubs = store.pubs.borrow();
        assert_eq!(pubs.len(), 2);
        assert_ne!(pubs[0].id, pubs[1].id);
        assert_eq!(pubs[0].name, pubs[1].name);
    }

    #[tokio::test]
    async fn clear_preview_twice_matches_once() {
        let store = MemoryStore::default();
        let geocoder = red_lions();
        let settings = WorkflowSettings::default();
        let controller = WorkflowController::new(&store, &geocoder, &settings);
        let mut session = WorkflowSession::default();

        controller.search(&mut session, "Red Lion").await.unwrap();
        controller.select(&mut session, 2).unwrap();

        controller.clear_preview(&mut session);
        let once = session.clone();
        controller.clear_preview(&mut session);

        assert_eq!(session, once);
        assert_eq!(session.stage(), Stage::Idle);
    }
}
