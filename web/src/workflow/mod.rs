pub mod backend;
pub mod controller;
pub mod render;
pub mod session;

pub use backend::ServerBackend;
pub use controller::{Geocoder, PubStore, WorkflowController};
pub use render::{record_commit, render_model, PreviewMarker, PubMarker, RenderModel};
pub use session::{
    Effect, Event, LatLon, Preview, PubForm, Stage, Transition, WorkflowSession, WorkflowSettings,
    MAX_CANDIDATES,
};
