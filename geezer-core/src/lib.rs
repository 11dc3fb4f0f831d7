pub mod candidate;
pub mod pub_record;
pub mod region;
#[cfg(feature = "store")]
pub mod store;

pub use candidate::{derive_name, AddressCandidate};
pub use pub_record::{
    Amenities, Commentary, NewPub, Pub, PubDetails, PubValidationError, UnknownChoice, YesNo,
};
pub use region::{BoundingBox, LonLat, Region, GREATER_LONDON};
#[cfg(feature = "store")]
pub use store::{PubStore, StoreError};
