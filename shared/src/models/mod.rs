//! Domain models shared between the server and its clients

pub mod review;
pub mod spot;

pub use review::{MAX_STAR, MIN_STAR, ReviewSubmitResult, VoteKind, VoteResult};
pub use spot::{
    Location, NoiseLevel, ParseEnumError, SpotFormOptions, SpotType, parse_purchase_required,
};
