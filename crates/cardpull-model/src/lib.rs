pub mod card;
pub mod envelope;
pub mod error;

pub use card::*;
pub use envelope::{normalize, Envelope};
pub use error::ExtractError;
