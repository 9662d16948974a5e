//! Common types for the Spotify authorization workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
