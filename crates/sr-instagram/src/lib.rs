//! sr-instagram: Instagram story source for story-relay
//!
//! Talks to the private mobile API the way the Android app does:
//! a deterministic device identity, a signed login and the per-user
//! story reel endpoint.

pub mod api;
pub mod device;
pub mod error;
pub mod source;

pub use api::{InstagramApi, InstagramSession};
pub use device::Device;
pub use error::{InstagramError, Result};
