//! Client-side session state.
//!
//! The backend owns authentication and device limits. Locally we only keep
//! the logged-in user, its bearer token and a stable device id between runs.

mod device;
mod store;

pub use device::{generate_device_id, is_valid_device_id, DEVICE_ID_PREFIX};
pub use store::{SessionState, SessionStore};
