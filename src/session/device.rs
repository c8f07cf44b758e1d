//! Device identifiers.
//!
//! The backend counts concurrent sessions per device, so each installation
//! sends the same id on every request until the user logs out.

use chrono::Utc;
use rand::Rng;

/// Prefix shared by every generated device id.
pub const DEVICE_ID_PREFIX: &str = "web";

/// Length of the random suffix.
const SUFFIX_LENGTH: usize = 15;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a new device id of the form `web_<unix-millis>_<15 base36 chars>`.
pub fn generate_device_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LENGTH)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{DEVICE_ID_PREFIX}_{millis}_{suffix}")
}

/// Check that a stored id has the generated shape.
pub fn is_valid_device_id(id: &str) -> bool {
    let mut parts = id.splitn(3, '_');
    let (Some(prefix), Some(millis), Some(suffix)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    prefix == DEVICE_ID_PREFIX
        && !millis.is_empty()
        && millis.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == SUFFIX_LENGTH
        && suffix.bytes().all(|b| BASE36.contains(&b))
}
