//! Device identifier derivation.
//!
//! The identifier is a 32-bit rolling hash (`h = h * 31 + unit`, wrapping) over the
//! UTF-16 code units of the environment attributes joined with `###`, rendered as
//! `DEV-<absolute value>`. Collisions across devices are possible and anyone who
//! knows the attributes can reproduce it. The server matches on this exact value.

use crate::types::DeviceIdentifier;

const PREFIX: &str = "DEV-";
const SEPARATOR: &str = "###";

/// Snapshot of the client environment the identifier is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    pub user_agent: String,
    pub language: String,
    pub color_depth: u32,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Minutes to add to local time to reach UTC (UTC+05:30 is `-330`).
    pub timezone_offset_minutes: i32,
}

impl DeviceProfile {
    /// The attribute string that gets hashed. Order matters.
    pub fn fingerprint_source(&self) -> String {
        [
            self.user_agent.clone(),
            self.language.clone(),
            self.color_depth.to_string(),
            format!("{}x{}", self.screen_width, self.screen_height),
            self.timezone_offset_minutes.to_string(),
        ]
        .join(SEPARATOR)
    }

    pub fn identifier(&self) -> DeviceIdentifier {
        let hash = rolling_hash(&self.fingerprint_source());
        // Widen first so i32::MIN has an absolute value.
        DeviceIdentifier::from_raw(format!("{PREFIX}{}", i64::from(hash).abs()))
    }
}

fn rolling_hash(input: &str) -> i32 {
    input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}
