// src/report/canonical.rs
//! The nine-slot summary record forwarded to the collector
//!
//! On the wire the record is a positional array of nine strings under a
//! `result` key, the shape Claymore's `miner_getstat1` answers with. Inside
//! the monitor every slot has a name.

use crate::utils::error::MonitorError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Number of positional slots in a report
pub const SLOT_COUNT: usize = 9;

/// Placeholder for the invalid-share / pool-switch diagnostics slot
pub const DIAGNOSTICS_PLACEHOLDER: &str = "0;0;0;0";

/// Pool identity reported when the miner does not tell us
pub const UNKNOWN_POOL: &str = "unknown";

/// Normalized miner summary
///
/// Field order matches slot order. Unset slots are empty strings and are
/// still emitted, so the serialized array always has nine entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalReport {
    /// Slot 0: miner version or algorithm label
    pub label: String,
    /// Slot 1: uptime in whole minutes
    pub uptime_minutes: String,
    /// Slot 2: `total hashrate;accepted;rejected`
    pub totals: String,
    /// Slot 3: per-device hashrates, `;`-joined
    pub hashrates: String,
    /// Slot 4: secondary-coin totals (passthrough only)
    pub secondary_totals: String,
    /// Slot 5: secondary-coin per-device hashrates (passthrough only)
    pub secondary_hashrates: String,
    /// Slot 6: per-device `temperature;fan` pairs, `;`-joined
    pub temperatures: String,
    /// Slot 7: pool / server identity
    pub pool: String,
    /// Slot 8: invalid shares and pool switches
    pub diagnostics: String,
}

impl CanonicalReport {
    /// Builds a report from its positional form.
    pub fn from_slots(slots: [String; SLOT_COUNT]) -> Self {
        let [
            label,
            uptime_minutes,
            totals,
            hashrates,
            secondary_totals,
            secondary_hashrates,
            temperatures,
            pool,
            diagnostics,
        ] = slots;

        CanonicalReport {
            label,
            uptime_minutes,
            totals,
            hashrates,
            secondary_totals,
            secondary_hashrates,
            temperatures,
            pool,
            diagnostics,
        }
    }

    /// Borrows the report in its positional form.
    pub fn slots(&self) -> [&str; SLOT_COUNT] {
        [
            &self.label,
            &self.uptime_minutes,
            &self.totals,
            &self.hashrates,
            &self.secondary_totals,
            &self.secondary_hashrates,
            &self.temperatures,
            &self.pool,
            &self.diagnostics,
        ]
    }

    /// Serializes the report as `{"result":[...]}`.
    pub fn to_json(&self) -> Result<String, MonitorError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a report, tolerating missing or mistyped slots.
    ///
    /// Anything that is not a string becomes an empty slot. Input that is not
    /// JSON at all yields an all-empty report rather than an error.
    pub fn parse_lenient(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(report) => report,
            Err(e) => {
                log::warn!("Unreadable report, using empty slots: {}", e);
                Self::default()
            }
        }
    }
}

#[derive(Serialize)]
struct WireOut<'a> {
    result: [&'a str; SLOT_COUNT],
}

#[derive(Deserialize)]
struct WireIn {
    #[serde(default, deserialize_with = "lenient_slots")]
    result: [String; SLOT_COUNT],
}

impl Serialize for CanonicalReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireOut {
            result: self.slots(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CanonicalReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        WireIn::deserialize(deserializer).map(|wire| Self::from_slots(wire.result))
    }
}

/// Reads up to nine slots from any JSON value.
///
/// Short arrays leave trailing slots empty, extra entries are ignored and
/// non-string entries become empty strings.
pub(crate) fn lenient_slots<'de, D>(deserializer: D) -> Result<[String; SLOT_COUNT], D::Error>
where
    D: Deserializer<'de>,
{
    let mut slots: [String; SLOT_COUNT] = Default::default();
    if let Value::Array(values) = Value::deserialize(deserializer)? {
        for (slot, value) in slots.iter_mut().zip(values) {
            if let Value::String(s) = value {
                *slot = s;
            }
        }
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CanonicalReport {
        CanonicalReport::from_slots([
            "9.3 - ETH".into(),
            "21".into(),
            "182724;51;0".into(),
            "30440;30461;30451".into(),
            "0;0;0".into(),
            "off;off;off".into(),
            "53;71;57;67;61;72".into(),
            "eth-eu1.nanopool.org:9999".into(),
            "0;0;0;0".into(),
        ])
    }

    #[test]
    fn serializes_positionally() {
        let json = sample().to_json().unwrap();
        assert_eq!(
            json,
            r#"{"result":["9.3 - ETH","21","182724;51;0","30440;30461;30451","0;0;0","off;off;off","53;71;57;67;61;72","eth-eu1.nanopool.org:9999","0;0;0;0"]}"#
        );
    }

    #[test]
    fn empty_slots_are_kept() {
        let json = CanonicalReport::default().to_json().unwrap();
        assert_eq!(json, r#"{"result":["","","","","","","","",""]}"#);
    }

    #[test]
    fn reparsing_own_output_is_identity() {
        let report = sample();
        let again = CanonicalReport::parse_lenient(&report.to_json().unwrap());
        assert_eq!(again, report);
    }

    #[test]
    fn short_array_pads_with_empty_slots() {
        let report = CanonicalReport::parse_lenient(r#"{"result":["a","b"]}"#);
        assert_eq!(report.label, "a");
        assert_eq!(report.uptime_minutes, "b");
        assert_eq!(report.diagnostics, "");
    }

    #[test]
    fn mistyped_entries_become_empty() {
        let report = CanonicalReport::parse_lenient(r#"{"result":["a",5,null,"d"],"id":0}"#);
        assert_eq!(report.slots()[..4], ["a", "", "", "d"]);
    }

    #[test]
    fn garbage_yields_default() {
        assert_eq!(CanonicalReport::parse_lenient("not json"), CanonicalReport::default());
        assert_eq!(CanonicalReport::parse_lenient("{}"), CanonicalReport::default());
    }
}
