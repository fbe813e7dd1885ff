// src/identity.rs
//! Node identifier generation
//!
//! A node id is the CRC-32 of a human-readable timestamp, rendered as eight
//! lowercase hex characters. It is generated once and then persisted.

use crc_all::CrcAlgo;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const CRC32_INIT: u32 = 0xffff_ffff;

// Koopman polynomial 0x814141ab, 0xd5828281 in reversed notation.
const CRC32_NODE: CrcAlgo<u32> = CrcAlgo::<u32>::new(
    0x8141_41ab, // polynomial
    32,          // width
    CRC32_INIT,  // init
    0xffff_ffff, // xorout
    true,        // reflect
);

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] UTC"
);

/// Computes the node CRC-32 over a byte slice.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = CRC32_INIT;
    CRC32_NODE.update_crc(&mut crc, data);
    CRC32_NODE.finish_crc(&crc)
}

/// Derives a node identifier from a formatted timestamp.
///
/// Deterministic: the same input always yields the same eight hex characters.
pub fn node_id_from(stamp: &str) -> String {
    hex::encode(crc32(stamp.as_bytes()).to_be_bytes())
}

/// Formats a point in time the way node ids are seeded,
/// e.g. `Mon, 02 Jan 2006 15:04:05 UTC`.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let at = at.to_offset(time::UtcOffset::UTC);
    at.format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

/// Generates a fresh node identifier from the current time.
pub fn generate_node_id() -> String {
    let stamp = format_timestamp(OffsetDateTime::now_utc());
    log::debug!("Seeding node id from '{}'", stamp);
    node_id_from(&stamp)
}
