//! Display names that replace an activity's catalog name.
//!
//! Some encounters exist once per difficulty with identical catalog names.
//! Entries here give each variant its own label; variants left out of the
//! table keep the shared name and collapse into one display-list entry.

struct ActivityName {
    activity_hash: u32,
    name: &'static str,
}

#[rustfmt::skip]
const ACTIVITY_NAMES: &[ActivityName] = &[
    // Wrath of the Machine
    ActivityName { activity_hash:  260765522, name: "Wrath of the Machine (Normal)" },
    ActivityName { activity_hash: 1387993552, name: "Wrath of the Machine (Hard)" },
];

/// Look up the display-name override for an activity hash.
pub fn lookup(activity_hash: u32) -> Option<&'static str> {
    ACTIVITY_NAMES
        .iter()
        .find(|entry| entry.activity_hash == activity_hash)
        .map(|entry| entry.name)
}
