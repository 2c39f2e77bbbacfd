//! Realm-of-the-day selection
//!
//! Realms are cosmetic biome descriptors. The pick is a pure function of
//! the date string, so every client shows the same realm on the same day
//! without coordination.

use serde::Serialize;

use crate::seed::char_sum;

/// A biome: display name, background color and flavor hazards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Realm {
    pub name: &'static str,
    /// Hex background color, `#rrggbb`
    pub bg: &'static str,
    pub hazards: &'static [&'static str],
}

pub const REALMS: [Realm; 5] = [
    Realm {
        name: "Ancient Ruins",
        bg: "#2d1e0f",
        hazards: &["falling debris", "lava fissures"],
    },
    Realm {
        name: "Cyberpunk City",
        bg: "#0f0f2d",
        hazards: &["electric grids", "drone patrols"],
    },
    Realm {
        name: "Alien Hive",
        bg: "#132d13",
        hazards: &["acid pools", "spore clouds"],
    },
    Realm {
        name: "Elemental Wasteland",
        bg: "#331f2d",
        hazards: &["firestorms", "sand cyclones"],
    },
    Realm {
        name: "Puzzle Sanctum",
        bg: "#1f2333",
        hazards: &["shifting walls", "void tiles"],
    },
];

/// Pick the realm for an ISO date string
pub fn pick_realm_by_date(date: &str) -> Realm {
    REALMS[char_sum(date) as usize % REALMS.len()]
}
