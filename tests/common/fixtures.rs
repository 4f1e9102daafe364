//! Store fixtures
//!
//! Lofts, reservations that reference them and availability rows.

use loft_monitor::InMemoryStore;
use serde_json::json;

/// Ids of the seeded lofts
pub const LOFT_IDS: [&str; 3] = ["loft-1", "loft-2", "loft-3"];

/// Store with three lofts, two reservations and their availability
pub fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();

    for (i, id) in LOFT_IDS.iter().enumerate() {
        store.insert(
            "lofts",
            json!({
                "id": id,
                "name": format!("Loft {}", i + 1),
                "price_per_night": 90 + 10 * i,
                "max_guests": 2 + i,
            }),
        );
        store.insert(
            "loft_availability",
            json!({"id": format!("avail-{}", i + 1), "loft_id": id, "date": "2026-11-01"}),
        );
    }

    store.insert(
        "reservations",
        json!({"id": "res-1", "loft_id": "loft-1", "guests": 2}),
    );
    store.insert(
        "reservations",
        json!({"id": "res-2", "loft_id": "loft-2", "guests": 1}),
    );

    store
}
