//! Deterministic booster generation.
//!
//! The booster a purchase grants is never trusted from client input and
//! never queued ahead of consensus: its contents are derived from the
//! mined transaction id itself, so replaying the derivation after a crash
//! between mining and fan-out always reproduces the same booster.

use sha2::{Digest, Sha256};
use serde_json::{json, Value};

const CARD_POOL: &[&str] = &[
    "whispering-hollow",
    "salt-circle-ward",
    "moth-lantern",
    "drowned-choir",
    "brass-automaton",
    "gravekeeper's-ledger",
    "fever-dream-courier",
    "pale-tide",
    "cindered-oracle",
    "hush-bell",
    "the-unlit-room",
    "marrow-garden",
];

const CARDS_PER_BOOSTER: usize = 5;

/// Derives a fixed-size booster from `tx_id` by hashing `tx_id || index`
/// once per slot and indexing into the card pool with the digest.
pub fn booster_for_tx(tx_id: &str) -> Value {
    let cards: Vec<&str> = (0..CARDS_PER_BOOSTER)
        .map(|slot| {
            let mut hasher = Sha256::new();
            hasher.update(tx_id.as_bytes());
            hasher.update(slot.to_be_bytes());
            let digest = hasher.finalize();
            let index = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) as usize;
            CARD_POOL[index % CARD_POOL.len()]
        })
        .collect();

    json!({ "cards": cards })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_tx_id_always_yields_the_same_booster() {
        assert_eq!(booster_for_tx("tx-1"), booster_for_tx("tx-1"));
    }

    #[test]
    fn different_tx_ids_usually_yield_different_boosters() {
        assert_ne!(booster_for_tx("tx-1"), booster_for_tx("tx-2"));
    }

    #[test]
    fn booster_always_has_the_expected_card_count() {
        let booster = booster_for_tx("tx-42");
        let cards = booster["cards"].as_array().unwrap();
        assert_eq!(cards.len(), CARDS_PER_BOOSTER);
    }
}
