//! # tcg-types
//!
//! Domain entities shared across every subsystem of the card-game node:
//! transactions, blocks, and the player directory / reply-bus envelope
//! used to notify clients.

pub mod entities;
pub mod envelope;

pub use entities::*;
pub use envelope::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_field_counts_match_schema() {
        assert_eq!(TransactionType::Purchase.expected_fields(), 3);
        assert_eq!(TransactionType::Trade.expected_fields(), 4);
        assert_eq!(TransactionType::BattleResult.expected_fields(), 4);
    }

    #[test]
    fn genesis_transaction_is_tagged() {
        let tx = Transaction::genesis();
        assert!(tx.is_genesis());
        assert_eq!(tx.tx_type.as_wire_str(), "GENESIS");
    }

    #[test]
    fn transaction_round_trips_through_json() {
        let tx = Transaction {
            id: "tx-1".into(),
            tx_type: TransactionType::Purchase,
            timestamp: 1000,
            data: vec!["alice".into(), "{}".into(), "meta".into()],
            user_data: vec![
                "{}".into(),
                "1000".into(),
                "alice".into(),
                "PURCHASE".into(),
            ],
            public_key: vec![4u8; 65],
            signature: vec![0u8; 64],
        };
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, tx.id);
        assert_eq!(back.data, tx.data);
    }
}
