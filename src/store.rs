//! Read-only access to the user's stored debts and funding settings.
//!
//! Callers take an owned [`Snapshot`] and hand that to the simulator, so a plan
//! is always computed from a consistent copy rather than a live record set.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Debt, StrategySettings};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub settings: StrategySettings,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store lock poisoned")]
    Poisoned,
}

pub trait RecordStore: Send + Sync {
    fn snapshot(&self) -> Result<Snapshot, StoreError>;
}

/// In-process store; readers share the current snapshot until `replace` swaps it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    current: RwLock<Arc<Snapshot>>,
}

impl MemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn replace(&self, snapshot: Snapshot) -> Result<(), StoreError> {
        let mut current = self.current.write().map_err(|_| StoreError::Poisoned)?;
        *current = Arc::new(snapshot);
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let current = self.current.read().map_err(|_| StoreError::Poisoned)?;
        Ok(Snapshot::clone(&current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RecurringFunding;
    use rust_decimal_macros::dec;

    fn snapshot_with(amount: rust_decimal::Decimal) -> Snapshot {
        Snapshot {
            debts: vec![Debt {
                id: "card".to_string(),
                name: "Card".to_string(),
                balance: dec!(800),
                apr: dec!(19.99),
                minimum_payment: dec!(35),
                due_day: Some(12),
                credit_limit: Some(dec!(2000)),
            }],
            settings: StrategySettings {
                recurring_funding: RecurringFunding {
                    amount,
                    day_of_month: Some(1),
                },
                ..StrategySettings::default()
            },
        }
    }

    #[test]
    fn default_store_is_empty() {
        let store = MemoryStore::default();
        let snapshot = store.snapshot().expect("readable");
        assert!(snapshot.debts.is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_later_replacements() {
        let store = MemoryStore::new(snapshot_with(dec!(100)));
        let before = store.snapshot().expect("readable");
        store.replace(snapshot_with(dec!(250))).expect("writable");
        let after = store.snapshot().expect("readable");

        assert_eq!(before.settings.recurring_funding.amount, dec!(100));
        assert_eq!(after.settings.recurring_funding.amount, dec!(250));
    }

    #[test]
    fn snapshot_parses_camel_case_json() {
        let json = r#"{
          "debts": [{"id": "a", "name": "A", "balance": 120.5, "apr": 9.9, "minimumPayment": 20}],
          "settings": {"strategy": "snowball", "recurringFunding": {"amount": 60}}
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).expect("valid json");
        assert_eq!(snapshot.debts[0].balance, dec!(120.5));
        assert_eq!(snapshot.debts[0].minimum_payment, dec!(20));
        assert_eq!(snapshot.settings.strategy, crate::core::Strategy::Snowball);
        assert!(snapshot.settings.one_time_fundings.is_empty());
    }
}
