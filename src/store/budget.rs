//! Budget ledger - one record per calendar month
//!
//! ```text
//!            first access of month         update_budget(amount)
//!   absent ───────────────────────▶ default ─────────────────────▶ amount set
//!                                      │
//!                                      └── add_purchase ──▶ spent += amount
//! ```
//!
//! Records are keyed by `MonthKey` so iteration is chronological.

use std::collections::BTreeMap;

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{BudgetRecord, MonthKey, Purchase};

/// Budget given to a month that has never been configured
pub const DEFAULT_BUDGET_AMOUNT: f64 = 1000.0;

/// All monthly budget records
#[derive(Debug)]
pub struct BudgetLedger {
    records: BTreeMap<MonthKey, BudgetRecord>,
    default_amount: f64,
}

impl Default for BudgetLedger {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET_AMOUNT)
    }
}

impl BudgetLedger {
    pub fn new(default_amount: f64) -> Self {
        Self {
            records: BTreeMap::new(),
            default_amount,
        }
    }

    /// Build a ledger from existing records; a later record for the same month wins
    pub fn from_records(records: Vec<BudgetRecord>, default_amount: f64) -> Self {
        let mut ledger = Self::new(default_amount);
        for record in records {
            if ledger.records.contains_key(&record.month) {
                tracing::warn!(month = %record.month, "Duplicate budget month in seed data, replacing");
            }
            ledger.records.insert(record.month, record);
        }
        ledger
    }

    pub fn default_amount(&self) -> f64 {
        self.default_amount
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, oldest month first
    pub fn all(&self) -> Vec<BudgetRecord> {
        self.records.values().cloned().collect()
    }

    pub fn get(&self, month: MonthKey) -> Option<&BudgetRecord> {
        self.records.get(&month)
    }

    /// Return the record for `month`, creating it with the default amount
    ///
    /// `make_id` is only called when a record is created.
    pub fn get_or_create(&mut self, month: MonthKey, make_id: impl FnOnce() -> String) -> &BudgetRecord {
        let default_amount = self.default_amount;
        self.records.entry(month).or_insert_with(|| {
            let id = make_id();
            tracing::info!(month = %month, budget_id = %id, amount = default_amount, "Created default budget");
            BudgetRecord::new(id, month, default_amount)
        })
    }

    /// Set the budget amount, creating the month if needed
    ///
    /// Purchases and the derived spent amount are left untouched.
    pub fn set_amount(
        &mut self,
        month: MonthKey,
        amount: f64,
        make_id: impl FnOnce() -> String,
    ) -> &BudgetRecord {
        let record = self
            .records
            .entry(month)
            .or_insert_with(|| BudgetRecord::new(make_id(), month, amount));
        record.budget_amount = amount;
        record
    }

    /// Append a purchase to an existing month
    pub fn add_purchase(&mut self, month: MonthKey, purchase: Purchase) -> StoreResult<&BudgetRecord> {
        let record = self
            .records
            .get_mut(&month)
            .ok_or_else(|| StoreError::BudgetNotFound(month.to_string()))?;
        record.push_purchase(purchase);
        Ok(record)
    }

    /// Remaining budget for a month; the default amount if the month is unknown
    pub fn remaining(&self, month: MonthKey) -> f64 {
        self.records
            .get(&month)
            .map(BudgetRecord::remaining)
            .unwrap_or(self.default_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn purchase(id: &str, amount: f64) -> Purchase {
        Purchase {
            id: id.to_string(),
            book_title: "Dune".to_string(),
            amount,
            date: Utc::now(),
            retailer: None,
        }
    }

    #[test]
    fn test_get_or_create_is_at_most_once() {
        let mut ledger = BudgetLedger::default();
        let first = ledger.get_or_create(month("2024-06"), || "a".to_string()).id.clone();
        let second = ledger
            .get_or_create(month("2024-06"), || panic!("should not create twice"))
            .id
            .clone();
        assert_eq!(first, second);
        assert_eq!(ledger.len(), 1);

        let record = ledger.get(month("2024-06")).unwrap();
        assert_eq!(record.budget_amount, DEFAULT_BUDGET_AMOUNT);
        assert_eq!(record.spent_amount(), 0.0);
        assert!(record.purchases().is_empty());
    }

    #[test]
    fn test_set_amount_creates_or_updates() {
        let mut ledger = BudgetLedger::default();
        ledger.set_amount(month("2024-06"), 1500.0, || "new".to_string());
        assert_eq!(ledger.get(month("2024-06")).unwrap().budget_amount, 1500.0);

        ledger.add_purchase(month("2024-06"), purchase("p1", 400.0)).unwrap();
        let updated = ledger.set_amount(month("2024-06"), 800.0, || unreachable!());
        assert_eq!(updated.id, "new");
        assert_eq!(updated.budget_amount, 800.0);
        assert_eq!(updated.spent_amount(), 400.0);
    }

    #[test]
    fn test_add_purchase_requires_month() {
        let mut ledger = BudgetLedger::default();
        let err = ledger.add_purchase(month("2024-06"), purchase("p1", 10.0)).unwrap_err();
        assert!(matches!(err, StoreError::BudgetNotFound(m) if m == "2024-06"));
    }

    #[test]
    fn test_add_purchase_grows_spent_by_amount() {
        let mut ledger = BudgetLedger::default();
        ledger.get_or_create(month("2024-06"), || "b".to_string());

        let before = ledger.get(month("2024-06")).unwrap().clone();
        let after = ledger.add_purchase(month("2024-06"), purchase("p1", 349.5)).unwrap();

        assert_eq!(after.spent_amount(), before.spent_amount() + 349.5);
        assert_eq!(after.purchases().len(), before.purchases().len() + 1);
    }

    #[test]
    fn test_remaining_floors_at_zero_and_defaults() {
        let mut ledger = BudgetLedger::new(750.0);
        assert_eq!(ledger.remaining(month("2030-01")), 750.0);

        ledger.set_amount(month("2024-06"), 300.0, || "b".to_string());
        ledger.add_purchase(month("2024-06"), purchase("p1", 450.0)).unwrap();
        assert_eq!(ledger.remaining(month("2024-06")), 0.0);
    }

    #[test]
    fn test_all_is_chronological() {
        let ledger = BudgetLedger::from_records(
            vec![
                BudgetRecord::new("3", month("2024-03"), 100.0),
                BudgetRecord::new("1", month("2023-11"), 100.0),
                BudgetRecord::new("2", month("2024-01"), 100.0),
            ],
            DEFAULT_BUDGET_AMOUNT,
        );
        let months: Vec<String> = ledger.all().iter().map(|r| r.month.to_string()).collect();
        assert_eq!(months, vec!["2023-11", "2024-01", "2024-03"]);
    }
}
