//! Expense repository.
//!
//! Expenses are flat: an amount, a note, a date. Blank notes get the
//! stock "No details" text so the list never shows an empty row.

use chrono::Utc;
use tindera_core::{validation, Expense};
use tracing::debug;

use crate::collection::{ChangeSubscription, Collection};
use crate::error::StoreResult;

/// Repository for operating expenses.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    coll: Collection<Expense>,
}

impl ExpenseRepository {
    pub(crate) fn new(coll: Collection<Expense>) -> Self {
        ExpenseRepository { coll }
    }

    /// Validates and records an expense dated now.
    pub async fn add(&self, amount_cents: i64, note: &str) -> StoreResult<Expense> {
        validation::validate_expense_amount(amount_cents)?;

        let mut expense = Expense {
            id: String::new(),
            amount_cents,
            note: validation::normalize_expense_note(note),
            date: Some(Utc::now()),
        };

        let id = self.coll.push(&expense).await?;
        expense.id = id;
        debug!(id = %expense.id, amount_cents, "Expense recorded");
        Ok(expense)
    }

    /// Lists all expenses in insertion order.
    pub async fn list(&self) -> StoreResult<Vec<Expense>> {
        self.coll.list().await
    }

    /// Lists expenses newest first. Undated legacy records sort last.
    pub async fn list_recent(&self) -> StoreResult<Vec<Expense>> {
        let mut expenses = self.coll.list().await?;
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    /// Deletes an expense.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.coll.remove(id).await
    }

    /// Subscribes to expense changes.
    pub fn subscribe(&self) -> ChangeSubscription {
        self.coll.subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
