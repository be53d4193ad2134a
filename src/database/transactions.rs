// ABOUTME: Transaction management with an RAII guard for multi-statement writes
// ABOUTME: Rolls back automatically on drop unless commit() was reached
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Scoped transactions
//!
//! A recipe write touches the recipe row, its tag links and its ledger rows. Those
//! statements run through one [`TransactionGuard`]: if any of them fails, or the caller
//! returns early with `?`, the guard is dropped and `SQLx` rolls the transaction back, so
//! readers never observe a recipe with a partial ingredient or tag set.
//!
//! ```text
//! let mut guard = database.begin().await?;
//! sqlx::query("DELETE FROM recipe_ingredients ...").execute(guard.executor()?).await?;
//! sqlx::query("INSERT INTO recipe_ingredients ...").execute(guard.executor()?).await?;
//! guard.commit().await?;
//! ```

use sqlx::{Database, Sqlite, Transaction};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};

/// RAII guard for database transactions ensuring automatic rollback on drop
///
/// `commit` consumes the guard, so a committed transaction cannot be used again.
pub struct TransactionGuard<'c, DB: Database> {
    transaction: Option<Transaction<'c, DB>>,
}

impl<'c, DB: Database> TransactionGuard<'c, DB> {
    /// Wrap a transaction obtained from `pool.begin().await`
    #[must_use]
    pub fn new(transaction: Transaction<'c, DB>) -> Self {
        debug!("TransactionGuard created - transaction will auto-rollback if not committed");
        Self {
            transaction: Some(transaction),
        }
    }

    /// Commit the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already consumed or the commit fails
    pub async fn commit(mut self) -> AppResult<()> {
        let tx = self
            .transaction
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed - cannot commit"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Transaction commit failed: {e}")))?;
        debug!("TransactionGuard committed successfully");
        Ok(())
    }

    /// Connection to run statements on inside the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the guard is used after commit
    pub fn executor(&mut self) -> AppResult<&mut <DB as Database>::Connection> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            AppError::internal("Transaction already consumed - guard used after commit")
        })
    }
}

impl<DB: Database> Drop for TransactionGuard<'_, DB> {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            warn!("TransactionGuard dropped without commit - transaction will be rolled back");
        }
    }
}

/// `SQLite` transaction guard
pub type SqliteTransactionGuard = TransactionGuard<'static, Sqlite>;
