use anyhow::ensure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Ingreso",
            Self::Expense => "Gasto",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub kind: EntryKind,
    pub amount: f64,
    pub recorded_at: DateTime<Utc>,
}

/// In-memory transaction log for the entry page: a running signed balance and
/// a newest-first history. State lives only for the process lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    balance: f64,
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        kind: EntryKind,
        amount: f64,
        recorded_at: DateTime<Utc>,
    ) -> anyhow::Result<&LedgerEntry> {
        ensure!(
            amount.is_finite() && amount > 0.0,
            "entry amount must be positive (got {amount})"
        );

        self.balance += match kind {
            EntryKind::Income => amount,
            EntryKind::Expense => -amount,
        };

        self.entries.insert(
            0,
            LedgerEntry {
                kind,
                amount,
                recorded_at,
            },
        );
        Ok(&self.entries[0])
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Entries newest first.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }
}
