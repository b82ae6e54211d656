use crate::core::ids::{LeadId, Role, UserId};
use crate::financing::quote::{FinancingQuote, QuoteError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Errors arising from creating or storing a simulation record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("role '{0}' may not run financing simulations")]
    RoleNotPermitted(Role),
    #[error("cannot access record file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record holds an invalid quote: {0}")]
    InvalidQuote(#[from] QuoteError),
}

/// A financing simulation a salesperson chose to keep for a lead.
///
/// Records are immutable snapshots: the quote is stored exactly as
/// computed, unrounded.
///
/// # Examples
///
/// ```
/// use moto_financing::core::ids::{LeadId, Role, UserId};
/// use moto_financing::financing::quote::FinancingSimulator;
/// use moto_financing::simulation::record::SimulationRecord;
/// use rust_decimal_macros::dec;
///
/// let quote = FinancingSimulator::default()
///     .compute_quote(dec!(25000), dec!(5000), 24, dec!(0.015))
///     .unwrap();
/// let record = SimulationRecord::new(
///     LeadId::new("lead-1"),
///     UserId::new("seller-7"),
///     Role::Vendedor,
///     quote,
/// )
/// .unwrap()
/// .with_notes("customer prefers 24x");
///
/// assert_eq!(record.approved(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    id: Uuid,
    lead_id: LeadId,
    salesperson_id: UserId,
    run_by: Role,
    quote: FinancingQuote,
    /// Credit decision, unknown until the financer answers.
    approved: Option<bool>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl SimulationRecord {
    /// Snapshot `quote` for `lead`, rejecting roles that cannot simulate.
    pub fn new(
        lead_id: LeadId,
        salesperson_id: UserId,
        run_by: Role,
        quote: FinancingQuote,
    ) -> Result<Self, RecordError> {
        Self::with_id(Uuid::new_v4(), lead_id, salesperson_id, run_by, quote)
    }

    /// Create a record with a specific ID (useful for testing / determinism).
    pub fn with_id(
        id: Uuid,
        lead_id: LeadId,
        salesperson_id: UserId,
        run_by: Role,
        quote: FinancingQuote,
    ) -> Result<Self, RecordError> {
        if !run_by.can_simulate() {
            return Err(RecordError::RoleNotPermitted(run_by));
        }
        Ok(Self {
            id,
            lead_id,
            salesperson_id,
            run_by,
            quote,
            approved: None,
            notes: None,
            created_at: Utc::now(),
        })
    }

    pub fn with_approval(mut self, approved: bool) -> Self {
        self.approved = Some(approved);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn lead_id(&self) -> &LeadId {
        &self.lead_id
    }

    pub fn salesperson_id(&self) -> &UserId {
        &self.salesperson_id
    }

    pub fn run_by(&self) -> Role {
        self.run_by
    }

    pub fn quote(&self) -> &FinancingQuote {
        &self.quote
    }

    pub fn approved(&self) -> Option<bool> {
        self.approved
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Write the record as pretty JSON, replacing any existing file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "saved simulation {} for lead {} to {}",
            self.id,
            self.lead_id,
            path.display()
        );
        Ok(())
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let record: Self = serde_json::from_str(&content)?;
        record.quote.verify()?;
        Ok(record)
    }
}
