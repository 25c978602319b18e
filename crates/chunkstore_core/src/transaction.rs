//! Multi-record create transaction with compensating rollback.
//!
//! The backing store has no multi-record transactions. A
//! [`CreateTransaction`] makes "create N records" look atomic by tracking
//! exactly which records it created and deleting those, and only those, when
//! a later create fails.
//!
//! ## States
//!
//! ```text
//! Creating --create ok--> Creating
//! Creating --create err--> Failed { position }
//! Creating --commit (all created)--> Committed
//! Creating | Failed --rollback--> RolledBack
//! ```

use crate::error::{CoreError, CoreResult};
use chunkstore_records::{Context, Record, RecordError, RecordStore};
use tracing::{debug, warn};

/// State of a create transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateState {
    /// Records are being created; everything recorded so far exists.
    Creating,
    /// Creating the segment at `position` failed.
    Failed {
        /// Position of the failed segment.
        position: u64,
    },
    /// Every record was created.
    Committed,
    /// Created records were deleted (best effort).
    RolledBack,
}

/// Tracks the records created for one logical object.
#[derive(Debug)]
pub struct CreateTransaction<'a, S: ?Sized> {
    store: &'a S,
    key: &'a str,
    total: u64,
    created: Vec<Record>,
    state: CreateState,
}

impl<'a, S: RecordStore + ?Sized> CreateTransaction<'a, S> {
    /// Starts a transaction that will create `total` records for `key`.
    pub fn begin(store: &'a S, key: &'a str, total: u64) -> Self {
        Self {
            store,
            key,
            total,
            created: Vec::with_capacity(usize::try_from(total).unwrap_or(0)),
            state: CreateState::Creating,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> CreateState {
        self.state
    }

    /// Returns the records created so far.
    #[must_use]
    pub fn created(&self) -> &[Record] {
        &self.created
    }

    /// Creates the record for the segment at `position`.
    ///
    /// On failure the transaction moves to [`CreateState::Failed`] and the
    /// store error is returned for the caller to report.
    ///
    /// # Errors
    ///
    /// Returns the record store's error, or [`RecordError::Corrupted`] if the
    /// transaction is no longer creating.
    pub fn create(&mut self, ctx: &Context, position: u64, record: Record) -> Result<(), RecordError> {
        if self.state != CreateState::Creating {
            return Err(RecordError::Corrupted(format!(
                "create on {} transaction for {}",
                state_name(self.state),
                self.key
            )));
        }

        match self.store.create(ctx, record) {
            Ok(created) => {
                debug!(
                    key = self.key,
                    position,
                    name = %created.meta.name,
                    "created segment record"
                );
                self.created.push(created);
                Ok(())
            }
            Err(e) => {
                self.state = CreateState::Failed { position };
                Err(e)
            }
        }
    }

    /// Finishes the transaction and returns the created records in
    /// creation order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PartitionFailed`] if not every record was
    /// created or the transaction already failed.
    pub fn commit(mut self) -> CoreResult<Vec<Record>> {
        if self.state != CreateState::Creating || self.created.len() as u64 != self.total {
            return Err(CoreError::PartitionFailed {
                key: self.key.to_string(),
            });
        }
        self.state = CreateState::Committed;
        Ok(self.created)
    }

    /// Deletes every record this transaction created.
    ///
    /// Runs under a background context so a cancelled caller still gets its
    /// compensating deletes. Delete failures are logged and the names of the
    /// records left behind are returned; they never abort the rollback.
    pub fn rollback(&mut self) -> Vec<String> {
        if matches!(self.state, CreateState::Committed | CreateState::RolledBack) {
            return Vec::new();
        }

        let ctx = Context::background();
        let mut unreclaimed = Vec::new();
        for record in self.created.drain(..).rev() {
            let meta = &record.meta;
            match self.store.delete(&ctx, &meta.namespace, &meta.name) {
                Ok(()) => debug!(key = self.key, name = %meta.name, "rolled back segment record"),
                Err(e) if e.is_not_found() => {}
                Err(e) => {
                    warn!(
                        key = self.key,
                        name = %meta.name,
                        error = %e,
                        "failed to roll back segment record"
                    );
                    unreclaimed.push(meta.name.clone());
                }
            }
        }
        self.state = CreateState::RolledBack;
        unreclaimed
    }
}

fn state_name(state: CreateState) -> &'static str {
    match state {
        CreateState::Creating => "creating",
        CreateState::Failed { .. } => "failed",
        CreateState::Committed => "committed",
        CreateState::RolledBack => "rolled back",
    }
}
