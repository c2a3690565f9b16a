use sea_orm::{DatabaseConnection, DbErr};

use crate::{EngineError, ResultEngine};

mod ledger;
mod manufacturing;
mod metals;
mod supply;

/// Attempts per write operation before a busy/serialization failure is
/// surfaced as [`EngineError::Conflict`].
pub(crate) const WRITE_ATTEMPTS: u32 = 3;

/// Returns true for backend errors worth retrying: the transaction lost a
/// race, not the caller's input.
pub(crate) fn retryable(err: &DbErr) -> bool {
    let message = err.to_string();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("serialization failure")
        || message.contains("deadlock")
}

pub(crate) fn conflict_or_db(err: DbErr) -> EngineError {
    if retryable(&err) {
        EngineError::Conflict(err.to_string())
    } else {
        EngineError::Database(err)
    }
}

/// Run a block inside a DB transaction, committing on success and rolling
/// back on error. Busy/serialization failures are retried up to
/// [`WRITE_ATTEMPTS`] times; the body must therefore only borrow its
/// captures.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let mut attempt: u32 = 1;
        loop {
            let $tx = match $self.database.begin().await {
                Ok(tx) => tx,
                Err(err) => break Err($crate::ops::conflict_or_db(err)),
            };
            let result: $crate::ResultEngine<_> = async { $body }.await;
            match result {
                Ok(value) => match $tx.commit().await {
                    Ok(()) => break Ok(value),
                    Err(err) if $crate::ops::retryable(&err)
                        && attempt < $crate::ops::WRITE_ATTEMPTS =>
                    {
                        attempt += 1;
                        continue;
                    }
                    Err(err) => break Err($crate::ops::conflict_or_db(err)),
                },
                Err($crate::EngineError::Database(err))
                    if $crate::ops::retryable(&err)
                        && attempt < $crate::ops::WRITE_ATTEMPTS =>
                {
                    drop($tx);
                    attempt += 1;
                    continue;
                }
                Err($crate::EngineError::Database(err)) => {
                    break Err($crate::ops::conflict_or_db(err));
                }
                Err(err) => break Err(err),
            }
        }
    }};
}

pub(crate) use with_tx;

pub(crate) fn require_positive(value: f64, label: &str) -> ResultEngine<()> {
    if value <= 0.0 {
        return Err(EngineError::Validation(format!(
            "{label} must be greater than 0"
        )));
    }
    Ok(())
}

/// The metal accounting and transfer engine.
///
/// Every public write method executes as one database transaction: the
/// affected rows, the balance buckets and the audit rows commit together or
/// not at all.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
