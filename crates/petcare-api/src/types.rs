//! Shared types for the API layer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

use petcare_core::{Account, BookingPolicy, BookingResult, Database, Scheduler};

use crate::error::ApiError;

/// Shared context for all routes and middleware.
///
/// One SQLite connection behind a mutex; handlers hold the lock only for
/// their synchronous storage work, never across an `.await`.
#[derive(Clone)]
pub struct ApiContext {
    db: Arc<Mutex<Database>>,
    policy: BookingPolicy,
}

impl ApiContext {
    pub fn new(db: Database, policy: BookingPolicy) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            policy,
        }
    }

    /// Run `f` against a scheduler bound to the shared connection.
    pub fn with_scheduler<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Scheduler<'_>) -> BookingResult<T>,
    {
        let db = self.lock();
        let scheduler = Scheduler::with_policy(&db, self.policy);
        Ok(f(&scheduler)?)
    }

    /// Lock the connection, recovering it from a poisoned mutex. Open
    /// transactions roll back on unwind.
    fn lock(&self) -> MutexGuard<'_, Database> {
        self.db.lock().unwrap_or_else(|poisoned| {
            warn!("Recovering database lock after a handler panic");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Resolve a bearer token to its account.
    pub fn authenticate(&self, token: &str) -> Result<Option<Account>, ApiError> {
        let db = self.lock();
        Ok(db.account_for_token(token)?)
    }
}

/// Authenticated account, injected into request extensions by the auth
/// middleware.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub account: Account,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poisoned_lock_is_recovered() {
        let ctx = ApiContext::new(Database::open_in_memory().unwrap(), BookingPolicy::default());

        let panicking = ctx.clone();
        let joined = std::thread::spawn(move || {
            let _: Result<(), ApiError> = panicking.with_scheduler(|_| panic!("handler bug"));
        })
        .join();
        assert!(joined.is_err());

        assert_eq!(ctx.with_scheduler(|_| Ok(7)).unwrap(), 7);
        assert!(ctx.authenticate("no-such-token").unwrap().is_none());
    }
}
