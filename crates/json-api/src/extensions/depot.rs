//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use ecom_app::domain::users::records::UserRecord;

/// Typed access to values the middleware stack stores in the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_current_user(&mut self, user: UserRecord);

    /// The user resolved by the bearer auth middleware.
    fn current_user_or_401(&self) -> Result<&UserRecord, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_missing| StatusError::internal_server_error())
    }

    fn insert_current_user(&mut self, user: UserRecord) {
        self.inject(user);
    }

    fn current_user_or_401(&self) -> Result<&UserRecord, StatusError> {
        self.obtain::<UserRecord>()
            .map_err(|_missing| StatusError::unauthorized())
    }
}
