//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use emporium_app::auth::AuthenticatedUser;

const CURRENT_USER_DEPOT_KEY: &str = "current_user";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_current_user(&mut self, user: AuthenticatedUser);

    fn current_user_or_401(&self) -> Result<AuthenticatedUser, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_current_user(&mut self, user: AuthenticatedUser) {
        self.insert(CURRENT_USER_DEPOT_KEY, user);
    }

    fn current_user_or_401(&self) -> Result<AuthenticatedUser, StatusError> {
        self.get::<AuthenticatedUser>(CURRENT_USER_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| {
                StatusError::unauthorized().brief("Could not validate credentials")
            })
    }
}
