//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        customers::{CustomersService, PgCustomersService},
        memberships::{MembershipsService, PgMembershipsService},
        orders::{OrdersService, PgOrdersService},
    },
    notify::Notifier,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub customers: Arc<dyn CustomersService>,
    pub memberships: Arc<dyn MembershipsService>,
    pub orders: Arc<dyn OrdersService>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self {
            customers: Arc::new(PgCustomersService::new(db.clone())),
            memberships: Arc::new(PgMembershipsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db, notifier.clone())),
            notifier,
        })
    }
}
