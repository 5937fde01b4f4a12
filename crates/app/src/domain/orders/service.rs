//! Orders service.

use std::sync::Arc;

use apothecary::{
    codes,
    orders::{OrderStateError, OrderStatus, Signature, SignatureError},
};
use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::orders::{
        data::NewOrder,
        errors::OrdersServiceError,
        records::{OrderRecord, OrderUuid},
        repository::PgOrdersRepository,
    },
    notify::{Notifier, templates},
};

/// Attempts at inserting a freshly generated pickup code before giving up.
const CODE_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    notifier: Arc<dyn Notifier>,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            notifier,
        }
    }

    async fn try_submit(
        &self,
        order: &NewOrder,
        pickup_code: &str,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_order(&mut tx, order, pickup_code)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    /// Fire-and-forget delivery; a notification failure never fails the
    /// order operation that triggered it.
    async fn notify(&self, to: &str, message: &str) {
        if let Err(error) = self.notifier.send(to, message).await {
            tracing::warn!(%error, to, "notification delivery failed");
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn submit_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError> {
        if order.quantity == 0 {
            return Err(OrdersServiceError::InvalidQuantity);
        }

        if order.customer_name.trim().is_empty()
            || order.customer_phone.trim().is_empty()
            || order.medicine_name.trim().is_empty()
        {
            return Err(OrdersServiceError::MissingRequiredData);
        }

        let mut created = None;

        for _ in 0..CODE_ATTEMPTS {
            let pickup_code = codes::pickup_code(&mut rand::thread_rng());

            match self.try_submit(&order, &pickup_code).await {
                Err(OrdersServiceError::CodeTaken) => {
                    tracing::warn!(pickup_code, "pickup code collision, regenerating");
                }
                Err(error) => return Err(error),
                Ok(record) => {
                    created = Some(record);
                    break;
                }
            }
        }

        let Some(created) = created else {
            return Err(OrdersServiceError::CodeTaken);
        };

        self.notify(
            &created.customer_phone,
            &templates::order_confirmation(
                &created.customer_name,
                &created.medicine_name,
                created.quantity,
            ),
        )
        .await;

        Ok(created)
    }

    async fn lookup(&self, pickup_code: &str) -> Result<OrderRecord, OrdersServiceError> {
        let pickup_code = codes::normalize(pickup_code);

        let mut tx = self.db.begin().await?;

        let order = self
            .repository
            .find_by_pickup_code(&mut tx, &pickup_code)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.repository.get_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.repository.list_orders(&mut tx).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn advance(
        &self,
        order: OrderUuid,
        next: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.repository.get_order(&mut tx, order).await?;

        current.status.transition(next)?;

        // Completion always carries proof-of-pickup. [`OrdersService::complete`]
        // takes the signature directly; reaching `completed` through here is
        // only permitted once one has already been captured.
        if next == OrderStatus::Completed && !current.has_signature() {
            return Err(SignatureError::Empty.into());
        }

        let Some(updated) = self
            .repository
            .set_status(&mut tx, order, current.status, next)
            .await?
        else {
            // The row moved on between the read and the guarded update.
            let fresh = self.repository.get_order(&mut tx, order).await?;

            return Err(OrderStateError::InvalidTransition {
                from: fresh.status,
                to: next,
            }
            .into());
        };

        tx.commit().await?;

        if updated.status == OrderStatus::Ready {
            self.notify(
                &updated.customer_phone,
                &templates::order_ready(&updated.customer_name, &updated.medicine_name),
            )
            .await;
        }

        Ok(updated)
    }

    async fn capture_signature(
        &self,
        order: OrderUuid,
        signature: Signature,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(updated) = self
            .repository
            .set_signature(&mut tx, order, signature.as_str())
            .await?
        else {
            // Missing row surfaces as NotFound here; otherwise it is closed.
            self.repository.get_order(&mut tx, order).await?;

            return Err(OrdersServiceError::AlreadyClosed);
        };

        tx.commit().await?;

        Ok(updated)
    }

    async fn complete(
        &self,
        order: OrderUuid,
        signature: Signature,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(updated) = self
            .repository
            .complete_order(&mut tx, order, signature.as_str())
            .await?
        else {
            self.repository.get_order(&mut tx, order).await?;

            return Err(OrdersServiceError::AlreadyClosed);
        };

        tx.commit().await?;

        Ok(updated)
    }

    async fn cancel(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.repository.get_order(&mut tx, order).await?;

        current.status.transition(OrderStatus::Cancelled)?;

        let Some(updated) = self
            .repository
            .set_status(&mut tx, order, current.status, OrderStatus::Cancelled)
            .await?
        else {
            let fresh = self.repository.get_order(&mut tx, order).await?;

            return Err(OrderStateError::InvalidTransition {
                from: fresh.status,
                to: OrderStatus::Cancelled,
            }
            .into());
        };

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Submits a customer order request, generating a pickup code and
    /// sending a confirmation notification.
    async fn submit_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError>;

    /// Look an order up by pickup code. Input is trimmed and uppercased
    /// before matching; matching is exact, never fuzzy.
    async fn lookup(&self, pickup_code: &str) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve a single order.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieves all orders, newest first.
    async fn list_orders(&self) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Move an order one step along
    /// `pending → processing → ready → completed`. Reaching `ready` sends
    /// the pickup notification. Reaching `completed` requires that
    /// proof-of-pickup has already been captured; without it the advance is
    /// rejected and callers must go through [`OrdersService::complete`].
    async fn advance(
        &self,
        order: OrderUuid,
        next: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Attach proof-of-pickup to an open order without changing its status.
    /// Idempotent: re-capture overwrites the stored signature.
    async fn capture_signature(
        &self,
        order: OrderUuid,
        signature: Signature,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Terminal handover: marks the order completed and stores the captured
    /// signature. Permitted from any open state; a [`Signature`] value is
    /// required, so completion without proof is unrepresentable.
    async fn complete(
        &self,
        order: OrderUuid,
        signature: Signature,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Cancel an open order.
    async fn cancel(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;
}
