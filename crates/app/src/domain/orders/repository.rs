//! Orders Repository

use std::str::FromStr;

use apothecary::orders::OrderStatus;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::orders::{
    data::NewOrder,
    records::{OrderRecord, OrderUuid},
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const FIND_ORDER_BY_PICKUP_CODE_SQL: &str = include_str!("sql/find_order_by_pickup_code.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const SET_ORDER_STATUS_SQL: &str = include_str!("sql/set_order_status.sql");
const SET_ORDER_SIGNATURE_SQL: &str = include_str!("sql/set_order_signature.sql");
const COMPLETE_ORDER_SQL: &str = include_str!("sql/complete_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
        pickup_code: &str,
    ) -> Result<OrderRecord, sqlx::Error> {
        let quantity = i32::try_from(order.quantity).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(pickup_code)
            .bind(&order.customer_name)
            .bind(&order.customer_phone)
            .bind(&order.customer_email)
            .bind(&order.medicine_name)
            .bind(quantity)
            .bind(&order.notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_by_pickup_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        pickup_code: &str,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(FIND_ORDER_BY_PICKUP_CODE_SQL)
            .bind(pickup_code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Compare-and-swap status update: only applies while the row still has
    /// the status the caller validated from. Returns `None` when the row is
    /// missing or has moved on concurrently.
    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(SET_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(to.as_str())
            .bind(from.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Stores proof-of-pickup while the order is still open. Re-capture
    /// overwrites; there is only ever one stored signature.
    pub(crate) async fn set_signature(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        signature: &str,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(SET_ORDER_SIGNATURE_SQL)
            .bind(order.into_uuid())
            .bind(signature)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Terminal handover: sets `completed` and stores the signature in one
    /// statement, guarded so closed orders are never rewritten.
    pub(crate) async fn complete_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        signature: &str,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(COMPLETE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(signature)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let status = OrderStatus::from_str(&status).map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            pickup_code: row.try_get("pickup_code")?,
            customer_name: row.try_get("customer_name")?,
            customer_phone: row.try_get("customer_phone")?,
            customer_email: row.try_get("customer_email")?,
            medicine_name: row.try_get("medicine_name")?,
            quantity: row.try_get("quantity")?,
            notes: row.try_get("notes")?,
            status,
            customer_signature: row.try_get("customer_signature")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
