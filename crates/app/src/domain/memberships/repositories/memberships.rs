//! Memberships Repository

use std::str::FromStr;

use apothecary::membership::{MembershipStatus, Tier};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    customers::records::CustomerUuid,
    memberships::records::{MembershipRecord, MembershipUuid},
};

const CREATE_MEMBERSHIP_SQL: &str = include_str!("../sql/create_membership.sql");
const GET_MEMBERSHIP_SQL: &str = include_str!("../sql/get_membership.sql");
const FIND_MEMBERSHIP_BY_CODE_SQL: &str = include_str!("../sql/find_membership_by_code.sql");
const LIST_MEMBERSHIPS_SQL: &str = include_str!("../sql/list_memberships.sql");
const APPLY_BALANCE_DELTA_SQL: &str = include_str!("../sql/apply_balance_delta.sql");
const SET_MEMBERSHIP_STATUS_SQL: &str = include_str!("../sql/set_membership_status.sql");
const DELETE_MEMBERSHIP_SQL: &str = include_str!("../sql/delete_membership.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgMembershipsRepository;

impl PgMembershipsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_membership(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: MembershipUuid,
        customer: CustomerUuid,
        code: &str,
        tier: Tier,
        initial_points: u32,
    ) -> Result<MembershipRecord, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(CREATE_MEMBERSHIP_SQL)
            .bind(uuid.into_uuid())
            .bind(customer.into_uuid())
            .bind(code)
            .bind(tier.as_str())
            .bind(i64::from(initial_points))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_membership(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        membership: MembershipUuid,
    ) -> Result<MembershipRecord, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(GET_MEMBERSHIP_SQL)
            .bind(membership.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<MembershipRecord, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(FIND_MEMBERSHIP_BY_CODE_SQL)
            .bind(code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_memberships(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<MembershipRecord>, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(LIST_MEMBERSHIPS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Applies a signed balance delta, guarded so the balance can never go
    /// below zero. Returns the updated record, or `None` when the guard
    /// rejected the delta.
    pub(crate) async fn apply_balance_delta(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        membership: MembershipUuid,
        delta: i64,
    ) -> Result<Option<MembershipRecord>, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(APPLY_BALANCE_DELTA_SQL)
            .bind(membership.into_uuid())
            .bind(delta)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        membership: MembershipUuid,
        status: MembershipStatus,
    ) -> Result<MembershipRecord, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(SET_MEMBERSHIP_STATUS_SQL)
            .bind(membership.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_membership(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        membership: MembershipUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_MEMBERSHIP_SQL)
            .bind(membership.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for MembershipRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let tier: String = row.try_get("tier")?;
        let tier = Tier::from_str(&tier).map_err(|e| sqlx::Error::ColumnDecode {
            index: "tier".to_string(),
            source: Box::new(e),
        })?;

        let status: String = row.try_get("status")?;
        let status = MembershipStatus::from_str(&status).map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: MembershipUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            code: row.try_get("code")?,
            tier,
            points_balance: row.try_get("points_balance")?,
            status,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
