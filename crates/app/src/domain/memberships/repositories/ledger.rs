//! Points Ledger Repository
//!
//! Append and list only; no update or delete statements exist for ledger
//! entries.

use std::str::FromStr;

use apothecary::ledger::EntryType;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::memberships::records::{LedgerEntryRecord, LedgerEntryUuid, MembershipUuid};

const APPEND_LEDGER_ENTRY_SQL: &str = include_str!("../sql/append_ledger_entry.sql");
const LIST_LEDGER_ENTRIES_SQL: &str = include_str!("../sql/list_ledger_entries.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLedgerRepository;

impl PgLedgerRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn append_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        membership: MembershipUuid,
        entry_type: EntryType,
        points: u32,
        description: Option<&str>,
        order_uuid: Option<Uuid>,
    ) -> Result<LedgerEntryRecord, sqlx::Error> {
        query_as::<Postgres, LedgerEntryRecord>(APPEND_LEDGER_ENTRY_SQL)
            .bind(LedgerEntryUuid::new().into_uuid())
            .bind(membership.into_uuid())
            .bind(entry_type.as_str())
            .bind(i64::from(points))
            .bind(description)
            .bind(order_uuid)
            .fetch_one(&mut **tx)
            .await
    }

    /// Entries newest-first, for display.
    pub(crate) async fn list_for(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        membership: MembershipUuid,
    ) -> Result<Vec<LedgerEntryRecord>, sqlx::Error> {
        query_as::<Postgres, LedgerEntryRecord>(LIST_LEDGER_ENTRIES_SQL)
            .bind(membership.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

}

impl<'r> FromRow<'r, PgRow> for LedgerEntryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let entry_type: String = row.try_get("entry_type")?;
        let entry_type = EntryType::from_str(&entry_type).map_err(|e| sqlx::Error::ColumnDecode {
            index: "entry_type".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: LedgerEntryUuid::from_uuid(row.try_get("uuid")?),
            membership_uuid: MembershipUuid::from_uuid(row.try_get("membership_uuid")?),
            entry_type,
            points: row.try_get("points")?,
            description: row.try_get("description")?,
            order_uuid: row.try_get("order_uuid")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
