//! Memberships service.

use apothecary::{codes, ledger::EntryType, membership::MembershipStatus};
use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::memberships::{
        data::{NewMembership, PointsAdjustment},
        errors::{self, MembershipsServiceError},
        records::{LedgerEntryRecord, MembershipRecord, MembershipUuid},
        repositories::{PgLedgerRepository, PgMembershipsRepository},
    },
};

/// Attempts at inserting a freshly generated code before giving up.
const CODE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone)]
pub struct PgMembershipsService {
    db: Db,
    memberships_repository: PgMembershipsRepository,
    ledger_repository: PgLedgerRepository,
}

impl PgMembershipsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            memberships_repository: PgMembershipsRepository::new(),
            ledger_repository: PgLedgerRepository::new(),
        }
    }

    /// One enrollment attempt with a fixed code; the whole account (row plus
    /// any initial ledger entry) commits or rolls back together.
    async fn try_enroll(
        &self,
        membership: &NewMembership,
        code: &str,
    ) -> Result<MembershipRecord, MembershipsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .memberships_repository
            .create_membership(
                &mut tx,
                membership.uuid,
                membership.customer_uuid,
                code,
                membership.tier,
                membership.initial_points,
            )
            .await?;

        if membership.initial_points > 0 {
            self.ledger_repository
                .append_entry(
                    &mut tx,
                    membership.uuid,
                    EntryType::Earned,
                    membership.initial_points,
                    Some("Initial points"),
                    None,
                )
                .await?;
        }

        tx.commit().await?;

        Ok(created)
    }
}

#[async_trait]
impl MembershipsService for PgMembershipsService {
    async fn enroll(
        &self,
        membership: NewMembership,
    ) -> Result<MembershipRecord, MembershipsServiceError> {
        for _ in 0..CODE_ATTEMPTS {
            let code = codes::membership_code(&mut rand::thread_rng());

            match self.try_enroll(&membership, &code).await {
                Err(MembershipsServiceError::CodeTaken) => {
                    tracing::warn!(code, "membership code collision, regenerating");
                }
                other => return other,
            }
        }

        Err(MembershipsServiceError::CodeTaken)
    }

    async fn get_membership(
        &self,
        membership: MembershipUuid,
    ) -> Result<MembershipRecord, MembershipsServiceError> {
        let mut tx = self.db.begin().await?;

        let membership = self
            .memberships_repository
            .get_membership(&mut tx, membership)
            .await?;

        tx.commit().await?;

        Ok(membership)
    }

    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<MembershipRecord, MembershipsServiceError> {
        let code = codes::normalize(code);

        let mut tx = self.db.begin().await?;

        let membership = self
            .memberships_repository
            .find_by_code(&mut tx, &code)
            .await?;

        tx.commit().await?;

        Ok(membership)
    }

    async fn list_memberships(&self) -> Result<Vec<MembershipRecord>, MembershipsServiceError> {
        let mut tx = self.db.begin().await?;

        let memberships = self
            .memberships_repository
            .list_memberships(&mut tx)
            .await?;

        tx.commit().await?;

        Ok(memberships)
    }

    async fn adjust_points(
        &self,
        membership: MembershipUuid,
        adjustment: PointsAdjustment,
    ) -> Result<MembershipRecord, MembershipsServiceError> {
        match adjustment.entry_type {
            EntryType::Earned | EntryType::Redeemed => {}
            EntryType::Expired => return Err(MembershipsServiceError::UnsupportedEntryType),
        }

        if adjustment.points == 0 {
            return Err(MembershipsServiceError::InvalidPoints);
        }

        let mut tx = self.db.begin().await?;

        // Append first: a missing membership surfaces here as a foreign key
        // violation, so a balance guard miss below can only mean overdraw.
        self.ledger_repository
            .append_entry(
                &mut tx,
                membership,
                adjustment.entry_type,
                adjustment.points,
                adjustment.description.as_deref(),
                adjustment.order_uuid,
            )
            .await?;

        let delta = adjustment.entry_type.signed_delta(adjustment.points);

        let Some(updated) = self
            .memberships_repository
            .apply_balance_delta(&mut tx, membership, delta)
            .await?
        else {
            // Dropping the transaction rolls the ledger append back.
            return Err(MembershipsServiceError::InsufficientBalance);
        };

        tx.commit().await?;

        Ok(updated)
    }

    async fn ledger(
        &self,
        membership: MembershipUuid,
    ) -> Result<Vec<LedgerEntryRecord>, MembershipsServiceError> {
        let mut tx = self.db.begin().await?;

        self.memberships_repository
            .get_membership(&mut tx, membership)
            .await?;

        let entries = self.ledger_repository.list_for(&mut tx, membership).await?;

        tx.commit().await?;

        Ok(entries)
    }

    async fn set_status(
        &self,
        membership: MembershipUuid,
        status: MembershipStatus,
    ) -> Result<MembershipRecord, MembershipsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .memberships_repository
            .set_status(&mut tx, membership, status)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_membership(
        &self,
        membership: MembershipUuid,
    ) -> Result<(), MembershipsServiceError> {
        let mut tx = self.db.begin().await?;

        // No count-then-delete: the ledger foreign key rejects the delete
        // whenever history exists, including entries appended concurrently.
        let rows_affected = self
            .memberships_repository
            .delete_membership(&mut tx, membership)
            .await
            .map_err(|error| {
                let constraint = error
                    .as_database_error()
                    .and_then(sqlx::error::DatabaseError::constraint);

                if constraint == Some(errors::LEDGER_FK_CONSTRAINT) {
                    MembershipsServiceError::HasLedgerHistory
                } else {
                    error.into()
                }
            })?;

        if rows_affected == 0 {
            return Err(MembershipsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait MembershipsService: Send + Sync {
    /// Enrolls a customer, generating a membership code. At most one
    /// membership may exist per customer.
    async fn enroll(
        &self,
        membership: NewMembership,
    ) -> Result<MembershipRecord, MembershipsServiceError>;

    /// Retrieve a single membership.
    async fn get_membership(
        &self,
        membership: MembershipUuid,
    ) -> Result<MembershipRecord, MembershipsServiceError>;

    /// Look a membership up by its human-facing code, case-insensitively.
    async fn find_by_code(&self, code: &str)
    -> Result<MembershipRecord, MembershipsServiceError>;

    /// Retrieves all memberships, newest first.
    async fn list_memberships(&self) -> Result<Vec<MembershipRecord>, MembershipsServiceError>;

    /// Earn or redeem points. The ledger append and the balance update
    /// commit atomically; redemptions exceeding the balance are rejected
    /// outright, never clamped.
    async fn adjust_points(
        &self,
        membership: MembershipUuid,
        adjustment: PointsAdjustment,
    ) -> Result<MembershipRecord, MembershipsServiceError>;

    /// Ledger entries for a membership, newest first.
    async fn ledger(
        &self,
        membership: MembershipUuid,
    ) -> Result<Vec<LedgerEntryRecord>, MembershipsServiceError>;

    /// Set the account lifecycle status.
    async fn set_status(
        &self,
        membership: MembershipUuid,
        status: MembershipStatus,
    ) -> Result<MembershipRecord, MembershipsServiceError>;

    /// Remove a membership that has no ledger history. Accounts with history
    /// must be archived via [`MembershipsService::set_status`] instead.
    async fn delete_membership(
        &self,
        membership: MembershipUuid,
    ) -> Result<(), MembershipsServiceError>;
}

#[cfg(test)]
mod tests {
    use apothecary::{
        ledger::{Entry, balance},
        membership::Tier,
    };
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn earn(points: u32, description: &str) -> PointsAdjustment {
        PointsAdjustment {
            entry_type: EntryType::Earned,
            points,
            description: Some(description.to_string()),
            order_uuid: None,
        }
    }

    fn redeem(points: u32, description: &str) -> PointsAdjustment {
        PointsAdjustment {
            entry_type: EntryType::Redeemed,
            points,
            description: Some(description.to_string()),
            order_uuid: None,
        }
    }

    #[tokio::test]
    async fn enroll_creates_account_with_generated_code() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("gold@example.com").await?;
        let uuid = MembershipUuid::new();

        let membership = ctx
            .memberships
            .enroll(NewMembership {
                uuid,
                customer_uuid: customer,
                tier: Tier::Gold,
                initial_points: 0,
            })
            .await?;

        assert_eq!(membership.uuid, uuid);
        assert_eq!(membership.customer_uuid, customer);
        assert_eq!(membership.tier, Tier::Gold);
        assert_eq!(membership.points_balance, 0);
        assert_eq!(membership.status, MembershipStatus::Active);
        assert!(
            membership.code.starts_with("MEM-"),
            "unexpected code {}",
            membership.code
        );

        Ok(())
    }

    #[tokio::test]
    async fn enroll_with_initial_points_writes_one_ledger_entry() -> TestResult {
        let ctx = TestContext::new().await;
        let membership = ctx.enroll(Tier::Silver, 250).await?;

        assert_eq!(membership.points_balance, 250);

        let entries = ctx.memberships.ledger(membership.uuid).await?;

        assert_eq!(entries.len(), 1);

        let entry = entries.first().ok_or("missing initial entry")?;

        assert_eq!(entry.entry_type, EntryType::Earned);
        assert_eq!(entry.points, 250);
        assert_eq!(entry.description.as_deref(), Some("Initial points"));

        Ok(())
    }

    #[tokio::test]
    async fn enroll_without_initial_points_writes_no_ledger_entry() -> TestResult {
        let ctx = TestContext::new().await;
        let membership = ctx.enroll(Tier::Bronze, 0).await?;

        let entries = ctx.memberships.ledger(membership.uuid).await?;

        assert!(entries.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn second_enrollment_for_same_customer_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("repeat@example.com").await?;

        ctx.memberships
            .enroll(NewMembership {
                uuid: MembershipUuid::new(),
                customer_uuid: customer,
                tier: Tier::Bronze,
                initial_points: 100,
            })
            .await?;

        let result = ctx
            .memberships
            .enroll(NewMembership {
                uuid: MembershipUuid::new(),
                customer_uuid: customer,
                tier: Tier::Silver,
                initial_points: 100,
            })
            .await;

        assert!(
            matches!(result, Err(MembershipsServiceError::AlreadyEnrolled)),
            "expected AlreadyEnrolled, got {result:?}"
        );

        // Exactly one account, with exactly one initial entry.
        let accounts = ctx.memberships.list_memberships().await?;

        assert_eq!(accounts.len(), 1);

        let account = accounts.first().ok_or("missing account")?;

        assert_eq!(ctx.memberships.ledger(account.uuid).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn enroll_for_unknown_customer_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .memberships
            .enroll(NewMembership {
                uuid: MembershipUuid::new(),
                customer_uuid: crate::domain::customers::records::CustomerUuid::new(),
                tier: Tier::Bronze,
                initial_points: 0,
            })
            .await;

        assert!(
            matches!(result, Err(MembershipsServiceError::CustomerNotFound)),
            "expected CustomerNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn earn_then_redeem_then_overdraw_scenario() -> TestResult {
        let ctx = TestContext::new().await;
        let membership = ctx.enroll(Tier::Bronze, 0).await?;

        let after_earn = ctx
            .memberships
            .adjust_points(membership.uuid, earn(500, "Initial points"))
            .await?;

        assert_eq!(after_earn.points_balance, 500);
        assert_eq!(ctx.memberships.ledger(membership.uuid).await?.len(), 1);

        let after_redeem = ctx
            .memberships
            .adjust_points(membership.uuid, redeem(200, "Purchase discount"))
            .await?;

        assert_eq!(after_redeem.points_balance, 300);
        assert_eq!(ctx.memberships.ledger(membership.uuid).await?.len(), 2);

        let result = ctx
            .memberships
            .adjust_points(membership.uuid, redeem(400, "Too much"))
            .await;

        assert!(
            matches!(result, Err(MembershipsServiceError::InsufficientBalance)),
            "expected InsufficientBalance, got {result:?}"
        );

        // The failed attempt left neither a balance change nor a ledger entry.
        let account = ctx.memberships.get_membership(membership.uuid).await?;

        assert_eq!(account.points_balance, 300);
        assert_eq!(ctx.memberships.ledger(membership.uuid).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn balance_matches_ledger_reconstruction() -> TestResult {
        let ctx = TestContext::new().await;
        let membership = ctx.enroll(Tier::Silver, 120).await?;

        ctx.memberships
            .adjust_points(membership.uuid, earn(80, "Purchase"))
            .await?;
        ctx.memberships
            .adjust_points(membership.uuid, redeem(50, "Discount"))
            .await?;

        let account = ctx.memberships.get_membership(membership.uuid).await?;
        let entries = ctx.memberships.ledger(membership.uuid).await?;

        let mut reconstructed = Vec::new();

        for entry in &entries {
            reconstructed.push(Entry::new(entry.entry_type, u32::try_from(entry.points)?)?);
        }

        assert_eq!(account.points_balance, balance(&reconstructed));
        assert_eq!(account.points_balance, 150);

        Ok(())
    }

    #[tokio::test]
    async fn zero_point_adjustment_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let membership = ctx.enroll(Tier::Bronze, 0).await?;

        let result = ctx
            .memberships
            .adjust_points(membership.uuid, earn(0, "Nothing"))
            .await;

        assert!(
            matches!(result, Err(MembershipsServiceError::InvalidPoints)),
            "expected InvalidPoints, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn expired_adjustments_are_not_staff_adjustable() -> TestResult {
        let ctx = TestContext::new().await;
        let membership = ctx.enroll(Tier::Bronze, 100).await?;

        let result = ctx
            .memberships
            .adjust_points(
                membership.uuid,
                PointsAdjustment {
                    entry_type: EntryType::Expired,
                    points: 50,
                    description: None,
                    order_uuid: None,
                },
            )
            .await;

        assert!(
            matches!(result, Err(MembershipsServiceError::UnsupportedEntryType)),
            "expected UnsupportedEntryType, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn adjust_points_unknown_membership_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .memberships
            .adjust_points(MembershipUuid::new(), earn(10, "Ghost"))
            .await;

        assert!(
            matches!(result, Err(MembershipsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn find_by_code_is_case_insensitive() -> TestResult {
        let ctx = TestContext::new().await;
        let membership = ctx.enroll(Tier::Gold, 0).await?;

        let lowercase = membership.code.to_lowercase();
        let found = ctx.memberships.find_by_code(&format!(" {lowercase} ")).await?;

        assert_eq!(found.uuid, membership.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn set_status_archives_account() -> TestResult {
        let ctx = TestContext::new().await;
        let membership = ctx.enroll(Tier::Bronze, 100).await?;

        let archived = ctx
            .memberships
            .set_status(membership.uuid, MembershipStatus::Inactive)
            .await?;

        assert_eq!(archived.status, MembershipStatus::Inactive);

        Ok(())
    }

    #[tokio::test]
    async fn delete_with_ledger_history_is_forbidden() -> TestResult {
        let ctx = TestContext::new().await;
        let membership = ctx.enroll(Tier::Bronze, 100).await?;

        let result = ctx.memberships.delete_membership(membership.uuid).await;

        assert!(
            matches!(result, Err(MembershipsServiceError::HasLedgerHistory)),
            "expected HasLedgerHistory, got {result:?}"
        );

        // Still present.
        assert!(ctx.memberships.get_membership(membership.uuid).await.is_ok());

        Ok(())
    }

    #[tokio::test]
    async fn delete_without_history_removes_account() -> TestResult {
        let ctx = TestContext::new().await;
        let membership = ctx.enroll(Tier::Bronze, 0).await?;

        ctx.memberships.delete_membership(membership.uuid).await?;

        let result = ctx.memberships.get_membership(membership.uuid).await;

        assert!(
            matches!(result, Err(MembershipsServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_unknown_membership_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.memberships.delete_membership(MembershipUuid::new()).await;

        assert!(
            matches!(result, Err(MembershipsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
