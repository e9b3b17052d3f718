//! Consumption gate repository: grants, one-shot purchases, metered video.
//!
//! The grant insert-if-absent is the atomicity boundary for purchases: the
//! unique `(user_id, resource_id)` constraint decides the winner of any race,
//! and the ledger debit happens only for the winner. A debit failure
//! compensates by deleting the just-inserted grant so a retry with funds can
//! succeed later.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use tracing::{info, warn};
use uuid::Uuid;

use tabeeb_core::access::{AccessDecision, AccessError, PricingPolicy, ResourceKind};
use tabeeb_core::ledger::{DeltaRequest, TransactionReason};
use tabeeb_shared::types::{BalanceAmounts, CreditKind};

use crate::entities::grants;
use crate::repositories::ledger::LedgerRepository;

fn db_err(err: DbErr) -> AccessError {
    AccessError::Database(err.to_string())
}

/// Grant repository for access checks, purchases, and video metering.
#[derive(Debug, Clone)]
pub struct GrantRepository {
    db: DatabaseConnection,
    ledger: LedgerRepository,
}

impl GrantRepository {
    /// Creates a new grant repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let ledger = LedgerRepository::new(db.clone());
        Self { db, ledger }
    }

    /// Finds the grant for a (user, resource) pair, if any.
    pub async fn find_grant(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
    ) -> Result<Option<grants::Model>, AccessError> {
        grants::Entity::find()
            .filter(grants::Column::UserId.eq(user_id))
            .filter(grants::Column::ResourceId.eq(resource_id))
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Checks whether a user may access a one-shot resource.
    ///
    /// An existing grant answers `granted` with no ledger involvement;
    /// otherwise the decision carries the price to unlock.
    pub async fn check_access(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
        resource_kind: ResourceKind,
        policy: &PricingPolicy,
    ) -> Result<AccessDecision, AccessError> {
        if self.find_grant(user_id, resource_id).await?.is_some() {
            return Ok(AccessDecision::granted());
        }
        Ok(AccessDecision::priced(policy.price(resource_kind)))
    }

    /// Unlocks a one-shot resource, charging credits exactly once.
    ///
    /// Idempotent: a second purchase of the same (user, resource) pair
    /// returns the existing grant and charges nothing, whether the pair was
    /// found up front or the insert lost a race on the unique constraint.
    ///
    /// # Errors
    ///
    /// Propagates `InsufficientCredits` from the ledger debit; the tentative
    /// grant is deleted before the error is returned.
    pub async fn purchase(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
        resource_kind: ResourceKind,
        policy: &PricingPolicy,
    ) -> Result<grants::Model, AccessError> {
        if let Some(existing) = self.find_grant(user_id, resource_id).await? {
            return Ok(existing);
        }

        let price = policy.price(resource_kind);
        let grant_id = Uuid::new_v4();
        let now = Utc::now().into();

        let row = grants::ActiveModel {
            id: Set(grant_id),
            user_id: Set(user_id),
            resource_id: Set(resource_id),
            resource_kind: Set(resource_kind.into()),
            price_kind: Set(price.kind.into()),
            price: Set(price.amount),
            created_at: Set(now),
        };

        let rows = grants::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([grants::Column::UserId, grants::Column::ResourceId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;

        if rows == 0 {
            // Lost the insert race: someone else unlocked this pair between
            // our lookup and our insert. Their grant stands; nothing charged.
            return self
                .find_grant(user_id, resource_id)
                .await?
                .ok_or_else(|| {
                    AccessError::Database("grant vanished after conflicting insert".to_string())
                });
        }

        // Free resources carry no debit; the grant alone records the unlock.
        if price.amount > 0 {
            let debit = self
                .ledger
                .apply_delta(DeltaRequest {
                    user_id,
                    kind: price.kind,
                    delta: -price.amount,
                    reason: PricingPolicy::reason(resource_kind),
                    reference: Some(resource_id),
                    note: None,
                })
                .await;

            if let Err(err) = debit {
                self.compensate_grant(grant_id).await;
                return Err(err.into());
            }
        }

        info!(
            user_id = %user_id,
            resource_id = %resource_id,
            kind = %resource_kind,
            "resource unlocked"
        );

        Ok(grants::Model {
            id: grant_id,
            user_id,
            resource_id,
            resource_kind: resource_kind.into(),
            price_kind: price.kind.into(),
            price: price.amount,
            created_at: now,
        })
    }

    /// Deletes a tentative grant whose debit failed.
    ///
    /// Failure here leaves a grant without a debit. Log loudly with the
    /// grant id so an operator can remove it, rather than masking the
    /// original error.
    async fn compensate_grant(&self, grant_id: Uuid) {
        if let Err(err) = grants::Entity::delete_by_id(grant_id).exec(&self.db).await {
            warn!(grant_id = %grant_id, error = %err, "failed to compensate grant after debit failure");
        }
    }

    /// Debits metered video minutes. No grant involved: access to watch time
    /// is gated purely by the remaining balance.
    ///
    /// # Errors
    ///
    /// `AccessError::InvalidMinutes` for a non-positive request;
    /// `InsufficientCredits` when the remaining minutes cannot cover it.
    pub async fn consume_video_minutes(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        minutes: i64,
    ) -> Result<BalanceAmounts, AccessError> {
        PricingPolicy::validate_minutes(minutes)?;

        let balance = self
            .ledger
            .apply_delta(DeltaRequest {
                user_id,
                kind: CreditKind::VideoMinutes,
                delta: -minutes,
                reason: TransactionReason::ConsumeVideo,
                reference: Some(course_id),
                note: None,
            })
            .await?;

        Ok(balance)
    }
}
