//! Code registry repository: batch generation and redemption.
//!
//! Uniqueness and single-use are enforced by the storage layer: generation
//! inserts with `ON CONFLICT DO NOTHING` and regenerates on collision, and
//! redemption flips the status with a conditional UPDATE guarded on
//! `status = 'unused'`. Two requests racing to redeem one code cannot both
//! match that guard.

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use tabeeb_core::codes::{BatchRequest, CodeError, CodeStatus as DomainCodeStatus, generate_code, normalize_code};
use tabeeb_shared::config::CodesConfig;
use tabeeb_shared::types::{BalanceAmounts, PageRequest, PageResponse};

use crate::entities::{redemption_codes, sea_orm_active_enums::CodeStatus};
use crate::repositories::ledger::LedgerRepository;

fn db_err(err: DbErr) -> CodeError {
    CodeError::Database(err.to_string())
}

/// Filter options for listing codes.
#[derive(Debug, Clone, Default)]
pub struct CodeFilter {
    /// Filter by batch prefix.
    pub prefix: Option<String>,
    /// Filter by batch id.
    pub batch_id: Option<Uuid>,
    /// Filter by status.
    pub status: Option<CodeStatus>,
}

/// Result of a successful redemption.
#[derive(Debug, Clone)]
pub struct RedeemOutcome {
    /// The code, now in `redeemed` state.
    pub code: redemption_codes::Model,
    /// The user's balance after the credit.
    pub balance: BalanceAmounts,
}

/// Code repository for batch generation, redemption, and admin management.
#[derive(Debug, Clone)]
pub struct CodeRepository {
    db: DatabaseConnection,
}

impl CodeRepository {
    /// Creates a new code repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Generates a batch of unique codes carrying an identical payload.
    ///
    /// All codes insert in one database transaction: a batch either exists
    /// completely or not at all. Collisions with existing tokens are retried
    /// with fresh randomness up to `max_generation_attempts` per code before
    /// the whole batch fails.
    ///
    /// # Errors
    ///
    /// Returns validation errors from [`BatchRequest::validate`], or
    /// `CodeError::GenerationExhausted` when a token slot cannot be filled.
    pub async fn generate_batch(
        &self,
        request: &BatchRequest,
        config: &CodesConfig,
    ) -> Result<Vec<redemption_codes::Model>, CodeError> {
        request.validate(config.max_batch_size)?;

        let batch_id = Uuid::new_v4();
        let mut rng = StdRng::from_os_rng();
        let mut created = Vec::with_capacity(request.amount as usize);

        let txn = self.db.begin().await.map_err(db_err)?;

        for _ in 0..request.amount {
            let model =
                Self::insert_one_code(&txn, request, config, batch_id, &mut rng).await?;
            created.push(model);
        }

        txn.commit().await.map_err(db_err)?;

        info!(
            batch_id = %batch_id,
            prefix = %request.prefix,
            amount = request.amount,
            "generated code batch"
        );

        Ok(created)
    }

    /// Inserts a single code, regenerating the token on collision.
    async fn insert_one_code(
        txn: &DatabaseTransaction,
        request: &BatchRequest,
        config: &CodesConfig,
        batch_id: Uuid,
        rng: &mut StdRng,
    ) -> Result<redemption_codes::Model, CodeError> {
        for _ in 0..config.max_generation_attempts {
            let token = generate_code(rng, &request.prefix, config.suffix_length);
            let id = Uuid::new_v4();
            let now = Utc::now().into();

            let row = redemption_codes::ActiveModel {
                id: Set(id),
                code: Set(token.clone()),
                prefix: Set(request.prefix.clone()),
                batch_id: Set(batch_id),
                universal_credits: Set(request.payload.universal_credits),
                video_minutes: Set(request.payload.video_minutes),
                article_credits: Set(request.payload.article_credits),
                status: Set(CodeStatus::Unused),
                expires_at: Set(request.expires_at.map(Into::into)),
                redeemed_by: Set(None),
                redeemed_at: Set(None),
                created_by: Set(request.created_by),
                created_at: Set(now),
            };

            let rows = redemption_codes::Entity::insert(row)
                .on_conflict(
                    OnConflict::column(redemption_codes::Column::Code)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(txn)
                .await
                .map_err(db_err)?;

            if rows == 1 {
                return Ok(redemption_codes::Model {
                    id,
                    code: token,
                    prefix: request.prefix.clone(),
                    batch_id,
                    universal_credits: request.payload.universal_credits,
                    video_minutes: request.payload.video_minutes,
                    article_credits: request.payload.article_credits,
                    status: CodeStatus::Unused,
                    expires_at: request.expires_at.map(Into::into),
                    redeemed_by: None,
                    redeemed_at: None,
                    created_by: request.created_by,
                    created_at: now,
                });
            }
            // Token collided with an existing code; draw a fresh one.
        }

        Err(CodeError::GenerationExhausted {
            attempts: config.max_generation_attempts,
        })
    }

    /// Redeems a code for a user: flips the status, credits the payload, and
    /// appends the redeem transactions, all in one database transaction.
    ///
    /// # Errors
    ///
    /// `CodeError::NotFound` for an unknown token; `CodeError::AlreadyRedeemed`,
    /// `CodeError::Expired`, or `CodeError::Revoked` when the conditional flip
    /// matches no row (including a lost race).
    pub async fn redeem(&self, raw_code: &str, user_id: Uuid) -> Result<RedeemOutcome, CodeError> {
        let token = normalize_code(raw_code);

        let existing = redemption_codes::Entity::find()
            .filter(redemption_codes::Column::Code.eq(token.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(CodeError::NotFound)?;

        let now = Utc::now();
        let txn = self.db.begin().await.map_err(db_err)?;

        // The atomic guard: only an unused, unexpired code flips. A losing
        // racer matches zero rows here and is classified below.
        let flip = redemption_codes::Entity::update_many()
            .set(redemption_codes::ActiveModel {
                status: Set(CodeStatus::Redeemed),
                redeemed_by: Set(Some(user_id)),
                redeemed_at: Set(Some(now.into())),
                ..Default::default()
            })
            .filter(redemption_codes::Column::Id.eq(existing.id))
            .filter(redemption_codes::Column::Status.eq(CodeStatus::Unused))
            .filter(
                Condition::any()
                    .add(redemption_codes::Column::ExpiresAt.is_null())
                    .add(redemption_codes::Column::ExpiresAt.gt(now)),
            )
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if flip.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Err(self.classify_unredeemable(existing.id, now).await?);
        }

        LedgerRepository::credit_payload_in_txn(&txn, user_id, existing.payload(), existing.id)
            .await
            .map_err(|e| CodeError::Database(e.to_string()))?;

        let balance = LedgerRepository::balance_in_txn(&txn, user_id)
            .await
            .map_err(|e| CodeError::Database(e.to_string()))?;

        txn.commit().await.map_err(db_err)?;

        info!(code_id = %existing.id, user_id = %user_id, "code redeemed");

        Ok(RedeemOutcome {
            code: redemption_codes::Model {
                status: CodeStatus::Redeemed,
                redeemed_by: Some(user_id),
                redeemed_at: Some(now.into()),
                ..existing
            },
            balance,
        })
    }

    /// Re-reads a code whose flip matched no row and names the reason.
    async fn classify_unredeemable(
        &self,
        code_id: Uuid,
        now: chrono::DateTime<Utc>,
    ) -> Result<CodeError, CodeError> {
        let current = redemption_codes::Entity::find_by_id(code_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(CodeError::NotFound)?;

        let status: DomainCodeStatus = current.status.into();
        let expires_at = current.expires_at.map(Into::into);

        Ok(status
            .check_redeemable(expires_at, now)
            .err()
            // The flip can only miss for a reason; if the state looks clean
            // again the caller lost a race that has since been repaired.
            .unwrap_or(CodeError::AlreadyRedeemed))
    }

    /// Revokes an unused code. Redeemed codes cannot be revoked.
    ///
    /// # Errors
    ///
    /// `CodeError::NotFound` for an unknown id; the status-specific error
    /// when the code is not in `unused` state.
    pub async fn revoke(&self, code_id: Uuid) -> Result<redemption_codes::Model, CodeError> {
        let flip = redemption_codes::Entity::update_many()
            .set(redemption_codes::ActiveModel {
                status: Set(CodeStatus::Revoked),
                ..Default::default()
            })
            .filter(redemption_codes::Column::Id.eq(code_id))
            .filter(redemption_codes::Column::Status.eq(CodeStatus::Unused))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        let current = redemption_codes::Entity::find_by_id(code_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(CodeError::NotFound)?;

        if flip.rows_affected == 0 {
            let status: DomainCodeStatus = current.status.into();
            return match status {
                DomainCodeStatus::Redeemed => Err(CodeError::AlreadyRedeemed),
                DomainCodeStatus::Expired => Err(CodeError::Expired),
                DomainCodeStatus::Revoked => Err(CodeError::Revoked),
                DomainCodeStatus::Unused => Ok(current),
            };
        }

        info!(code_id = %code_id, "code revoked");
        Ok(current)
    }

    /// Lists codes for admins, newest first.
    pub async fn list_codes(
        &self,
        filter: &CodeFilter,
        page: PageRequest,
    ) -> Result<PageResponse<redemption_codes::Model>, CodeError> {
        let mut query = redemption_codes::Entity::find();

        if let Some(prefix) = &filter.prefix {
            query = query.filter(redemption_codes::Column::Prefix.eq(prefix.as_str()));
        }
        if let Some(batch_id) = filter.batch_id {
            query = query.filter(redemption_codes::Column::BatchId.eq(batch_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(redemption_codes::Column::Status.eq(status));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let rows = query
            .order_by_desc(redemption_codes::Column::CreatedAt)
            .order_by_desc(redemption_codes::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PageResponse::new(rows, page.page, page.per_page, total))
    }
}
