//! Ledger repository: the only write path to balances.
//!
//! Every mutation is a single conditional UPDATE with a rows-affected check.
//! The non-negativity guard lives in the UPDATE's WHERE clause (and again in
//! a CHECK constraint), so two racing debits can never both pass against a
//! stale read: the second one simply matches zero rows.

use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use tabeeb_core::ledger::{
    DeltaRequest, LedgerError, LedgerService, TransactionReason, TransactionRecord,
};
use tabeeb_shared::types::{BalanceAmounts, CreditKind, CreditPayload, PageRequest, PageResponse};

use crate::entities::{balances, ledger_transactions, sea_orm_active_enums};

fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}

/// Ledger repository for balance and transaction operations.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the user's current balance, or the zero balance if the user
    /// has no row yet. Never creates a row.
    pub async fn get_balance(&self, user_id: Uuid) -> Result<BalanceAmounts, LedgerError> {
        let row = balances::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(row.map_or(BalanceAmounts::ZERO, |model| model.amounts()))
    }

    /// Applies a signed delta to one credit kind and appends the matching
    /// transaction, atomically.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InsufficientCredits` when the conditional update
    /// matches no row (the balance cannot cover the debit); no transaction is
    /// recorded in that case.
    pub async fn apply_delta(&self, request: DeltaRequest) -> Result<BalanceAmounts, LedgerError> {
        LedgerService::validate_delta(request.delta)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        Self::ensure_balance_row(&txn, request.user_id).await?;

        if !Self::try_apply(&txn, request.user_id, request.kind, request.delta).await? {
            // Matched no row: insufficient balance. Report against the
            // current value so the caller can show what is available.
            let available = Self::balance_in_txn(&txn, request.user_id)
                .await?
                .get(request.kind);
            txn.rollback().await.map_err(db_err)?;
            return Err(LedgerError::InsufficientCredits {
                kind: request.kind,
                available,
                requested: request.delta.unsigned_abs().try_into().unwrap_or(i64::MAX),
            });
        }

        Self::insert_transaction(&txn, &request).await?;

        let updated = Self::balance_in_txn(&txn, request.user_id).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(updated)
    }

    /// Credits a multi-kind payload inside an existing transaction, appending
    /// one ledger entry per non-zero component.
    ///
    /// Used by code redemption so the status flip, the credit, and the
    /// transaction rows commit or roll back together.
    pub async fn credit_payload_in_txn(
        txn: &DatabaseTransaction,
        user_id: Uuid,
        payload: CreditPayload,
        reference: Uuid,
    ) -> Result<(), LedgerError> {
        Self::ensure_balance_row(txn, user_id).await?;

        for (kind, amount) in payload.components() {
            if !Self::try_apply(txn, user_id, kind, amount).await? {
                // A positive credit can only fail on bigint overflow.
                return Err(LedgerError::Overflow(kind));
            }
            Self::insert_transaction(
                txn,
                &DeltaRequest {
                    user_id,
                    kind,
                    delta: amount,
                    reason: TransactionReason::Redeem,
                    reference: Some(reference),
                    note: None,
                },
            )
            .await?;
        }

        Ok(())
    }

    /// Reads a user's balance inside an existing transaction.
    pub async fn balance_in_txn(
        txn: &DatabaseTransaction,
        user_id: Uuid,
    ) -> Result<BalanceAmounts, LedgerError> {
        let row = balances::Entity::find_by_id(user_id)
            .one(txn)
            .await
            .map_err(db_err)?;

        Ok(row.map_or(BalanceAmounts::ZERO, |model| model.amounts()))
    }

    /// Returns a reverse-chronological page of the user's transactions.
    pub async fn get_history(
        &self,
        user_id: Uuid,
        page: PageRequest,
        kind: Option<CreditKind>,
    ) -> Result<PageResponse<TransactionRecord>, LedgerError> {
        let mut query =
            ledger_transactions::Entity::find().filter(ledger_transactions::Column::UserId.eq(user_id));

        if let Some(kind) = kind {
            let column: sea_orm_active_enums::CreditKind = kind.into();
            query = query.filter(ledger_transactions::Column::Kind.eq(column));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let rows = query
            .order_by_desc(ledger_transactions::Column::CreatedAt)
            .order_by_desc(ledger_transactions::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let records = rows.into_iter().map(TransactionRecord::from).collect();

        Ok(PageResponse::new(records, page.page, page.per_page, total))
    }

    /// Inserts the zero balance row if the user has none yet.
    async fn ensure_balance_row<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
    ) -> Result<(), LedgerError> {
        let now = Utc::now().into();
        let row = balances::ActiveModel {
            user_id: Set(user_id),
            universal_credits: Set(0),
            video_minutes: Set(0),
            article_credits: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        balances::Entity::insert(row)
            .on_conflict(
                OnConflict::column(balances::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    /// The conditional UPDATE at the heart of the ledger.
    ///
    /// Returns whether a row was updated. For debits the WHERE clause also
    /// requires the column to cover the amount, so a lost race or an empty
    /// balance both surface as `false` with nothing written.
    async fn try_apply<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        kind: CreditKind,
        delta: i64,
    ) -> Result<bool, LedgerError> {
        let column = Self::column_for(kind);

        let mut update = balances::Entity::update_many()
            .col_expr(column, Expr::col(column).add(delta))
            .col_expr(
                balances::Column::UpdatedAt,
                Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(Utc::now())),
            )
            .filter(balances::Column::UserId.eq(user_id));

        if delta < 0 {
            update = update.filter(column.gte(-delta));
        }

        let result = update.exec(conn).await.map_err(db_err)?;
        Ok(result.rows_affected == 1)
    }

    /// Appends one immutable ledger entry.
    async fn insert_transaction<C: ConnectionTrait>(
        conn: &C,
        request: &DeltaRequest,
    ) -> Result<(), LedgerError> {
        let entry = ledger_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(request.user_id),
            kind: Set(request.kind.into()),
            delta: Set(request.delta),
            reason: Set(request.reason.into()),
            reference: Set(request.reference),
            note: Set(request.note.clone()),
            created_at: Set(Utc::now().into()),
        };

        entry.insert(conn).await.map_err(db_err)?;
        Ok(())
    }

    const fn column_for(kind: CreditKind) -> balances::Column {
        match kind {
            CreditKind::Universal => balances::Column::UniversalCredits,
            CreditKind::VideoMinutes => balances::Column::VideoMinutes,
            CreditKind::ArticleCredits => balances::Column::ArticleCredits,
        }
    }
}
