//! Report repository for admin reporting queries.
//!
//! Read-only projections: the license report (redeemed codes joined with the
//! redeeming user's grants and quiz outcomes) and the reconciliation report
//! (redeemed codes whose ledger credit is missing). Nothing here mutates.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, ExprTrait, Query as SeaQuery};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::warn;
use uuid::Uuid;

use tabeeb_core::report::{
    GrantSummary, LicenseReportFilter, LicenseReportRow, QuizOutcome, ReconciliationRow,
};
use tabeeb_shared::types::{PageRequest, PageResponse};

use crate::entities::{
    grants, ledger_transactions, quiz_attempts, redemption_codes,
    sea_orm_active_enums::{CodeStatus, ResourceKind},
};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Range start.
        start: DateTime<Utc>,
        /// Range end.
        end: DateTime<Utc>,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Report repository for admin read-only projections.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the license report: one row per redeemed code, newest first.
    ///
    /// Quiz outcomes come from the externally-owned quiz data; a failed quiz
    /// lookup degrades the affected row instead of failing the page.
    pub async fn license_report(
        &self,
        filter: &LicenseReportFilter,
        page: PageRequest,
    ) -> Result<PageResponse<LicenseReportRow>, ReportError> {
        if let (Some(from), Some(to)) = (filter.redeemed_from, filter.redeemed_to)
            && from > to
        {
            return Err(ReportError::InvalidDateRange {
                start: from,
                end: to,
            });
        }

        let mut query = redemption_codes::Entity::find()
            .filter(redemption_codes::Column::Status.eq(CodeStatus::Redeemed));

        if let Some(prefix) = &filter.prefix {
            query = query.filter(redemption_codes::Column::Prefix.eq(prefix.as_str()));
        }
        if let Some(from) = filter.redeemed_from {
            query = query.filter(redemption_codes::Column::RedeemedAt.gte(from));
        }
        if let Some(to) = filter.redeemed_to {
            query = query.filter(redemption_codes::Column::RedeemedAt.lt(to));
        }

        let total = query.clone().count(&self.db).await?;

        let codes = query
            .order_by_desc(redemption_codes::Column::RedeemedAt)
            .order_by_desc(redemption_codes::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let mut rows = Vec::with_capacity(codes.len());
        for code in codes {
            rows.push(self.build_row(code).await?);
        }

        Ok(PageResponse::new(rows, page.page, page.per_page, total))
    }

    /// Assembles one report row; quiz failures degrade, they do not abort.
    async fn build_row(
        &self,
        code: redemption_codes::Model,
    ) -> Result<LicenseReportRow, ReportError> {
        // The status filter guarantees these are present for redeemed codes.
        let redeemed_by = code.redeemed_by.unwrap_or_default();
        let redeemed_at = code
            .redeemed_at
            .map(Into::into)
            .unwrap_or_else(Utc::now);

        let grant_rows = grants::Entity::find()
            .filter(grants::Column::UserId.eq(redeemed_by))
            .order_by_desc(grants::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let course_ids: Vec<Uuid> = grant_rows
            .iter()
            .filter(|g| g.resource_kind == ResourceKind::Course)
            .map(|g| g.resource_id)
            .collect();

        let (quiz_outcomes, degraded) = if course_ids.is_empty() {
            (Vec::new(), false)
        } else {
            match self.quiz_outcomes(redeemed_by, &course_ids).await {
                Ok(outcomes) => (outcomes, false),
                Err(err) => {
                    warn!(
                        code_id = %code.id,
                        user_id = %redeemed_by,
                        error = %err,
                        "quiz lookup failed, serving degraded report row"
                    );
                    (Vec::new(), true)
                }
            }
        };

        let grants = grant_rows
            .into_iter()
            .map(|g| GrantSummary {
                id: g.id,
                resource_id: g.resource_id,
                resource_kind: g.resource_kind.into(),
                created_at: g.created_at.into(),
            })
            .collect();

        Ok(LicenseReportRow {
            code_id: code.id,
            code: code.code,
            prefix: code.prefix,
            payload: tabeeb_shared::types::CreditPayload {
                universal_credits: code.universal_credits,
                video_minutes: code.video_minutes,
                article_credits: code.article_credits,
            },
            redeemed_by,
            redeemed_at,
            grants,
            quiz_outcomes,
            degraded,
        })
    }

    /// Aggregates quiz attempts per course: best score, pass flag, attempt count.
    async fn quiz_outcomes(
        &self,
        user_id: Uuid,
        course_ids: &[Uuid],
    ) -> Result<Vec<QuizOutcome>, DbErr> {
        let attempts = quiz_attempts::Entity::find()
            .filter(quiz_attempts::Column::UserId.eq(user_id))
            .filter(quiz_attempts::Column::CourseId.is_in(course_ids.iter().copied()))
            .all(&self.db)
            .await?;

        let mut outcomes: Vec<QuizOutcome> = Vec::new();
        for attempt in attempts {
            match outcomes
                .iter_mut()
                .find(|o| o.course_id == attempt.course_id)
            {
                Some(outcome) => {
                    outcome.best_score = outcome.best_score.max(attempt.score);
                    outcome.passed = outcome.passed || attempt.passed;
                    outcome.attempts += 1;
                }
                None => outcomes.push(QuizOutcome {
                    course_id: attempt.course_id,
                    best_score: attempt.score,
                    passed: attempt.passed,
                    attempts: 1,
                }),
            }
        }

        Ok(outcomes)
    }

    /// Lists redeemed codes with no ledger transaction referencing them.
    ///
    /// A code in this state means a redeem request died between the status
    /// flip and the credit commit; the row is surfaced for a human to repair
    /// with an admin adjustment.
    pub async fn reconciliation(
        &self,
        page: PageRequest,
    ) -> Result<PageResponse<ReconciliationRow>, ReportError> {
        // References on transactions are code ids for redeems and resource
        // ids for consumes; a resource id can never equal a code id, so any
        // reference hit means the credit was written.
        let referenced = SeaQuery::select()
            .column(ledger_transactions::Column::Reference)
            .from(ledger_transactions::Entity)
            .and_where(Expr::col(ledger_transactions::Column::Reference).is_not_null())
            .to_owned();

        let query = redemption_codes::Entity::find()
            .filter(redemption_codes::Column::Status.eq(CodeStatus::Redeemed))
            .filter(redemption_codes::Column::Id.not_in_subquery(referenced));

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(redemption_codes::Column::RedeemedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?
            .into_iter()
            .map(|code| ReconciliationRow {
                code_id: code.id,
                code: code.code,
                redeemed_by: code.redeemed_by,
                redeemed_at: code.redeemed_at.map(Into::into),
                payload: tabeeb_shared::types::CreditPayload {
                    universal_credits: code.universal_credits,
                    video_minutes: code.video_minutes,
                    article_credits: code.article_credits,
                },
            })
            .collect();

        Ok(PageResponse::new(rows, page.page, page.per_page, total))
    }
}
