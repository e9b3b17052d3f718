//! Initial database migration.
//!
//! Creates the enums, tables, and constraints for the credit ledger:
//! balances, redemption codes, ledger transactions, grants, and the
//! externally-owned quiz_attempts table read by the license report.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: BALANCES & LEDGER
        // ============================================================
        db.execute_unprepared(BALANCES_SQL).await?;
        db.execute_unprepared(LEDGER_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 3: CODE REGISTRY
        // ============================================================
        db.execute_unprepared(REDEMPTION_CODES_SQL).await?;

        // ============================================================
        // PART 4: GRANTS
        // ============================================================
        db.execute_unprepared(GRANTS_SQL).await?;

        // ============================================================
        // PART 5: EXTERNAL QUIZ DATA (read-only here)
        // ============================================================
        db.execute_unprepared(QUIZ_ATTEMPTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Credit kinds: three independent balances
CREATE TYPE credit_kind AS ENUM (
    'universal',
    'video_minutes',
    'article_credits'
);

-- Redemption code lifecycle
CREATE TYPE code_status AS ENUM (
    'unused',
    'redeemed',
    'expired',
    'revoked'
);

-- Ledger transaction causes
CREATE TYPE transaction_reason AS ENUM (
    'redeem',
    'consume_video',
    'consume_article',
    'admin_adjustment'
);

-- One-shot resource kinds
CREATE TYPE resource_kind AS ENUM ('article', 'course');
";

const BALANCES_SQL: &str = r"
CREATE TABLE balances (
    user_id UUID PRIMARY KEY,
    universal_credits BIGINT NOT NULL DEFAULT 0 CHECK (universal_credits >= 0),
    video_minutes BIGINT NOT NULL DEFAULT 0 CHECK (video_minutes >= 0),
    article_credits BIGINT NOT NULL DEFAULT 0 CHECK (article_credits >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const LEDGER_TRANSACTIONS_SQL: &str = r"
CREATE TABLE ledger_transactions (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    kind credit_kind NOT NULL,
    delta BIGINT NOT NULL CHECK (delta <> 0),
    reason transaction_reason NOT NULL,
    reference UUID,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- History reads are always per-user, newest first
CREATE INDEX idx_ledger_transactions_user_created
    ON ledger_transactions (user_id, created_at DESC);

-- Reconciliation joins transactions back to their triggering code
CREATE INDEX idx_ledger_transactions_reference
    ON ledger_transactions (reference)
    WHERE reference IS NOT NULL;
";

const REDEMPTION_CODES_SQL: &str = r"
CREATE TABLE redemption_codes (
    id UUID PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    prefix TEXT NOT NULL,
    batch_id UUID NOT NULL,
    universal_credits BIGINT NOT NULL DEFAULT 0 CHECK (universal_credits >= 0),
    video_minutes BIGINT NOT NULL DEFAULT 0 CHECK (video_minutes >= 0),
    article_credits BIGINT NOT NULL DEFAULT 0 CHECK (article_credits >= 0),
    status code_status NOT NULL DEFAULT 'unused',
    expires_at TIMESTAMPTZ,
    redeemed_by UUID,
    redeemed_at TIMESTAMPTZ,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- A redeemed code always records who and when
    CHECK (status <> 'redeemed' OR (redeemed_by IS NOT NULL AND redeemed_at IS NOT NULL))
);

CREATE INDEX idx_redemption_codes_prefix ON redemption_codes (prefix);
CREATE INDEX idx_redemption_codes_batch ON redemption_codes (batch_id);
CREATE INDEX idx_redemption_codes_status_redeemed_at
    ON redemption_codes (status, redeemed_at DESC);
";

const GRANTS_SQL: &str = r"
CREATE TABLE grants (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    resource_id UUID NOT NULL,
    resource_kind resource_kind NOT NULL,
    price_kind credit_kind NOT NULL,
    price BIGINT NOT NULL CHECK (price >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- At most one grant per (user, resource); the insert-if-absent guard
    UNIQUE (user_id, resource_id)
);

CREATE INDEX idx_grants_user ON grants (user_id);
";

const QUIZ_ATTEMPTS_SQL: &str = r"
-- Owned by the course/quiz subsystem; created here so a standalone
-- deployment has the table the license report joins against.
CREATE TABLE IF NOT EXISTS quiz_attempts (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    course_id UUID NOT NULL,
    score INTEGER NOT NULL,
    passed BOOLEAN NOT NULL,
    attempted_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS idx_quiz_attempts_user_course
    ON quiz_attempts (user_id, course_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS quiz_attempts;
DROP TABLE IF EXISTS grants;
DROP TABLE IF EXISTS redemption_codes;
DROP TABLE IF EXISTS ledger_transactions;
DROP TABLE IF EXISTS balances;
DROP TYPE IF EXISTS resource_kind;
DROP TYPE IF EXISTS transaction_reason;
DROP TYPE IF EXISTS code_status;
DROP TYPE IF EXISTS credit_kind;
";
