//! Postgres enum mappings shared by the entities.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tabeeb_core::access::ResourceKind as DomainResourceKind;
use tabeeb_core::codes::CodeStatus as DomainCodeStatus;
use tabeeb_core::ledger::TransactionReason as DomainTransactionReason;
use tabeeb_shared::types::CreditKind as DomainCreditKind;

/// Credit kind column (`credit_kind` enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "credit_kind")]
#[serde(rename_all = "snake_case")]
pub enum CreditKind {
    /// General-purpose credits.
    #[sea_orm(string_value = "universal")]
    Universal,
    /// Metered video minutes.
    #[sea_orm(string_value = "video_minutes")]
    VideoMinutes,
    /// One-shot article credits.
    #[sea_orm(string_value = "article_credits")]
    ArticleCredits,
}

impl From<DomainCreditKind> for CreditKind {
    fn from(kind: DomainCreditKind) -> Self {
        match kind {
            DomainCreditKind::Universal => Self::Universal,
            DomainCreditKind::VideoMinutes => Self::VideoMinutes,
            DomainCreditKind::ArticleCredits => Self::ArticleCredits,
        }
    }
}

impl From<CreditKind> for DomainCreditKind {
    fn from(kind: CreditKind) -> Self {
        match kind {
            CreditKind::Universal => Self::Universal,
            CreditKind::VideoMinutes => Self::VideoMinutes,
            CreditKind::ArticleCredits => Self::ArticleCredits,
        }
    }
}

/// Redemption code status column (`code_status` enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "code_status")]
#[serde(rename_all = "snake_case")]
pub enum CodeStatus {
    /// Never redeemed.
    #[sea_orm(string_value = "unused")]
    Unused,
    /// Redeemed exactly once.
    #[sea_orm(string_value = "redeemed")]
    Redeemed,
    /// Expired administratively or past `expires_at`.
    #[sea_orm(string_value = "expired")]
    Expired,
    /// Withdrawn by an admin.
    #[sea_orm(string_value = "revoked")]
    Revoked,
}

impl From<DomainCodeStatus> for CodeStatus {
    fn from(status: DomainCodeStatus) -> Self {
        match status {
            DomainCodeStatus::Unused => Self::Unused,
            DomainCodeStatus::Redeemed => Self::Redeemed,
            DomainCodeStatus::Expired => Self::Expired,
            DomainCodeStatus::Revoked => Self::Revoked,
        }
    }
}

impl From<CodeStatus> for DomainCodeStatus {
    fn from(status: CodeStatus) -> Self {
        match status {
            CodeStatus::Unused => Self::Unused,
            CodeStatus::Redeemed => Self::Redeemed,
            CodeStatus::Expired => Self::Expired,
            CodeStatus::Revoked => Self::Revoked,
        }
    }
}

/// Transaction reason column (`transaction_reason` enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_reason")]
#[serde(rename_all = "snake_case")]
pub enum TransactionReason {
    /// Credit from a redeemed code.
    #[sea_orm(string_value = "redeem")]
    Redeem,
    /// Debit from video watching or a course unlock.
    #[sea_orm(string_value = "consume_video")]
    ConsumeVideo,
    /// Debit from an article unlock.
    #[sea_orm(string_value = "consume_article")]
    ConsumeArticle,
    /// Manual admin correction.
    #[sea_orm(string_value = "admin_adjustment")]
    AdminAdjustment,
}

impl From<DomainTransactionReason> for TransactionReason {
    fn from(reason: DomainTransactionReason) -> Self {
        match reason {
            DomainTransactionReason::Redeem => Self::Redeem,
            DomainTransactionReason::ConsumeVideo => Self::ConsumeVideo,
            DomainTransactionReason::ConsumeArticle => Self::ConsumeArticle,
            DomainTransactionReason::AdminAdjustment => Self::AdminAdjustment,
        }
    }
}

impl From<TransactionReason> for DomainTransactionReason {
    fn from(reason: TransactionReason) -> Self {
        match reason {
            TransactionReason::Redeem => Self::Redeem,
            TransactionReason::ConsumeVideo => Self::ConsumeVideo,
            TransactionReason::ConsumeArticle => Self::ConsumeArticle,
            TransactionReason::AdminAdjustment => Self::AdminAdjustment,
        }
    }
}

/// Resource kind column (`resource_kind` enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "resource_kind")]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A research article.
    #[sea_orm(string_value = "article")]
    Article,
    /// A video course.
    #[sea_orm(string_value = "course")]
    Course,
}

impl From<DomainResourceKind> for ResourceKind {
    fn from(kind: DomainResourceKind) -> Self {
        match kind {
            DomainResourceKind::Article => Self::Article,
            DomainResourceKind::Course => Self::Course,
        }
    }
}

impl From<ResourceKind> for DomainResourceKind {
    fn from(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Article => Self::Article,
            ResourceKind::Course => Self::Course,
        }
    }
}
