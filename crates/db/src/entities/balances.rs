//! `SeaORM` Entity for the balances table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tabeeb_shared::types::BalanceAmounts;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "balances")]
pub struct Model {
    /// One balance row per user; the user id is the key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub universal_credits: i64,
    pub video_minutes: i64,
    pub article_credits: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ledger_transactions::Entity")]
    LedgerTransactions,
}

impl Related<super::ledger_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The plain amounts, without row metadata.
    #[must_use]
    pub const fn amounts(&self) -> BalanceAmounts {
        BalanceAmounts {
            universal_credits: self.universal_credits,
            video_minutes: self.video_minutes,
            article_credits: self.article_credits,
        }
    }
}
