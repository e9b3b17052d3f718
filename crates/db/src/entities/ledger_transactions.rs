//! `SeaORM` Entity for the ledger_transactions table.
//!
//! Rows are append-only: there is no update path anywhere in the codebase,
//! and corrections are written as new compensating rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tabeeb_core::ledger::TransactionRecord;

use super::sea_orm_active_enums::{CreditKind, TransactionReason};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: CreditKind,
    /// Signed amount; positive credits, negative debits. Never zero.
    pub delta: i64,
    pub reason: TransactionReason,
    /// The code or resource that caused this entry, if any.
    pub reference: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::balances::Entity",
        from = "Column::UserId",
        to = "super::balances::Column::UserId"
    )]
    Balances,
}

impl Related<super::balances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Balances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TransactionRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            kind: model.kind.into(),
            delta: model.delta,
            reason: model.reason.into(),
            reference: model.reference,
            note: model.note,
            created_at: model.created_at.into(),
        }
    }
}
