//! `SeaORM` Entity for the redemption_codes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tabeeb_shared::types::CreditPayload;

use super::sea_orm_active_enums::CodeStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "redemption_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The unique token users type in.
    #[sea_orm(unique)]
    pub code: String,
    /// Batch prefix, denormalized for admin filtering.
    pub prefix: String,
    /// Codes generated together share a batch id.
    pub batch_id: Uuid,
    pub universal_credits: i64,
    pub video_minutes: i64,
    pub article_credits: i64,
    pub status: CodeStatus,
    pub expires_at: Option<DateTimeWithTimeZone>,
    pub redeemed_by: Option<Uuid>,
    pub redeemed_at: Option<DateTimeWithTimeZone>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The credit payload this code carries.
    #[must_use]
    pub const fn payload(&self) -> CreditPayload {
        CreditPayload {
            universal_credits: self.universal_credits,
            video_minutes: self.video_minutes,
            article_credits: self.article_credits,
        }
    }
}
