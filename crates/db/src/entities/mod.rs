//! `SeaORM` entity definitions.

pub mod balances;
pub mod grants;
pub mod ledger_transactions;
pub mod quiz_attempts;
pub mod redemption_codes;
pub mod sea_orm_active_enums;
