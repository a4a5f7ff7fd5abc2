//! Legacy group-registration entity.
//!
//! Historical shape from before the unified registration table. Read-mostly:
//! new writes go to `registration`, but duplicate checks and admin views must
//! still reconcile rows that only exist here.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::registration::RegistrationStatus;

/// Legacy group row, keyed by the group leader's contact details.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "legacy_group")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Group leader's email. Some historical rows left this empty and keyed
    /// by phone instead.
    #[sea_orm(indexed, nullable)]
    pub contact_email: Option<String>,

    /// Group leader's phone.
    #[sea_orm(indexed, nullable)]
    pub contact_phone: Option<String>,

    /// College of the group.
    #[sea_orm(nullable)]
    pub college: Option<String>,

    /// Review status, same enumeration as the unified table.
    pub status: RegistrationStatus,

    /// Total in rupees as recorded at the time.
    pub total_amount: i32,

    /// UPI transaction reference.
    #[sea_orm(indexed, nullable)]
    pub transaction_id: Option<String>,

    /// When the group registered.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::member::Entity")]
    Members,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
