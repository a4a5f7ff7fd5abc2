//! Admin identity entity.
//!
//! An email present here is treated as an administrator after authenticating
//! with the external auth provider.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One admin email.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin_identity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Admin email address.
    #[sea_orm(unique)]
    pub email: String,

    /// Who added this admin.
    #[sea_orm(nullable)]
    pub added_by: Option<String>,

    /// When the admin was added.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
