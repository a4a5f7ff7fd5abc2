//! Group-registration member entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A member of a group registration. Belongs to exactly one unified
/// registration or one legacy group, never both.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning unified registration, if any.
    #[sea_orm(indexed, nullable)]
    pub registration_id: Option<String>,

    /// Owning legacy group, if any.
    #[sea_orm(indexed, nullable)]
    pub group_id: Option<String>,

    /// Member full name.
    pub name: String,

    /// Member email.
    pub email: String,

    /// Member college.
    pub college: String,

    /// Member phone.
    #[sea_orm(nullable)]
    pub phone: Option<String>,

    /// 1-based contiguous position within the group.
    pub member_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::registration::Entity",
        from = "Column::RegistrationId",
        to = "super::registration::Column::Id",
        on_delete = "Cascade"
    )]
    Registration,
    #[sea_orm(
        belongs_to = "super::legacy_group::Entity",
        from = "Column::GroupId",
        to = "super::legacy_group::Column::Id",
        on_delete = "Cascade"
    )]
    LegacyGroup,
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registration.def()
    }
}

impl Related<super::legacy_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LegacyGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
