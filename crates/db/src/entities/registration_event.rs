//! Registration line-item entity (selected events with price snapshots).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One selected event on a registration. Name and price are copied from the
/// catalog at write time (price-at-registration semantics).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registration_event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning registration.
    #[sea_orm(indexed)]
    pub registration_id: String,

    /// Catalog event id at selection time.
    pub event_id: String,

    /// Event name snapshot.
    pub event_name: String,

    /// Event price snapshot in rupees.
    pub price: i32,
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
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registration.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
