//! Festival event catalog entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EventCategory {
    #[sea_orm(string_value = "technical")]
    Technical,
    #[sea_orm(string_value = "cultural")]
    Cultural,
    #[sea_orm(string_value = "sports")]
    Sports,
    #[sea_orm(string_value = "workshop")]
    Workshop,
}

/// Catalog event. Registrations snapshot `name` and `price` at write time, so
/// later edits here never alter past totals.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Event display name.
    pub name: String,

    /// Event category.
    pub category: EventCategory,

    /// Entry price in rupees.
    pub price: i32,

    /// Whether the event accepts registrations.
    #[sea_orm(default_value = true)]
    pub is_active: bool,

    /// Optional participant capacity.
    #[sea_orm(nullable)]
    pub capacity: Option<i32>,

    /// When the event was created.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
