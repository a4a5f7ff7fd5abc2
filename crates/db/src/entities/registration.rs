//! Unified registration entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Review status of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum RegistrationStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Fixed delegate tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum Tier {
    #[sea_orm(string_value = "tier1")]
    Tier1,
    #[sea_orm(string_value = "tier2")]
    Tier2,
    #[sea_orm(string_value = "tier3")]
    Tier3,
}

/// Pass kinds, mutually exclusive with a tier selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PassType {
    /// Requires a sub-tier; priced by (pass, sub-tier) compound lookup.
    #[sea_orm(string_value = "nexus_forum")]
    NexusForum,
    #[sea_orm(string_value = "pro_nite")]
    ProNite,
    #[sea_orm(string_value = "esports")]
    Esports,
}

/// Sub-tier for passes that require one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum PassTier {
    #[sea_orm(string_value = "tier1")]
    Tier1,
    #[sea_orm(string_value = "tier2")]
    Tier2,
    #[sea_orm(string_value = "tier3")]
    Tier3,
}

/// Unified registration row.
///
/// Created once with status pending; only the review fields mutate afterwards.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registration")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Participant full name.
    pub name: String,

    /// Contact email; at most one non-rejected row per email.
    #[sea_orm(indexed)]
    pub email: String,

    /// Contact phone; at most one non-rejected row per phone.
    #[sea_orm(indexed)]
    pub phone: String,

    /// College the participant attends.
    pub college: String,

    /// Year of study.
    #[sea_orm(nullable)]
    pub year: Option<String>,

    /// Branch of study.
    #[sea_orm(nullable)]
    pub branch: Option<String>,

    /// Chosen tier; mutually exclusive with `pass_type`.
    #[sea_orm(nullable)]
    pub tier: Option<Tier>,

    /// Chosen pass; mutually exclusive with `tier`.
    #[sea_orm(nullable)]
    pub pass_type: Option<PassType>,

    /// Sub-tier, present iff `pass_type` requires one.
    #[sea_orm(nullable)]
    pub pass_tier: Option<PassTier>,

    /// Total in rupees, recomputed server-side at write time.
    pub total_amount: i32,

    /// User-supplied UPI transaction reference (8-50 chars).
    #[sea_orm(indexed)]
    pub transaction_id: String,

    /// Storage key of the payment screenshot.
    pub screenshot_key: String,

    /// Current review status.
    pub status: RegistrationStatus,

    /// Admin who reviewed the registration.
    #[sea_orm(nullable)]
    pub reviewed_by: Option<String>,

    /// When the registration was reviewed.
    #[sea_orm(nullable)]
    pub reviewed_at: Option<DateTimeWithTimeZone>,

    /// Reason, set iff status is rejected.
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,

    /// When the registration was submitted.
    pub created_at: DateTimeWithTimeZone,

    /// When the registration was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::registration_event::Entity")]
    Events,
    #[sea_orm(has_many = "super::member::Entity")]
    Members,
}

impl Related<super::registration_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
