//! Notification audit-log entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Delivery outcome of one notification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum DeliveryStatus {
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// One row per notification attempt, written regardless of outcome.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "email_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Template key used for the send.
    pub template_key: String,

    /// Recipient address.
    pub recipient: String,

    /// Delivery outcome.
    pub status: DeliveryStatus,

    /// Provider error detail, if the send failed.
    #[sea_orm(column_type = "Text", nullable)]
    pub error: Option<String>,

    /// When the attempt was made.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
