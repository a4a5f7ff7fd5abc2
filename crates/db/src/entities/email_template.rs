//! Admin-editable email template entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Named email template with `{{variable}}` placeholders in subject and body.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "email_template")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Lookup key, e.g. `approval_tier`.
    #[sea_orm(unique)]
    pub key: String,

    /// Subject line template.
    pub subject: String,

    /// HTML body template.
    #[sea_orm(column_type = "Text")]
    pub html_body: String,

    /// When the template was last edited.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
