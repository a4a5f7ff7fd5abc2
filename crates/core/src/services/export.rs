//! CSV export builder.
//!
//! Flattens registrations, members and event line items into one row per
//! registration. Output is deterministic: the same rows in the same order
//! always produce byte-identical text, so exports can be snapshot-tested.

use std::collections::HashMap;

use festa_common::AppResult;
use festa_db::entities::registration::{PassTier, PassType, RegistrationStatus, Tier};
use festa_db::repositories::{LegacyGroupRepository, MemberRepository, RegistrationRepository};

/// Fixed column order of the export.
pub const EXPORT_COLUMNS: [&str; 19] = [
    "source",
    "id",
    "name",
    "email",
    "phone",
    "college",
    "year",
    "branch",
    "tier",
    "pass_type",
    "pass_tier",
    "events",
    "members",
    "total_amount",
    "transaction_id",
    "status",
    "reviewed_by",
    "rejection_reason",
    "created_at",
];

/// One flattened export row. `None` renders as an empty cell.
#[derive(Debug, Clone, Default)]
pub struct ExportRow {
    pub source: String,
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub year: Option<String>,
    pub branch: Option<String>,
    pub tier: Option<String>,
    pub pass_type: Option<String>,
    pub pass_tier: Option<String>,
    pub events: Option<String>,
    pub members: Option<String>,
    pub total_amount: i32,
    pub transaction_id: Option<String>,
    pub status: String,
    pub reviewed_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: String,
}

fn csv_cell(value: Option<&str>) -> String {
    value.map_or_else(String::new, |v| {
        format!("\"{}\"", v.replace('"', "\"\""))
    })
}

/// Render rows as CSV text with the fixed column order.
#[must_use]
pub fn build_csv(rows: &[ExportRow]) -> String {
    let mut out = EXPORT_COLUMNS.join(",");
    out.push('\n');

    for row in rows {
        let cells = [
            csv_cell(Some(&row.source)),
            csv_cell(Some(&row.id)),
            csv_cell(row.name.as_deref()),
            csv_cell(row.email.as_deref()),
            csv_cell(row.phone.as_deref()),
            csv_cell(row.college.as_deref()),
            csv_cell(row.year.as_deref()),
            csv_cell(row.branch.as_deref()),
            csv_cell(row.tier.as_deref()),
            csv_cell(row.pass_type.as_deref()),
            csv_cell(row.pass_tier.as_deref()),
            csv_cell(row.events.as_deref()),
            csv_cell(row.members.as_deref()),
            csv_cell(Some(&row.total_amount.to_string())),
            csv_cell(row.transaction_id.as_deref()),
            csv_cell(Some(&row.status)),
            csv_cell(row.reviewed_by.as_deref()),
            csv_cell(row.rejection_reason.as_deref()),
            csv_cell(Some(&row.created_at)),
        ];
        out.push_str(&cells.join(","));
        out.push('\n');
    }

    out
}

const fn status_label(status: RegistrationStatus) -> &'static str {
    match status {
        RegistrationStatus::Pending => "pending",
        RegistrationStatus::Approved => "approved",
        RegistrationStatus::Rejected => "rejected",
    }
}

const fn tier_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Tier1 => "tier1",
        Tier::Tier2 => "tier2",
        Tier::Tier3 => "tier3",
    }
}

const fn pass_type_label(pass_type: PassType) -> &'static str {
    match pass_type {
        PassType::NexusForum => "nexus_forum",
        PassType::ProNite => "pro_nite",
        PassType::Esports => "esports",
    }
}

const fn pass_tier_label(pass_tier: PassTier) -> &'static str {
    match pass_tier {
        PassTier::Tier1 => "tier1",
        PassTier::Tier2 => "tier2",
        PassTier::Tier3 => "tier3",
    }
}

/// Export service over both data shapes.
#[derive(Clone)]
pub struct ExportService {
    registrations: RegistrationRepository,
    members: MemberRepository,
    legacy_groups: LegacyGroupRepository,
}

impl ExportService {
    /// Create a new export service.
    #[must_use]
    pub const fn new(
        registrations: RegistrationRepository,
        members: MemberRepository,
        legacy_groups: LegacyGroupRepository,
    ) -> Self {
        Self {
            registrations,
            members,
            legacy_groups,
        }
    }

    /// Export every registration, unified rows first then legacy groups,
    /// each oldest-first.
    pub async fn export_all(&self) -> AppResult<String> {
        let registrations = self.registrations.list_all().await?;
        let line_items = self.registrations.all_line_items().await?;
        let members = self.members.list_all().await?;
        let legacy_groups = self.legacy_groups.list_all().await?;

        let mut events_by_registration: HashMap<&str, Vec<String>> = HashMap::new();
        for item in &line_items {
            events_by_registration
                .entry(item.registration_id.as_str())
                .or_default()
                .push(format!("{} ({})", item.event_name, item.price));
        }

        let mut members_by_registration: HashMap<&str, Vec<String>> = HashMap::new();
        let mut members_by_group: HashMap<&str, Vec<String>> = HashMap::new();
        for m in &members {
            let rendered = format!("{} <{}>", m.name, m.email);
            if let Some(registration_id) = &m.registration_id {
                members_by_registration
                    .entry(registration_id.as_str())
                    .or_default()
                    .push(rendered);
            } else if let Some(group_id) = &m.group_id {
                members_by_group
                    .entry(group_id.as_str())
                    .or_default()
                    .push(rendered);
            }
        }

        let mut rows = Vec::with_capacity(registrations.len() + legacy_groups.len());

        for r in registrations {
            rows.push(ExportRow {
                source: "unified".to_string(),
                id: r.id.clone(),
                name: Some(r.name),
                email: Some(r.email),
                phone: Some(r.phone),
                college: Some(r.college),
                year: r.year,
                branch: r.branch,
                tier: r.tier.map(|t| tier_label(t).to_string()),
                pass_type: r.pass_type.map(|p| pass_type_label(p).to_string()),
                pass_tier: r.pass_tier.map(|p| pass_tier_label(p).to_string()),
                events: events_by_registration
                    .get(r.id.as_str())
                    .map(|e| e.join("; ")),
                members: members_by_registration
                    .get(r.id.as_str())
                    .map(|m| m.join("; ")),
                total_amount: r.total_amount,
                transaction_id: Some(r.transaction_id),
                status: status_label(r.status).to_string(),
                reviewed_by: r.reviewed_by,
                rejection_reason: r.rejection_reason,
                created_at: r.created_at.to_rfc3339(),
            });
        }

        for g in legacy_groups {
            rows.push(ExportRow {
                source: "legacy".to_string(),
                id: g.id.clone(),
                name: None,
                email: g.contact_email,
                phone: g.contact_phone,
                college: g.college,
                members: members_by_group.get(g.id.as_str()).map(|m| m.join("; ")),
                total_amount: g.total_amount,
                transaction_id: g.transaction_id,
                status: status_label(g.status).to_string(),
                created_at: g.created_at.to_rfc3339(),
                ..Default::default()
            });
        }

        Ok(build_csv(&rows))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use festa_db::entities::{legacy_group, member, registration, registration_event};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn sample_row() -> ExportRow {
        ExportRow {
            source: "unified".to_string(),
            id: "reg1".to_string(),
            name: Some("Priya".to_string()),
            email: Some("priya@x.edu".to_string()),
            total_amount: 800,
            status: "pending".to_string(),
            created_at: "2026-02-14T10:00:00+00:00".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_csv_is_deterministic() {
        let rows = vec![sample_row(), sample_row()];
        let first = build_csv(&rows);
        let second = build_csv(&rows);
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_csv_doubles_embedded_quotes() {
        let mut row = sample_row();
        row.name = Some("Priya \"PJ\" Sharma".to_string());
        let csv = build_csv(&[row]);
        assert!(csv.contains("\"Priya \"\"PJ\"\" Sharma\""));
    }

    #[test]
    fn test_build_csv_renders_null_as_empty_cell() {
        let csv = build_csv(&[sample_row()]);
        let data_line = csv.lines().nth(1).unwrap();
        // phone and college are unset: consecutive empty cells.
        assert!(data_line.contains(",,"));
    }

    #[test]
    fn test_header_matches_column_order() {
        let csv = build_csv(&[]);
        assert_eq!(csv, format!("{}\n", EXPORT_COLUMNS.join(",")));
    }

    #[tokio::test]
    async fn test_export_all_flattens_both_shapes() {
        let created_at = Utc::now();
        let registration = registration::Model {
            id: "reg1".to_string(),
            name: "Priya".to_string(),
            email: "priya@x.edu".to_string(),
            phone: "9876543210".to_string(),
            college: "X College".to_string(),
            year: None,
            branch: None,
            tier: Some(festa_db::entities::registration::Tier::Tier2),
            pass_type: None,
            pass_tier: None,
            total_amount: 800,
            transaction_id: "TXN12345678".to_string(),
            screenshot_key: "payments/k".to_string(),
            status: RegistrationStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
            created_at: created_at.into(),
            updated_at: None,
        };
        let item = registration_event::Model {
            id: "li1".to_string(),
            registration_id: "reg1".to_string(),
            event_id: "ev1".to_string(),
            event_name: "Robo Race".to_string(),
            price: 150,
        };
        let group_member = member::Model {
            id: "m1".to_string(),
            registration_id: None,
            group_id: Some("grp1".to_string()),
            name: "Rahul".to_string(),
            email: "rahul@x.edu".to_string(),
            college: "X College".to_string(),
            phone: None,
            member_order: 1,
        };
        let group = legacy_group::Model {
            id: "grp1".to_string(),
            contact_email: Some("lead@x.edu".to_string()),
            contact_phone: None,
            college: None,
            status: RegistrationStatus::Approved,
            total_amount: 1200,
            transaction_id: None,
            created_at: created_at.into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[registration]])
                .append_query_results([[item]])
                .append_query_results([[group_member]])
                .append_query_results([[group]])
                .into_connection(),
        );

        let service = ExportService::new(
            RegistrationRepository::new(db.clone()),
            MemberRepository::new(db.clone()),
            LegacyGroupRepository::new(db),
        );

        let csv = service.export_all().await.unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("\"unified\",\"reg1\""));
        assert!(lines[1].contains("\"Robo Race (150)\""));
        assert!(lines[2].starts_with("\"legacy\",\"grp1\""));
        assert!(lines[2].contains("\"Rahul <rahul@x.edu>\""));
    }
}
