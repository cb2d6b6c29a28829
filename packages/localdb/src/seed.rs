//! One-time fixture seeding for the incident dashboard.
//!
//! Populates a fresh store with realistic starter data so the dashboard is
//! not empty on first run. Gated by the `seeded` meta flag: once the flag
//! is set the loader never touches a table again, so anything a user
//! created or edited on top of the seed is preserved.
//!
//! There is no partial-seed recovery. If the process dies between the table
//! writes and the flag write, the next run reseeds in full; that is
//! acceptable because seeding always replaces whole tables.

use crate::store::LocalDb;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::info;

/// Meta flag marking a store as seeded.
pub const SEEDED_FLAG: &str = "seeded";

/// Table names the seeder owns.
pub mod tables {
    pub const INCIDENT: &str = "Incident";
    pub const KNOWLEDGE_BASE_ARTICLE: &str = "KnowledgeBaseArticle";
    pub const AUDIT_LOG: &str = "AuditLog";
    pub const DECISION: &str = "Decision";
    pub const PREDICTIVE_ALERT: &str = "PredictiveAlert";
    pub const POST_INCIDENT_REVIEW: &str = "PostIncidentReview";
    pub const INCIDENT_AUTOMATION: &str = "IncidentAutomation";
}

/// Seed the store with demo data unless that already happened.
pub fn ensure_seeded(db: &mut LocalDb) {
    ensure_seeded_at(db, Utc::now());
}

/// Seed with an explicit reference time. Every fixture timestamp is a fixed
/// offset from `now`, so the demo data always looks recent relative to when
/// seeding ran.
pub fn ensure_seeded_at(db: &mut LocalDb, now: DateTime<Utc>) {
    let seeded = db
        .get_meta(SEEDED_FLAG)
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if seeded {
        return;
    }

    info!("Seeding store with incident dashboard demo data");

    let iso = |t: DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Millis, true);
    let ago = |hours: i64| iso(now - Duration::hours(hours));
    let ahead = |hours: i64| iso(now + Duration::hours(hours));

    db.replace_table(
        tables::INCIDENT,
        vec![
            json!({
                "id": "inc_001",
                "created_date": ago(26),
                "title": "Customer Portal intermittent login failures",
                "description": "Users report intermittent login failures. Elevated 5xx at /auth/callback. Suspect token validation or upstream auth dependency.",
                "severity": "high",
                "status": "in_progress",
                "source": "Monitoring",
                "affected_systems": ["Identity Service", "Customer Portal"],
                "assigned_to": "SRE On-Call",
            }),
            json!({
                "id": "inc_002",
                "created_date": ago(52),
                "title": "Payments API latency spike",
                "description": "p95 latency jumped from 180ms to 1.9s. Timeout errors on checkout flow.",
                "severity": "medium",
                "status": "resolved",
                "source": "Synthetic",
                "affected_systems": ["Payments API", "Customer Portal"],
                "resolved_at": ago(44),
                "resolution_notes": "Rolled back config change and increased DB connection pool.",
                "assigned_to": "Payments Team",
            }),
            json!({
                "id": "inc_003",
                "created_date": ago(7),
                "title": "Data pipeline delayed for hourly aggregations",
                "description": "Hourly ETL jobs are delayed ~35 minutes; downstream dashboards stale.",
                "severity": "low",
                "status": "awaiting_approval",
                "source": "Batch Monitoring",
                "affected_systems": ["Data Pipeline"],
                "assigned_to": "Data Ops",
            }),
        ],
    );

    db.replace_table(
        tables::KNOWLEDGE_BASE_ARTICLE,
        vec![
            json!({
                "id": "kb_001",
                "created_date": ago(120),
                "title": "Runbook: Troubleshoot SSO callback failures",
                "summary": "Steps to diagnose auth callback 5xx, token validation errors, and certificate/clock skew issues.",
                "content": "## Checklist\n- Verify IdP status\n- Check token validation logs\n- Confirm certificate chain and time sync\n\n## Rollback\n- Revert recent auth config\n",
                "tags": ["auth", "sso", "identity"],
                "category": "runbook",
                "status": "published",
            }),
            json!({
                "id": "kb_002",
                "created_date": ago(200),
                "title": "Runbook: Payments API latency and DB saturation",
                "summary": "DB connection pool, slow queries, and cache strategies for checkout stability.",
                "content": "## Signals\n- Connection pool saturation\n- Query timeouts\n\n## Mitigations\n- Increase pool cautiously\n- Enable read replica\n",
                "tags": ["payments", "database", "latency"],
                "category": "runbook",
                "status": "published",
            }),
        ],
    );

    db.replace_table(
        tables::AUDIT_LOG,
        vec![
            json!({
                "id": "log_001",
                "created_date": ago(26),
                "updated_date": ago(26),
                "incident_id": "inc_001",
                "action_type": "incident_created",
                "actor": "demo.user@example.com",
                "details": { "severity": "high", "source": "Monitoring" },
            }),
            json!({
                "id": "log_002",
                "created_date": ago(52),
                "updated_date": ago(52),
                "incident_id": "inc_002",
                "action_type": "incident_created",
                "actor": "demo.user@example.com",
                "details": { "severity": "medium", "source": "Synthetic" },
            }),
        ],
    );

    db.replace_table(tables::DECISION, vec![]);

    db.replace_table(
        tables::PREDICTIVE_ALERT,
        vec![json!({
            "id": "pa_001",
            "created_date": ago(3),
            "updated_date": ago(3),
            "title": "Elevated risk detected: Identity Service",
            "system": "Identity Service",
            "likelihood": 0.78,
            "impact": "high",
            "recommended_action": "Validate token validation errors and recent auth configuration changes.",
            "status": "active",
            "predicted_window": format!("{} / {}", ahead(1), ahead(4)),
        })],
    );

    db.replace_table(tables::POST_INCIDENT_REVIEW, vec![]);
    db.replace_table(tables::INCIDENT_AUTOMATION, vec![]);

    db.set_meta(SEEDED_FLAG, json!(true));
}
