use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use icdi_localdb::seed::{ensure_seeded_at, tables, SEEDED_FLAG};
use icdi_localdb::{FileBackend, LocalDb, Record};
use serde_json::json;
use std::collections::HashSet;
use tempfile::tempdir;

fn seed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 14, 9, 30, 0).unwrap()
}

fn iso(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn record<'a>(db: &'a LocalDb, table: &str, id: &str) -> &'a Record {
    db.table(table)
        .iter()
        .find(|r| r["id"] == id)
        .unwrap_or_else(|| panic!("no record {id} in {table}"))
}

#[test]
fn test_first_seed_table_cardinalities() {
    let mut db = LocalDb::ephemeral();
    ensure_seeded_at(&mut db, seed_time());

    assert_eq!(db.table(tables::INCIDENT).len(), 3);
    assert_eq!(db.table(tables::KNOWLEDGE_BASE_ARTICLE).len(), 2);
    assert_eq!(db.table(tables::AUDIT_LOG).len(), 2);
    assert_eq!(db.table(tables::PREDICTIVE_ALERT).len(), 1);
    assert_eq!(db.table(tables::DECISION).len(), 0);
    assert_eq!(db.table(tables::POST_INCIDENT_REVIEW).len(), 0);
    assert_eq!(db.table(tables::INCIDENT_AUTOMATION).len(), 0);

    // The empty tables exist in the dump; consumers see them as valid
    // empty arrays, not as missing tables.
    assert_eq!(db.dump().tables.len(), 7);
    assert!(db.dump().tables.contains_key(tables::DECISION));

    assert_eq!(db.get_meta(SEEDED_FLAG), Some(&json!(true)));
}

#[test]
fn test_seeded_records_have_unique_ids_and_timestamps() {
    let mut db = LocalDb::ephemeral();
    ensure_seeded_at(&mut db, seed_time());

    for (name, records) in &db.dump().tables {
        let mut ids = HashSet::new();
        for r in records {
            let id = r["id"].as_str().unwrap_or_else(|| panic!("{name}: missing id"));
            assert!(ids.insert(id), "{name}: duplicate id {id}");
            assert!(
                r["created_date"].is_string(),
                "{name}/{id}: missing created_date"
            );
        }
    }
}

#[test]
fn test_fixture_timestamps_are_offsets_from_seed_time() {
    let now = seed_time();
    let mut db = LocalDb::ephemeral();
    ensure_seeded_at(&mut db, now);

    let ago = |hours: i64| iso(now - Duration::hours(hours));

    assert_eq!(record(&db, tables::INCIDENT, "inc_001")["created_date"], ago(26));
    assert_eq!(record(&db, tables::INCIDENT, "inc_002")["created_date"], ago(52));
    assert_eq!(record(&db, tables::INCIDENT, "inc_002")["resolved_at"], ago(44));
    assert_eq!(record(&db, tables::INCIDENT, "inc_003")["created_date"], ago(7));

    assert_eq!(
        record(&db, tables::KNOWLEDGE_BASE_ARTICLE, "kb_001")["created_date"],
        ago(120)
    );
    assert_eq!(
        record(&db, tables::KNOWLEDGE_BASE_ARTICLE, "kb_002")["created_date"],
        ago(200)
    );

    assert_eq!(record(&db, tables::AUDIT_LOG, "log_001")["created_date"], ago(26));
    assert_eq!(record(&db, tables::AUDIT_LOG, "log_002")["created_date"], ago(52));

    let alert = record(&db, tables::PREDICTIVE_ALERT, "pa_001");
    assert_eq!(alert["created_date"], ago(3));
    assert_eq!(
        alert["predicted_window"],
        format!("{} / {}", iso(now + Duration::hours(1)), iso(now + Duration::hours(4)))
    );
}

#[test]
fn test_seeding_twice_is_a_noop() {
    let mut db = LocalDb::ephemeral();
    ensure_seeded_at(&mut db, seed_time());
    let first = db.dump().clone();

    // A later invocation, even with a different reference time, must not
    // touch a single record or timestamp.
    ensure_seeded_at(&mut db, seed_time() + Duration::hours(9));
    assert_eq!(db.dump(), &first);
}

#[test]
fn test_preset_flag_gates_seeding() {
    let mut db = LocalDb::ephemeral();
    db.set_meta(SEEDED_FLAG, json!(true));

    ensure_seeded_at(&mut db, seed_time());
    assert!(db.dump().tables.is_empty());
}

#[test]
fn test_ephemeral_runs_reseed_every_start() {
    // Two simulated process starts without a durable medium: each one
    // observes an unseeded store and seeds in full.
    for _ in 0..2 {
        let mut db = LocalDb::ephemeral();
        assert!(db.get_meta(SEEDED_FLAG).is_none());
        ensure_seeded_at(&mut db, seed_time());
        assert_eq!(db.table(tables::INCIDENT).len(), 3);
    }
}

#[test]
fn test_durable_store_seeds_once_across_restarts() {
    let dir = tempdir().unwrap();
    let first_seed = seed_time();

    let mut db = LocalDb::open(Box::new(FileBackend::in_dir(dir.path())));
    ensure_seeded_at(&mut db, first_seed);
    let before = db.dump().clone();
    drop(db);

    // Restart: the flag came back from disk, so seeding is skipped and the
    // original timestamps survive.
    let mut db = LocalDb::open(Box::new(FileBackend::in_dir(dir.path())));
    ensure_seeded_at(&mut db, first_seed + Duration::hours(48));
    assert_eq!(db.dump(), &before);
}

#[test]
fn test_user_data_survives_reseed_attempt() {
    let mut db = LocalDb::ephemeral();
    ensure_seeded_at(&mut db, seed_time());

    // User edits on top of the seed: a full table replacement, as the
    // business layer above this store would do.
    let mut incidents: Vec<Record> = db.table(tables::INCIDENT).to_vec();
    incidents.push(json!({ "id": "inc_900", "created_date": iso(seed_time()), "title": "User-created incident" }));
    db.replace_table(tables::INCIDENT, incidents);

    ensure_seeded_at(&mut db, seed_time() + Duration::hours(1));
    assert_eq!(db.table(tables::INCIDENT).len(), 4);
}
