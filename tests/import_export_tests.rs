use pretty_assertions::assert_eq;
use schedule_xer::{
    PersistenceError, Schedule, load_schedule_from_json, parse_file,
    persistence::file::ACTIVITY_CSV_COLUMNS, save_activities_to_csv, save_schedule_to_json,
    schedule_from_json_str, schedule_to_json_string, write_activities_csv,
};
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn sample_schedule() -> Schedule {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample.xer");
    parse_file(path).unwrap()
}

#[test]
fn json_round_trip_preserves_counts_and_statistics() {
    let schedule = sample_schedule();
    let file = NamedTempFile::new().unwrap();

    save_schedule_to_json(&schedule.view(), file.path()).unwrap();
    let loaded = load_schedule_from_json(file.path()).unwrap();

    assert_eq!(loaded.activities().len(), schedule.activities().len());
    assert_eq!(loaded.relationships().len(), schedule.relationships().len());
    assert_eq!(loaded.statistics(), schedule.statistics());
    assert_eq!(loaded, schedule);
}

#[test]
fn json_document_has_expected_shape() {
    let schedule = sample_schedule();
    let json = schedule_to_json_string(&schedule.view()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["project"]["proj_id"], "P1");
    assert_eq!(value["projects"].as_array().unwrap().len(), 2);
    assert_eq!(value["header"]["version"], "19.12");

    let first = &value["activities"][0];
    assert_eq!(first["task_id"], "T1");
    assert_eq!(first["duration_hr"], 40.0);
    assert_eq!(first["is_critical"], true);
    assert_eq!(first["is_complete"], true);

    let relationships = value["relationships"].as_array().unwrap();
    assert_eq!(relationships[1]["pred_type"], "PR_SS");
    assert_eq!(relationships[3]["pred_task_id"], "X99");

    assert_eq!(value["resources"][0]["rsrc_id"], "CREW-A");
}

#[test]
fn project_json_export_contains_only_that_project() {
    let schedule = sample_schedule();
    let json = schedule_to_json_string(&schedule.project_view(Some("P2"))).unwrap();
    let loaded = schedule_from_json_str(&json).unwrap();

    assert_eq!(loaded.projects().len(), 1);
    assert_eq!(loaded.projects()[0].proj_id, "P2");
    assert_eq!(loaded.activities().len(), 1);
    assert!(loaded.relationships().is_empty());
}

#[test]
fn dangling_relationship_round_trips_unchanged() {
    let schedule = sample_schedule();
    let json = schedule_to_json_string(&schedule.view()).unwrap();
    let loaded = schedule_from_json_str(&json).unwrap();

    let original = schedule.unresolved_relationships();
    let reloaded = loaded.unresolved_relationships();
    assert_eq!(reloaded, original);
    assert_eq!(reloaded[0].pred_proj_id.as_deref(), Some("P9"));
}

#[test]
fn export_does_not_mutate_model() {
    let schedule = sample_schedule();
    let before = schedule.clone();
    let mut sink: Vec<u8> = Vec::new();
    schedule_to_json_string(&schedule.view()).unwrap();
    write_activities_csv(schedule.activities(), &mut sink).unwrap();
    assert_eq!(schedule, before);
}

#[test]
fn csv_has_one_row_per_activity_in_declared_column_order() {
    let schedule = sample_schedule();
    let file = NamedTempFile::new().unwrap();
    save_activities_to_csv(schedule.activities(), file.path()).unwrap();

    let mut reader = csv::Reader::from_path(file.path()).unwrap();
    let headers: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(headers, ACTIVITY_CSV_COLUMNS.to_vec());

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 5);
    assert_eq!(&rows[0][0], "T1");
    assert_eq!(&rows[2][4], "TK_NotStart");
    assert_eq!(&rows[2][16], "CS_MSO");
    assert_eq!(&rows[1][11], "");
    assert_eq!(&rows[3][18], "true");
    assert_eq!(&rows[2][19], "false");
}

#[test]
fn csv_of_empty_selection_still_has_header() {
    let schedule = sample_schedule();
    let view = schedule.project_view(Some("UNKNOWN"));
    let mut buffer = Vec::new();
    write_activities_csv(view.activities().iter().copied(), &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(text.trim_end(), ACTIVITY_CSV_COLUMNS.join(","));
}

#[test]
fn projectless_activities_round_trip_through_json() {
    let schedule = schedule_xer::parse_str("%T\tTASK\n%F\ttask_id\n%R\tT1\n");
    let json = schedule_to_json_string(&schedule.view()).unwrap();
    let loaded = schedule_from_json_str(&json).unwrap();
    assert_eq!(loaded, schedule);
}

#[test]
fn json_load_rejects_garbage() {
    match schedule_from_json_str("{ not json") {
        Err(PersistenceError::Serialization(_)) => {}
        other => panic!("expected Serialization error, got {other:?}"),
    }
}
