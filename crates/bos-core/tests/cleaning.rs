use std::fs;
use std::path::{Path, PathBuf};

use bos_core::{ActionLog, CleanStatus, PipelineConfig, Workspace};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    workspace: Workspace,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = PipelineConfig {
            staging_dir: dir.path().join("staging"),
            clean_dir: dir.path().join("clean"),
            reference_file: dir.path().join("reference/rooms.csv"),
            action_log_file: dir.path().join("log/action_log.json"),
        };
        let workspace = Workspace::new(config, ActionLog::in_memory());
        Self {
            _dir: dir,
            workspace,
        }
    }

    fn staging(&self) -> &Path {
        &self.workspace.config().staging_dir
    }

    fn clean_path(&self, name: &str) -> PathBuf {
        self.workspace.config().clean_dir.join(name)
    }

    fn stage(&self, name: &str, content: &str) {
        self.workspace
            .stage_bytes(name, content.as_bytes())
            .expect("stage file");
    }

    fn put_clean(&self, name: &str, content: &str) {
        fs::create_dir_all(&self.workspace.config().clean_dir).expect("clean dir");
        fs::write(self.clean_path(name), content).expect("write clean file");
    }

    fn put_reference(&self, content: &str) {
        let path = &self.workspace.config().reference_file;
        fs::create_dir_all(path.parent().expect("reference dir")).expect("reference dir");
        fs::write(path, content).expect("write reference");
    }

    fn read_clean(&self, name: &str) -> String {
        fs::read_to_string(self.clean_path(name)).expect("clean output")
    }
}

const WATER: &str = "timestamp,display name,water,floor\n\
2025-02-01T10:00:00Z,Sanitaires RDC - Compteur Volume d'Eau,12.5,RDC\n\
2025-02-01T10:45:00Z,Sanitaires RDC - Compteur Volume d'Eau,12.5,RDC\n";

const TEMPERATURE: &str = "timestamp,sensor id,temperature,room,floor,zone\n\
2025-03-01T00:00:00Z,urn:/OnDijon_Center_01/TS0001_AvgTemperature,\"21,5\",B101,RDC,Nord\n";

const ROOMS: &str = "Name;c1;c2;c3;c4;c5;c6;c7;Aliases;c9;c10;c11;c12;Designation\n\
B101;x;x;x;x;x;x;x;Salle Polyvalente;x;x;x;x;Salle polyvalente\n";

#[test]
fn water_export_is_cleaned_and_deduplicated() {
    let fx = Fixture::new();
    fx.stage("water_February 2025.csv", WATER);

    let outcome = fx.workspace.run_clean(false);

    assert_eq!(outcome.status, CleanStatus::Ok);
    assert_eq!(
        outcome.created.as_deref(),
        Some(&["water_02_25_clean.csv".to_string()][..])
    );
    assert_eq!(
        fx.read_clean("water_02_25_clean.csv"),
        "timestamp,display_name,water,floor\n2025-02-01T10:00:00Z,Sanitaires RDC,12.5,RDC\n"
    );
    assert!(outcome.log[0].ends_with(" - Clean succeeded: water_02_25_clean.csv"));
    assert!(outcome.log[1].ends_with(" - Imported/cleaned: water_02_25_clean.csv"));
}

#[test]
fn existing_target_blocks_the_batch_until_overwrite() {
    let fx = Fixture::new();
    fx.stage("temperature_RDC_March 2025.csv", TEMPERATURE);
    fx.put_clean("temperature_RDC_03_25_clean.csv", "stale\n");

    let refused = fx.workspace.run_clean(false);
    assert_eq!(refused.status, CleanStatus::AlreadyExist);
    assert_eq!(
        refused.already_exist.as_deref(),
        Some(&["temperature_RDC_03_25_clean.csv".to_string()][..])
    );
    assert!(refused.created.is_none());
    assert_eq!(fx.read_clean("temperature_RDC_03_25_clean.csv"), "stale\n");
    assert!(refused.log[0].ends_with(" - Collision on: temperature_RDC_03_25_clean.csv"));

    let replaced = fx.workspace.run_clean(true);
    assert_eq!(replaced.status, CleanStatus::Ok);
    assert!(fx
        .read_clean("temperature_RDC_03_25_clean.csv")
        .starts_with("timestamp,sensor_uid,temperature,isValidSensor,"));
    assert!(replaced.log[1].ends_with(" - Overwritten/cleaned: temperature_RDC_03_25_clean.csv"));
}

#[test]
fn collision_gate_is_all_or_nothing() {
    let fx = Fixture::new();
    fx.stage("temperature_RDC_March 2025.csv", TEMPERATURE);
    fx.stage("water_February 2025.csv", WATER);
    fx.put_clean("TEMPERATURE_rdc_03_25_CLEAN.csv", "stale\n");

    let outcome = fx.workspace.run_clean(false);

    assert_eq!(outcome.status, CleanStatus::AlreadyExist);
    assert!(!fx.clean_path("water_02_25_clean.csv").exists());
    assert_eq!(
        fx.workspace.list_clean().expect("list clean"),
        vec!["TEMPERATURE_rdc_03_25_CLEAN.csv"]
    );
}

#[test]
fn empty_or_unrecognised_staging_reports_no_file() {
    let fx = Fixture::new();
    let outcome = fx.workspace.run_clean(false);
    assert_eq!(outcome.status, CleanStatus::NoFile);
    assert!(outcome.log[0].ends_with(" - Nothing to transform."));

    fx.stage("readme.txt", "not sensor data");
    fx.stage("water_Feb_2025.csv", WATER);
    let outcome = fx.workspace.run_clean(true);
    assert_eq!(outcome.status, CleanStatus::NoFile);
    assert!(fx.workspace.list_clean().expect("list clean").is_empty());
}

#[test]
fn missing_directories_are_created() {
    let fx = Fixture::new();
    assert!(!fx.staging().exists());

    let outcome = fx.workspace.run_clean(false);

    assert_eq!(outcome.status, CleanStatus::NoFile);
    assert!(fx.staging().is_dir());
    assert!(fx.workspace.config().clean_dir.is_dir());
}

#[test]
fn one_failing_job_does_not_abort_the_batch() {
    let fx = Fixture::new();
    fx.stage("water_February 2025.csv", WATER);
    fx.stage(
        "energy_PowerMain_January 2025.csv",
        "timestamp,sensor id,room\n2025-01-01T00:00:00Z,x,B101\n",
    );

    let outcome = fx.workspace.run_clean(false);

    assert_eq!(outcome.status, CleanStatus::Ok);
    assert_eq!(
        outcome.created.as_deref(),
        Some(&["water_02_25_clean.csv".to_string()][..])
    );
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].target, "energy_PowerMain_01_25_clean.csv");
    assert!(!fx.clean_path("energy_PowerMain_01_25_clean.csv").exists());
    assert!(outcome
        .log
        .iter()
        .any(|entry| entry.contains("Error on energy_PowerMain_01_25_clean.csv:")));
}

#[test]
fn long_aliases_never_reach_clean_rows() {
    let fx = Fixture::new();
    fx.put_reference(ROOMS);
    fx.stage("temperature_RDC_March 2025.csv", TEMPERATURE);

    fx.workspace.run_clean(false);

    let output = fx.read_clean("temperature_RDC_03_25_clean.csv");
    let row = output.lines().nth(1).expect("data row");
    assert!(row.ends_with(",B101,RDC,Nord,,Salle polyvalente"), "{row}");
}

#[test]
fn overwrite_runs_are_idempotent() {
    let fx = Fixture::new();
    fx.put_reference(ROOMS);
    fx.stage("temperature_RDC_March 2025.csv", TEMPERATURE);
    fx.stage("water_February 2025.csv", WATER);

    fx.workspace.run_clean(true);
    let first = (
        fx.read_clean("temperature_RDC_03_25_clean.csv"),
        fx.read_clean("water_02_25_clean.csv"),
    );
    fx.workspace.run_clean(true);
    let second = (
        fx.read_clean("temperature_RDC_03_25_clean.csv"),
        fx.read_clean("water_02_25_clean.csv"),
    );

    assert_eq!(first, second);
}

#[test]
fn unrelated_clean_files_are_left_alone() {
    let fx = Fixture::new();
    fx.put_clean("occupancy_01_25_clean.csv", "keep me\n");
    fx.stage("water_February 2025.csv", WATER);

    let outcome = fx.workspace.run_clean(true);

    assert_eq!(outcome.status, CleanStatus::Ok);
    assert_eq!(fx.read_clean("occupancy_01_25_clean.csv"), "keep me\n");
}

#[test]
fn outcome_serializes_for_the_dashboard() {
    let fx = Fixture::new();
    fx.stage("water_February 2025.csv", WATER);
    fx.put_clean("water_02_25_clean.csv", "old\n");

    let outcome = fx.workspace.run_clean(false);
    let json = serde_json::to_value(&outcome).expect("json");

    assert_eq!(json["status"], "already-exist");
    assert_eq!(json["alreadyExist"][0], "water_02_25_clean.csv");
    assert!(json.get("created").is_none());
    assert!(json["log"].is_array());
}
