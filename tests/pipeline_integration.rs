//! End-to-end pipeline tests against a synthetic survey tree.

use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::TempDir;
use trapseq::Error;
use trapseq::pipeline::{RunOptions, run_pipeline};

fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn write_survey_tree(root: &Path) {
    write_file(
        root,
        "SetA/Cam1/data.csv",
        "File,Folder,Date,Time,elkpresent,otherpresent,other,otherwhat,comment\n\
         IMG_0001.JPG,Cam1,1/12/2016,10:00:00,1,0,0,,\n\
         IMG_0002.JPG,Cam1,1/12/2016,10:00:05,1,0,0,,\n\
         IMG_0003.JPG,Cam1,1/12/2016,11:00:00,0,1,0,badger,\n",
    );
    write_file(root, "SetA/Cam1/IMG_0001.JPG", "jpg");
    write_file(root, "SetA/Cam1/IMG_0002.JPG", "jpg");
    write_file(root, "SetA/Cam1/IMG_0003.JPG", "jpg");

    // Two CSVs in one folder: the whole folder is unusable.
    write_file(root, "SetA/Cam2/first.csv", "File\n");
    write_file(root, "SetA/Cam2/second.csv", "File\n");

    // Blocklisted paths never count as survey CSVs.
    write_file(root, "Backups/SetA/data.csv", "File\n");
    write_file(root, "SetA/Metadata.csv", "File\n");
}

fn write_upstream(path: &Path) {
    let upstream = json!({
        "images": [
            {"id": "a", "file_name": "SetA/Cam1/IMG_0001.JPG", "seq_id": "x", "frame_num": 0}
        ],
        "annotations": [
            {"id": "ann0", "image_id": "a", "category_id": 1}
        ],
        "categories": [
            {"id": 0, "name": "empty"},
            {"id": 1, "name": "prong"},
            {"id": 2, "name": " Elk"}
        ]
    });
    fs::write(path, serde_json::to_string(&upstream).unwrap()).unwrap();
}

fn options(root: &Path, upstream: &Path, output_dir: &Path) -> RunOptions {
    RunOptions {
        root: root.to_path_buf(),
        upstream: upstream.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        output: None,
        columns: None,
        force_enumeration: false,
        jobs: 1,
        sanity_check_cmd: None,
        preview_cmd: None,
        preview_dir: None,
        image_base: None,
        progress: false,
    }
}

#[test]
fn test_full_run_writes_all_artifacts() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_survey_tree(root.path());
    let upstream_path = out.path().join("upstream.json");
    write_upstream(&upstream_path);

    let summary = run_pipeline(&options(root.path(), &upstream_path, out.path())).unwrap();

    assert_eq!(summary.csv_count, 1);
    assert_eq!(summary.ignored_csv_count, 2);
    assert_eq!(summary.image_count, 3);
    assert_eq!(summary.row_count, 3);
    assert_eq!(summary.sequence_count, 2);
    assert_eq!(summary.location_count, 1);

    assert!(out.path().join("all_files.json").is_file());

    let sequences: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out.path().join("sequences.json")).unwrap(),
    )
    .unwrap();
    let sequences = sequences.as_array().unwrap();
    assert_eq!(sequences.len(), 2);
    assert_eq!(
        sequences[0]["sequence_id"],
        "SetA_Cam1_seq_2016-01-12 10:00:00"
    );
    assert_eq!(sequences[0]["images"][1]["frame_number"], 1);
    assert_eq!(sequences[1]["species_present"][0], "badger");

    let release: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out.path().join("idaho_camera_traps.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(release["images"][0]["file_name"], "SetA/Cam1/IMG_0001.JPG");
    assert_eq!(release["categories"][1]["name"], "pronghorn");
    assert_eq!(release["categories"][2]["name"], "elk");
    assert_eq!(release["info"]["version"], "2021.07.19");
    assert_eq!(
        release["info"]["contributor"],
        "Images acquired by the Idaho Department of Fish and Game"
    );
}

#[test]
fn test_listing_cache_skips_new_files_until_forced() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_survey_tree(root.path());
    let upstream_path = out.path().join("upstream.json");
    write_upstream(&upstream_path);

    let first = run_pipeline(&options(root.path(), &upstream_path, out.path())).unwrap();
    assert_eq!(first.csv_count, 1);

    write_file(
        root.path(),
        "SetB/Cam9/data.csv",
        "File,Folder,Date,Time,otherpresent,other,otherwhat\n\
         IMG_0009.JPG,Cam9,1/12/2016,09:00:00,0,0,\n",
    );

    let cached = run_pipeline(&options(root.path(), &upstream_path, out.path())).unwrap();
    assert_eq!(cached.csv_count, 1);

    let mut forced = options(root.path(), &upstream_path, out.path());
    forced.force_enumeration = true;
    let rebuilt = run_pipeline(&forced).unwrap();
    assert_eq!(rebuilt.csv_count, 2);
    assert_eq!(rebuilt.location_count, 2);
}

#[test]
fn test_parallel_run_matches_sequential() {
    let root = TempDir::new().unwrap();
    let out_seq = TempDir::new().unwrap();
    let out_par = TempDir::new().unwrap();
    write_survey_tree(root.path());
    write_file(
        root.path(),
        "SetB/Cam9/data.csv",
        "File,Folder,Date,Time,deerpresent,otherpresent,other,otherwhat\n\
         IMG_0009.JPG,Cam9,1/12/2016,09:00:00,1,0,0,\n",
    );
    let upstream_path = out_seq.path().join("upstream.json");
    write_upstream(&upstream_path);

    run_pipeline(&options(root.path(), &upstream_path, out_seq.path())).unwrap();
    let mut parallel = options(root.path(), &upstream_path, out_par.path());
    parallel.jobs = 4;
    run_pipeline(&parallel).unwrap();

    let sequential = fs::read_to_string(out_seq.path().join("sequences.json")).unwrap();
    let parallel = fs::read_to_string(out_par.path().join("sequences.json")).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_tree_without_csvs_is_fatal() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_file(root.path(), "SetA/IMG_0001.JPG", "jpg");
    let upstream_path = out.path().join("upstream.json");
    write_upstream(&upstream_path);

    let result = run_pipeline(&options(root.path(), &upstream_path, out.path()));
    assert!(matches!(result, Err(Error::NoCsvFiles)));
}

#[test]
fn test_release_path_override() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_survey_tree(root.path());
    let upstream_path = out.path().join("upstream.json");
    write_upstream(&upstream_path);

    let mut opts = options(root.path(), &upstream_path, out.path());
    opts.output = Some(out.path().join("custom_release.json"));
    let summary = run_pipeline(&opts).unwrap();

    assert_eq!(summary.release_path, out.path().join("custom_release.json"));
    assert!(summary.release_path.is_file());
    assert!(!out.path().join("idaho_camera_traps.json").exists());
}
