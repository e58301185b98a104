use assert_cmd::Command;
use predicates::prelude::*;
use std::env;
use std::fs;
use std::path::PathBuf;

const SAMPLE_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Placemark>
      <name>LD Trnovo</name>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>
              14.40,46.00,0 14.60,46.00,0 14.60,46.20,0 14.40,46.00,0
            </coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
  </Document>
</kml>
"#;

fn convert() -> Command {
    Command::cargo_bin("rog-kml-convert").expect("binary builds")
}

/// Fresh per-test directory pair under the system temp dir.
fn setup_dirs(name: &str) -> (PathBuf, PathBuf) {
    let root = env::temp_dir().join(format!("{name}_rog_kml_convert"));
    fs::remove_dir_all(&root).ok();
    let input = root.join("in");
    let output = root.join("out");
    fs::create_dir_all(&input).expect("create input dir");
    (input, output)
}

#[test]
fn missing_arguments_exit_with_code_1() {
    convert().assert().failure().code(1);
}

#[test]
fn converts_a_tree_and_writes_a_sorted_manifest() {
    let (input, output) = setup_dirs("tree");
    let region = input.join("Notranjska");
    fs::create_dir_all(&region).expect("create region dir");
    fs::write(region.join("LD Trnovo.kml"), SAMPLE_KML).expect("write kml");
    fs::write(region.join("LD Čolnik.kml"), SAMPLE_KML).expect("write kml");

    convert()
        .arg(&input)
        .arg(&output)
        .assert()
        .success();

    let manifest = fs::read_to_string(output.join("manifest.json")).expect("manifest exists");
    let entries: Vec<serde_json::Value> = serde_json::from_str(&manifest).expect("valid json");
    assert_eq!(entries.len(), 2);
    // sorted by region/slug
    assert_eq!(entries[0]["slug"], "ld_colnik");
    assert_eq!(entries[1]["slug"], "ld_trnovo");
    assert_eq!(entries[0]["region"], "Notranjska");
    assert_eq!(
        entries[1]["geojsonUrl"],
        "/boundaries/Notranjska/ld_trnovo.geojson"
    );

    let geojson = fs::read_to_string(output.join("Notranjska").join("ld_trnovo.geojson"))
        .expect("geojson exists");
    let doc: serde_json::Value = serde_json::from_str(&geojson).expect("valid geojson");
    assert_eq!(doc["type"], "FeatureCollection");
    assert!(!doc["features"].as_array().unwrap().is_empty());
}

#[test]
fn same_file_name_in_two_regions_keeps_both_outputs() {
    let (input, output) = setup_dirs("mirror");
    for region in ["Primorska", "Gorenjska"] {
        let dir = input.join(region);
        fs::create_dir_all(&dir).expect("create region dir");
        fs::write(dir.join("LD Zarja.kml"), SAMPLE_KML).expect("write kml");
    }

    convert()
        .arg(&input)
        .arg(&output)
        .assert()
        .success();

    assert!(output.join("Primorska").join("ld_zarja.geojson").exists());
    assert!(output.join("Gorenjska").join("ld_zarja.geojson").exists());

    let manifest = fs::read_to_string(output.join("manifest.json")).expect("manifest exists");
    let entries: Vec<serde_json::Value> = serde_json::from_str(&manifest).expect("valid json");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["region"], "Gorenjska");
    assert_eq!(
        entries[0]["geojsonUrl"],
        "/boundaries/Gorenjska/ld_zarja.geojson"
    );
    assert_eq!(entries[1]["region"], "Primorska");
}

#[test]
fn broken_files_are_skipped_without_aborting() {
    let (input, output) = setup_dirs("broken");
    fs::write(input.join("good.kml"), SAMPLE_KML).expect("write kml");
    fs::write(input.join("bad.kml"), "this is not xml").expect("write kml");

    convert()
        .arg(&input)
        .arg(&output)
        .assert()
        .success();

    let manifest = fs::read_to_string(output.join("manifest.json")).expect("manifest exists");
    let entries: Vec<serde_json::Value> = serde_json::from_str(&manifest).expect("valid json");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["slug"], "ld_good");
}

#[test]
fn non_kml_files_are_ignored() {
    let (input, output) = setup_dirs("ignored");
    fs::write(input.join("notes.txt"), "nothing").expect("write txt");

    convert()
        .arg(&input)
        .arg(&output)
        .assert()
        .success();

    let manifest = fs::read_to_string(output.join("manifest.json")).expect("manifest exists");
    assert_eq!(manifest.trim(), "[]");
}

#[test]
fn reports_usage_on_stderr_when_arguments_are_missing() {
    convert()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
