use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const ARRIVALS: &str = "\
month,countries,value,country_code
2009-08,Germany,5000,276
2009-08,France,4990,250
2019-08,Germany,7000,276
2019-08,France,na,250
";

const DEPARTURES: &str = "\
month,countries,value,country_code
2019-08,Germany,6100,276
";

fn write_data(dir: &Path) -> (String, String) {
    let a = dir.join("arrivals.csv");
    let d = dir.join("departures.csv");
    fs::write(&a, ARRIVALS).unwrap();
    fs::write(&d, DEPARTURES).unwrap();
    (a.display().to_string(), d.display().to_string())
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("tviz").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("tviz"));
}

#[test]
fn dodge_prints_adjusted_positions_in_order() {
    let mut cmd = Command::cargo_bin("tviz").unwrap();
    cmd.args(["dodge", "--separation", "5", "0", "10", "20"]);
    cmd.assert()
        .success()
        .stdout(predicate::eq("0\n10\n20\n"));
}

#[test]
fn dodge_accepts_negative_positions() {
    let mut cmd = Command::cargo_bin("tviz").unwrap();
    cmd.args(["dodge", "--separation", "1", "-5", "5"]);
    cmd.assert().success().stdout(predicate::eq("-5\n5\n"));
}

#[test]
fn dodge_rejects_nan() {
    let mut cmd = Command::cargo_bin("tviz").unwrap();
    cmd.args(["dodge", "--separation", "5", "1", "NaN", "3"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid label position"));
}

#[test]
fn slope_writes_svg_and_summary() {
    let dir = tempdir().unwrap();
    let (a, d) = write_data(dir.path());
    let out = dir.path().join("slope.svg");

    let mut cmd = Command::cargo_bin("tviz").unwrap();
    cmd.args(["slope", "--arrivals", &a, "--departures", &d, "--summary", "--out"])
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("increased by 40%"))
        .stderr(predicate::str::contains("Wrote slope chart"));

    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("Germany 5,000"));
    assert!(svg.contains("France 4,990"));
}

#[test]
fn slope_png_requires_font() {
    let dir = tempdir().unwrap();
    let (a, d) = write_data(dir.path());
    let out = dir.path().join("slope.png");

    let mut cmd = Command::cargo_bin("tviz").unwrap();
    cmd.args(["slope", "--arrivals", &a, "--departures", &d, "--out"])
        .arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("font"));
}

#[test]
fn map_prints_fill_per_country() {
    let dir = tempdir().unwrap();
    let (a, d) = write_data(dir.path());

    let mut cmd = Command::cargo_bin("tviz").unwrap();
    cmd.args(["map", "--arrivals", &a, "--departures", &d, "--direction", "departures"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("276\tGermany\t6,100\t#"));
}

#[test]
fn map_exports_json() {
    let dir = tempdir().unwrap();
    let (a, d) = write_data(dir.path());
    let out = dir.path().join("map.json");

    let mut cmd = Command::cargo_bin("tviz").unwrap();
    cmd.args(["map", "--arrivals", &a, "--departures", &d, "--out"])
        .arg(&out);
    cmd.assert().success();

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[1]["name"], "France");
    assert!(arr[1]["fill"].is_null());
}

#[test]
fn unknown_month_fails_cleanly() {
    let dir = tempdir().unwrap();
    let (a, d) = write_data(dir.path());

    let mut cmd = Command::cargo_bin("tviz").unwrap();
    cmd.args(["map", "--arrivals", &a, "--departures", &d, "--date", "1999-01"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no arrivals records for 1999-01"));
}

#[test]
fn dates_lists_months() {
    let dir = tempdir().unwrap();
    let (a, d) = write_data(dir.path());

    let mut cmd = Command::cargo_bin("tviz").unwrap();
    cmd.args(["dates", "--arrivals", &a, "--departures", &d]);
    cmd.assert()
        .success()
        .stdout(predicate::eq("2009-08\n2019-08\n"));
}
