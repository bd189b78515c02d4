//! Integration tests for fixwidth
//!
//! End-to-end tests that run the fixwidth binary against fixture files.

mod helpers;

use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

use helpers::{create_temp_dir, data_file, write_file};

#[test]
fn test_import_prints_csv() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("fixwidth")?;
    cmd.arg("--layouts")
        .arg(data_file("layouts.json"))
        .arg("--layout")
        .arg("people")
        .arg(data_file("people.txt"));

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("id,name,value\n"))
        .stdout(predicate::str::contains("1,John      ,123.45"))
        .stdout(predicate::str::contains("3,Bob       ,345.67"));

    Ok(())
}

#[test]
fn test_toml_layouts_and_max_rows() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("fixwidth")?;
    cmd.arg("-L")
        .arg(data_file("layouts.toml"))
        .arg("-l")
        .arg("people")
        .arg("-n")
        .arg("2")
        .arg(data_file("people.txt"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2,Alice     ,234.56"))
        .stdout(predicate::str::contains("Bob").not());

    Ok(())
}

#[test]
fn test_header_skip_layout() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("fixwidth")?;
    cmd.arg("--layouts")
        .arg(data_file("layouts.json"))
        .arg("--layout")
        .arg("transaction")
        .arg(format!("txns={}", data_file("transactions.txt").display()));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "date,account,transaction_type,amount,description",
        ))
        .stdout(predicate::str::contains("DESCRIPTION").not())
        .stdout(predicate::str::contains(
            "20240107,ACC0000002,WDR,200.5,ATM withdrawal",
        ))
        .stderr(predicate::str::contains(
            "Table 'txns' created: 4 rows x 5 columns",
        ));

    Ok(())
}

#[test]
fn test_list_layouts() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("fixwidth")?;
    cmd.arg("--layouts").arg(data_file("layouts.json")).arg("--list");

    cmd.assert()
        .success()
        .stdout("people\ntransaction\n");

    Ok(())
}

#[test]
fn test_unknown_layout_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("fixwidth")?;
    cmd.arg("--layouts")
        .arg(data_file("layouts.json"))
        .arg("--layout")
        .arg("payroll")
        .arg(data_file("people.txt"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Layout 'payroll' not found"));

    Ok(())
}

#[test]
fn test_bad_value_fails_by_default() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let input = write_file(
        temp_dir.path(),
        "people.txt",
        b"00001John      123.45\n0000XAlice     234.56\n",
    )?;

    let mut cmd = Command::cargo_bin("fixwidth")?;
    cmd.arg("--layouts")
        .arg(data_file("layouts.json"))
        .arg("--layout")
        .arg("people")
        .arg(&input);

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("field 'id' at row 1"))
        .stderr(predicate::str::contains("\"0000X\""));

    Ok(())
}

#[test]
fn test_null_on_error_keeps_row() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let input = write_file(
        temp_dir.path(),
        "people.txt",
        b"00001John      123.45\n0000XAlice     234.56\n",
    )?;

    let mut cmd = Command::cargo_bin("fixwidth")?;
    cmd.arg("--layouts")
        .arg(data_file("layouts.json"))
        .arg("--layout")
        .arg("people")
        .arg("--null-on-error")
        .arg(&input);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(",Alice     ,234.56"))
        .stderr(predicate::str::contains("could not be converted"));

    Ok(())
}

#[test]
fn test_invalid_layout_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let layouts = write_file(
        temp_dir.path(),
        "layouts.json",
        br#"{"dup": {"fields": [
            {"name": "a", "start": 0, "length": 1},
            {"name": "a", "start": 1, "length": 1}
        ]}}"#,
    )?;

    let mut cmd = Command::cargo_bin("fixwidth")?;
    cmd.arg("--layouts")
        .arg(&layouts)
        .arg("--layout")
        .arg("dup")
        .arg(data_file("people.txt"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load layout file"))
        .stderr(predicate::str::contains("duplicate field name 'a'"));

    Ok(())
}

#[test]
fn test_multiple_files() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let extra = write_file(
        temp_dir.path(),
        "More People.txt",
        b"00009Zoe       1.00\n",
    )?;

    let mut cmd = Command::cargo_bin("fixwidth")?;
    cmd.arg("--layouts")
        .arg(data_file("layouts.json"))
        .arg("--layout")
        .arg("people")
        .arg(data_file("people.txt"))
        .arg(&extra);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "3,Bob       ,345.67\n\nid,name,value\n9,Zoe       ,1",
        ))
        .stderr(predicate::str::contains("Table 'more_people' created"));

    Ok(())
}

#[test]
fn test_duplicate_table_names_fail() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let extra = write_file(temp_dir.path(), "x.txt", b"00009Zoe       1.00\n")?;

    let mut cmd = Command::cargo_bin("fixwidth")?;
    cmd.arg("--layouts")
        .arg(data_file("layouts.json"))
        .arg("--layout")
        .arg("people")
        .arg(format!("t={}", data_file("people.txt").display()))
        .arg(format!("t={}", extra.display()));

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("table 't' is already used"));

    Ok(())
}
