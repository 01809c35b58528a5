use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cleopattes(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cleopattes").unwrap();
    cmd.env("CLEOPATTES_DATA_DIR", dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_clients_listing() {
    let dir = TempDir::new().unwrap();
    cleopattes(&dir)
        .arg("clients")
        .assert()
        .success()
        .stdout(predicate::str::contains("Marie Dupont"))
        .stdout(predicate::str::contains("2 client(s)"));
}

#[test]
fn test_clients_search() {
    let dir = TempDir::new().unwrap();
    cleopattes(&dir)
        .args(["clients", "--search", "martin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jean Martin"))
        .stdout(predicate::str::contains("Marie Dupont").not());
}

#[test]
fn test_empty_store() {
    let dir = TempDir::new().unwrap();
    cleopattes(&dir)
        .args(["--no-sample-data", "clients"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No clients found"));
}

#[test]
fn test_animals_reject_bad_client_id() {
    let dir = TempDir::new().unwrap();
    cleopattes(&dir)
        .args(["animals", "--client", "not-a-uuid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn test_services_price_filter() {
    let dir = TempDir::new().unwrap();
    cleopattes(&dir)
        .args(["services", "--min-price", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Toilettage"))
        .stdout(predicate::str::contains("25.00 €"))
        .stdout(predicate::str::contains("15.00 €").not());
}

#[test]
fn test_services_out_of_range_price() {
    let dir = TempDir::new().unwrap();
    cleopattes(&dir)
        .args(["services", "--min-price", "92233720368547759"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount"));
}

#[test]
fn test_planning_views() {
    let dir = TempDir::new().unwrap();
    cleopattes(&dir)
        .args(["planning", "--view", "week"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Planning (Week view)"));

    cleopattes(&dir)
        .args(["planning", "--date", "1999-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1999-01-01 to 1999-01-01"))
        .stdout(predicate::str::contains("No time slots scheduled"));

    cleopattes(&dir)
        .args(["planning", "--view", "year"])
        .assert()
        .failure();
}

#[test]
fn test_dashboard() {
    let dir = TempDir::new().unwrap();
    cleopattes(&dir)
        .args(["dashboard", "--range", "this-year"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard (This year)"))
        .stdout(predicate::str::contains("Clients: 2  Animals: 3  Services: 3"));
}

#[test]
fn test_search_ranks_results() {
    let dir = TempDir::new().unwrap();
    cleopattes(&dir)
        .args(["search", "buddy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Animal"))
        .stdout(predicate::str::contains("1 animal(s)"));

    cleopattes(&dir)
        .args(["search", "zzzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results for 'zzzz'"));
}

#[test]
fn test_export_json_and_csv() {
    let dir = TempDir::new().unwrap();
    let json = dir.path().join("out").join("data.json");
    cleopattes(&dir)
        .args(["export", "--format", "json", "--output"])
        .arg(&json)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported data.json"));
    let content = std::fs::read_to_string(&json).unwrap();
    assert!(content.contains("\"schema_version\""));
    assert!(content.contains("Marie"));

    let csv = dir.path().join("services.csv");
    cleopattes(&dir)
        .args(["export", "--format", "csv", "--entity", "services", "--output"])
        .arg(&csv)
        .assert()
        .success();
    assert!(std::fs::read_to_string(&csv).unwrap().contains("Toilettage"));
}

#[test]
fn test_backup_writes_into_backup_dir() {
    let dir = TempDir::new().unwrap();
    cleopattes(&dir)
        .arg("backup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup created"));

    let backups: Vec<_> = std::fs::read_dir(dir.path().join("backups"))
        .unwrap()
        .collect();
    assert_eq!(backups.len(), 1);
}

#[test]
fn test_config_shows_paths_and_settings() {
    let dir = TempDir::new().unwrap();
    cleopattes(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains(dir.path().to_string_lossy().to_string()))
        .stdout(predicate::str::contains("Backup frequency: weekly"))
        .stdout(predicate::str::contains("EUR (€)"));
}
