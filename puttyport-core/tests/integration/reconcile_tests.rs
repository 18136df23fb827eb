//! Parse, plan, and execute against a file-backed store

use puttyport_core::import::PuttyImporter;
use puttyport_core::models::HostRecord;
use puttyport_core::{
    Classification, HostStore, ImportExecutor, ImportPlan, JsonHostStore, ParseResult, Selection,
};
use tempfile::TempDir;

use super::{PREAMBLE, section};

fn export(host: &str, forwards: &str) -> String {
    format!(
        "{PREAMBLE}{}{}",
        section(
            "web",
            &[
                ("HostName", &format!("\"{host}\"")),
                ("UserName", "\"deploy\""),
                ("Protocol", "\"ssh\""),
                ("PortForwardings", &format!("\"{forwards}\"")),
            ],
        ),
        section(
            "db",
            &[("HostName", "\"db.example.com\""), ("Protocol", "\"ssh\"")],
        )
    )
}

fn parse(text: &str) -> ParseResult {
    PuttyImporter::new().parse(text.as_bytes(), text.len() as u64)
}

fn import(result: &ParseResult, store: &mut JsonHostStore) -> ImportPlan {
    let plan = ImportPlan::from_store(result, store, &Selection::All).unwrap();
    let summary = ImportExecutor::default().execute(&plan, store);
    assert!(summary.is_complete(), "{:?}", summary.failures);
    plan
}

#[test]
fn test_first_import_creates_everything() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hosts.json");
    let mut store = JsonHostStore::open(&path).unwrap();

    let result = parse(&export("web.example.com", "L8080=localhost:80,D1080"));
    let plan = import(&result, &mut store);
    assert_eq!(plan.new_count, 2);
    assert!(path.exists());

    let reopened = JsonHostStore::open(&path).unwrap();
    let hosts = reopened.hosts().unwrap();
    assert_eq!(hosts.len(), 2);
    let web = reopened.find_by_nickname("web").unwrap().unwrap();
    assert_eq!(web.username.as_deref(), Some("deploy"));
    assert_eq!(reopened.forwards_for_host(web.id).unwrap().len(), 2);
}

#[test]
fn test_reimport_is_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hosts.json");
    let mut store = JsonHostStore::open(&path).unwrap();
    let result = parse(&export("web.example.com", "L8080=localhost:80"));
    import(&result, &mut store);

    let mut store = JsonHostStore::open(&path).unwrap();
    let plan = ImportPlan::from_store(&result, &store, &Selection::All).unwrap();
    assert_eq!(plan.unchanged_count, 2);
    assert!(plan.is_noop());
    let summary = ImportExecutor::default().execute(&plan, &mut store);
    assert_eq!(summary.unchanged, 2);
    assert_eq!(summary.imported, 0);
}

#[test]
fn test_bind_override_does_not_cause_update() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonHostStore::open(dir.path().join("hosts.json")).unwrap();
    let result = parse(&export("web.example.com", "L8080=localhost:80"));

    let plan = ImportPlan::from_store(&result, &store, &Selection::All).unwrap();
    ImportExecutor::new(Some("0.0.0.0".to_string())).execute(&plan, &mut store);

    let plan = ImportPlan::from_store(&result, &store, &Selection::All).unwrap();
    assert!(plan.is_noop());
}

#[test]
fn test_update_preserves_destination_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hosts.json");
    let mut store = JsonHostStore::open(&path).unwrap();
    import(&parse(&export("web.example.com", "L8080=localhost:80")), &mut store);

    let web = store.find_by_nickname("web").unwrap().unwrap();
    let customized = HostRecord {
        color: "green".to_string(),
        font_size: 14,
        stay_connected: true,
        post_login: Some("tmux attach".to_string()),
        ..web.clone()
    };
    store.upsert_host(customized).unwrap();

    let result = parse(&export("web2.example.com", "L8080=localhost:80,L9090=localhost:90"));
    let plan = ImportPlan::from_store(&result, &store, &Selection::All).unwrap();
    assert_eq!(plan.update_count, 1);
    assert_eq!(plan.unchanged_count, 1);
    assert_eq!(
        plan.entries[0].classification,
        Classification::Updated { existing_id: web.id }
    );
    ImportExecutor::default().execute(&plan, &mut store);

    let reopened = JsonHostStore::open(&path).unwrap();
    let updated = reopened.find_by_nickname("web").unwrap().unwrap();
    assert_eq!(updated.id, web.id);
    assert_eq!(updated.hostname, "web2.example.com");
    assert_eq!(updated.color, "green");
    assert_eq!(updated.font_size, 14);
    assert!(updated.stay_connected);
    assert_eq!(updated.post_login.as_deref(), Some("tmux attach"));
    assert_eq!(reopened.hosts().unwrap().len(), 2);

    let mut ports: Vec<u16> = reopened
        .forwards_for_host(web.id)
        .unwrap()
        .iter()
        .map(|f| f.source_port)
        .collect();
    ports.sort_unstable();
    assert_eq!(ports, vec![8080, 9090]);
}

#[test]
fn test_forward_removed_in_export_is_removed_from_store() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonHostStore::open(dir.path().join("hosts.json")).unwrap();
    import(&parse(&export("web.example.com", "L8080=localhost:80,D1080")), &mut store);

    let plan = import(&parse(&export("web.example.com", "D1080")), &mut store);
    assert_eq!(plan.update_count, 1);

    let web = store.find_by_nickname("web").unwrap().unwrap();
    let forwards = store.forwards_for_host(web.id).unwrap();
    assert_eq!(forwards.len(), 1);
    assert_eq!(forwards[0].source_port, 1080);
}

#[test]
fn test_selection_limits_writes() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonHostStore::open(dir.path().join("hosts.json")).unwrap();
    let result = parse(&export("web.example.com", ""));

    let plan = ImportPlan::from_store(&result, &store, &Selection::only(["db"])).unwrap();
    assert_eq!(plan.total(), 1);
    ImportExecutor::default().execute(&plan, &mut store);

    let hosts = store.hosts().unwrap();
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].nickname, "db");
}
