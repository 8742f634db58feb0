//! End-to-end catalog workflows over the built-in catalog with in-memory
//! filesystem and runtime.

use std::path::Path;

use infrakit_adapters::{
    BuiltinCatalog, LocalFilesystem, MemoryFilesystem, RecordingRuntime, RuntimeCall,
};
use infrakit_core::{
    application::{ApplicationError, CatalogService, InstanceState, Outcome, ports::Filesystem},
    domain::{CatalogType, DomainError},
    error::{ErrorCategory, InfrakitError},
};

const BASE: &str = "/home/dev/infrakit";

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn service(fs: &MemoryFilesystem, runtime: &RecordingRuntime) -> CatalogService {
    CatalogService::new(
        Box::new(BuiltinCatalog),
        Box::new(fs.clone()),
        Box::new(runtime.clone()),
        BASE,
        "infrakit-net",
    )
}

#[test]
fn setup_generates_full_instance_layout() {
    let fs = MemoryFilesystem::new();
    let runtime = RecordingRuntime::new();

    let report = service(&fs, &runtime)
        .setup(CatalogType::Infra, &names(&["postgres"]))
        .unwrap();

    assert!(!report.has_failures());
    let root = Path::new(BASE).join("infra/postgres");
    for dir in ["config", "volumes", "data"] {
        assert!(fs.exists(&root.join(dir)), "missing {dir}/");
    }
    let compose = fs.read_file(&root.join("docker-compose.yml")).unwrap();
    assert!(compose.contains("postgres:16"));
    assert!(fs.read_file(&root.join(".env")).unwrap().contains("POSTGRES_PORT=5432"));
    assert!(fs.read_file(&root.join("config/init.sql")).is_some());
    assert!(runtime.calls().is_empty(), "setup never talks to the runtime");
}

#[test]
fn grafana_provisioning_directories_are_created() {
    let fs = MemoryFilesystem::new();
    service(&fs, &RecordingRuntime::new())
        .setup(CatalogType::Monitoring, &names(&["grafana"]))
        .unwrap();

    let datasources = Path::new(BASE)
        .join("monitoring/grafana/config/provisioning/datasources/datasources.yml");
    assert!(fs.read_file(&datasources).unwrap().contains("infrakit-prometheus:9090"));
}

#[test]
fn setup_twice_is_byte_identical() {
    let fs = MemoryFilesystem::new();
    let svc = service(&fs, &RecordingRuntime::new());
    let all = svc.all_names(CatalogType::Monitoring);

    svc.setup(CatalogType::Monitoring, &all).unwrap();
    let first: Vec<_> = fs
        .list_files()
        .into_iter()
        .map(|p| (p.clone(), fs.read_file(&p)))
        .collect();

    svc.setup(CatalogType::Monitoring, &all).unwrap();
    let second: Vec<_> = fs
        .list_files()
        .into_iter()
        .map(|p| (p.clone(), fs.read_file(&p)))
        .collect();

    assert_eq!(first, second);
}

#[test]
fn setup_on_disk_is_idempotent() {
    let tmp = tempfile::TempDir::new().unwrap();
    let svc = CatalogService::new(
        Box::new(BuiltinCatalog),
        Box::new(LocalFilesystem),
        Box::new(RecordingRuntime::new()),
        tmp.path(),
        "infrakit-net",
    );

    svc.setup(CatalogType::Infra, &names(&["redis"])).unwrap();
    let conf = tmp.path().join("infra/redis/config/redis.conf");
    let before = std::fs::read(&conf).unwrap();

    // User data under volumes/ must survive a re-run.
    let keep = tmp.path().join("infra/redis/volumes/dump.rdb");
    std::fs::write(&keep, b"data").unwrap();

    svc.setup(CatalogType::Infra, &names(&["redis"])).unwrap();
    assert_eq!(std::fs::read(&conf).unwrap(), before);
    assert_eq!(std::fs::read(&keep).unwrap(), b"data");
}

#[test]
fn unknown_name_rejects_batch_before_any_mutation() {
    let fs = MemoryFilesystem::new();
    let runtime = RecordingRuntime::new();
    let svc = service(&fs, &runtime);

    for result in [
        svc.setup(CatalogType::Infra, &names(&["postgres", "doesnotexist"])),
        svc.start(CatalogType::Infra, &names(&["doesnotexist"])),
        svc.stop(CatalogType::Infra, &names(&["redis", "doesnotexist"])),
    ] {
        assert!(matches!(
            result,
            Err(InfrakitError::Domain(DomainError::UnknownResource { .. }))
        ));
    }

    assert!(fs.list_files().is_empty());
    assert_eq!(fs.write_count(), 0);
    assert!(runtime.calls().is_empty());
}

#[test]
fn names_do_not_cross_catalogs() {
    let svc = service(&MemoryFilesystem::new(), &RecordingRuntime::new());
    assert!(svc.setup(CatalogType::Infra, &names(&["grafana"])).is_err());
    assert!(svc.setup(CatalogType::Monitoring, &names(&["redis"])).is_err());
}

#[test]
fn start_ensures_network_once_then_brings_each_up() {
    let fs = MemoryFilesystem::new();
    let runtime = RecordingRuntime::new();
    let svc = service(&fs, &runtime);
    let batch = names(&["redis", "postgres"]);

    svc.setup(CatalogType::Infra, &batch).unwrap();
    let report = svc.start(CatalogType::Infra, &batch).unwrap();

    assert!(!report.has_failures());
    let calls = runtime.calls();
    assert_eq!(calls[0], RuntimeCall::EnsureNetwork("infrakit-net".into()));
    assert_eq!(
        calls[1],
        RuntimeCall::Up(Path::new(BASE).join("infra/redis/docker-compose.yml"))
    );
    assert_eq!(
        calls[2],
        RuntimeCall::Up(Path::new(BASE).join("infra/postgres/docker-compose.yml"))
    );
    assert_eq!(calls.len(), 3);
}

#[test]
fn start_continues_after_a_failing_resource() {
    let fs = MemoryFilesystem::new();
    let runtime = RecordingRuntime::new();
    let svc = service(&fs, &runtime);
    let batch = names(&["redis", "postgres", "mongodb"]);

    svc.setup(CatalogType::Infra, &names(&["redis", "postgres"])).unwrap();
    runtime.fail_on(Path::new(BASE).join("infra/redis/docker-compose.yml"));

    let report = svc.start(CatalogType::Infra, &batch).unwrap();

    assert!(report.has_failures());
    assert!(report.outcomes[0].outcome.is_failure(), "runtime failure");
    assert_eq!(report.outcomes[1].outcome, Outcome::Done("started".into()));
    assert!(
        report.outcomes[2].outcome.message().contains("not set up"),
        "missing instance"
    );
    assert_eq!(report.failed().count(), 2);
}

#[test]
fn stop_skips_resources_that_were_never_set_up() {
    let fs = MemoryFilesystem::new();
    let runtime = RecordingRuntime::new();
    let svc = service(&fs, &runtime);

    svc.setup(CatalogType::Monitoring, &names(&["loki"])).unwrap();
    let report = svc
        .stop(CatalogType::Monitoring, &names(&["tempo", "loki"]))
        .unwrap();

    assert!(!report.has_failures());
    assert!(matches!(report.outcomes[0].outcome, Outcome::Skipped(_)));
    assert_eq!(report.outcomes[1].outcome, Outcome::Done("stopped".into()));
    assert_eq!(runtime.calls().len(), 1);
}

#[test]
fn status_of_never_started_instance_is_no_containers() {
    let fs = MemoryFilesystem::new();
    let runtime = RecordingRuntime::new();
    let svc = service(&fs, &runtime);

    svc.setup(CatalogType::Infra, &names(&["redis"])).unwrap();
    let statuses = svc.status(CatalogType::Infra, Some("redis")).unwrap();

    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].state, InstanceState::NoContainers);
}

#[test]
fn status_lists_instance_directories_sorted() {
    let fs = MemoryFilesystem::new();
    let runtime = RecordingRuntime::new();
    let svc = service(&fs, &runtime);

    svc.setup(CatalogType::Infra, &names(&["redis", "clickhouse"])).unwrap();
    svc.start(CatalogType::Infra, &names(&["redis"])).unwrap();

    let statuses = svc.status(CatalogType::Infra, None).unwrap();
    let listed: Vec<_> = statuses.iter().map(|s| s.resource.as_str()).collect();
    assert_eq!(listed, ["clickhouse", "redis"]);
    assert_eq!(statuses[0].state, InstanceState::NoContainers);
    assert!(matches!(statuses[1].state, InstanceState::Running(ref s) if s[0].is_running()));

    assert!(svc.status(CatalogType::Monitoring, None).unwrap().is_empty());
}

#[test]
fn status_of_unknown_name_is_validation_error() {
    let svc = service(&MemoryFilesystem::new(), &RecordingRuntime::new());
    assert!(svc.status(CatalogType::Infra, Some("nope")).is_err());
    assert_eq!(
        svc.status(CatalogType::Infra, Some("redis")).unwrap()[0].state,
        InstanceState::NotSetUp
    );
}

#[test]
fn failed_write_marks_only_that_resource() {
    let fs = MemoryFilesystem::new();
    fs.deny_writes(Path::new(BASE).join("infra/redis/.env"));
    let svc = service(&fs, &RecordingRuntime::new());

    let report = svc
        .setup(CatalogType::Infra, &names(&["redis", "postgres"]))
        .unwrap();

    assert!(report.outcomes[0].outcome.message().contains("re-run setup"));
    assert!(matches!(report.outcomes[1].outcome, Outcome::Done(_)));
}

#[test]
fn unreachable_daemon_fails_the_runtime_check() {
    let runtime = RecordingRuntime::new();
    let svc = service(&MemoryFilesystem::new(), &runtime);
    assert!(svc.check_runtime().is_ok());

    runtime.set_unavailable();
    let err = svc.check_runtime().unwrap_err();

    assert!(matches!(
        err,
        InfrakitError::Application(ApplicationError::RuntimeUnavailable { .. })
    ));
    assert_eq!(err.category(), ErrorCategory::Precondition);
    assert_eq!(runtime.calls(), vec![RuntimeCall::Ping, RuntimeCall::Ping]);
}
