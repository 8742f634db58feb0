//! Built-in resource tables.
//!
//! Template bodies are embedded at compile time from
//! `templates/<catalog>/<name>/`, so the binary carries everything it needs
//! and a generated instance never depends on files next to the executable.
//!
//! # Adding a Resource
//!
//! 1. Create `templates/<catalog>/<name>/` with `docker-compose.yml`, `.env`
//!    and any `config/` payloads
//! 2. Add a generator function below
//! 3. Add one [`ResourceDescriptor`] row to [`INFRA`] or [`MONITORING`]

use infrakit_core::{
    application::ports::ResourceCatalog,
    domain::{CatalogType, ConfigFile, ResourceArtifacts, ResourceDescriptor},
};

macro_rules! template {
    ($catalog:literal, $name:literal, $file:expr) => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/templates/",
            $catalog,
            "/",
            $name,
            "/",
            $file
        ))
    };
}

macro_rules! base {
    ($catalog:literal, $name:literal) => {
        ResourceArtifacts::new(
            template!($catalog, $name, "docker-compose.yml"),
            template!($catalog, $name, ".env"),
        )
    };
}

macro_rules! config {
    ($catalog:literal, $name:literal, $file:literal) => {
        ConfigFile::new(
            concat!("config/", $file),
            template!($catalog, $name, concat!("config/", $file)),
        )
    };
}

// ── infra ─────────────────────────────────────────────────────────────────────

fn postgres() -> ResourceArtifacts {
    base!("infra", "postgres").with_config(config!("infra", "postgres", "init.sql"))
}

fn redis() -> ResourceArtifacts {
    base!("infra", "redis").with_config(config!("infra", "redis", "redis.conf"))
}

fn rabbitmq() -> ResourceArtifacts {
    base!("infra", "rabbitmq")
        .with_config(config!("infra", "rabbitmq", "rabbitmq.conf"))
        .with_config(config!("infra", "rabbitmq", "enabled_plugins"))
}

fn mongodb() -> ResourceArtifacts {
    base!("infra", "mongodb").with_config(config!("infra", "mongodb", "mongo-init.js"))
}

fn clickhouse() -> ResourceArtifacts {
    base!("infra", "clickhouse").with_config(config!("infra", "clickhouse", "users.xml"))
}

// ── monitoring ────────────────────────────────────────────────────────────────

fn grafana() -> ResourceArtifacts {
    base!("monitoring", "grafana").with_config(config!(
        "monitoring",
        "grafana",
        "provisioning/datasources/datasources.yml"
    ))
}

fn prometheus() -> ResourceArtifacts {
    base!("monitoring", "prometheus").with_config(config!(
        "monitoring",
        "prometheus",
        "prometheus.yml"
    ))
}

fn loki() -> ResourceArtifacts {
    base!("monitoring", "loki").with_config(config!("monitoring", "loki", "loki-config.yaml"))
}

fn tempo() -> ResourceArtifacts {
    base!("monitoring", "tempo").with_config(config!("monitoring", "tempo", "tempo.yaml"))
}

pub static INFRA: &[ResourceDescriptor] = &[
    ResourceDescriptor::new(
        "postgres",
        CatalogType::Infra,
        "PostgreSQL 16 relational database",
        postgres,
    ),
    ResourceDescriptor::new(
        "redis",
        CatalogType::Infra,
        "Redis 7 cache with LRU eviction",
        redis,
    ),
    ResourceDescriptor::new(
        "rabbitmq",
        CatalogType::Infra,
        "RabbitMQ 3.13 broker with management UI",
        rabbitmq,
    ),
    ResourceDescriptor::new(
        "mongodb",
        CatalogType::Infra,
        "MongoDB 7 document store",
        mongodb,
    ),
    ResourceDescriptor::new(
        "clickhouse",
        CatalogType::Infra,
        "ClickHouse 24.8 analytics database",
        clickhouse,
    ),
];

pub static MONITORING: &[ResourceDescriptor] = &[
    ResourceDescriptor::new(
        "grafana",
        CatalogType::Monitoring,
        "Grafana 11 dashboards, provisioned with the stack's data sources",
        grafana,
    ),
    ResourceDescriptor::new(
        "prometheus",
        CatalogType::Monitoring,
        "Prometheus 2.54 metrics store",
        prometheus,
    ),
    ResourceDescriptor::new(
        "loki",
        CatalogType::Monitoring,
        "Loki 3 log aggregation",
        loki,
    ),
    ResourceDescriptor::new(
        "tempo",
        CatalogType::Monitoring,
        "Tempo 2.6 tracing backend (OTLP)",
        tempo,
    ),
];

/// The catalog compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    pub fn new() -> Self {
        Self
    }

    pub fn table(catalog: CatalogType) -> &'static [ResourceDescriptor] {
        match catalog {
            CatalogType::Infra => INFRA,
            CatalogType::Monitoring => MONITORING,
        }
    }

    pub fn find(catalog: CatalogType, name: &str) -> Option<ResourceDescriptor> {
        Self::table(catalog).iter().find(|d| d.name == name).copied()
    }
}

impl ResourceCatalog for BuiltinCatalog {
    fn list(&self, catalog: CatalogType) -> Vec<ResourceDescriptor> {
        Self::table(catalog).to_vec()
    }
}
