#![allow(dead_code)]

use connectors::settings::{ConnectionSettings, DatabaseKind};
use mysql_async::{Conn, prelude::Queryable};
use std::env;
use tokio_postgres::{Client, NoTls};

pub mod utils;

// Local test databases; override with TABLEFETCH_TEST_MYSQL_* and
// TABLEFETCH_TEST_PG_*.
const MYSQL_DEFAULTS: [(&str, &str); 5] = [
    ("HOST", "localhost"),
    ("PORT", "3306"),
    ("USER", "user"),
    ("PASSWORD", "password"),
    ("DATABASE", "testdb"),
];

const PG_DEFAULTS: [(&str, &str); 5] = [
    ("HOST", "localhost"),
    ("PORT", "5432"),
    ("USER", "user"),
    ("PASSWORD", "password"),
    ("DATABASE", "testdb"),
];

fn settings_from_env(
    driver: DatabaseKind,
    prefix: &str,
    defaults: &[(&str, &str)],
) -> ConnectionSettings {
    let var = |key: &str| {
        env::var(format!("{prefix}_{key}")).unwrap_or_else(|_| {
            defaults
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .unwrap_or_default()
        })
    };

    let port = var("PORT").parse().expect("numeric test database port");
    ConnectionSettings::new(var("HOST"), var("USER"), var("PASSWORD"), var("DATABASE"))
        .with_driver(driver)
        .with_port(port)
}

pub fn mysql_settings() -> ConnectionSettings {
    settings_from_env(DatabaseKind::MySql, "TABLEFETCH_TEST_MYSQL", &MYSQL_DEFAULTS)
}

pub fn pg_settings() -> ConnectionSettings {
    settings_from_env(DatabaseKind::Postgres, "TABLEFETCH_TEST_PG", &PG_DEFAULTS)
}

/// Settings pointing at a port nothing listens on.
pub fn unreachable_settings(driver: DatabaseKind) -> ConnectionSettings {
    ConnectionSettings::new("127.0.0.1", "nobody", "nothing", "nowhere")
        .with_driver(driver)
        .with_port(1)
}

async fn mysql_conn() -> Conn {
    let settings = mysql_settings();
    let opts = mysql_async::OptsBuilder::default()
        .ip_or_hostname(settings.host.clone())
        .tcp_port(settings.port())
        .user(Some(settings.username.clone()))
        .pass(Some(settings.password.clone()))
        .db_name(Some(settings.database.clone()));
    Conn::new(opts).await.expect("connect mysql")
}

async fn pg_client() -> Client {
    let settings = pg_settings();
    let (client, connection) = tokio_postgres::Config::new()
        .host(&settings.host)
        .port(settings.port())
        .user(&settings.username)
        .password(&settings.password)
        .dbname(&settings.database)
        .connect(NoTls)
        .await
        .expect("connect postgres");
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            eprintln!("postgres connection error: {err}");
        }
    });
    client
}

/// Runs each statement on a fresh MySQL connection.
pub async fn execute_mysql(statements: &[&str]) {
    let mut conn = mysql_conn().await;
    for sql in statements {
        conn.query_drop(*sql)
            .await
            .unwrap_or_else(|e| panic!("mysql statement failed: {sql}: {e}"));
    }
    conn.disconnect().await.expect("disconnect mysql");
}

/// Runs a batch of statements on a fresh Postgres connection.
pub async fn execute_postgres(sql: &str) {
    let client = pg_client().await;
    client
        .batch_execute(sql)
        .await
        .unwrap_or_else(|e| panic!("postgres batch failed: {e}"));
}
