use crate::sql::base::error::ConnectorError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Which driver a connection goes through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    #[default]
    #[serde(alias = "mariadb")]
    MySql,
    #[serde(alias = "pg", alias = "postgresql")]
    Postgres,
}

impl DatabaseKind {
    pub fn default_port(&self) -> u16 {
        match self {
            DatabaseKind::MySql => 3306,
            DatabaseKind::Postgres => 5432,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseKind::MySql => "mysql",
            DatabaseKind::Postgres => "postgres",
        }
    }
}

impl FromStr for DatabaseKind {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DatabaseKind::MySql),
            "pg" | "postgres" | "postgresql" => Ok(DatabaseKind::Postgres),
            other => Err(ConnectorError::InvalidSettings(format!(
                "unknown driver: {other}"
            ))),
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and as whom to connect. Fixed for the lifetime of a fetcher.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    #[serde(default)]
    pub driver: DatabaseKind,
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub database: String,
}

impl ConnectionSettings {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        ConnectionSettings {
            driver: DatabaseKind::default(),
            host: host.into(),
            port: None,
            username: username.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    pub fn with_driver(mut self, driver: DatabaseKind) -> Self {
        self.driver = driver;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.driver.default_port())
    }

    /// `host:port/database`, safe to log.
    pub fn endpoint(&self) -> String {
        format!("{}:{}/{}", self.host, self.port(), self.database)
    }

    pub fn validate(&self) -> Result<(), ConnectorError> {
        if self.host.trim().is_empty() {
            return Err(ConnectorError::InvalidSettings("host is empty".into()));
        }
        if self.username.is_empty() {
            return Err(ConnectorError::InvalidSettings("username is empty".into()));
        }
        if self.database.is_empty() {
            return Err(ConnectorError::InvalidSettings("database is empty".into()));
        }
        Ok(())
    }

    pub(crate) fn mysql_opts(&self) -> mysql_async::Opts {
        mysql_async::OptsBuilder::default()
            .ip_or_hostname(self.host.clone())
            .tcp_port(self.port())
            .user(Some(self.username.clone()))
            .pass(Some(self.password.clone()))
            .db_name(Some(self.database.clone()))
            .into()
    }

    pub(crate) fn pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port())
            .user(&self.username)
            .password(&self.password)
            .dbname(&self.database);
        config
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port())
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_password() {
        let settings = ConnectionSettings::new("db.local", "reader", "s3cret", "shop");
        let debug = format!("{settings:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn serialized_settings_omit_the_password() {
        let settings = ConnectionSettings::new("db.local", "reader", "s3cret", "shop");
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("s3cret"));
        assert!(json.contains("\"driver\":\"mysql\""));
    }

    #[test]
    fn port_defaults_follow_the_driver() {
        let settings = ConnectionSettings::new("h", "u", "p", "d");
        assert_eq!(settings.port(), 3306);
        let settings = settings.with_driver(DatabaseKind::Postgres);
        assert_eq!(settings.port(), 5432);
        assert_eq!(settings.with_port(6543).endpoint(), "h:6543/d");
    }

    #[test]
    fn driver_names_are_case_insensitive() {
        assert_eq!("MariaDB".parse::<DatabaseKind>().unwrap(), DatabaseKind::MySql);
        assert_eq!("PostgreSQL".parse::<DatabaseKind>().unwrap(), DatabaseKind::Postgres);
        assert!("oracle".parse::<DatabaseKind>().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let settings: ConnectionSettings = serde_json::from_str(
            r#"{"host":"h","username":"u","password":"p","database":"d"}"#,
        )
        .unwrap();
        assert_eq!(settings.driver, DatabaseKind::MySql);
        assert_eq!(settings.port, None);

        let settings: ConnectionSettings = serde_json::from_str(
            r#"{"driver":"pg","host":"h","port":15432,"username":"u","password":"p","database":"d"}"#,
        )
        .unwrap();
        assert_eq!(settings.driver, DatabaseKind::Postgres);
        assert_eq!(settings.port(), 15432);
    }

    #[test]
    fn validation_rejects_blank_host() {
        let settings = ConnectionSettings::new(" ", "u", "p", "d");
        assert!(matches!(
            settings.validate(),
            Err(ConnectorError::InvalidSettings(_))
        ));
    }
}
