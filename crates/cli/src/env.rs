use crate::{commands::ConnectionArgs, error::CliError};
use connectors::settings::{ConnectionSettings, DatabaseKind};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const DRIVER_VAR: &str = "TABLEFETCH_DRIVER";
pub const HOST_VAR: &str = "TABLEFETCH_HOST";
pub const PORT_VAR: &str = "TABLEFETCH_PORT";
pub const USER_VAR: &str = "TABLEFETCH_USER";
pub const PASSWORD_VAR: &str = "TABLEFETCH_PASSWORD";
pub const DATABASE_VAR: &str = "TABLEFETCH_DATABASE";

/// Environment variables from the process, overlaid with any `.env` files
/// loaded afterwards.
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
    sensitive_patterns: Vec<String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            vars: vars.into_iter().collect(),
            sensitive_patterns: Self::default_sensitive_patterns(),
        }
    }

    /// Load variables from a .env file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        let loaded = self.parse_env_content(&content)?;
        debug!("Loaded {} variables from {}", loaded, path.display());
        Ok(())
    }

    /// `~/.tablefetch/.env`, if it exists.
    pub fn default_env_file() -> Option<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".tablefetch/.env"))
            .filter(|path| path.is_file())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.sensitive_patterns.iter().any(|p| key.contains(p))
    }

    /// The `TABLEFETCH_*` variables in effect, sensitive values masked.
    pub fn describe(&self) -> Vec<String> {
        let mut lines: Vec<_> = self
            .vars
            .iter()
            .filter(|(key, _)| key.starts_with("TABLEFETCH_"))
            .map(|(key, value)| {
                if self.is_sensitive(key) {
                    format!("{key}=***")
                } else {
                    format!("{key}={value}")
                }
            })
            .collect();
        lines.sort();
        lines
    }

    fn parse_env_content(&mut self, content: &str) -> Result<usize, CliError> {
        let mut loaded = 0;
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "Invalid env file: empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars
                .insert(key.to_string(), Self::unquote_value(value));
            loaded += 1;
        }

        Ok(loaded)
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }

    fn default_sensitive_patterns() -> Vec<String> {
        ["password", "passwd", "secret", "token", "credential"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds connection settings from flags, falling back to the environment.
pub fn resolve_settings(
    args: &ConnectionArgs,
    env: &EnvManager,
) -> Result<ConnectionSettings, CliError> {
    let pick = |flag: &Option<String>, var: &str| -> Option<String> {
        flag.clone().or_else(|| env.get(var).map(str::to_string))
    };
    let require = |flag: &Option<String>, name: &'static str, var: &'static str| {
        pick(flag, var).ok_or(CliError::MissingSetting { flag: name, var })
    };

    let driver = match pick(&args.driver, DRIVER_VAR) {
        Some(name) => name
            .parse::<DatabaseKind>()
            .map_err(|_| CliError::InvalidSetting {
                name: "driver",
                value: name,
            })?,
        None => DatabaseKind::default(),
    };

    let port = match args.port {
        Some(port) => Some(port),
        None => env
            .get(PORT_VAR)
            .map(|raw| {
                raw.parse::<u16>().map_err(|_| CliError::InvalidSetting {
                    name: PORT_VAR,
                    value: raw.to_string(),
                })
            })
            .transpose()?,
    };

    let mut settings = ConnectionSettings::new(
        require(&args.host, "host", HOST_VAR)?,
        require(&args.user, "user", USER_VAR)?,
        pick(&args.password, PASSWORD_VAR).unwrap_or_default(),
        require(&args.database, "database", DATABASE_VAR)?,
    )
    .with_driver(driver);
    if let Some(port) = port {
        settings = settings.with_port(port);
    }

    debug!(?settings, "Resolved connection settings");
    Ok(settings)
}

/// Process environment plus the requested or default env file.
pub fn load_env(args: &ConnectionArgs) -> Result<EnvManager, CliError> {
    let mut env = EnvManager::new();
    match &args.env_file {
        Some(path) => env.load_from_file(path)?,
        None => {
            if let Some(path) = EnvManager::default_env_file() {
                env.load_from_file(path)?;
            }
        }
    }

    for line in env.describe() {
        debug!("{}", line);
    }
    Ok(env)
}
