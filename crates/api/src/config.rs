use std::path::PathBuf;

/// Error raised when an environment variable holds an unusable value.
#[derive(Debug, thiserror::Error)]
#[error("{var}={value:?} is invalid: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Where the feature table is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureSourceConfig {
    Csv { path: PathBuf },
    Sqlite { table: String },
}

/// Where the reference sets are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSourceConfig {
    /// Directory holding `checkout_types.json`, `vertical_names.json` and
    /// `methods.json`.
    Json { dir: PathBuf },
    Sqlite,
}

/// Where saved annotation snapshots live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationBackendConfig {
    Sqlite { name: String },
    Json { path: PathBuf },
}

/// Data sources and optional capabilities of the reckoner.
#[derive(Debug, Clone)]
pub struct ReckonerConfig {
    pub database_url: String,
    pub feature_source: FeatureSourceConfig,
    pub reference_source: ReferenceSourceConfig,
    pub annotations: AnnotationBackendConfig,
    /// Add a free-text comments column to filtered views.
    pub comments_enabled: bool,
    /// Serve the feature-flag side lookup.
    pub feature_flags_enabled: bool,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
    pub reckoner: ReckonerConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                  | Default                               |
    /// |--------------------------|---------------------------------------|
    /// | `HOST`                   | `0.0.0.0`                             |
    /// | `PORT`                   | `3000`                                |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`               |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                                  |
    /// | `RECKONER_LOG_JSON`      | `false`                               |
    /// | `DATABASE_URL`           | `sqlite://data/redefine_reckoner.db`  |
    /// | `RECKONER_SOURCE`        | `sqlite` (`sqlite` or `csv`)          |
    /// | `RECKONER_CSV_PATH`      | `data/Ready Reckoner.csv`             |
    /// | `RECKONER_TABLE`         | `reckoner`                            |
    /// | `REFERENCE_SOURCE`       | `json` (`json` or `sqlite`)           |
    /// | `REFERENCE_DIR`          | `data/static_data`                    |
    /// | `ANNOTATION_BACKEND`     | `sqlite` (`sqlite` or `json`)         |
    /// | `ANNOTATION_NAME`        | `filtered_data`                       |
    /// | `ANNOTATION_JSON_PATH`   | `data/filtered_data.json`             |
    /// | `RECKONER_COMMENTS`      | `true`                                |
    /// | `RECKONER_FEATURE_FLAGS` | `false`                               |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port = parse_number("PORT", var("PORT", "3000"))?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs =
            parse_number("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS", "30"))?;
        let log_json = parse_bool("RECKONER_LOG_JSON", var("RECKONER_LOG_JSON", "false"))?;

        let feature_source = match var("RECKONER_SOURCE", "sqlite").as_str() {
            "sqlite" => FeatureSourceConfig::Sqlite {
                table: var("RECKONER_TABLE", "reckoner"),
            },
            "csv" => FeatureSourceConfig::Csv {
                path: var("RECKONER_CSV_PATH", "data/Ready Reckoner.csv").into(),
            },
            other => return Err(invalid("RECKONER_SOURCE", other, "expected `sqlite` or `csv`")),
        };

        let reference_source = match var("REFERENCE_SOURCE", "json").as_str() {
            "json" => ReferenceSourceConfig::Json {
                dir: var("REFERENCE_DIR", "data/static_data").into(),
            },
            "sqlite" => ReferenceSourceConfig::Sqlite,
            other => return Err(invalid("REFERENCE_SOURCE", other, "expected `json` or `sqlite`")),
        };

        let annotations = match var("ANNOTATION_BACKEND", "sqlite").as_str() {
            "sqlite" => AnnotationBackendConfig::Sqlite {
                name: var("ANNOTATION_NAME", "filtered_data"),
            },
            "json" => AnnotationBackendConfig::Json {
                path: var("ANNOTATION_JSON_PATH", "data/filtered_data.json").into(),
            },
            other => {
                return Err(invalid("ANNOTATION_BACKEND", other, "expected `sqlite` or `json`"))
            }
        };

        let reckoner = ReckonerConfig {
            database_url: var("DATABASE_URL", "sqlite://data/redefine_reckoner.db"),
            feature_source,
            reference_source,
            annotations,
            comments_enabled: parse_bool("RECKONER_COMMENTS", var("RECKONER_COMMENTS", "true"))?,
            feature_flags_enabled: parse_bool(
                "RECKONER_FEATURE_FLAGS",
                var("RECKONER_FEATURE_FLAGS", "false"),
            )?,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            log_json,
            reckoner,
        })
    }
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(var, &value, &e.to_string()))
}

fn parse_bool(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(var, &value, "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_local_data_dir() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, ["http://localhost:5173"]);
        assert_eq!(
            config.reckoner.feature_source,
            FeatureSourceConfig::Sqlite {
                table: "reckoner".into()
            }
        );
        assert_eq!(
            config.reckoner.annotations,
            AnnotationBackendConfig::Sqlite {
                name: "filtered_data".into()
            }
        );
        assert!(config.reckoner.comments_enabled);
        assert!(!config.reckoner.feature_flags_enabled);
    }

    #[test]
    fn csv_source_and_json_store_selected() {
        let config = load(&[
            ("RECKONER_SOURCE", "csv"),
            ("RECKONER_CSV_PATH", "/srv/reckoner.csv"),
            ("ANNOTATION_BACKEND", "json"),
            ("ANNOTATION_JSON_PATH", "/srv/annotations.json"),
            ("RECKONER_COMMENTS", "off"),
        ])
        .unwrap();
        assert_eq!(
            config.reckoner.feature_source,
            FeatureSourceConfig::Csv {
                path: "/srv/reckoner.csv".into()
            }
        );
        assert_eq!(
            config.reckoner.annotations,
            AnnotationBackendConfig::Json {
                path: "/srv/annotations.json".into()
            }
        );
        assert!(!config.reckoner.comments_enabled);
    }

    #[test]
    fn cors_origins_split_and_trimmed() {
        let config = load(&[("CORS_ORIGINS", "http://a.test, ,http://b.test ")]).unwrap();
        assert_eq!(config.cors_origins, ["http://a.test", "http://b.test"]);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(err.var, "PORT");

        let err = load(&[("RECKONER_SOURCE", "xlsx")]).unwrap_err();
        assert!(err.to_string().contains("RECKONER_SOURCE"));

        let err = load(&[("RECKONER_FEATURE_FLAGS", "maybe")]).unwrap_err();
        assert_eq!(err.var, "RECKONER_FEATURE_FLAGS");
    }
}
