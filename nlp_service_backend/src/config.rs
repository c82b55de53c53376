// backend/src/config.rs

use std::{net::SocketAddr, time::Duration};
use thiserror::Error;

use crate::models::Language;

const DEFAULT_MAX_BODY_BYTES: &str = "33554432";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("JOB_BACKEND=memory only works with SERVICE_ROLE=all")]
    MemoryBackendNeedsAllRole,
}

/// Which halves of the service this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRole {
    Api,
    Worker,
    All,
}

impl ServiceRole {
    pub fn runs_api(&self) -> bool {
        matches!(self, ServiceRole::Api | ServiceRole::All)
    }

    pub fn runs_workers(&self) -> bool {
        matches!(self, ServiceRole::Worker | ServiceRole::All)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Redis,
    Memory,
}

/// Per-request parameter defaults. Copied into every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDefaults {
    pub include_references: bool,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            include_references: true,
        }
    }
}

/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen_addr: SocketAddr,
    pub role: ServiceRole,
    pub backend: BackendKind,
    pub redis_url: String,
    pub queue_name: String,
    pub result_ttl: Duration,
    pub worker_count: usize,
    pub dequeue_timeout: Duration,
    pub supported_languages: Vec<Language>,
    pub defaults: RequestDefaults,
    pub max_body_bytes: usize,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let listen_addr = parse_with("LISTEN_ADDR", get("LISTEN_ADDR", "0.0.0.0:8000"), |v| {
            v.parse::<SocketAddr>().ok()
        })?;

        let role = parse_with("SERVICE_ROLE", get("SERVICE_ROLE", "all"), |v| {
            match v.to_ascii_lowercase().as_str() {
                "api" => Some(ServiceRole::Api),
                "worker" => Some(ServiceRole::Worker),
                "all" => Some(ServiceRole::All),
                _ => None,
            }
        })?;

        let backend = parse_with("JOB_BACKEND", get("JOB_BACKEND", "redis"), |v| {
            match v.to_ascii_lowercase().as_str() {
                "redis" => Some(BackendKind::Redis),
                "memory" => Some(BackendKind::Memory),
                _ => None,
            }
        })?;
        if backend == BackendKind::Memory && role != ServiceRole::All {
            return Err(ConfigError::MemoryBackendNeedsAllRole);
        }

        let result_ttl = parse_with("RESULT_TTL_SECS", get("RESULT_TTL_SECS", "86400"), |v| {
            v.parse::<u64>().ok().filter(|s| *s > 0).map(Duration::from_secs)
        })?;

        let worker_count = parse_with("WORKER_COUNT", get("WORKER_COUNT", "2"), |v| {
            v.parse::<usize>().ok().filter(|n| *n > 0)
        })?;

        let dequeue_timeout = parse_with(
            "DEQUEUE_TIMEOUT_SECS",
            get("DEQUEUE_TIMEOUT_SECS", "5"),
            |v| v.parse::<u64>().ok().filter(|s| *s > 0).map(Duration::from_secs),
        )?;

        let supported_languages = parse_with(
            "SUPPORTED_LANGUAGES",
            get("SUPPORTED_LANGUAGES", "de,en,it,fr"),
            |v| {
                let langs = v
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(Language::parse)
                    .collect::<Option<Vec<_>>>()?;
                (!langs.is_empty()).then_some(langs)
            },
        )?;

        let include_references = parse_with(
            "DEFAULT_INCLUDE_REFERENCES",
            get("DEFAULT_INCLUDE_REFERENCES", "true"),
            crate::validation::parse_flag,
        )?;

        let max_body_bytes = parse_with(
            "MAX_BODY_BYTES",
            get("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),
            |v| v.parse::<usize>().ok().filter(|n| *n > 0),
        )?;

        Ok(Self {
            listen_addr,
            role,
            backend,
            redis_url: get("REDIS_URL", "redis://127.0.0.1:6379"),
            queue_name: get("QUEUE_NAME", "nlp_job_queue"),
            result_ttl,
            worker_count,
            dequeue_timeout,
            supported_languages,
            defaults: RequestDefaults { include_references },
            max_body_bytes,
        })
    }
}

fn parse_with<T>(
    key: &'static str,
    value: String,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    parse(&value).ok_or(ConfigError::Invalid {
        key,
        reason: "unrecognised value",
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.listen_addr.port(), 8000);
        assert_eq!(config.role, ServiceRole::All);
        assert_eq!(config.backend, BackendKind::Redis);
        assert_eq!(config.worker_count, 2);
        assert_eq!(config.result_ttl, Duration::from_secs(86400));
        assert_eq!(config.supported_languages, Language::ALL.to_vec());
        assert!(config.defaults.include_references);
        assert_eq!(config.max_body_bytes, 32 * 1024 * 1024);
    }

    #[test]
    fn language_subset_and_flags() {
        let config = config_from(&[
            ("SUPPORTED_LANGUAGES", "de, en"),
            ("DEFAULT_INCLUDE_REFERENCES", "off"),
            ("SERVICE_ROLE", "worker"),
        ])
        .unwrap();
        assert_eq!(config.supported_languages, vec![Language::De, Language::En]);
        assert!(!config.defaults.include_references);
        assert!(config.role.runs_workers());
        assert!(!config.role.runs_api());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_from(&[("WORKER_COUNT", "0")]),
            Err(ConfigError::Invalid { key: "WORKER_COUNT", .. })
        ));
        assert!(matches!(
            config_from(&[("MAX_BODY_BYTES", "lots")]),
            Err(ConfigError::Invalid { key: "MAX_BODY_BYTES", .. })
        ));
        assert!(matches!(
            config_from(&[("SUPPORTED_LANGUAGES", "de,xx")]),
            Err(ConfigError::Invalid { key: "SUPPORTED_LANGUAGES", .. })
        ));
        assert!(matches!(
            config_from(&[("JOB_BACKEND", "memory"), ("SERVICE_ROLE", "api")]),
            Err(ConfigError::MemoryBackendNeedsAllRole)
        ));
    }
}
