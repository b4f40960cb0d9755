//! Configuration for chapterctl

use chapter_runtime::{DEFAULT_ASSIGNMENT_COLLECTION, DEFAULT_MATRIX_COLLECTION};
use chapter_types::Role;
use serde::{Deserialize, Serialize};

/// Main CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterConfig {
    /// Document store backend
    #[serde(default)]
    pub store: StoreConfig,

    /// Collection names inside the store
    #[serde(default)]
    pub collections: CollectionsConfig,

    /// Permission policy source
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Member directory source
    #[serde(default)]
    pub members: MembersConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ChapterConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            collections: CollectionsConfig::default(),
            policy: PolicyConfig::default(),
            members: MembersConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// In-memory storage, lost on exit
    #[default]
    Memory,

    /// Single JSON file
    File {
        /// Path of the store file
        path: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsConfig {
    #[serde(default = "default_assignments")]
    pub assignments: String,

    #[serde(default = "default_matrices")]
    pub matrices: String,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            assignments: default_assignments(),
            matrices: default_matrices(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// JSON rule table replacing the standard one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_path: Option<String>,

    /// Roles granted every permission
    #[serde(default = "default_super_roles")]
    pub super_roles: Vec<Role>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            rules_path: None,
            super_roles: default_super_roles(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembersConfig {
    /// JSON array of `{"id", "name"}` objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_assignments() -> String {
    DEFAULT_ASSIGNMENT_COLLECTION.to_string()
}

fn default_matrices() -> String {
    DEFAULT_MATRIX_COLLECTION.to_string()
}

fn default_super_roles() -> Vec<Role> {
    vec![Role::DEVELOPER, Role::ADMINISTRATOR]
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl ChapterConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `CHAPTER_`-prefixed environment variables (`CHAPTER_LOGGING__LEVEL`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&ChapterConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Double underscore between sections so field names keep theirs
        builder = builder.add_source(
            config::Environment::with_prefix("CHAPTER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ChapterConfig::default();
        assert_eq!(config.store, StoreConfig::Memory);
        assert_eq!(config.collections.assignments, "position_assignments");
        assert_eq!(config.collections.matrices, "permission_matrices");
        assert_eq!(
            config.policy.super_roles,
            vec![Role::DEVELOPER, Role::ADMINISTRATOR]
        );
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_without_file() {
        let config = ChapterConfig::load(None).unwrap();
        assert_eq!(config.collections.assignments, "position_assignments");
        assert_eq!(config.policy.super_roles.len(), 2);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("chapterctl-{}.json", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
                "store": {{"type": "file", "path": "/var/lib/chapter/store.json"}},
                "collections": {{"assignments": "officer_terms"}},
                "logging": {{"level": "debug"}}
            }}"#
        )
        .unwrap();

        let config = ChapterConfig::load(path.to_str()).unwrap();
        assert_eq!(
            config.store,
            StoreConfig::File {
                path: "/var/lib/chapter/store.json".to_string()
            }
        );
        assert_eq!(config.collections.assignments, "officer_terms");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.collections.matrices, "permission_matrices");

        std::fs::remove_file(&path).unwrap();
    }
}
