use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::Domains;

/// What the renderer does with description text that does not fit in the
/// description block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Continue the description on additional pages.
    #[default]
    Paginate,
    /// Cut the description at the block boundary and mark the cut with an
    /// ellipsis.
    Truncate,
}

/// Errors raised while loading or saving the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),
    /// The file could not be parsed.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// The file could not be written.
    #[error("Failed to write config file: {0}")]
    Write(#[source] std::io::Error),
}

/// Configuration for the request wizard.
///
/// Controls the enumerated value sets offered to requesters, how the
/// document is laid out, and where the hand-off puts its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Departments a requester can belong to.
    ///
    /// If this is empty, the built-in departments are used.
    departments: Vec<String>,

    /// Categories an issue can be filed under.
    ///
    /// If this is empty, the built-in categories are used.
    categories: Vec<String>,

    /// How long descriptions are laid out.
    pub description_overflow: OverflowPolicy,

    /// Default recipient for the email hand-off.
    pub support_address: Option<String>,

    /// Directory rendered documents are saved to.
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            departments: Vec::new(),
            categories: Vec::new(),
            description_overflow: OverflowPolicy::default(),
            support_address: None,
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// The conventional file name of the configuration.
    pub const FILE_NAME: &'static str = ".helpdesk.toml";

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads the configuration if the file exists, otherwise returns the
    /// default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// The value sets enumerated fields are validated against.
    #[must_use]
    pub fn domains(&self) -> Domains {
        Domains::new(self.departments.clone(), self.categories.clone())
    }

    /// Adds a department to the allowed list.
    ///
    /// Returns `true` if the department was added, `false` if it already
    /// existed.
    pub fn add_department(&mut self, department: String) -> bool {
        if self.departments.contains(&department) {
            false
        } else {
            self.departments.push(department);
            true
        }
    }

    /// Adds a category to the allowed list.
    ///
    /// Returns `true` if the category was added, `false` if it already
    /// existed.
    pub fn add_category(&mut self, category: String) -> bool {
        if self.categories.contains(&category) {
            false
        } else {
            self.categories.push(category);
            true
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        departments: Vec<String>,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        categories: Vec<String>,

        #[serde(default)]
        description_overflow: OverflowPolicy,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        support_address: Option<String>,

        #[serde(default = "default_output_dir")]
        output_dir: PathBuf,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                departments,
                categories,
                description_overflow,
                support_address,
                output_dir,
            } => Self {
                departments,
                categories,
                description_overflow,
                support_address,
                output_dir,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            departments: config.departments,
            categories: config.categories,
            description_overflow: config.description_overflow,
            support_address: config.support_address,
            output_dir: config.output_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\n\
              departments = [\"Direction Technique\"]\n\
              categories = [\"Hardware\", \"Badge\"]\n\
              description_overflow = \"truncate\"\n\
              support_address = \"it@example.com\"\n\
              output_dir = \"out\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        let domains = config.domains();

        assert_eq!(domains.departments(), &["Direction Technique".to_string()]);
        assert!(domains.is_category("Badge"));
        assert_eq!(config.description_overflow, OverflowPolicy::Truncate);
        assert_eq!(config.support_address.as_deref(), Some("it@example.com"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.to_string().starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&tmp.path().join(Config::FILE_NAME)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ndescription_overflow = \"shrink\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.to_string().starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(Config::FILE_NAME);

        let mut config = Config::default();
        assert!(config.add_category("Badge".to_string()));
        assert!(!config.add_category("Badge".to_string()));
        assert!(config.add_department("Direction Technique".to_string()));
        config.description_overflow = OverflowPolicy::Truncate;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
