use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::manifest::DEFAULT_MANIFEST_NAME;
use crate::models::LicenseEntry;
use crate::overrides::Overrides;

/// Root configuration structure, deserialized from `.license-graph/config.toml`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File name that marks a package manifest inside the trees.
    pub manifest_name: String,
    /// Package trees to scan, relative to the project directory.
    pub trees: Vec<PathBuf>,
    /// Directory holding the files referenced by `licenses`, relative to the
    /// project directory.
    pub licenses_dir: PathBuf,
    /// Known licenses. A package whose license is not listed here is reported.
    pub licenses: Vec<LicenseEntry>,
    /// Manual homepage/license corrections.
    pub overrides: Overrides,
}

impl Default for Config {
    /// Built-in configuration used when no config file is found: scan
    /// `node_modules` for `package.json`, with an empty license table.
    fn default() -> Self {
        Config {
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            trees: vec![PathBuf::from("node_modules")],
            licenses_dir: PathBuf::from("licenses"),
            licenses: Vec::new(),
            overrides: Overrides::default(),
        }
    }
}

impl Config {
    /// Tree roots resolved against `project_path`.
    pub fn tree_paths(&self, project_path: &Path) -> Vec<PathBuf> {
        self.trees.iter().map(|tree| project_path.join(tree)).collect()
    }

    pub fn licenses_path(&self, project_path: &Path) -> PathBuf {
        project_path.join(&self.licenses_dir)
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.license-graph/config.toml`
/// 3. `~/.config/license-graph/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".license-graph").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-graph")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.manifest_name, "package.json");
        assert_eq!(
            cfg.tree_paths(Path::new("/proj")),
            vec![PathBuf::from("/proj/node_modules")]
        );
        assert!(cfg.licenses.is_empty());
        assert!(cfg.overrides.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
licenses_dir = "legal"

[[licenses]]
name = "MIT"
file = "MIT.txt"

[[licenses]]
name = "ISC"

[[overrides.homepage]]
name = "left-pad"
version = "1.3.0"
new = "https://github.com/left-pad/left-pad"
"#,
        )
        .unwrap();

        assert_eq!(cfg.manifest_name, "package.json");
        assert_eq!(cfg.trees, vec![PathBuf::from("node_modules")]);
        assert_eq!(cfg.licenses_path(Path::new("/proj")), PathBuf::from("/proj/legal"));
        assert_eq!(cfg.licenses.len(), 2);
        assert_eq!(cfg.licenses[1].file, None);
        assert_eq!(cfg.overrides.homepage.len(), 1);
        assert_eq!(cfg.overrides.homepage[0].comment, "");
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join(".license-graph");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(
            config_dir.join("config.toml"),
            "manifest_name = \"bower.json\"\ntrees = [\"bower_components\", \"vendor\"]\n",
        )
        .unwrap();

        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.manifest_name, "bower.json");
        assert_eq!(cfg.trees.len(), 2);
    }

    #[test]
    fn test_override_path_errors_are_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(dir.path(), Some(&missing)).is_err());

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "licenses = 3").unwrap();
        let err = load_config(dir.path(), Some(&broken)).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }
}
