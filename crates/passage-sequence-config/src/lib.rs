use passage_sequence_engine::editing::{EditorSettings, FavoritesRepository, InsertBoundary};
use passage_sequence_engine::models::CommandKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name the CLI opens inside `passages_path` when no file is given
pub const DEFAULT_PASSAGE_FILE: &str = "passage.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passages_path: Option<PathBuf>,
    pub breakpoint_base_name: String,
    pub insert_boundary: InsertBoundary,
    pub favorites: Vec<CommandKind>,
}

impl Default for Config {
    fn default() -> Self {
        let settings = EditorSettings::default();
        Self {
            passages_path: None,
            breakpoint_base_name: settings.breakpoint_base_name,
            insert_boundary: settings.insert_boundary,
            favorites: Vec::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        let Some(mut config) = Self::read_unexpanded(config_path)? else {
            return Ok(None);
        };

        // Expand shell variables and tilde in the passages directory
        config.passages_path = config
            .passages_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        log::debug!("Loaded config from {}", config_path.display());
        Ok(Some(config))
    }

    /// Parse the file exactly as written, for callers that write it back
    fn read_unexpanded(config_path: &Path) -> Result<Option<Self>, ConfigError> {
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/passage-sequence");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Settings handed to the engine's editor
    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            insert_boundary: self.insert_boundary,
            breakpoint_base_name: self.breakpoint_base_name.clone(),
        }
    }

    pub fn default_passage_file(&self) -> Option<PathBuf> {
        self.passages_path
            .as_ref()
            .map(|dir| dir.join(DEFAULT_PASSAGE_FILE))
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

/// Favourite command kinds stored under the `favorites` key of a config file.
///
/// Saving rewrites the whole file, keeping every other key as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFavoritesRepository {
    config_path: PathBuf,
}

impl FileFavoritesRepository {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for FileFavoritesRepository {
    fn default() -> Self {
        Self::new(Config::config_path())
    }
}

impl FavoritesRepository for FileFavoritesRepository {
    fn load(&self) -> anyhow::Result<Vec<CommandKind>> {
        let config = Config::load_from_path(&self.config_path)?;
        Ok(config.map(|c| c.favorites).unwrap_or_default())
    }

    fn save(&mut self, favorites: &[CommandKind]) -> anyhow::Result<()> {
        let mut config = Config::read_unexpanded(&self.config_path)?.unwrap_or_default();
        config.favorites = favorites.to_vec();
        config.save_to_path(&self.config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/passage-sequence/config.toml"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            passages_path: Some(PathBuf::from("/tmp/test-passages")),
            breakpoint_base_name: "Scene".to_string(),
            insert_boundary: InsertBoundary::ShiftWithCommand,
            favorites: vec![CommandKind::Dialog, CommandKind::Jump],
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.editor_settings(), EditorSettings::default());
        assert_eq!(config.default_passage_file(), None);
    }

    #[test]
    fn test_config_keys_in_toml() {
        let config_content = r#"
passages_path = "/stories"
breakpoint_base_name = "Checkpoint"
insert_boundary = "shift_with_command"
favorites = ["dialog", "show_character"]
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(
            config.default_passage_file(),
            Some(PathBuf::from("/stories/passage.json"))
        );
        assert_eq!(
            config.favorites,
            vec![CommandKind::Dialog, CommandKind::ShowCharacter]
        );
        let settings = config.editor_settings();
        assert_eq!(settings.insert_boundary, InsertBoundary::ShiftWithCommand);
        assert_eq!(settings.breakpoint_base_name, "Checkpoint");
    }

    #[test]
    fn test_unknown_insert_boundary_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "insert_boundary = \"sideways\"\n").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(
            result,
            Err(ConfigError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_absolute_path() {
        let path = PathBuf::from("/absolute/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_expands_env_var_in_passages_path() {
        unsafe {
            env::set_var("PASSAGE_SEQUENCE_TEST_ROOT", "/custom/stories");
        }
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "passages_path = \"$PASSAGE_SEQUENCE_TEST_ROOT/act-one\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(
            config.passages_path,
            Some(PathBuf::from("/custom/stories/act-one"))
        );
        unsafe {
            env::remove_var("PASSAGE_SEQUENCE_TEST_ROOT");
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            passages_path: Some(PathBuf::from("/tmp/test-passages")),
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_favorites_repository_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let repository = FileFavoritesRepository::new(temp_dir.path().join("config.toml"));

        assert!(repository.load().unwrap().is_empty());
    }

    #[test]
    fn test_favorites_repository_keeps_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        let existing = Config {
            passages_path: Some(PathBuf::from("/stories")),
            breakpoint_base_name: "Scene".to_string(),
            ..Config::default()
        };
        existing.save_to_path(&config_file).unwrap();
        let mut repository = FileFavoritesRepository::new(&config_file);

        repository
            .save(&[CommandKind::Delay, CommandKind::Comment])
            .unwrap();

        assert_eq!(
            repository.load().unwrap(),
            vec![CommandKind::Delay, CommandKind::Comment]
        );
        let reloaded = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(reloaded.breakpoint_base_name, "Scene");
        assert_eq!(reloaded.passages_path, Some(PathBuf::from("/stories")));
    }

    #[test]
    fn test_favorites_repository_keeps_unexpanded_paths() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "passages_path = \"~/stories\"\n").unwrap();
        let mut repository = FileFavoritesRepository::new(&config_file);

        repository.save(&[CommandKind::Jump]).unwrap();

        let written = std::fs::read_to_string(&config_file).unwrap();
        assert!(written.contains("passages_path = \"~/stories\""));
        assert_eq!(repository.load().unwrap(), vec![CommandKind::Jump]);
    }

    #[test]
    fn test_favorites_repository_reports_broken_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "favorites = [\"teleport\"]\n").unwrap();
        let repository = FileFavoritesRepository::new(&config_file);

        assert!(repository.load().is_err());
    }
}
