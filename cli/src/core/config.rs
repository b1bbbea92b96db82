//! # archquery Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module loads, merges, overrides, and validates the configuration that
//! every archquery command runs with. The resolved `Config` is passed explicitly
//! to the recipe engine, the batch orchestrator, and the package helpers; no
//! component reads the working directory or the CodeQL location from ambient
//! process state.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line / environment overrides (`--workdir`, `--codeql-dir`)
//! 2. Project-specific `.archquery.toml` in the current directory or ancestors
//! 3. User-specific `<config dir>/archquery/config.toml`
//! 4. Default values defined in the code
//!
//! After merging, `~` is expanded in every path and the result is validated.
//!
//! ## Examples
//!
//! ```toml
//! working_directory = "~/.archquerywork"
//!
//! [analysis]
//! install_dir = "~/ql"
//!
//! [selection]
//! bad_packages = ["pacman", "wine"]
//!
//! [build]
//! command = ["makepkg", "--noconfirm", "--syncdeps"]
//! ```
//!
//! ```rust
//! let cfg = config::load_config(&ConfigOverrides::default())?;
//! let recipe = cfg.recipe_path("zlib"); // ~/.archquerywork/zlib/trunk/PKGBUILD
//! ```
//!
use crate::core::error::{ArchqueryError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root directory holding one checkout directory per package (can use ~).
    #[serde(default = "default_working_directory")]
    pub working_directory: String,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub recipe: RecipeConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

/// Location and naming of the CodeQL analysis tool and its databases.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Directory CodeQL was unpacked into (can use ~).
    #[serde(default = "default_install_dir")]
    pub install_dir: String,
    /// Path of the executable relative to `install_dir`.
    #[serde(default = "default_executable")]
    pub executable: String,
    /// Subdirectory of the working directory receiving one database per package.
    #[serde(default = "default_database_subdir")]
    pub database_subdir: String,
    /// Substring marking a recipe line that already invokes the tool.
    #[serde(default = "default_marker")]
    pub marker: String,
}

/// Where recipes live inside a package checkout, and which function gets wrapped.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RecipeConfig {
    #[serde(default = "default_function")]
    pub function: String,
    /// Recipe path relative to the package directory.
    #[serde(default = "default_relative_path")]
    pub relative_path: String,
}

/// Package selection filters. These are policy, so they live in configuration.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SelectionConfig {
    /// Number of packages picked when `--package-count` is not given.
    #[serde(default = "default_package_count")]
    pub default_count: usize,
    /// Exact package names never selected.
    #[serde(default = "default_bad_packages")]
    pub bad_packages: Vec<String>,
    /// Packages whose name contains any of these substrings are never selected.
    #[serde(default = "default_excluded_substrings")]
    pub excluded_substrings: Vec<String>,
    /// Executables that must be on PATH before a run starts.
    #[serde(default = "default_required_executables")]
    pub required_executables: Vec<String>,
}

/// Build phase settings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Log file (relative to the working directory) collecting all build output.
    #[serde(default = "default_log_file")]
    pub log_file: String,
    /// Program and arguments run inside each recipe directory.
    #[serde(default = "default_build_command")]
    pub command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            working_directory: default_working_directory(),
            analysis: AnalysisConfig::default(),
            recipe: RecipeConfig::default(),
            selection: SelectionConfig::default(),
            build: BuildConfig::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            install_dir: default_install_dir(),
            executable: default_executable(),
            database_subdir: default_database_subdir(),
            marker: default_marker(),
        }
    }
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            function: default_function(),
            relative_path: default_relative_path(),
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            default_count: default_package_count(),
            bad_packages: default_bad_packages(),
            excluded_substrings: default_excluded_substrings(),
            required_executables: default_required_executables(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            command: default_build_command(),
        }
    }
}

fn default_working_directory() -> String {
    "~/.archquerywork".to_string()
}
fn default_install_dir() -> String {
    "~/ql".to_string()
}
fn default_executable() -> String {
    "codeql/codeql".to_string()
}
fn default_database_subdir() -> String {
    "codeql_databases".to_string()
}
fn default_marker() -> String {
    "codeql".to_string()
}
fn default_function() -> String {
    "build".to_string()
}
fn default_relative_path() -> String {
    "trunk/PKGBUILD".to_string()
}
fn default_package_count() -> usize {
    5
}
fn default_bad_packages() -> Vec<String> {
    [
        "pacman-mirrorlist",    // not code
        "pacman",               // may cause problems
        "iotop",                // python
        "sqlmap",               // python
        "ansible",              // python
        "diet-ng",              // Dlang
        "poppler",              // unknown
        "utox",                 // build error
        "wine",                 // missing deps
        "alacritty",            // rust
        "pantheon-dpms-helper", // no source found
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_excluded_substrings() -> Vec<String> {
    [
        "haskell-", "python-", "python2-", "perl-", "ruby-", "java-", "rust-", "golang-", "ttf-",
        "lib32", "-midi",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_required_executables() -> Vec<String> {
    ["asp", "git", "wget"].iter().map(|s| s.to_string()).collect()
}
fn default_log_file() -> String {
    "build.log".to_string()
}
fn default_build_command() -> Vec<String> {
    [
        "makepkg",
        "--noconfirm",
        "--nocheck",
        "--nosign",
        "--noarchive",
        "--syncdeps",
        "--skipchecksums",
        "--skipinteg",
        "--skippgpcheck",
        "--rmdeps",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Values supplied on the command line (or via environment variables) that
/// take precedence over every configuration file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub working_directory: Option<PathBuf>,
    pub codeql_dir: Option<PathBuf>,
}

const PROJECT_CONFIG_FILENAME: &str = ".archquery.toml";

/// Loads, merges, overrides, expands, and validates the configuration.
pub fn load_config(overrides: &ConfigOverrides) -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    apply_overrides(&mut merged_config, overrides);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("org", "archquery", "archquery") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.archquery.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks up from `start` looking for `.archquery.toml`, stopping at a `.git` directory.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Keeps the project value when it differs from the built-in default.
fn pick<T: PartialEq>(project: T, user: T, default: T) -> T {
    if project != default {
        project
    } else {
        user
    }
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project = match project {
        Some(p) => p,
        None => return user,
    };
    let d = Config::default();
    Config {
        working_directory: pick(
            project.working_directory,
            user.working_directory,
            d.working_directory,
        ),
        analysis: AnalysisConfig {
            install_dir: pick(
                project.analysis.install_dir,
                user.analysis.install_dir,
                d.analysis.install_dir,
            ),
            executable: pick(
                project.analysis.executable,
                user.analysis.executable,
                d.analysis.executable,
            ),
            database_subdir: pick(
                project.analysis.database_subdir,
                user.analysis.database_subdir,
                d.analysis.database_subdir,
            ),
            marker: pick(project.analysis.marker, user.analysis.marker, d.analysis.marker),
        },
        recipe: RecipeConfig {
            function: pick(project.recipe.function, user.recipe.function, d.recipe.function),
            relative_path: pick(
                project.recipe.relative_path,
                user.recipe.relative_path,
                d.recipe.relative_path,
            ),
        },
        selection: SelectionConfig {
            default_count: pick(
                project.selection.default_count,
                user.selection.default_count,
                d.selection.default_count,
            ),
            bad_packages: pick(
                project.selection.bad_packages,
                user.selection.bad_packages,
                d.selection.bad_packages,
            ),
            excluded_substrings: pick(
                project.selection.excluded_substrings,
                user.selection.excluded_substrings,
                d.selection.excluded_substrings,
            ),
            required_executables: pick(
                project.selection.required_executables,
                user.selection.required_executables,
                d.selection.required_executables,
            ),
        },
        build: BuildConfig {
            log_file: pick(project.build.log_file, user.build.log_file, d.build.log_file),
            command: pick(project.build.command, user.build.command, d.build.command),
        },
    }
}

fn apply_overrides(config: &mut Config, overrides: &ConfigOverrides) {
    if let Some(workdir) = &overrides.working_directory {
        debug!("Working directory overridden: {}", workdir.display());
        config.working_directory = workdir.to_string_lossy().into_owned();
    }
    if let Some(codeql_dir) = &overrides.codeql_dir {
        debug!("CodeQL install directory overridden: {}", codeql_dir.display());
        config.analysis.install_dir = codeql_dir.to_string_lossy().into_owned();
    }
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    config.working_directory = shellexpand::tilde(&config.working_directory).into_owned();
    config.analysis.install_dir = shellexpand::tilde(&config.analysis.install_dir).into_owned();
    debug!(
        "Expanded working directory: {}, install dir: {}",
        config.working_directory, config.analysis.install_dir
    );
    Ok(())
}

fn is_shell_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if config.working_directory.trim().is_empty() {
        return Err(anyhow!(ArchqueryError::Config(
            "working_directory cannot be empty.".to_string()
        )));
    }
    if config.analysis.install_dir.trim().is_empty() {
        return Err(anyhow!(ArchqueryError::Config(
            "analysis.install_dir cannot be empty.".to_string()
        )));
    }
    if config.analysis.marker.is_empty() {
        return Err(anyhow!(ArchqueryError::Config(
            "analysis.marker cannot be empty.".to_string()
        )));
    }
    let subdir = Path::new(&config.analysis.database_subdir);
    if config.analysis.database_subdir.is_empty() || subdir.components().count() != 1 {
        return Err(anyhow!(ArchqueryError::Config(format!(
            "analysis.database_subdir must be a single directory name, got '{}'.",
            config.analysis.database_subdir
        ))));
    }
    if !is_shell_identifier(&config.recipe.function) {
        return Err(anyhow!(ArchqueryError::Config(format!(
            "recipe.function '{}' is not a valid shell function name.",
            config.recipe.function
        ))));
    }
    if config.recipe.relative_path.trim().is_empty() {
        return Err(anyhow!(ArchqueryError::Config(
            "recipe.relative_path cannot be empty.".to_string()
        )));
    }
    if config.selection.default_count == 0 {
        return Err(anyhow!(ArchqueryError::Config(
            "selection.default_count must be greater than zero.".to_string()
        )));
    }
    if config.build.command.is_empty() || config.build.command[0].trim().is_empty() {
        return Err(anyhow!(ArchqueryError::Config(
            "build.command must name a program to run.".to_string()
        )));
    }
    info!("Configuration validation successful.");
    Ok(())
}

impl Config {
    /// Root directory containing the package checkouts.
    pub fn working_dir(&self) -> PathBuf {
        PathBuf::from(&self.working_directory)
    }

    /// Directory receiving one analysis database per package.
    pub fn database_dir(&self) -> PathBuf {
        self.working_dir().join(&self.analysis.database_subdir)
    }

    /// Full path of the analysis executable.
    pub fn analysis_tool(&self) -> PathBuf {
        Path::new(&self.analysis.install_dir).join(&self.analysis.executable)
    }

    /// Recipe file for `package`.
    pub fn recipe_path(&self, package: &str) -> PathBuf {
        self.working_dir()
            .join(package)
            .join(&self.recipe.relative_path)
    }

    pub fn build_log_path(&self) -> PathBuf {
        self.working_dir().join(&self.build.log_file)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            working_directory = "/srv/archquery"

            [analysis]
            install_dir = "~/tools/ql"

            [selection]
            default_count = 12
            bad_packages = ["wine"]

            [build]
            command = ["makepkg", "--syncdeps"]
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.working_directory, "/srv/archquery");
        assert_eq!(config.analysis.install_dir, "~/tools/ql"); // Not yet expanded
        assert_eq!(config.analysis.database_subdir, "codeql_databases"); // Default
        assert_eq!(config.recipe.function, "build"); // Default
        assert_eq!(config.selection.default_count, 12);
        assert_eq!(config.selection.bad_packages, vec!["wine"]);
        assert_eq!(config.selection.excluded_substrings, default_excluded_substrings());
        assert_eq!(config.build.command, vec!["makepkg", "--syncdeps"]);
        assert_eq!(config.build.log_file, "build.log");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[analysis]\nflavour = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config {
            working_directory: "~/aq_work".to_string(),
            analysis: AnalysisConfig {
                install_dir: "/opt/ql".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        expand_config_paths(&mut config).unwrap();

        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(
            config.working_directory,
            home_dir.join("aq_work").to_string_lossy()
        );
        assert_eq!(config.analysis.install_dir, "/opt/ql"); // Absolute path unchanged
    }

    #[test]
    fn test_derived_paths() {
        let config = Config {
            working_directory: "/work".to_string(),
            analysis: AnalysisConfig {
                install_dir: "/opt/ql".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.recipe_path("zlib"), PathBuf::from("/work/zlib/trunk/PKGBUILD"));
        assert_eq!(config.database_dir(), PathBuf::from("/work/codeql_databases"));
        assert_eq!(config.analysis_tool(), PathBuf::from("/opt/ql/codeql/codeql"));
        assert_eq!(config.build_log_path(), PathBuf::from("/work/build.log"));
    }

    #[test]
    fn test_merge_prefers_project_values() {
        let user = Config {
            working_directory: "/user/work".to_string(),
            selection: SelectionConfig {
                default_count: 9,
                ..Default::default()
            },
            ..Default::default()
        };
        let project = Config {
            recipe: RecipeConfig {
                function: "package".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = merge_configs(user, Some(project));
        assert_eq!(merged.working_directory, "/user/work"); // Project left default
        assert_eq!(merged.selection.default_count, 9);
        assert_eq!(merged.recipe.function, "package");
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::default();
        apply_overrides(
            &mut config,
            &ConfigOverrides {
                working_directory: Some(PathBuf::from("/tmp/w")),
                codeql_dir: Some(PathBuf::from("/tmp/ql")),
            },
        );
        assert_eq!(config.working_directory, "/tmp/w");
        assert_eq!(config.analysis.install_dir, "/tmp/ql");
    }

    #[test]
    fn test_find_project_config_path() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();

        let found = find_project_config_path(&nested);
        assert_eq!(found, Some(temp_dir.path().join(PROJECT_CONFIG_FILENAME)));
    }

    #[test]
    fn test_find_project_config_stops_at_git() {
        let temp_dir = tempdir().unwrap();
        let repo = temp_dir.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        fs::write(temp_dir.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();

        assert_eq!(find_project_config_path(&repo), None);
    }

    #[test]
    fn test_validate_config_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_config_invalid_function() {
        let config = Config {
            recipe: RecipeConfig {
                function: "build; rm".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("not a valid shell function name"));
    }

    #[test]
    fn test_validate_config_nested_database_subdir() {
        let config = Config {
            analysis: AnalysisConfig {
                database_subdir: "a/b".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_empty_build_command() {
        let config = Config {
            build: BuildConfig {
                command: vec![],
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("build.command"));
    }
}
