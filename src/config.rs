use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::BaseDirs;
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::expand::Expander;

const APP_NAME: &str = "eeditor";
const CONFIG_FILE: &str = "eeditor.yml";
const SYSTEM_CONFIG: &str = "/etc/eeditor/eeditor.yml";

/// One entry of the config list, as written. `path` is kept as a raw YAML
/// value and shape-checked later.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct EditorEntry {
    pub name: String,
    #[serde(default)]
    pub path: Option<serde_yaml_ng::Value>,
    #[serde(default)]
    pub env: Option<IndexMap<String, String>>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub path: PathBuf,
    pub editors: Vec<EditorEntry>,
}

impl Config {
    /// Loads the first config file that exists, see [`search_paths`].
    pub fn load(explicit: Option<&str>, expander: &Expander<'_>) -> Result<Self> {
        let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        let paths = search_paths(explicit, expander, home.as_deref());
        match find_existing(&paths) {
            Some(path) => Self::from_file(path),
            None => bail!(
                "Could not find config file, looked in: {}",
                paths.iter().map(|p| format!("`{}`", p.display())).collect::<Vec<_>>().join(", ")
            ),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from `{}`", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Fail to open file `{}`", path.display()))?;
        let editors = parse(&content)
            .with_context(|| format!("Fail to deserialize file `{}`", path.display()))?;
        Ok(Self { path: path.to_path_buf(), editors })
    }
}

pub fn parse(content: &str) -> Result<Vec<EditorEntry>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let editors: Option<Vec<EditorEntry>> = serde_yaml_ng::from_str(content)?;
    Ok(editors.unwrap_or_default())
}

/// Config locations in priority order: the explicit path (`--config` or
/// `$EEDITOR_CONFIG`), `$XDG_CONFIG_HOME/eeditor/eeditor.yml`,
/// `~/.config/eeditor/eeditor.yml`, `~/.eeditor.yml`, then the system file.
pub fn search_paths(explicit: Option<&str>, expander: &Expander<'_>, home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(explicit) = explicit.filter(|p| !p.is_empty()) {
        match expander.expand(explicit) {
            Ok(path) => paths.push(PathBuf::from(path)),
            Err(e) => warn!("Could not resolve config path `{}`: {}", explicit, e),
        }
    }

    if let Some(xdg) = expander.lookup().lookup("XDG_CONFIG_HOME").filter(|p| !p.is_empty()) {
        match expander.expand(&xdg) {
            Ok(dir) => paths.push(Path::new(&dir).join(APP_NAME).join(CONFIG_FILE)),
            Err(e) => warn!("Could not resolve XDG_CONFIG_HOME `{}`: {}", xdg, e),
        }
    }

    if let Some(home) = home {
        paths.push(home.join(".config").join(APP_NAME).join(CONFIG_FILE));
        paths.push(home.join(format!(".{}", CONFIG_FILE)));
    }
    paths.push(PathBuf::from(SYSTEM_CONFIG));

    paths
}

/// First path that exists. Symlinks are not followed, so a link counts as
/// present even when dangling and then fails loudly on read.
pub fn find_existing(paths: &[PathBuf]) -> Option<&Path> {
    paths.iter().map(PathBuf::as_path).find(|path| fs::symlink_metadata(path).is_ok())
}
