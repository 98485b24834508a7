//! Configuration loading.
//!
//! Options are read from, in increasing priority:
//! 1. Global: `~/.config/pycs/config.toml` (or `$XDG_CONFIG_HOME/pycs/config.toml`)
//! 2. Per-project: `.pycs/config.toml` in the working directory
//! 3. The file passed with `--config`
//!
//! Later files override earlier ones key by key, so a project file that
//! only sets `runtime.value_type` keeps the global `indent_width`.
//!
//! ```toml
//! indent_width = 2
//!
//! [runtime]
//! value_type = "dynamic"
//! ```

use anyhow::{Context, Result};
use pycs_csharp::TranslateOptions;
use std::path::{Path, PathBuf};
use toml::Table;

/// One config file in the lookup chain.
#[derive(Debug, Clone)]
struct Layer {
    path: PathBuf,
    /// Missing optional layers are skipped; a missing required one is an
    /// error.
    required: bool,
}

/// Load translation options for a run started in `root`.
pub fn load(root: &Path, explicit: Option<&Path>) -> Result<TranslateOptions> {
    let mut layers = Vec::new();
    if let Some(global) = global_config_path() {
        layers.push(Layer {
            path: global,
            required: false,
        });
    }
    layers.push(Layer {
        path: root.join(".pycs").join("config.toml"),
        required: false,
    });
    if let Some(path) = explicit {
        layers.push(Layer {
            path: path.to_path_buf(),
            required: true,
        });
    }
    load_layers(&layers)
}

fn global_config_path() -> Option<PathBuf> {
    let config_home = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .ok()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
    Some(config_home.join("pycs").join("config.toml"))
}

fn load_layers(layers: &[Layer]) -> Result<TranslateOptions> {
    let mut merged = Table::new();
    for layer in layers {
        if !layer.required && !layer.path.exists() {
            continue;
        }
        let content = std::fs::read_to_string(&layer.path)
            .with_context(|| format!("reading config {}", layer.path.display()))?;
        let table: Table = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", layer.path.display()))?;
        tracing::debug!(path = %layer.path.display(), "loaded config");
        merge(&mut merged, table);
    }
    toml::Value::Table(merged)
        .try_into()
        .context("invalid translation options")
}

/// Deep-merge `other` into `base`. Tables merge recursively; any other
/// value in `other` replaces the one in `base`.
fn merge(base: &mut Table, other: Table) {
    for (key, value) in other {
        match value {
            toml::Value::Table(incoming) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => merge(existing, incoming),
                _ => {
                    base.insert(key, toml::Value::Table(incoming));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}
