use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub matcher: Option<MatcherConfig>,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Where the canonical catalog artifact (pretty-printed JSON) is written.
    pub output: PathBuf,
    #[serde(default)]
    pub sources: Vec<SourceFileConfig>,
}

/// One catalog source file and how to parse it.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceFileConfig {
    pub path: PathBuf,
    pub format: SourceFormat,
    /// Field delimiter for `format = "delimited"` sources.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Delimited table with a header row; fields may be `"`-quoted.
    Delimited,
    /// One strain name per line.
    Names,
    /// Arbitrary nested JSON; arrays of objects are flattened recursively.
    Json,
}

fn default_delimiter() -> char {
    ','
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatcherConfig {
    /// Root directory of the reference image set.
    pub reference_root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
}

fn default_include_globs() -> Vec<String> {
    vec![
        "**/*.jpg".to_string(),
        "**/*.jpeg".to_string(),
        "**/*.png".to_string(),
    ]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// How often (in records) the importer emits a progress checkpoint.
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            progress_every: default_progress_every(),
        }
    }
}

fn default_progress_every() -> usize {
    250
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.catalog.sources.is_empty() {
        anyhow::bail!("catalog.sources must list at least one source file");
    }

    for source in &config.catalog.sources {
        if source.format == SourceFormat::Delimited && source.delimiter.is_whitespace() {
            anyhow::bail!(
                "catalog source '{}': delimiter must not be whitespace",
                source.path.display()
            );
        }
    }

    if config.import.progress_every == 0 {
        anyhow::bail!("import.progress_every must be > 0");
    }

    if let Some(ref matcher) = config.matcher {
        if matcher.include_globs.is_empty() {
            anyhow::bail!("matcher.include_globs must not be empty");
        }
    }

    Ok(config)
}
