use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::document::{ConfigDocument, DocumentError, parse_toml, parse_yaml};
use crate::pipeline::errors::LoadError;

/// Where task documents come from, by name.
pub trait DocumentSource {
    fn load(&self, name: &str) -> Result<ConfigDocument, LoadError>;
}

const EXTENSIONS: &[&str] = &["yaml", "yml", "toml"];

/// Reads `<name>.yaml`, `<name>.yml` or `<name>.toml` from the first search
/// directory that has one.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dirs: Vec<PathBuf>,
}

impl DirectorySource {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    fn find(&self, name: &str) -> Option<(PathBuf, &'static str)> {
        self.dirs.iter().find_map(|dir| {
            EXTENSIONS.iter().find_map(|ext| {
                let path = dir.join(format!("{}.{}", name, ext));
                path.is_file().then_some((path, *ext))
            })
        })
    }
}

impl DocumentSource for DirectorySource {
    fn load(&self, name: &str) -> Result<ConfigDocument, LoadError> {
        let Some((path, ext)) = self.find(name) else {
            return Err(LoadError::NotFound {
                name: name.to_string(),
                searched: self
                    .dirs
                    .iter()
                    .map(|d| d.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        };
        debug!(event = "core.pipeline.document_found", name = name, path = %path.display());

        let text = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let parsed: Result<ConfigDocument, DocumentError> = match ext {
            "toml" => parse_toml(&text),
            _ => parse_yaml(&text),
        };
        parsed.map_err(|source| LoadError::Document {
            name: name.to_string(),
            source,
        })
    }
}

/// In-memory documents, for tests and for embedding tasks in a binary.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, ConfigDocument>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, document: ConfigDocument) {
        self.documents.insert(name.into(), document);
    }

    pub fn with(mut self, name: impl Into<String>, document: ConfigDocument) -> Self {
        self.insert(name, document);
        self
    }

    /// Parse and add a YAML document.
    pub fn with_yaml(self, name: &str, text: &str) -> Result<Self, LoadError> {
        let document = parse_yaml(text).map_err(|source| LoadError::Document {
            name: name.to_string(),
            source,
        })?;
        Ok(self.with(name, document))
    }
}

impl DocumentSource for MemorySource {
    fn load(&self, name: &str) -> Result<ConfigDocument, LoadError> {
        self.documents
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                name: name.to_string(),
                searched: "memory".to_string(),
            })
    }
}
