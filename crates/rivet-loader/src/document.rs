use crate::error::{LoaderError, LoaderResult};
use indexmap::IndexMap;
use rivet_core::{ServiceRecord, Value};
use serde::Deserialize;
use serde_yaml::{Mapping, Value as Tree};
use std::fs;
use std::path::{Path, PathBuf};

/// Syntax of a service document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "yml" | "yaml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    fn parse(self, source: &str) -> LoaderResult<Tree> {
        let tree = match self {
            Format::Yaml => serde_yaml::from_str(source)?,
            Format::Json => serde_json::from_str(source)?,
        };
        Ok(tree)
    }
}

/// One entry of the `imports` list
#[derive(Debug, Clone, Deserialize)]
pub struct Import {
    pub resource: String,
}

/// A service document with all imports merged in
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub parameters: IndexMap<String, Value>,
    #[serde(default)]
    pub services: IndexMap<String, ServiceRecord>,
    #[serde(default)]
    pub autowire: Option<bool>,
}

impl ConfigDocument {
    /// Load a document file and everything it imports
    pub fn load(path: impl AsRef<Path>) -> LoaderResult<Self> {
        let tree = DocumentLoader::default().load(path.as_ref())?;
        Self::from_tree(tree)
    }

    /// Parse an in-memory document; relative imports resolve against the working directory
    pub fn from_str(source: &str, format: Format) -> LoaderResult<Self> {
        let tree = format.parse(source)?;
        let tree = DocumentLoader::default().resolve_imports(tree, Path::new("."))?;
        Self::from_tree(tree)
    }

    fn from_tree(tree: Tree) -> LoaderResult<Self> {
        let mut mapping = match tree {
            Tree::Null => return Ok(Self::default()),
            Tree::Mapping(mapping) => mapping,
            other => {
                return Err(LoaderError::invalid_document(format!(
                    "expected a mapping at the top level, found {}",
                    kind(&other)
                )))
            }
        };

        // `services:` with nothing under it reads as null
        mapping.retain(|_, value| !value.is_null());

        let document = serde_yaml::from_value(Tree::Mapping(mapping))?;
        Ok(document)
    }
}

/// Reads documents and merges their imports, depth first
#[derive(Debug, Default)]
struct DocumentLoader {
    stack: Vec<PathBuf>,
}

impl DocumentLoader {
    fn load(&mut self, path: &Path) -> LoaderResult<Tree> {
        let format = Format::from_path(path)
            .ok_or_else(|| LoaderError::unsupported_import(path.display().to_string()))?;

        let canonical = fs::canonicalize(path)
            .map_err(|source| LoaderError::io(path.display().to_string(), source))?;
        if self.stack.contains(&canonical) {
            return Err(LoaderError::invalid_document(format!(
                "'{}' imports itself",
                path.display()
            )));
        }

        tracing::debug!("Loading service document: {}", path.display());
        let source = fs::read_to_string(&canonical)
            .map_err(|source| LoaderError::io(path.display().to_string(), source))?;
        let tree = format.parse(&source)?;

        let dir = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        self.stack.push(canonical);
        let resolved = self.resolve_imports(tree, &dir);
        self.stack.pop();
        resolved
    }

    fn resolve_imports(&mut self, tree: Tree, dir: &Path) -> LoaderResult<Tree> {
        let Tree::Mapping(mut mapping) = tree else {
            return Ok(tree);
        };

        let imports = match mapping.remove("imports") {
            None | Some(Tree::Null) => Vec::new(),
            Some(imports) => serde_yaml::from_value::<Vec<Import>>(imports)?,
        };

        let mut tree = Tree::Mapping(mapping);
        for import in imports {
            let resource = resolve_resource(dir, &import.resource);
            tracing::debug!("Importing {}", resource.display());
            let imported = self.load(&resource)?;
            merge(&mut tree, imported);
        }

        Ok(tree)
    }
}

fn resolve_resource(dir: &Path, resource: &str) -> PathBuf {
    let path = Path::new(resource);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

/// Deep-merge `overlay` into `base`
///
/// Mappings merge key by key and sequences merge by index, so a shorter
/// overlay list only replaces the leading items. Anything else is replaced.
fn merge(base: &mut Tree, overlay: Tree) {
    match (base, overlay) {
        (Tree::Mapping(base), Tree::Mapping(overlay)) => merge_mappings(base, overlay),
        (Tree::Sequence(base), Tree::Sequence(overlay)) => merge_sequences(base, overlay),
        (base, overlay) => *base = overlay,
    }
}

fn merge_sequences(base: &mut Vec<Tree>, overlay: Vec<Tree>) {
    for (index, item) in overlay.into_iter().enumerate() {
        match base.get_mut(index) {
            Some(existing) => merge(existing, item),
            None => base.push(item),
        }
    }
}

fn merge_mappings(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(existing) => merge(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

fn kind(tree: &Tree) -> &'static str {
    match tree {
        Tree::Null => "null",
        Tree::Bool(_) => "bool",
        Tree::Number(_) => "number",
        Tree::String(_) => "string",
        Tree::Sequence(_) => "list",
        Tree::Mapping(_) => "map",
        Tree::Tagged(_) => "tagged value",
    }
}
