use std::fs;
use std::path::{Path, PathBuf};
use stylx_core::{Catalog, Error, Product, Result};
use tracing::{debug, info};

/// Loads a catalog from `.json` (array of products) and `.jsonl` (one
/// product per line) files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load from a single file or from every catalog file in a directory.
    ///
    /// Directory entries are read in file-name order and concatenated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Catalog> {
        let path = path.as_ref();
        let files = if path.is_dir() {
            Self::catalog_files(path)?
        } else {
            vec![path.to_path_buf()]
        };

        let mut products = Vec::new();
        for file in &files {
            let loaded = Self::load_file(file)?;
            debug!(file = %file.display(), products = loaded.len(), "catalog file read");
            products.extend(loaded);
        }

        let catalog = Catalog::new(products)?;
        info!(
            files = files.len(),
            products = catalog.len(),
            dimension = ?catalog.dimension(),
            "catalog loaded from {}",
            path.display()
        );
        Ok(catalog)
    }

    /// Catalog files directly inside `dir`, sorted by name
    pub fn catalog_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && Format::of(&path).is_some() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    pub fn load_file(path: &Path) -> Result<Vec<Product>> {
        let format = Format::of(path).ok_or_else(|| {
            Error::InvalidConfig(format!(
                "{} is not a .json or .jsonl catalog file",
                path.display()
            ))
        })?;
        let contents = fs::read_to_string(path)?;

        match format {
            Format::Json => serde_json::from_str(&contents).map_err(|e| {
                Error::Serialization(format!("{}: {}", path.display(), e))
            }),
            Format::JsonLines => contents
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(number, line)| {
                    serde_json::from_str(line).map_err(|e| {
                        Error::Serialization(format!("{}:{}: {}", path.display(), number + 1, e))
                    })
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    JsonLines,
}

impl Format {
    fn of(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Format::Json),
            "jsonl" => Some(Format::JsonLines),
            _ => None,
        }
    }
}
