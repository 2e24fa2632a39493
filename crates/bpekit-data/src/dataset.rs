//! # Text Dataset Loader

use std::fs;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

use bpekit::BpeResult;

/// An in-memory text dataset: one document per entry.
#[derive(Debug, Clone, Default)]
pub struct TextDataset {
    docs: Vec<String>,
}

impl TextDataset {
    /// Build a dataset from documents.
    pub fn from_docs<I>(docs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            docs: docs.into_iter().map(Into::into).collect(),
        }
    }

    /// Load a dataset from a path.
    ///
    /// A `.txt` file loads with one document per line. A directory loads
    /// its first `.txt` entry (sorted by name). Anything else is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> BpeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("cannot find dataset at {}", path.display()),
            )
            .into());
        }

        let file = if path.is_dir() {
            find_txt_file(path)?.ok_or_else(|| {
                Error::new(
                    ErrorKind::NotFound,
                    format!("no .txt file in {}", path.display()),
                )
            })?
        } else if path.extension().is_some_and(|ext| ext == "txt") {
            path.to_path_buf()
        } else {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("unsupported dataset file type: {}", path.display()),
            )
            .into());
        };

        let contents = fs::read_to_string(&file)?;
        log::info!("Loaded dataset from {}", file.display());

        Ok(Self::from_docs(contents.lines()))
    }

    /// Keep only the first `ndocs` documents, when given.
    pub fn limit(
        mut self,
        ndocs: Option<usize>,
    ) -> Self {
        if let Some(n) = ndocs {
            self.docs.truncate(n);
        }
        self
    }

    /// Deterministically partition the documents across processes.
    ///
    /// Each rank receives one contiguous chunk; chunk sizes differ by at
    /// most one document.
    pub fn split_by_node(
        mut self,
        rank: usize,
        world_size: usize,
    ) -> Self {
        let world_size = world_size.max(1);
        if rank >= world_size {
            self.docs.clear();
            return self;
        }

        let base = self.docs.len() / world_size;
        let remainder = self.docs.len() % world_size;

        let start = rank * base + rank.min(remainder);
        let len = base + usize::from(rank < remainder);

        self.docs = self.docs.split_off(start);
        self.docs.truncate(len);
        self
    }

    /// The documents.
    pub fn docs(&self) -> &[String] {
        &self.docs
    }

    /// The number of documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Is the dataset empty?
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Find the first `.txt` file in a directory, sorted by name.
fn find_txt_file(dir: &Path) -> BpeResult<Option<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();
    Ok(paths.into_iter().next())
}
