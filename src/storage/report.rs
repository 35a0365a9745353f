use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::Catalog;
use crate::ui::table;

/// Errors raised while exporting a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to write report to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Fixed-width plain-text report of the whole catalog
/// The file is rewritten on every export.
pub struct TextReport {
    path: PathBuf,
}

impl TextReport {
    pub fn new(path: PathBuf) -> Self {
        TextReport { path }
    }

    /// Write the report, returning the number of rows written
    pub fn write(&self, catalog: &Catalog) -> Result<usize, ReportError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ReportError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = table::render(catalog.properties());
        fs::write(&self.path, contents).map_err(|source| ReportError::Io {
            path: self.path.clone(),
            source,
        })?;

        log::info!("Wrote report of {} properties to {:?}", catalog.len(), self.path);
        Ok(catalog.len())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
