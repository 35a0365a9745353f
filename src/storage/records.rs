use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::models::{Catalog, HEADER, Property};

/// Errors raised while reading or writing the property file
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unexpected header in {path:?}: found {found:?}, expected ID,Location,Price,Bedrooms,Status")]
    Header { path: PathBuf, found: Vec<String> },

    #[error("Malformed record at line {line} of {path:?}: {message}")]
    Malformed {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("Failed to back up {path:?} to {backup:?}: {source}")]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error on {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// What to do with the previous file before it is overwritten
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackupPolicy {
    /// Never write a backup
    Disabled,
    /// Try to back up, log and continue on failure
    BestEffort,
    /// Abort the save if the backup cannot be written
    #[default]
    Required,
}

/// Record terminator of the property file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// Classify by how the header line ends
    fn detect(first_line: &[u8]) -> Self {
        if first_line.ends_with(b"\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    fn terminator(self) -> csv::Terminator {
        match self {
            LineEnding::Lf => csv::Terminator::Any(b'\n'),
            LineEnding::CrLf => csv::Terminator::CRLF,
        }
    }
}

/// Trait for property persistence
pub trait PropertyStore {
    /// Load the whole collection, creating an empty store if needed
    fn load(&self) -> Result<Catalog, StoreError>;

    /// Replace the whole collection on disk
    fn save(&self, catalog: &Catalog) -> Result<(), StoreError>;

    /// Get the storage file path
    fn path(&self) -> &Path;
}

/// CSV-backed implementation of PropertyStore
/// Uses atomic write pattern with .tmp file, plus an optional .bak snapshot
pub struct CsvPropertyStore {
    path: PathBuf,
    backup: BackupPolicy,
}

impl CsvPropertyStore {
    /// Create a new CsvPropertyStore for the given file and backup policy
    pub fn new(path: PathBuf, backup: BackupPolicy) -> Self {
        CsvPropertyStore { path, backup }
    }

    /// Path of the backup snapshot (`properties.csv` -> `properties.csv.bak`)
    pub fn backup_path(&self) -> PathBuf {
        sibling(&self.path, ".bak")
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> StoreError {
        match source.kind() {
            csv::ErrorKind::UnequalLengths { pos, .. } | csv::ErrorKind::Deserialize { pos, .. } => {
                StoreError::Malformed {
                    path: self.path.clone(),
                    line: pos.as_ref().map_or(0, |p| p.line()),
                    message: source.to_string(),
                }
            }
            _ => StoreError::Csv {
                path: self.path.clone(),
                source,
            },
        }
    }

    fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Write a file containing only the header row
    fn create_empty(&self) -> Result<(), StoreError> {
        self.ensure_parent()?;
        let bytes = encode(&[], LineEnding::Lf).map_err(|e| self.csv_error(e))?;
        fs::write(&self.path, bytes).map_err(|e| self.io_error(e))?;
        log::info!("Created new property file at {:?}", self.path);
        Ok(())
    }

    /// Line ending of the file about to be replaced, `\n` when there is none
    fn existing_line_ending(&self) -> Result<LineEnding, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LineEnding::Lf),
            Err(e) => return Err(self.io_error(e)),
        };
        let mut header = Vec::new();
        BufReader::new(file)
            .read_until(b'\n', &mut header)
            .map_err(|e| self.io_error(e))?;
        Ok(LineEnding::detect(&header))
    }

    /// Copy the current file to its .bak sibling according to the policy
    fn backup_existing(&self) -> Result<(), StoreError> {
        if self.backup == BackupPolicy::Disabled || !self.path.exists() {
            return Ok(());
        }

        let backup = self.backup_path();
        match fs::copy(&self.path, &backup) {
            Ok(_) => {
                log::debug!("Backed up {:?} to {:?}", self.path, backup);
                Ok(())
            }
            Err(source) if self.backup == BackupPolicy::BestEffort => {
                log::warn!(
                    "Backup of {:?} to {:?} failed, saving anyway: {}",
                    self.path,
                    backup,
                    source
                );
                Ok(())
            }
            Err(source) => {
                log::error!("Backup of {:?} failed, aborting save: {}", self.path, source);
                Err(StoreError::Backup {
                    path: self.path.clone(),
                    backup,
                    source,
                })
            }
        }
    }
}

impl PropertyStore for CsvPropertyStore {
    fn load(&self) -> Result<Catalog, StoreError> {
        if !self.path.exists() {
            self.create_empty()?;
        }

        let bytes = fs::read(&self.path).map_err(|e| self.io_error(e))?;
        if bytes.is_empty() {
            log::warn!("Property file {:?} is empty, treating as no records", self.path);
            return Ok(Catalog::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes.as_slice());

        let headers = reader.headers().map_err(|e| self.csv_error(e))?;
        if headers.iter().ne(HEADER.iter().copied()) {
            return Err(StoreError::Header {
                path: self.path.clone(),
                found: headers.iter().map(str::to_string).collect(),
            });
        }

        let properties = reader
            .deserialize::<Property>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.csv_error(e))?;

        log::info!("Loaded {} properties from {:?}", properties.len(), self.path);
        Ok(Catalog::from_properties(properties))
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let ending = self.existing_line_ending()?;
        let bytes = encode(catalog.properties(), ending).map_err(|e| self.csv_error(e))?;

        self.ensure_parent()?;
        self.backup_existing()?;

        // Atomic write pattern: write to .tmp, then rename
        let tmp_path = sibling(&self.path, ".tmp");
        fs::write(&tmp_path, &bytes).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;

        log::debug!("Saved {} properties to {:?}", catalog.len(), self.path);
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Serialize the header plus all properties to CSV bytes
fn encode(properties: &[Property], ending: LineEnding) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(ending.terminator())
        .from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for property in properties {
        writer.serialize(property)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Append a suffix to the full file name (`a.csv` + `.bak` -> `a.csv.bak`)
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
