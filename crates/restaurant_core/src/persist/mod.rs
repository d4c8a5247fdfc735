//! Extent snapshot files.
//!
//! # Responsibility
//! - Save one extent at a time to `<Kind>_Extent.<xml|json>`.
//! - Restore one extent at a time, degrading to an empty extent on any
//!   read or parse failure.
//!
//! # Invariants
//! - Saves replace the target file atomically; a failed save leaves the
//!   previous file untouched.
//! - Loads never leave an extent partially populated.
//! - Metadata is attached beside the records and never alters record fields.

use crate::extent::{Entity, Extent};
use chrono::Local;
use log::{error, info, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

mod json;
mod xml;

pub type PersistResult<T> = Result<T, PersistError>;

const GENERATED_ON_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DEFAULT_GENERATOR: &str = "restaurant_core";

/// On-disk document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtentFormat {
    #[default]
    Xml,
    Json,
}

impl ExtentFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
        }
    }

    /// Resolves a format from a file extension, ignoring case.
    pub fn from_extension(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "xml" => Some(Self::Xml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Where and how extents are stored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub format: ExtentFormat,
    /// Written to the `GeneratedBy` metadata field.
    pub generated_by: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            format: ExtentFormat::default(),
            generated_by: DEFAULT_GENERATOR.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>, format: ExtentFormat) -> Self {
        Self {
            data_dir: data_dir.into(),
            format,
            ..Self::default()
        }
    }
}

/// Errors from reading or writing extent files.
#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    XmlWrite(quick_xml::SeError),
    XmlRead(quick_xml::DeError),
    Json(serde_json::Error),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "extent file I/O failed: {err}"),
            Self::XmlWrite(err) => write!(f, "extent XML serialization failed: {err}"),
            Self::XmlRead(err) => write!(f, "extent XML is malformed: {err}"),
            Self::Json(err) => write!(f, "extent JSON is malformed: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::XmlWrite(err) => Some(err),
            Self::XmlRead(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<quick_xml::SeError> for PersistError {
    fn from(value: quick_xml::SeError) -> Self {
        Self::XmlWrite(value)
    }
}

impl From<quick_xml::DeError> for PersistError {
    fn from(value: quick_xml::DeError) -> Self {
        Self::XmlRead(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Generator identity and timestamp written beside the records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtentMetadata {
    pub generated_by: String,
    pub generated_on: String,
}

impl ExtentMetadata {
    fn now(generated_by: &str) -> Self {
        Self {
            generated_by: generated_by.to_string(),
            generated_on: Local::now().format(GENERATED_ON_FORMAT).to_string(),
        }
    }
}

/// Records read back from disk, or why none were.
#[derive(Debug)]
pub enum LoadOutcome<T> {
    Loaded(Vec<T>),
    /// No file yet; expected on first run.
    Missing,
    /// File existed but could not be read or parsed.
    Recovered(PersistError),
}

impl<T> LoadOutcome<T> {
    /// Records to install; empty for `Missing` and `Recovered`.
    pub fn into_records(self) -> Vec<T> {
        match self {
            Self::Loaded(records) => records,
            Self::Missing | Self::Recovered(_) => Vec::new(),
        }
    }
}

/// Summary of one `ExtentStore::load_into` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded { count: usize },
    Missing,
    Recovered { reason: String },
}

/// File-backed snapshot store, one file per entity kind.
#[derive(Debug, Clone, Default)]
pub struct ExtentStore {
    config: StoreConfig,
}

impl ExtentStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// `<data_dir>/<Kind>_Extent.<ext>`.
    pub fn path_for<T: Entity>(&self) -> PathBuf {
        self.config.data_dir.join(format!(
            "{}_Extent.{}",
            T::KIND,
            self.config.format.extension()
        ))
    }

    /// Writes the current extent contents.
    ///
    /// # Errors
    /// Returns the serialization or I/O error; the previous file, if any, is
    /// left as it was.
    pub fn save<T: Entity>(&self, extent: &Extent<T>) -> PersistResult<PathBuf> {
        let started_at = Instant::now();
        let path = self.path_for::<T>();
        match self.write_extent(extent, &path) {
            Ok(()) => {
                info!(
                    "event=extent_save module=persist status=ok kind={} count={} path={} duration_ms={}",
                    T::KIND,
                    extent.len(),
                    path.display(),
                    started_at.elapsed().as_millis()
                );
                Ok(path)
            }
            Err(err) => {
                error!(
                    "event=extent_save module=persist status=error kind={} path={} error={}",
                    T::KIND,
                    path.display(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Reads the persisted extent of kind `T`.
    ///
    /// Never fails: a missing file yields `Missing`, any other failure yields
    /// `Recovered` after logging it.
    pub fn load<T: Entity>(&self) -> LoadOutcome<T> {
        let path = self.path_for::<T>();
        if !path.exists() {
            info!(
                "event=extent_load module=persist status=skip kind={} reason=missing_file path={}",
                T::KIND,
                path.display()
            );
            return LoadOutcome::Missing;
        }

        match self.read_extent::<T>(&path) {
            Ok(records) => {
                info!(
                    "event=extent_load module=persist status=ok kind={} count={} path={}",
                    T::KIND,
                    records.len(),
                    path.display()
                );
                LoadOutcome::Loaded(records)
            }
            Err(err) => {
                warn!(
                    "event=extent_load module=persist status=error kind={} path={} fallback=empty error={}",
                    T::KIND,
                    path.display(),
                    err
                );
                LoadOutcome::Recovered(err)
            }
        }
    }

    /// Loads kind `T` and swaps it into `extent` in one step.
    pub fn load_into<T: Entity>(&self, extent: &mut Extent<T>) -> LoadStatus {
        match self.load::<T>() {
            LoadOutcome::Loaded(records) => {
                extent.replace(records);
                LoadStatus::Loaded {
                    count: extent.len(),
                }
            }
            LoadOutcome::Missing => {
                extent.clear();
                LoadStatus::Missing
            }
            LoadOutcome::Recovered(err) => {
                extent.clear();
                LoadStatus::Recovered {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn write_extent<T: Entity>(&self, extent: &Extent<T>, path: &Path) -> PersistResult<()> {
        let metadata = ExtentMetadata::now(&self.config.generated_by);
        let document = match self.config.format {
            ExtentFormat::Xml => xml::encode(extent.all(), &metadata)?,
            ExtentFormat::Json => json::encode(extent.all(), &metadata)?,
        };

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(document.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|err| err.error)?;
        Ok(())
    }

    fn read_extent<T: Entity>(&self, path: &Path) -> PersistResult<Vec<T>> {
        let text = std::fs::read_to_string(path)?;
        match self.config.format {
            ExtentFormat::Xml => xml::decode(&text),
            ExtentFormat::Json => json::decode(&text),
        }
    }
}
