use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use rayon::prelude::*;
use serde::Serialize;

use crate::config::ImportOptions;
use crate::error::{EmptyReason, ImportError};
use crate::kml::{import_kml_points, parse_kml, KmlPoint};
use crate::model::{IdGenerator, SiteStore};
use crate::net::fetch::{fetch_text, normalize_url, FetchOptions};
use crate::tabular::{import_tabular, read_csv, rows_from_json, Row, TabularImport};

/// Input formats the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csv,
    Json,
    Kml,
}

/// Pick a format from the file extension, falling back to the first
/// non-blank character of the content.
pub fn detect_format(name: &str, text: &str) -> Result<Format, ImportError> {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") | Some("tsv") | Some("txt") => return Ok(Format::Csv),
        Some("json") => return Ok(Format::Json),
        Some("kml") => return Ok(Format::Kml),
        Some("xlsx") | Some("xls") => {
            return Err(ImportError::UnsupportedFormat(format!(
                "{}: save the sheet as CSV first",
                name
            )))
        }
        Some("kmz") => {
            return Err(ImportError::UnsupportedFormat(format!(
                "{}: unzip the KMZ and import doc.kml",
                name
            )))
        }
        _ => {}
    }

    match text.trim_start_matches('\u{feff}').trim_start().chars().next() {
        Some('<') => Ok(Format::Kml),
        Some('{') | Some('[') => Ok(Format::Json),
        Some(_) => Ok(Format::Csv),
        None => Err(ImportError::NoValidRecords {
            reason: EmptyReason::EmptyInput,
        }),
    }
}

/// What one source parsed into, before it touches the store.
#[derive(Debug, Clone)]
pub enum Parsed {
    Sites(TabularImport),
    Points { points: Vec<KmlPoint>, skipped: usize },
}

/// Counts reported for one imported source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub source: String,
    pub sites: usize,
    pub sectors: usize,
    pub points: usize,
    /// Rows without a site name or coordinates.
    pub rejected_rows: usize,
    /// Placemarks without point geometry.
    pub skipped_placemarks: usize,
    /// Sites dropped by the store for out-of-range coordinates.
    pub dropped_sites: usize,
}

/// Error during an import, tagged with the phase that failed.
#[derive(Debug)]
pub struct PipelineError {
    pub source: ImportError,
    pub phase: &'static str,
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.phase, self.source)
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl PipelineError {
    fn at(phase: &'static str) -> impl FnOnce(ImportError) -> PipelineError {
        move |source| PipelineError { source, phase }
    }
}

/// Clears the in-flight flag when the import finishes, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, PipelineError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(flag))
            .map_err(|_| in_progress())
    }
}

fn in_progress() -> PipelineError {
    PipelineError {
        source: ImportError::ImportInProgress,
        phase: "merge",
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The import pipeline: Read/Fetch → Detect → Parse → Merge into the store.
///
/// One import runs at a time; a second caller gets
/// [`ImportError::ImportInProgress`] instead of waiting.
pub struct ImportEngine {
    store: Mutex<SiteStore>,
    options: ImportOptions,
    fetch: FetchOptions,
    ids: IdGenerator,
    in_flight: AtomicBool,
}

impl ImportEngine {
    pub fn new(options: ImportOptions) -> Self {
        Self {
            store: Mutex::new(SiteStore::new()),
            options,
            fetch: FetchOptions::default(),
            ids: IdGenerator::new(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_fetch_options(mut self, fetch: FetchOptions) -> Self {
        self.fetch = fetch;
        self
    }

    /// Start from an existing store, e.g. one loaded from a saved session.
    pub fn with_store(mut self, store: SiteStore) -> Self {
        self.store = Mutex::new(store);
        self
    }

    pub fn with_ids(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn store(&self) -> MutexGuard<'_, SiteStore> {
        // A panic mid-merge leaves whole sites and points behind, never half of one.
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn into_store(self) -> SiteStore {
        self.store.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    /// Parse text without touching the store.
    pub fn parse_text(&self, name: &str, text: &str) -> Result<Parsed, PipelineError> {
        self.parse_with(name, text, &self.options)
    }

    fn parse_with(&self, name: &str, text: &str, options: &ImportOptions) -> Result<Parsed, PipelineError> {
        let format = detect_format(name, text).map_err(PipelineError::at("parse"))?;
        log::debug!("{}: detected {:?}", name, format);

        match format {
            Format::Csv => {
                let rows = read_csv(text).map_err(PipelineError::at("parse"))?;
                self.parse_rows(&rows, options)
            }
            Format::Json => {
                let value: serde_json::Value = serde_json::from_str(text)
                    .map_err(|e| PipelineError::at("parse")(e.into()))?;
                let rows = rows_from_json(&value).map_err(PipelineError::at("parse"))?;
                self.parse_rows(&rows, options)
            }
            Format::Kml => {
                let parsed = parse_kml(text).map_err(PipelineError::at("parse"))?;
                if parsed.points.is_empty() {
                    log::warn!("{}: no placemarks with point geometry", name);
                    return Err(PipelineError {
                        source: ImportError::NoValidRecords {
                            reason: EmptyReason::EmptyInput,
                        },
                        phase: "parse",
                    });
                }
                Ok(Parsed::Points {
                    points: parsed.points,
                    skipped: parsed.skipped,
                })
            }
        }
    }

    fn parse_rows(&self, rows: &[Row], options: &ImportOptions) -> Result<Parsed, PipelineError> {
        import_tabular(rows, options, &self.ids)
            .map(Parsed::Sites)
            .map_err(PipelineError::at("parse"))
    }

    fn merge(&self, name: &str, parsed: Parsed) -> ImportSummary {
        let mut summary = ImportSummary {
            source: name.to_string(),
            ..ImportSummary::default()
        };
        let mut store = self.store();

        match parsed {
            Parsed::Sites(import) => {
                let offered = import.sites.len();
                summary.sectors = import.sector_count();
                summary.rejected_rows = import.rejected_rows;
                summary.sites = store.add_sites(import.sites);
                summary.dropped_sites = offered - summary.sites;
            }
            Parsed::Points { points, skipped } => {
                let points = import_kml_points(points, name, &self.options.point_defaults, &self.ids);
                summary.skipped_placemarks = skipped;
                summary.points = store.add_points(points);
            }
        }

        log::info!(
            "{}: imported {} sites, {} sectors, {} points",
            name,
            summary.sites,
            summary.sectors,
            summary.points
        );
        summary
    }

    /// Parse `text` and merge the result into the store.
    pub fn import_text(&self, name: &str, text: &str) -> Result<ImportSummary, PipelineError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let parsed = self.parse_text(name, text)?;
        Ok(self.merge(name, parsed))
    }

    /// Import already-decoded JSON rows, e.g. a remote table payload.
    /// Sites are grouped under the table name.
    pub fn import_json(&self, name: &str, value: &serde_json::Value) -> Result<ImportSummary, PipelineError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let rows = rows_from_json(value).map_err(PipelineError::at("parse"))?;
        let parsed = self.parse_rows(&rows, &self.remote_options(name))?;
        Ok(self.merge(name, parsed))
    }

    fn remote_options(&self, name: &str) -> ImportOptions {
        self.options.clone().with_group(name)
    }

    pub fn import_file(&self, path: &Path) -> Result<ImportSummary, PipelineError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let (name, text) = read_source(path)?;
        let parsed = self.parse_text(&name, &text)?;
        Ok(self.merge(&name, parsed))
    }

    /// Fetch a remote file and import it under its last path segment, which
    /// also becomes the group of any sites it holds.
    pub fn import_url(&self, url: &str) -> Result<ImportSummary, PipelineError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let fetched = fetch_text(url, &self.fetch).map_err(PipelineError::at("fetch"))?;
        let name = source_name_for_url(&fetched.url);
        let parsed = self.parse_with(&name, &fetched.body, &self.remote_options(&name))?;
        Ok(self.merge(&name, parsed))
    }

    /// Import several files: read and parse in parallel, then merge one at
    /// a time in input order.
    ///
    /// A failing file does not stop the others; its slot holds the error.
    /// When another import is running every slot holds
    /// [`ImportError::ImportInProgress`].
    pub fn import_files(&self, paths: &[PathBuf]) -> Vec<Result<ImportSummary, PipelineError>> {
        let _guard = match InFlight::acquire(&self.in_flight) {
            Ok(g) => g,
            Err(_) => return paths.iter().map(|_| Err(in_progress())).collect(),
        };

        let parsed: Vec<Result<(String, Parsed), PipelineError>> = paths
            .par_iter()
            .map(|path| -> Result<(String, Parsed), PipelineError> {
                let (name, text) = read_source(path)?;
                let parsed = self.parse_text(&name, &text)?;
                Ok((name, parsed))
            })
            .collect();

        parsed
            .into_iter()
            .map(|r| r.map(|(name, parsed)| self.merge(&name, parsed)))
            .collect()
    }
}

impl Default for ImportEngine {
    fn default() -> Self {
        Self::new(ImportOptions::default())
    }
}

/// Read a file as text. Bytes that are not UTF-8 (Latin-1 exports) become
/// U+FFFD instead of failing the whole file.
fn read_source(path: &Path) -> Result<(String, String), PipelineError> {
    let bytes = std::fs::read(path).map_err(|source| PipelineError {
        source: ImportError::Io {
            path: path.to_path_buf(),
            source,
        },
        phase: "read",
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("{}: not valid UTF-8, undecodable bytes replaced", name);
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    Ok((name, text))
}

/// Last non-empty path segment, or the host when the path is bare.
pub fn source_name_for_url(url: &str) -> String {
    let Ok(parsed) = normalize_url(url) else {
        return url.to_string();
    };
    parsed
        .path_segments()
        .and_then(|segs| segs.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .or_else(|| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}
