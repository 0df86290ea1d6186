use std::path::{Path, PathBuf};

use tracing::debug;

use crate::document::Document;
use crate::error::DosconfError;
use crate::file;
use crate::ops::{self, ConfResult};
use crate::settings::Settings;
use crate::types::{ConfAction, SearchMode, SearchPath};

/// Entry point for locating, loading and editing configuration files.
pub struct Dosconf;

impl Dosconf {
    pub fn builder() -> DosconfBuilder {
        DosconfBuilder::new()
    }
}

/// Builder for locating and handling configuration files.
///
/// Controls two orthogonal axes (see [`types`](crate::types) for the full picture):
///
/// - **Discovery**: [`search_paths()`](Self::search_paths): where to look for files.
/// - **Resolution**: [`search_mode()`](Self::search_mode): merge all or pick one.
///
/// [`override_path()`](Self::override_path) short-circuits both.
#[derive(Debug)]
pub struct DosconfBuilder {
    app_name: Option<String>,
    file_name: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    search_mode: SearchMode,
    override_path: Option<PathBuf>,
    settings: Option<Settings>,
}

impl DosconfBuilder {
    fn new() -> Self {
        Self {
            app_name: None,
            file_name: None,
            search_paths: None,
            search_mode: SearchMode::default(),
            override_path: None,
            settings: None,
        }
    }

    /// Set the application name (default: `app_name` from [`Settings`]).
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the file name looked up in each directory (default:
    /// `file_name` from [`Settings`]).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Replace the default search paths entirely.
    ///
    /// Paths are listed in **priority-ascending** order: the last entry has the
    /// highest priority. See [`SearchPath`] for the available variants.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Append a search path without replacing the defaults.
    /// If no paths have been set yet, starts from the default `[Platform, Cwd]`.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths
            .get_or_insert_with(default_search_paths)
            .push(path);
        self
    }

    /// Set the search mode (default: [`SearchMode::Merge`]).
    pub fn search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// Use this one file instead of searching. `None` is ignored, so an
    /// optional `--file` argument can be passed straight through.
    pub fn override_path<P: Into<PathBuf>>(mut self, path: Option<P>) -> Self {
        if let Some(p) = path {
            self.override_path = Some(p.into());
        }
        self
    }

    /// Use these settings instead of loading them from the environment.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    fn effective_settings(&self) -> Result<Settings, DosconfError> {
        match &self.settings {
            Some(settings) => Ok(settings.clone()),
            None => Settings::load(None),
        }
    }

    fn effective_app_name(&self, settings: &Settings) -> String {
        self.app_name
            .clone()
            .unwrap_or_else(|| settings.app_name.clone())
    }

    fn effective_file_name(&self, settings: &Settings) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| settings.file_name.clone())
    }

    fn effective_search_paths(&self) -> Vec<SearchPath> {
        self.search_paths
            .clone()
            .unwrap_or_else(default_search_paths)
    }

    /// The file that writes go to.
    pub fn target_path(&self) -> Result<PathBuf, DosconfError> {
        if let Some(path) = &self.override_path {
            return Ok(path.clone());
        }
        let settings = self.effective_settings()?;
        file::resolve_target_path(
            &self.effective_search_paths(),
            &self.effective_file_name(&settings),
            &self.effective_app_name(&settings),
        )
    }

    /// Load the effective document: the override file, or whatever the
    /// search paths yield under the search mode. When no file exists, an
    /// empty document styled after the settings is returned, pointing at
    /// [`target_path`](Self::target_path).
    pub fn load(&self) -> Result<Document, DosconfError> {
        if let Some(path) = &self.override_path {
            return Document::load_from(path);
        }
        let settings = self.effective_settings()?;
        let files = file::load_config_files(
            &self.effective_search_paths(),
            &self.effective_file_name(&settings),
            &self.effective_app_name(&settings),
            self.search_mode,
        )?;
        match file::merge_documents(&files)? {
            Some(doc) => Ok(doc),
            None => {
                let mut doc = fresh_document(&settings);
                doc.set_path(self.target_path()?);
                Ok(doc)
            }
        }
    }

    /// Load only the target file, or start an empty document for it.
    fn load_target(&self) -> Result<Document, DosconfError> {
        let path = self.target_path()?;
        if path.exists() {
            return Document::load_from(&path);
        }
        debug!(path = %path.display(), "target file does not exist yet");
        let mut doc = fresh_document(&self.effective_settings()?);
        doc.set_path(path);
        Ok(doc)
    }

    /// Handle a `ConfAction` and print the result to stdout.
    pub fn handle_and_print(&self, action: &ConfAction) -> Result<(), DosconfError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }

    /// Handle a `ConfAction`.
    ///
    /// Reads (`list`, `sections`, `get`) see the effective document. Writes
    /// change only the target file, which is saved back in its own dialect.
    pub fn handle(&self, action: &ConfAction) -> Result<ConfResult, DosconfError> {
        match action {
            ConfAction::List { section } => {
                let doc = self.load()?;
                ops::list_values(&doc, section.as_deref())
            }
            ConfAction::Sections => Ok(ops::list_sections(&self.load()?)),
            ConfAction::Get { key } => ops::get_value(&self.load()?, key),
            ConfAction::Set { key, value } => {
                let mut doc = self.load_target()?;
                ops::set_value(&mut doc, key, value)?;
                let path = save(&mut doc)?;
                Ok(ConfResult::ValueSet {
                    key: key.clone(),
                    value: value.clone(),
                    path,
                })
            }
            ConfAction::Unset { key } => {
                let mut doc = self.load_target()?;
                ops::unset_value(&mut doc, key)?;
                let path = save(&mut doc)?;
                Ok(ConfResult::ValueUnset {
                    key: key.clone(),
                    path,
                })
            }
            ConfAction::Merge { other } => {
                let mut doc = self.load_target()?;
                let overlay = Document::load_from(other)?;
                doc.merge_with(&overlay)?;
                let path = save(&mut doc)?;
                Ok(ConfResult::Merged {
                    other: other.clone(),
                    path,
                })
            }
            ConfAction::Format { style, newline } => {
                let path = self.target_path()?;
                let mut doc = Document::load_from(&path)?;
                if let Some(style) = style {
                    doc.set_style(*style);
                }
                if let Some(newline) = newline {
                    doc.set_newline(*newline);
                }
                let path = save(&mut doc)?;
                Ok(ConfResult::Formatted { path })
            }
        }
    }
}

fn default_search_paths() -> Vec<SearchPath> {
    vec![SearchPath::Platform, SearchPath::Cwd]
}

fn fresh_document(settings: &Settings) -> Document {
    Document::new()
        .with_style(settings.style())
        .with_newline(settings.newline)
}

/// Write `doc` back to its own path and return that path.
fn save(doc: &mut Document) -> Result<PathBuf, DosconfError> {
    doc.save(true)?;
    Ok(doc.path().map(Path::to_path_buf).unwrap_or_default())
}
