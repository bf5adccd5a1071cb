use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::action_log::ActionLog;
use crate::cleaning::{self, CleanOutcome, CleanRequest};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};

/// Staging and clean directories plus the action log, as exposed to the dashboard.
#[derive(Debug)]
pub struct Workspace {
    config: PipelineConfig,
    log: ActionLog,
}

impl Workspace {
    /// Workspace backed by the action-log file named in `config`.
    pub fn from_config(config: PipelineConfig) -> Self {
        let log = ActionLog::file(config.action_log_file.clone());
        Self::new(config, log)
    }

    pub fn new(config: PipelineConfig, log: ActionLog) -> Self {
        if let Some(dir) = log.path().and_then(Path::parent) {
            if let Err(err) = fs::create_dir_all(dir) {
                warn!(path = %dir.display(), error = %err, "could not create action log directory");
            }
        }
        Self { config, log }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn action_log(&self) -> Vec<String> {
        self.log.entries()
    }

    pub fn list_staged(&self) -> Result<Vec<String>> {
        list_existing(&self.config.staging_dir)
    }

    pub fn list_clean(&self) -> Result<Vec<String>> {
        list_existing(&self.config.clean_dir)
    }

    /// Copy `source` into staging under its own file name, replacing any staged file of that name.
    pub fn stage_file(&self, source: &Path) -> Result<String> {
        let name = source
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| PipelineError::InvalidName(source.display().to_string()))?;
        let contents = fs::read(source)?;
        self.stage_bytes(name, &contents)
    }

    pub fn stage_bytes(&self, name: &str, contents: &[u8]) -> Result<String> {
        let name = bare_name(name).ok_or_else(|| PipelineError::InvalidName(name.to_string()))?;
        fs::create_dir_all(&self.config.staging_dir)?;
        let dest = self.config.staging_dir.join(name);
        fs::write(&dest, contents)?;
        debug!(path = %dest.display(), bytes = contents.len(), "staged file");
        self.log.record(&format!("Imported into staging: {name}"));
        Ok(name.to_string())
    }

    /// `Ok(false)` when no such staged file exists.
    pub fn delete_staged(&self, name: &str) -> Result<bool> {
        self.delete_from(&self.config.staging_dir, name, "staging")
    }

    /// `Ok(false)` when no such clean file exists.
    pub fn delete_clean(&self, name: &str) -> Result<bool> {
        self.delete_from(&self.config.clean_dir, name, "clean")
    }

    pub fn run_clean(&self, overwrite: bool) -> CleanOutcome {
        let request = CleanRequest {
            staging_dir: &self.config.staging_dir,
            clean_dir: &self.config.clean_dir,
            reference_file: &self.config.reference_file,
            overwrite,
        };
        cleaning::run_clean(&request, &self.log)
    }

    fn delete_from(&self, dir: &Path, name: &str, area: &str) -> Result<bool> {
        let Some(name) = bare_name(name) else {
            return Ok(false);
        };
        let path: PathBuf = dir.join(name);
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        self.log.record(&format!("Deleted from {area}: {name}"));
        Ok(true)
    }
}

/// Names of the regular files in `dir`, sorted.
pub(crate) fn list_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

fn list_existing(dir: &Path) -> Result<Vec<String>> {
    match list_files(dir) {
        Ok(names) => Ok(names),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

/// `name` when it is a plain file name with no directory components.
fn bare_name(name: &str) -> Option<&str> {
    let is_bare = !name.is_empty()
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name() == Some(OsStr::new(name));
    is_bare.then_some(name)
}
