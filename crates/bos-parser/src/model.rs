use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Temperature,
    Water,
    Energy,
    Occupancy,
}

impl SensorKind {
    /// Recognition order used by the classifier.
    pub const ALL: [SensorKind; 4] = [
        SensorKind::Temperature,
        SensorKind::Water,
        SensorKind::Energy,
        SensorKind::Occupancy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Water => "water",
            SensorKind::Energy => "energy",
            SensorKind::Occupancy => "occupancy",
        }
    }

    /// Filename prefix checked (case-insensitively) before the full pattern.
    pub fn filename_prefix(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature_",
            SensorKind::Water => "water_",
            SensorKind::Energy => "energy_Power",
            SensorKind::Occupancy => "occupancy",
        }
    }

    /// Whether clean filenames carry the base label extracted from the raw name.
    pub fn has_base_label(&self) -> bool {
        matches!(self, SensorKind::Temperature | SensorKind::Energy)
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Month/year components of a clean filename, e.g. `03` / `25`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub month: String,
    pub year: String,
}

/// What the classifier extracted from a raw filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: SensorKind,
    pub base: Option<String>,
    pub month_token: String,
    pub year_token: String,
}

impl Classification {
    pub fn period(&self) -> Period {
        crate::registry::resolve_period(&self.month_token, &self.year_token)
    }

    pub fn target_name(&self) -> String {
        let Period { month, year } = self.period();
        match (&self.base, self.kind.has_base_label()) {
            (Some(base), true) => format!("{base}_{month}_{year}_clean.csv"),
            _ => format!("{}_{month}_{year}_clean.csv", self.kind.as_str()),
        }
    }
}

/// A staged file together with its classification, if any.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub path: PathBuf,
    pub classification: Option<Classification>,
}

impl StagedFile {
    pub fn inspect(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let classification = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(crate::registry::classify_filename);
        Self {
            path,
            classification,
        }
    }

    pub fn kind(&self) -> Option<SensorKind> {
        self.classification.as_ref().map(|c| c.kind)
    }

    pub fn into_job(self) -> Option<TransformJob> {
        let classification = self.classification?;
        Some(TransformJob {
            target: classification.target_name(),
            kind: classification.kind,
            source: self.path,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformJob {
    source: PathBuf,
    target: String,
    kind: SensorKind,
}

impl TransformJob {
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }
}

/// Row counts reported by a single transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransformSummary {
    pub kind: SensorKind,
    pub rows_read: usize,
    pub rows_written: usize,
}
