use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use tracing::{debug, warn};

use crate::errors::ParserError;

const PARSER: &str = "ROOM_REFERENCE";

/// Header naming the room code column.
const ROOM_COLUMN: &str = "Name";
/// Alias and designation are positional in the reference export.
const ALIAS_INDEX: usize = 8;
const DESIGNATION_INDEX: usize = 13;

/// Longest alias carried into clean rows; anything longer is a free-form name.
pub const MAX_ALIAS_LEN: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomEntry {
    pub alias: String,
    pub designation: String,
}

impl RoomEntry {
    /// Alias suitable for output rows: empty when longer than [`MAX_ALIAS_LEN`].
    pub fn short_alias(&self) -> &str {
        if self.alias.chars().count() > MAX_ALIAS_LEN {
            ""
        } else {
            &self.alias
        }
    }
}

/// Room code to alias/designation lookup, loaded once per clean run.
#[derive(Debug, Clone, Default)]
pub struct RoomReference {
    rooms: HashMap<String, RoomEntry>,
}

impl RoomReference {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the reference table, degrading to an empty lookup on any failure.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(reference) => {
                debug!(path = %path.display(), rooms = reference.len(), "loaded room reference");
                reference
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "room reference unavailable, continuing without enrichment");
                Self::empty()
            }
        }
    }

    /// A missing file is an empty reference; other I/O and CSV failures are errors.
    pub fn try_load(path: &Path) -> Result<Self, ParserError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::empty()),
            Err(source) => {
                return Err(ParserError::Io {
                    parser: PARSER,
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ParserError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .quoting(false)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header = reader
            .byte_headers()
            .map_err(|err| ParserError::csv(PARSER, err))?
            .clone();
        let room_idx = header
            .iter()
            .position(|name| String::from_utf8_lossy(name).trim() == ROOM_COLUMN)
            .unwrap_or(0);
        let highest = room_idx.max(ALIAS_INDEX).max(DESIGNATION_INDEX);

        let mut rooms = HashMap::new();
        let mut record = ByteRecord::new();
        while reader
            .read_byte_record(&mut record)
            .map_err(|err| ParserError::csv(PARSER, err))?
        {
            if record.len() <= highest {
                continue;
            }
            let room = text(&record, room_idx);
            let room = room.trim();
            if room.is_empty() {
                continue;
            }
            rooms.insert(
                room.to_string(),
                RoomEntry {
                    alias: unquote(&text(&record, ALIAS_INDEX)),
                    designation: unquote(&text(&record, DESIGNATION_INDEX)),
                },
            );
        }

        Ok(Self { rooms })
    }

    pub fn get(&self, room: &str) -> Option<&RoomEntry> {
        self.rooms.get(room)
    }

    /// `(alias, designation)` for an output row; both empty for unknown rooms.
    pub fn enrichment(&self, room: &str) -> (&str, &str) {
        self.get(room)
            .map(|entry| (entry.short_alias(), entry.designation.as_str()))
            .unwrap_or(("", ""))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

fn text(record: &ByteRecord, idx: usize) -> String {
    record
        .get(idx)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default()
}

fn unquote(value: &str) -> String {
    value.trim().replace('"', "")
}
