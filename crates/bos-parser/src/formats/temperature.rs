use csv::StringRecord;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ParserError;
use crate::model::SensorKind;
use crate::reference::RoomReference;

use super::{decimal_point, field, min_width, HeaderIndex, RowTransformer};

static SENSOR_UID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/OnDijon_Center_01/([A-Za-z0-9]+)_AvgTemperature")
        .expect("temperature sensor pattern is valid")
});

pub(crate) struct TemperatureRows {
    timestamp: usize,
    sensor_id: Option<usize>,
    temperature: usize,
    room: Option<usize>,
    floor: Option<usize>,
    zone: Option<usize>,
}

impl RowTransformer for TemperatureRows {
    const NAME: &'static str = "TEMPERATURE";
    const KIND: SensorKind = SensorKind::Temperature;

    fn bind(header: &HeaderIndex) -> Result<Self, ParserError> {
        Ok(Self {
            timestamp: header.required(Self::NAME, "timestamp")?,
            sensor_id: header.optional("sensor id"),
            temperature: header.required(Self::NAME, "temperature")?,
            room: header.optional("room"),
            floor: header.optional("floor"),
            zone: header.optional("zone"),
        })
    }

    fn min_width(&self) -> usize {
        min_width(&[
            Some(self.timestamp),
            self.sensor_id,
            Some(self.temperature),
            self.room,
            self.floor,
            self.zone,
        ])
    }

    fn rewrite(&mut self, record: &StringRecord, rooms: &RoomReference) -> Option<Vec<String>> {
        let timestamp = field(record, Some(self.timestamp));
        let sensor_id = field(record, self.sensor_id);
        let raw_value = field(record, Some(self.temperature));
        let room = field(record, self.room);
        let (alias, designation) = rooms.enrichment(room);

        Some(vec![
            timestamp.to_string(),
            sensor_uid(sensor_id).to_string(),
            raw_value.to_string(),
            validity_flag(raw_value).to_string(),
            room.to_string(),
            field(record, self.floor).to_string(),
            field(record, self.zone).to_string(),
            alias.to_string(),
            designation.to_string(),
        ])
    }
}

fn sensor_uid(sensor_id: &str) -> &str {
    SENSOR_UID
        .captures(sensor_id)
        .and_then(|captures| captures.get(1))
        .map_or(sensor_id, |uid| uid.as_str())
}

/// Spelled-out non-finite readings accepted by the exporting side; `inf` and friends are not.
const NON_FINITE_WORDS: [&str; 2] = ["infinity", "nan"];

/// `True` when the reading is numeric (comma or dot decimals) and nonzero.
fn validity_flag(raw_value: &str) -> &'static str {
    match parse_reading(raw_value) {
        Some(value) if value != 0.0 => "True",
        _ => "False",
    }
}

fn parse_reading(raw_value: &str) -> Option<f64> {
    let text = decimal_point(raw_value);
    let text = text.trim();
    let unsigned = text.trim_start_matches(['+', '-']);
    if unsigned.chars().all(|c| c.is_ascii_alphabetic())
        && !NON_FINITE_WORDS
            .iter()
            .any(|word| unsigned.eq_ignore_ascii_case(word))
    {
        return None;
    }
    text.parse().ok()
}
