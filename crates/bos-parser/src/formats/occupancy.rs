use csv::StringRecord;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ParserError;
use crate::model::SensorKind;
use crate::reference::RoomReference;

use super::{field, min_width, HeaderIndex, RowTransformer};

static SENSOR_UID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/OnDijon_[^/]+/([^_]+)_OrPresence").expect("occupancy sensor pattern is valid")
});

pub(crate) struct OccupancyRows {
    timestamp: usize,
    sensor_id: Option<usize>,
    status: usize,
    room: Option<usize>,
    floor: Option<usize>,
    zone: Option<usize>,
}

impl RowTransformer for OccupancyRows {
    const NAME: &'static str = "OCCUPANCY";
    const KIND: SensorKind = SensorKind::Occupancy;

    fn bind(header: &HeaderIndex) -> Result<Self, ParserError> {
        Ok(Self {
            timestamp: header.required(Self::NAME, "timestamp")?,
            sensor_id: header.optional("sensor id"),
            status: header.required(Self::NAME, "occupancy status")?,
            room: header.optional("room"),
            floor: header.optional("floor"),
            zone: header.optional("zone"),
        })
    }

    fn min_width(&self) -> usize {
        min_width(&[
            Some(self.timestamp),
            self.sensor_id,
            Some(self.status),
            self.room,
            self.floor,
            self.zone,
        ])
    }

    fn rewrite(&mut self, record: &StringRecord, rooms: &RoomReference) -> Option<Vec<String>> {
        let room = field(record, self.room);
        let (alias, designation) = rooms.enrichment(room);

        Some(vec![
            field(record, Some(self.timestamp)).to_string(),
            sensor_uid(field(record, self.sensor_id)).to_string(),
            field(record, Some(self.status)).to_string(),
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
        .map_or("", |uid| uid.as_str())
}
