use csv::StringRecord;

use crate::errors::ParserError;
use crate::model::SensorKind;
use crate::reference::RoomReference;

use super::schema::SITE_PREFIX;
use super::{
    decimal_point, field, first_floor, hour_key, min_width, HeaderIndex, RowTransformer, SeenKeys,
};

pub(crate) struct EnergyRows {
    timestamp: usize,
    sensor_id: Option<usize>,
    energy: usize,
    room: Option<usize>,
    floor: Option<usize>,
    zone: Option<usize>,
    seen: SeenKeys,
}

impl RowTransformer for EnergyRows {
    const NAME: &'static str = "ENERGY";
    const KIND: SensorKind = SensorKind::Energy;

    fn bind(header: &HeaderIndex) -> Result<Self, ParserError> {
        Ok(Self {
            timestamp: header.required(Self::NAME, "timestamp")?,
            sensor_id: header.optional("sensor id"),
            energy: header.required(Self::NAME, "energy")?,
            room: header.optional("room"),
            floor: header.optional("floor"),
            zone: header.optional("zone"),
            seen: SeenKeys::default(),
        })
    }

    fn min_width(&self) -> usize {
        min_width(&[
            Some(self.timestamp),
            self.sensor_id,
            Some(self.energy),
            self.room,
            self.floor,
            self.zone,
        ])
    }

    fn rewrite(&mut self, record: &StringRecord, rooms: &RoomReference) -> Option<Vec<String>> {
        let timestamp = field(record, Some(self.timestamp));
        let uid = sensor_uid(field(record, self.sensor_id));
        let room = field(record, self.room);
        let floor = first_floor(field(record, self.floor));
        let zone = field(record, self.zone);

        if !self
            .seen
            .first_time(&[hour_key(timestamp), uid, room, floor, zone])
        {
            return None;
        }

        let (alias, designation) = rooms.enrichment(room);
        Some(vec![
            timestamp.to_string(),
            uid.to_string(),
            decimal_point(field(record, Some(self.energy))),
            room.to_string(),
            floor.to_string(),
            zone.to_string(),
            alias.to_string(),
            designation.to_string(),
        ])
    }
}

/// Text after the site prefix up to its last underscore; empty when either is missing.
fn sensor_uid(sensor_id: &str) -> &str {
    let Some(start) = sensor_id.find(SITE_PREFIX) else {
        return "";
    };
    let rest = &sensor_id[start + SITE_PREFIX.len()..];
    match rest.rfind('_') {
        Some(end) if end > 0 => &rest[..end],
        _ => "",
    }
}
