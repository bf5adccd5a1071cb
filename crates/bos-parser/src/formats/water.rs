use csv::StringRecord;

use crate::errors::ParserError;
use crate::model::SensorKind;
use crate::reference::RoomReference;

use super::{field, first_floor, hour_key, min_width, HeaderIndex, RowTransformer, SeenKeys};

/// Suffix appended by the metering export to every water display name.
const METER_SUFFIX: &str = " - Compteur Volume d'Eau";

pub(crate) struct WaterRows {
    timestamp: usize,
    display_name: Option<usize>,
    water: usize,
    floor: Option<usize>,
    seen: SeenKeys,
}

impl RowTransformer for WaterRows {
    const NAME: &'static str = "WATER";
    const KIND: SensorKind = SensorKind::Water;

    fn bind(header: &HeaderIndex) -> Result<Self, ParserError> {
        Ok(Self {
            timestamp: header.required(Self::NAME, "timestamp")?,
            display_name: header.optional("display name"),
            water: header.required(Self::NAME, "water")?,
            floor: header.optional("floor"),
            seen: SeenKeys::default(),
        })
    }

    fn min_width(&self) -> usize {
        min_width(&[Some(self.timestamp), self.display_name, Some(self.water), self.floor])
    }

    fn rewrite(&mut self, record: &StringRecord, _rooms: &RoomReference) -> Option<Vec<String>> {
        let timestamp = field(record, Some(self.timestamp));
        let display = display_name(field(record, self.display_name));
        let water = field(record, Some(self.water));
        let floor = first_floor(field(record, self.floor));

        if !self.seen.first_time(&[hour_key(timestamp), display, water, floor]) {
            return None;
        }

        Some(vec![
            timestamp.to_string(),
            display.to_string(),
            water.to_string(),
            floor.to_string(),
        ])
    }
}

fn display_name(raw: &str) -> &str {
    match raw.find(METER_SUFFIX) {
        Some(cut) => raw[..cut].trim(),
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_drops_meter_suffix() {
        assert_eq!(
            display_name("Sanitaires RDC  - Compteur Volume d'Eau (m3)"),
            "Sanitaires RDC"
        );
        assert_eq!(display_name(" Cuisine "), " Cuisine ");
    }
}
