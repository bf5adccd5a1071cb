use crate::model::SensorKind;

pub const TEMPERATURE_COLUMNS: [&str; 9] = [
    "timestamp",
    "sensor_uid",
    "temperature",
    "isValidSensor",
    "room",
    "floor",
    "zone",
    "alias",
    "designation",
];

pub const WATER_COLUMNS: [&str; 4] = ["timestamp", "display_name", "water", "floor"];

pub const ENERGY_COLUMNS: [&str; 8] = [
    "timestamp",
    "sensor_uid",
    "energy",
    "room",
    "floor",
    "zone",
    "alias",
    "designation",
];

pub const OCCUPANCY_COLUMNS: [&str; 8] = [
    "timestamp",
    "sensor_uid",
    "occupancy_status",
    "room",
    "floor",
    "zone",
    "alias",
    "designation",
];

/// Fixed header written at the top of every clean file of the given kind.
pub fn output_columns(kind: SensorKind) -> &'static [&'static str] {
    match kind {
        SensorKind::Temperature => &TEMPERATURE_COLUMNS,
        SensorKind::Water => &WATER_COLUMNS,
        SensorKind::Energy => &ENERGY_COLUMNS,
        SensorKind::Occupancy => &OCCUPANCY_COLUMNS,
    }
}

/// Site path segment shared by every composite sensor identifier.
pub(crate) const SITE_PREFIX: &str = "/OnDijon_";
