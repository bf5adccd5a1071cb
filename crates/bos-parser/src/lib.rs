pub mod errors;
pub mod formats;
pub mod model;
pub mod reference;
mod registry;

pub use errors::ParserError;
pub use formats::schema::output_columns;
pub use formats::{transform, transform_file};
pub use model::{Classification, Period, SensorKind, StagedFile, TransformJob, TransformSummary};
pub use reference::{RoomEntry, RoomReference, MAX_ALIAS_LEN};
pub use registry::{classify_filename, resolve_period};
