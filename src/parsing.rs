mod entry_parser;
pub(crate) mod error;
mod helpers;
mod time_parser;
mod vehicle_parser;

pub use entry_parser::ParseReport;
pub use entry_parser::parse as parse_pickup_list;
pub use error::{PResult, ParsingError};
pub use time_parser::{canonicalize_time, parse_clock};
pub use vehicle_parser::parse_vehicle_text;
