#![doc = include_str!("../README.md")]
mod config;
mod dispatch;
mod error;
mod export;
mod formatter;
mod grouping;
mod merge;
mod models;
mod parsing;
mod utils;

pub use config::{Config, DEFAULT_PICKUP_TIME, DEFAULT_REMARK_MARKERS};
pub use dispatch::Dispatch;
pub use error::{DResult, DispatchError, Issue};
pub use export::{groups_workbook, manifest_file_name, manifest_workbook, manifests_workbook};
pub use formatter::{
    GroupRecord, ManifestRecord, format_group, format_groups, format_manifest, format_manifests,
};
pub use grouping::{PickupGroups, group_by_key};
pub use merge::{MergeOutcome, VehiclePlan, merge};
pub use models::*;
pub use parsing::{
    PResult, ParseReport, ParsingError, canonicalize_time, parse_clock, parse_pickup_list,
    parse_vehicle_text,
};
pub use utils::{capitalize, format_time, normalize_location, normalize_time};
