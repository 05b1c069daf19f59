// ------------------------------------------------------------------------------------------------
// --- Display records
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::{
    grouping::PickupGroups,
    models::{ItineraryStop, PickupGroup, VehicleManifest},
    utils::{capitalize, format_time},
};

/// One row per pickup group, keyed by spreadsheet column name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    #[serde(rename = "Pickup Person")]
    pub pickup_person: String,
    #[serde(rename = "Pickup time")]
    pub pickup_time: String,
    #[serde(rename = "Pickup Location")]
    pub pickup_location: String,
    #[serde(rename = "Number of People")]
    pub number_of_people: usize,
    #[serde(rename = "Date", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// One row per vehicle. Fields are plain strings so the operator can
/// override them before export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    #[serde(rename = "Pickup Person")]
    pub pickup_person: String,
    #[serde(rename = "Pickup time")]
    pub pickup_time: String,
    #[serde(rename = "Pickup Location")]
    pub pickup_location: String,
    #[serde(rename = "Number of People")]
    pub number_of_people: usize,
    #[serde(rename = "Car Plate")]
    pub car_plate: String,
    #[serde(rename = "Mobile")]
    pub mobile: String,
    #[serde(rename = "Date", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

pub fn format_group(group: &PickupGroup) -> GroupRecord {
    let key = group.key();
    GroupRecord {
        pickup_person: group.passengers().join("; "),
        pickup_time: key.time().to_string(),
        pickup_location: key.display_location(),
        number_of_people: group.len(),
        date: key.date().map(String::from),
    }
}

pub fn format_groups(groups: &PickupGroups) -> Vec<GroupRecord> {
    groups.iter().map(format_group).collect()
}

fn people(count: usize) -> String {
    match count {
        1 => "1 person".to_string(),
        n => format!("{n} people"),
    }
}

fn stop_passengers(stop: &ItineraryStop) -> String {
    format!(
        "{}: {} ({})",
        capitalize(stop.location()),
        stop.passengers().join("; "),
        people(stop.count())
    )
}

fn stop_location(stop: &ItineraryStop) -> String {
    format!("{} at {}", format_time(stop.time()), capitalize(stop.location()))
}

// Distinct dates in itinerary order.
fn manifest_date(manifest: &VehicleManifest) -> Option<String> {
    let mut dates: Vec<&str> = Vec::new();
    for date in manifest.stops().iter().filter_map(ItineraryStop::date) {
        if !dates.contains(&date) {
            dates.push(date);
        }
    }

    if dates.is_empty() {
        None
    } else {
        Some(dates.join(", "))
    }
}

pub fn format_manifest(manifest: &VehicleManifest) -> ManifestRecord {
    let stops = manifest.stops();
    ManifestRecord {
        pickup_person: stops
            .iter()
            .map(stop_passengers)
            .collect::<Vec<_>>()
            .join("\n"),
        pickup_time: manifest.earliest_time().map(format_time).unwrap_or_default(),
        pickup_location: stops.iter().map(stop_location).collect::<Vec<_>>().join(", "),
        number_of_people: manifest.total_people(),
        car_plate: manifest.plate().to_string(),
        mobile: manifest.mobile().to_string(),
        date: manifest_date(manifest),
    }
}

pub fn format_manifests(manifests: &[VehicleManifest]) -> Vec<ManifestRecord> {
    manifests.iter().map(format_manifest).collect()
}
