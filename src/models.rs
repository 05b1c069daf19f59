use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::utils::{capitalize, format_time, normalize_location};

// ------------------------------------------------------------------------------------------------
// --- PickupTime
// ------------------------------------------------------------------------------------------------

/// Canonical pickup time. `Invalid` sorts after every valid time.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PickupTime {
    At(NaiveTime),
    Invalid,
}

impl PickupTime {
    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            PickupTime::At(time) => Some(*time),
            PickupTime::Invalid => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, PickupTime::At(_))
    }
}

impl fmt::Display for PickupTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickupTime::At(time) => write!(f, "{}", format_time(*time)),
            PickupTime::Invalid => write!(f, "invalid"),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// --- PassengerRecord
// ------------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerRecord {
    line_number: usize,
    name: String,
    raw_location: String,
    raw_time: String,
    time: PickupTime,
    date: Option<String>,
}

impl PassengerRecord {
    pub fn new(
        line_number: usize,
        name: String,
        raw_location: String,
        raw_time: String,
        time: PickupTime,
        date: Option<String>,
    ) -> Self {
        Self {
            line_number,
            name,
            raw_location,
            raw_time,
            time,
            date,
        }
    }

    // Getters/Setters

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw_location(&self) -> &str {
        &self.raw_location
    }

    pub fn raw_time(&self) -> &str {
        &self.raw_time
    }

    pub fn time(&self) -> PickupTime {
        self.time
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    // Functions

    pub fn location(&self) -> String {
        normalize_location(&self.raw_location)
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(self.time, &self.raw_location, self.date.clone())
    }
}

// ------------------------------------------------------------------------------------------------
// --- GroupKey
// ------------------------------------------------------------------------------------------------

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct GroupKey {
    time: PickupTime,
    location: String,
    date: Option<String>,
}

impl GroupKey {
    /// The location is normalized, so building a key from an existing key's
    /// location gives back an equal key.
    pub fn new(time: PickupTime, location: &str, date: Option<String>) -> Self {
        Self {
            time,
            location: normalize_location(location),
            date: date
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        }
    }

    // Getters/Setters

    pub fn time(&self) -> PickupTime {
        self.time
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    // Functions

    pub fn display_location(&self) -> String {
        capitalize(&self.location)
    }

    /// Walk order for merging: time, then location, then date.
    pub fn sort_key(&self) -> (PickupTime, &str, Option<&str>) {
        (self.time, &self.location, self.date())
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.time, self.display_location())?;
        if let Some(date) = &self.date {
            write!(f, " ({date})")?;
        }
        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// --- PickupGroup
// ------------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupGroup {
    key: GroupKey,
    passengers: Vec<String>,
}

impl PickupGroup {
    pub fn new(key: GroupKey) -> Self {
        Self {
            key,
            passengers: Vec::new(),
        }
    }

    // Getters/Setters

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn passengers(&self) -> &[String] {
        &self.passengers
    }

    pub fn add_passenger(&mut self, name: String) {
        self.passengers.push(name);
    }

    // Functions

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }
}

// ------------------------------------------------------------------------------------------------
// --- VehicleAssignment
// ------------------------------------------------------------------------------------------------

/// A vehicle is identified by its plate and the driver's mobile.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct VehicleKey {
    plate: String,
    mobile: String,
}

impl VehicleKey {
    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn mobile(&self) -> &str {
        &self.mobile
    }
}

impl fmt::Display for VehicleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.plate, self.mobile)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct VehicleAssignment {
    plate: String,
    mobile: String,
    // None means the vehicle takes everyone offered to it.
    capacity: Option<u32>,
}

impl VehicleAssignment {
    pub fn new(plate: &str, mobile: &str, capacity: Option<u32>) -> Self {
        Self {
            plate: plate.trim().to_string(),
            mobile: mobile.trim().to_string(),
            capacity,
        }
    }

    // Getters/Setters

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    pub fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    // Functions

    pub fn key(&self) -> VehicleKey {
        VehicleKey {
            plate: self.plate.clone(),
            mobile: self.mobile.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.plate.is_empty() && !self.mobile.is_empty()
    }

    /// Nothing filled in yet.
    pub fn is_unset(&self) -> bool {
        self.plate.is_empty() && self.mobile.is_empty()
    }
}

// ------------------------------------------------------------------------------------------------
// --- VehicleManifest
// ------------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryStop {
    time: NaiveTime,
    location: String,
    date: Option<String>,
    passengers: Vec<String>,
}

impl ItineraryStop {
    pub fn new(
        time: NaiveTime,
        location: String,
        date: Option<String>,
        passengers: Vec<String>,
    ) -> Self {
        Self {
            time,
            location,
            date,
            passengers,
        }
    }

    // Getters/Setters

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn passengers(&self) -> &[String] {
        &self.passengers
    }

    // Functions

    pub fn count(&self) -> usize {
        self.passengers.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleManifest {
    plate: String,
    mobile: String,
    stops: Vec<ItineraryStop>,
}

impl VehicleManifest {
    pub fn new(key: &VehicleKey) -> Self {
        Self {
            plate: key.plate.clone(),
            mobile: key.mobile.clone(),
            stops: Vec::new(),
        }
    }

    // Getters/Setters

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    pub fn stops(&self) -> &[ItineraryStop] {
        &self.stops
    }

    // Functions

    /// Keeps the itinerary sorted by time, then location.
    pub fn add_stop(&mut self, stop: ItineraryStop) {
        let index = self
            .stops
            .partition_point(|s| (s.time, s.location.as_str()) <= (stop.time, stop.location.as_str()));
        self.stops.insert(index, stop);
    }

    pub fn total_people(&self) -> usize {
        self.stops.iter().map(ItineraryStop::count).sum()
    }

    pub fn earliest_time(&self) -> Option<NaiveTime> {
        self.stops.first().map(ItineraryStop::time)
    }
}

// ------------------------------------------------------------------------------------------------
// --- Unassigned
// ------------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, EnumString, Serialize, Deserialize)]
pub enum UnassignedReason {
    /// The group's time could not be read, so it has no place in any itinerary.
    #[strum(serialize = "invalid time")]
    InvalidTime,
    /// No usable vehicle was declared for the group.
    #[strum(serialize = "no vehicle")]
    NoVehicle,
    /// Every vehicle offered to the group was already full.
    #[strum(serialize = "capacity exhausted")]
    CapacityExhausted,
}

/// Passengers the merge could not place, left for the operator to re-assign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unassigned {
    key: GroupKey,
    passengers: Vec<String>,
    reason: UnassignedReason,
}

impl Unassigned {
    pub fn new(key: GroupKey, passengers: Vec<String>, reason: UnassignedReason) -> Self {
        Self {
            key,
            passengers,
            reason,
        }
    }

    // Getters/Setters

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn passengers(&self) -> &[String] {
        &self.passengers
    }

    pub fn reason(&self) -> UnassignedReason {
        self.reason
    }

    // Functions

    pub fn count(&self) -> usize {
        self.passengers.len()
    }
}

// ------------------------------------------------------------------------------------------------
// --- MergePolicy
// ------------------------------------------------------------------------------------------------

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    Hash,
    PartialEq,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// A vehicle absorbs whole groups, capacity is ignored.
    #[default]
    #[strum(serialize = "full-group")]
    FullGroup,

    /// Passengers are packed into vehicles up to their capacity.
    #[strum(serialize = "capacity-constrained")]
    CapacityConstrained,
}

// ------------------------------------------------------------------------------------------------
// --- SkippedLine
// ------------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    Blank,
    Remark,
    Unlabelled,
    Malformed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    line_number: usize,
    line: String,
    reason: SkipReason,
}

impl SkippedLine {
    pub fn new(line_number: usize, line: &str, reason: SkipReason) -> Self {
        Self {
            line_number,
            line: line.to_string(),
            reason,
        }
    }

    // Getters/Setters

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn reason(&self) -> SkipReason {
        self.reason
    }
}
