// ------------------------------------------------------------------------------------------------
// --- Grouping
// ------------------------------------------------------------------------------------------------

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::models::{GroupKey, PassengerRecord, PickupGroup};

/// Pickup groups in first-seen key order, with a key lookup on the side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PickupGroups {
    groups: Vec<PickupGroup>,
    #[serde(skip)]
    index: FxHashMap<GroupKey, usize>,
}

impl PickupGroups {
    pub fn new() -> Self {
        Self::default()
    }

    // Getters/Setters

    pub fn groups(&self) -> &[PickupGroup] {
        &self.groups
    }

    pub fn get(&self, key: &GroupKey) -> Option<&PickupGroup> {
        self.index.get(key).map(|&i| &self.groups[i])
    }

    // Functions

    pub fn insert(&mut self, key: GroupKey, name: String) {
        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                self.groups.push(PickupGroup::new(key.clone()));
                self.index.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[position].add_passenger(name);
    }

    pub fn contains_key(&self, key: &GroupKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.iter().map(PickupGroup::key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PickupGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn passenger_count(&self) -> usize {
        self.groups.iter().map(PickupGroup::len).sum()
    }
}

impl<'a> IntoIterator for &'a PickupGroups {
    type Item = &'a PickupGroup;
    type IntoIter = std::slice::Iter<'a, PickupGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Groups passengers by (time, location, date) in a single pass.
pub fn group_by_key(records: &[PassengerRecord]) -> PickupGroups {
    let mut groups = PickupGroups::new();
    for record in records {
        groups.insert(record.group_key(), record.name().to_string());
    }

    log::info!(
        "Grouped {} passenger(s) into {} pickup group(s)",
        groups.passenger_count(),
        groups.len()
    );

    groups
}
