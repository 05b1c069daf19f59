/// # Vehicle merging
///
/// Packs pickup groups into the vehicles the operator declared. Groups are
/// visited by time, then location, so a vehicle fills up with its earliest
/// pickups first.
///
/// ## Policies
///
/// * FullGroup: a vehicle absorbs whole groups, capacity is ignored. A vehicle
///   declared for several groups collects all of them.
/// * CapacityConstrained: passengers are peeled off into the group's vehicles
///   (then the global ones) up to each vehicle's remaining capacity. What does
///   not fit is reported as unassigned.
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::{
    error::Issue,
    grouping::PickupGroups,
    models::{
        GroupKey, ItineraryStop, MergePolicy, PickupGroup, Unassigned, UnassignedReason,
        VehicleAssignment, VehicleKey, VehicleManifest,
    },
};

// ------------------------------------------------------------------------------------------------
// --- VehiclePlan
// ------------------------------------------------------------------------------------------------

/// The operator's vehicle declarations, per group and for any group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VehiclePlan {
    per_group: FxHashMap<GroupKey, Vec<VehicleAssignment>>,
    global: Vec<VehicleAssignment>,
}

impl VehiclePlan {
    pub fn new() -> Self {
        Self::default()
    }

    // Getters/Setters

    pub fn for_group(&self, key: &GroupKey) -> &[VehicleAssignment] {
        self.per_group.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn global(&self) -> &[VehicleAssignment] {
        &self.global
    }

    // Functions

    pub fn declare(&mut self, key: GroupKey, vehicle: VehicleAssignment) {
        self.per_group.entry(key).or_default().push(vehicle);
    }

    /// Replaces every vehicle declared for `key`, as a resubmitted form does.
    pub fn replace(&mut self, key: GroupKey, vehicles: Vec<VehicleAssignment>) {
        if vehicles.is_empty() {
            self.per_group.remove(&key);
        } else {
            self.per_group.insert(key, vehicles);
        }
    }

    pub fn declare_global(&mut self, vehicle: VehicleAssignment) {
        self.global.push(vehicle);
    }

    /// Drops declarations for groups that no longer exist.
    pub fn retain_groups(&mut self, groups: &PickupGroups) {
        self.per_group.retain(|key, _| {
            let keep = groups.contains_key(key);
            if !keep {
                log::debug!("Dropping vehicles declared for stale group {key}");
            }
            keep
        });
    }

    pub fn is_empty(&self) -> bool {
        self.per_group.is_empty() && self.global.is_empty()
    }
}

// ------------------------------------------------------------------------------------------------
// --- MergeOutcome
// ------------------------------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    manifests: Vec<VehicleManifest>,
    unassigned: Vec<Unassigned>,
    issues: Vec<Issue>,
}

impl MergeOutcome {
    // Getters/Setters

    pub fn manifests(&self) -> &[VehicleManifest] {
        &self.manifests
    }

    pub fn unassigned(&self) -> &[Unassigned] {
        &self.unassigned
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    // Functions

    pub fn assigned_count(&self) -> usize {
        self.manifests.iter().map(VehicleManifest::total_people).sum()
    }

    pub fn unassigned_count(&self) -> usize {
        self.unassigned.iter().map(Unassigned::count).sum()
    }
}

// ------------------------------------------------------------------------------------------------
// --- Merge
// ------------------------------------------------------------------------------------------------

#[derive(Default)]
struct Fleet {
    manifests: Vec<VehicleManifest>,
    positions: FxHashMap<VehicleKey, usize>,
    // First declared capacity per vehicle, None means unbounded.
    declared: FxHashMap<VehicleKey, Option<u32>>,
    remaining: FxHashMap<VehicleKey, Option<u32>>,
}

impl Fleet {
    /// Reserves up to `wanted` seats and returns how many were granted.
    fn reserve(&mut self, vehicle: &VehicleAssignment, wanted: usize) -> usize {
        let key = vehicle.key();
        let declared = *self
            .declared
            .entry(key.clone())
            .or_insert(vehicle.capacity());
        if declared != vehicle.capacity() {
            log::warn!(
                "Vehicle {key} declared again with capacity {:?}, keeping {declared:?}",
                vehicle.capacity()
            );
        }

        match self.remaining.entry(key).or_insert(declared) {
            None => wanted,
            Some(seats) => {
                let granted = wanted.min(*seats as usize);
                *seats -= granted as u32;
                granted
            }
        }
    }

    fn board(&mut self, vehicle: &VehicleAssignment, group: &PickupGroup, passengers: Vec<String>) {
        let Some(time) = group.key().time().time() else {
            return;
        };

        let key = vehicle.key();
        let position = match self.positions.get(&key) {
            Some(&position) => position,
            None => {
                self.manifests.push(VehicleManifest::new(&key));
                self.positions.insert(key, self.manifests.len() - 1);
                self.manifests.len() - 1
            }
        };

        self.manifests[position].add_stop(ItineraryStop::new(
            time,
            group.key().location().to_string(),
            group.key().date().map(String::from),
            passengers,
        ));
    }

    fn into_manifests(mut self) -> Vec<VehicleManifest> {
        // Stable, so vehicles with the same first pickup keep boarding order.
        self.manifests.sort_by_key(VehicleManifest::earliest_time);
        self.manifests
    }
}

fn usable<'a>(
    declared: &'a [VehicleAssignment],
    context: &str,
    issues: &mut Vec<Issue>,
) -> Vec<&'a VehicleAssignment> {
    declared
        .iter()
        .filter(|vehicle| {
            if vehicle.is_complete() {
                return true;
            }

            if vehicle.is_unset() {
                log::debug!("No vehicle specified yet for {context}");
            } else {
                let issue = Issue::IncompleteVehicleAssignment {
                    context: context.to_string(),
                    plate: vehicle.plate().to_string(),
                    mobile: vehicle.mobile().to_string(),
                };
                log::warn!("{issue}");
                issues.push(issue);
            }
            false
        })
        .collect()
}

fn leave_behind(
    unassigned: &mut Vec<Unassigned>,
    group: &PickupGroup,
    passengers: &[String],
    reason: UnassignedReason,
) {
    log::warn!(
        "{} passenger(s) of {} left unassigned: {reason}",
        passengers.len(),
        group.key()
    );
    unassigned.push(Unassigned::new(
        group.key().clone(),
        passengers.to_vec(),
        reason,
    ));
}

/// Assigns every group to the declared vehicles according to `policy`.
pub fn merge(groups: &PickupGroups, plan: &VehiclePlan, policy: MergePolicy) -> MergeOutcome {
    log::info!("Merging {} pickup group(s) ({policy})...", groups.len());

    let mut issues = Vec::new();
    let mut unassigned = Vec::new();
    let mut fleet = Fleet::default();

    let global = usable(plan.global(), "all groups", &mut issues);

    let mut ordered: Vec<&PickupGroup> = groups.iter().collect();
    ordered.sort_by(|a, b| a.key().sort_key().cmp(&b.key().sort_key()));

    for group in ordered {
        if !group.key().time().is_valid() {
            leave_behind(
                &mut unassigned,
                group,
                group.passengers(),
                UnassignedReason::InvalidTime,
            );
            continue;
        }

        let declared = usable(
            plan.for_group(group.key()),
            &group.key().to_string(),
            &mut issues,
        );
        let mut candidates = declared.iter().chain(global.iter()).copied().peekable();

        if candidates.peek().is_none() {
            leave_behind(
                &mut unassigned,
                group,
                group.passengers(),
                UnassignedReason::NoVehicle,
            );
            continue;
        }

        match policy {
            MergePolicy::FullGroup => {
                // Capacity is ignored here, except that a zero-seat vehicle takes nobody.
                match candidates.find(|vehicle| vehicle.capacity() != Some(0)) {
                    Some(vehicle) => fleet.board(vehicle, group, group.passengers().to_vec()),
                    None => leave_behind(
                        &mut unassigned,
                        group,
                        group.passengers(),
                        UnassignedReason::NoVehicle,
                    ),
                }
            }
            MergePolicy::CapacityConstrained => {
                let mut waiting = group.passengers();
                for vehicle in candidates {
                    if waiting.is_empty() {
                        break;
                    }
                    let granted = fleet.reserve(vehicle, waiting.len());
                    if granted == 0 {
                        continue;
                    }
                    let (boarding, rest) = waiting.split_at(granted);
                    fleet.board(vehicle, group, boarding.to_vec());
                    waiting = rest;
                }

                if !waiting.is_empty() {
                    leave_behind(
                        &mut unassigned,
                        group,
                        waiting,
                        UnassignedReason::CapacityExhausted,
                    );
                }
            }
        }
    }

    let manifests = fleet.into_manifests();
    log::info!(
        "Built {} vehicle manifest(s), {} passenger(s) unassigned",
        manifests.len(),
        unassigned.iter().map(Unassigned::count).sum::<usize>()
    );

    MergeOutcome {
        manifests,
        unassigned,
        issues,
    }
}
