use crate::{
    config::Config,
    error::{DResult, Issue},
    export::{groups_workbook, manifest_workbook, manifests_workbook},
    formatter::{GroupRecord, ManifestRecord, format_groups, format_manifests},
    grouping::{PickupGroups, group_by_key},
    merge::{MergeOutcome, VehiclePlan, merge},
    models::{GroupKey, VehicleAssignment},
    parsing::{ParseReport, parse_pickup_list, parse_vehicle_text},
};

/// One operator session: the current pickup groups and the vehicles declared
/// for them. Every call runs to completion before the next one.
#[derive(Debug, Default)]
pub struct Dispatch {
    config: Config,
    report: ParseReport,
    groups: PickupGroups,
    plan: VehiclePlan,
    vehicle_issues: Vec<Issue>,
}

impl Dispatch {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    // Getters/Setters

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn report(&self) -> &ParseReport {
        &self.report
    }

    pub fn groups(&self) -> &PickupGroups {
        &self.groups
    }

    pub fn plan(&self) -> &VehiclePlan {
        &self.plan
    }

    /// Problems found in vehicle text since the last ingest.
    pub fn vehicle_issues(&self) -> &[Issue] {
        &self.vehicle_issues
    }

    // Functions

    /// Parses and groups a pickup list, replacing all previous groups.
    /// Vehicles declared for groups that no longer exist are dropped.
    pub fn ingest(&mut self, input: &str) -> &ParseReport {
        self.report = parse_pickup_list(input, &self.config);
        self.groups = group_by_key(self.report.records());
        self.plan.retain_groups(&self.groups);
        self.vehicle_issues.clear();
        &self.report
    }

    pub fn group_records(&self) -> Vec<GroupRecord> {
        format_groups(&self.groups)
    }

    pub fn declare_vehicle(&mut self, key: GroupKey, vehicle: VehicleAssignment) {
        if !self.groups.contains_key(&key) {
            log::warn!("Vehicle {} declared for unknown group {key}", vehicle.key());
        }
        self.plan.declare(key, vehicle);
    }

    /// Reads the paired-line form (plate, mobile, optional capacity) for one
    /// group and replaces whatever was declared for it before.
    pub fn declare_vehicle_text(&mut self, key: GroupKey, input: &str) {
        match parse_vehicle_text(input) {
            Ok(vehicle) => self.plan.replace(key, vec![vehicle]),
            Err(e) => {
                let issue = Issue::InvalidCapacity {
                    context: key.to_string(),
                    reason: e.to_string(),
                };
                log::warn!("{issue}");
                self.vehicle_issues.push(issue);
                self.plan.replace(key, Vec::new());
            }
        }
    }

    pub fn declare_global_vehicle(&mut self, vehicle: VehicleAssignment) {
        self.plan.declare_global(vehicle);
    }

    pub fn merge(&self) -> MergeOutcome {
        merge(&self.groups, &self.plan, self.config.merge_policy())
    }

    pub fn manifest_records(&self, outcome: &MergeOutcome) -> Vec<ManifestRecord> {
        format_manifests(outcome.manifests())
    }

    pub fn export_groups(&self) -> DResult<Vec<u8>> {
        groups_workbook(&self.group_records())
    }

    /// One workbook per vehicle, in manifest order.
    pub fn export_manifests(&self, outcome: &MergeOutcome) -> DResult<Vec<Vec<u8>>> {
        self.manifest_records(outcome)
            .iter()
            .map(manifest_workbook)
            .collect()
    }

    pub fn export_manifests_batch(&self, outcome: &MergeOutcome) -> DResult<Vec<u8>> {
        manifests_workbook(&self.manifest_records(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MergePolicy, PickupTime, UnassignedReason};
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn key(hour: u32, minute: u32, location: &str) -> GroupKey {
        GroupKey::new(
            PickupTime::At(NaiveTime::from_hms_opt(hour, minute, 0).unwrap()),
            location,
            None,
        )
    }

    #[test]
    fn test_ingest_replaces_previous_groups() {
        let mut dispatch = Dispatch::new(Config::default());
        dispatch.ingest("1- A - Ritz\n2- B - W");
        dispatch.declare_vehicle_text(key(8, 0, "ritz"), "SGX1\n9000");
        dispatch.declare_vehicle_text(key(8, 0, "w"), "SGX2\n9001");

        dispatch.ingest("1- A - Ritz\n2- C - Ritz");

        assert_eq!(dispatch.groups().len(), 1);
        assert_eq!(dispatch.groups().passenger_count(), 2);
        assert_eq!(dispatch.plan().for_group(&key(8, 0, "ritz")).len(), 1);
        assert!(dispatch.plan().for_group(&key(8, 0, "w")).is_empty());
    }

    #[test]
    fn test_vehicle_text_replaces_declaration() {
        let mut dispatch = Dispatch::new(Config::default());
        dispatch.ingest("1- A - Ritz");
        dispatch.declare_vehicle_text(key(8, 0, "ritz"), "SGX1\n9000");
        dispatch.declare_vehicle_text(key(8, 0, "ritz"), "SGX9\n9009");

        let declared = dispatch.plan().for_group(&key(8, 0, "ritz"));
        assert_eq!(declared, &[VehicleAssignment::new("SGX9", "9009", None)]);
    }

    #[test]
    fn test_bad_capacity_is_reported() {
        let mut dispatch = Dispatch::new(Config::default());
        dispatch.ingest("1- A - Ritz");
        dispatch.declare_vehicle_text(key(8, 0, "ritz"), "SGX1\n9000\nlots");

        assert_eq!(dispatch.vehicle_issues().len(), 1);
        assert!(dispatch.plan().for_group(&key(8, 0, "ritz")).is_empty());
    }

    #[test]
    fn test_session_end_to_end() {
        let config = Config::default().with_merge_policy(MergePolicy::CapacityConstrained);
        let mut dispatch = Dispatch::new(config);
        let report = dispatch.ingest(
            "Pickup time: Sat 3 May\n\
             1- Sam Yuen - Park Hyatt - 7:40am\n\
             2- Abel - parkhyaTT - 7:40aM\n\
             3- Arman - ritz\n\
             4- Wilkins - RitZ\n\
             5- Gogo - ritz",
        );
        assert!(report.issues().is_empty());

        let records = dispatch.group_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].pickup_person, "Arman; Wilkins; Gogo");
        assert_eq!(records[1].date.as_deref(), Some("Sat 3 May"));

        assert_eq!(records[0].pickup_location, "Parkhyatt");

        let park_key = dispatch.groups().groups()[0].key().clone();
        let ritz_key = dispatch.groups().groups()[1].key().clone();
        assert_eq!(ritz_key.date(), Some("Sat 3 May"));
        dispatch.declare_vehicle_text(park_key, "SGX1\n9000\n4");
        dispatch.declare_vehicle_text(ritz_key, "SGX1\n9000\n4");

        let outcome = dispatch.merge();
        assert_eq!(outcome.manifests().len(), 1);
        assert_eq!(outcome.unassigned_count(), 1);
        assert_eq!(
            outcome.unassigned()[0].reason(),
            UnassignedReason::CapacityExhausted
        );

        let manifests = dispatch.manifest_records(&outcome);
        assert_eq!(
            manifests[0].pickup_person,
            "Parkhyatt: Sam Yuen; Abel (2 people)\nRitz: Arman; Wilkins (2 people)"
        );
        assert_eq!(manifests[0].pickup_location, "07:40am at Parkhyatt, 08:00am at Ritz");
        assert_eq!(manifests[0].number_of_people, 4);

        let files = dispatch.export_manifests(&outcome).unwrap();
        assert_eq!(files.len(), 1);
        assert!(dispatch.export_groups().unwrap().starts_with(b"PK"));
        assert!(dispatch.export_manifests_batch(&outcome).unwrap().starts_with(b"PK"));
    }
}
