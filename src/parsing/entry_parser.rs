/// # Pickup list parsing
///
/// ## One passenger per line. A line contains:
///
/// * Numeric label, followed by "-", "~", "." or ")"
/// * Passenger name (mandatory)
/// * Pickup location (optional)
/// * Pickup time (optional, the default time is used when missing)
///
/// Fields are separated by "-" or "~", surrounded by any amount of whitespace.
/// Parenthesized remarks in the time field are ignored.
///
/// ## A header line sets the pickup date for the lines that follow it:
///
/// * Pickup time: <date or time range>
///
/// ## Examples
///
/// `
/// Pickup time: Saturday 3 May
/// 1- Eric peng-Ritz -9:00AM(Remark Special time)
/// 2- Cai Chunhui -parkhyatt
/// 4- Sam Yuen - Park Hyatt - 7:40am
/// 15 - Gogo - ritz - 8:30Am
/// `
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::Issue,
    models::{PassengerRecord, PickupTime, SkipReason, SkippedLine},
    parsing::{
        error::{PResult, ParsingError},
        helpers::{header_parser, is_remark, label_parser, split_fields},
        time_parser::canonicalize_time,
    },
    utils::normalize_time,
};

#[derive(Debug, PartialEq)]
enum EntryLine {
    // * Pickup time: <value>
    Header(Option<String>),
    // * <label>- <name> - <location> - <time>
    Entry {
        label: u32,
        name: String,
        location: Option<String>,
        time: Option<String>,
    },
    // Anything that does not start with a numeric label.
    Unlabelled,
}

/// Everything one pass over a pickup list produced.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseReport {
    records: Vec<PassengerRecord>,
    skipped: Vec<SkippedLine>,
    issues: Vec<Issue>,
}

impl ParseReport {
    // Getters/Setters

    pub fn records(&self) -> &[PassengerRecord] {
        &self.records
    }

    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    // Functions

    pub fn into_records(self) -> Vec<PassengerRecord> {
        self.records
    }
}

fn parse_line(line: &str) -> PResult<EntryLine> {
    if let Ok((_, value)) = header_parser(line) {
        let value = if value.is_empty() { None } else { Some(value) };
        return Ok(EntryLine::Header(value));
    }

    let Ok((rest, label)) = label_parser(line.trim_start()) else {
        return Ok(EntryLine::Unlabelled);
    };

    let mut fields = split_fields(rest).into_iter();
    let name = fields
        .next()
        .filter(|name| !name.is_empty())
        .ok_or(ParsingError::MissingName)?
        .to_string();
    let location = fields.next().map(String::from);
    let time = fields
        .next()
        .filter(|time| !normalize_time(time).is_empty())
        .map(String::from);

    Ok(EntryLine::Entry {
        label,
        name,
        location,
        time,
    })
}

/// A line such as "1 Ann - Ritz" was most likely meant as an entry.
fn missing_delimiter(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
}

/// Parses a whole pickup list. Problems are collected in the report, a batch
/// never fails as a whole.
pub fn parse(input: &str, config: &Config) -> ParseReport {
    log::info!("Parsing pickup list...");

    let mut report = ParseReport::default();
    let mut current_date: Option<String> = None;

    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;

        if line.trim().is_empty() {
            report
                .skipped
                .push(SkippedLine::new(line_number, line, SkipReason::Blank));
            continue;
        }

        if is_remark(line, config.remark_markers()) {
            log::debug!("Skipping remark at line {line_number}: {line}");
            report
                .skipped
                .push(SkippedLine::new(line_number, line, SkipReason::Remark));
            continue;
        }

        match parse_line(line) {
            Ok(EntryLine::Header(date)) => {
                log::debug!("Pickup date set to {date:?} at line {line_number}");
                current_date = date;
            }
            Ok(EntryLine::Unlabelled) => {
                if missing_delimiter(line) {
                    log::warn!(
                        "Line {line_number} starts with a number but has no label delimiter, skipped: {line}"
                    );
                } else {
                    log::debug!("Skipping unlabelled line {line_number}: {line}");
                }
                report
                    .skipped
                    .push(SkippedLine::new(line_number, line, SkipReason::Unlabelled));
            }
            Ok(EntryLine::Entry {
                label,
                name,
                location,
                time,
            }) => {
                log::debug!("Passenger #{label} at line {line_number}: {name}");
                let raw_time = time.unwrap_or_else(|| config.default_time().to_string());
                let pickup_time = canonicalize_time(&raw_time);
                if pickup_time == PickupTime::Invalid {
                    let issue = Issue::UnparseableTime {
                        line_number,
                        name: name.clone(),
                        raw_time: raw_time.clone(),
                    };
                    log::warn!("{issue}");
                    report.issues.push(issue);
                }

                report.records.push(PassengerRecord::new(
                    line_number,
                    name,
                    location.unwrap_or_default(),
                    raw_time,
                    pickup_time,
                    current_date.clone(),
                ));
            }
            Err(e) => {
                let issue = Issue::MalformedEntry {
                    line_number,
                    line: line.to_string(),
                    reason: e.to_string(),
                };
                log::warn!("{issue}");
                report.issues.push(issue);
                report
                    .skipped
                    .push(SkippedLine::new(line_number, line, SkipReason::Malformed));
            }
        }
    }

    log::info!(
        "Parsed {} passenger(s), skipped {} line(s)",
        report.records.len(),
        report.skipped.len()
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;
    use test_log::test;

    const SAMPLE: &str = "1- Eric peng-Ritz -9:00AM(Remark Special time)
2- Cai Chunhui -parkhyatt
3- CL Lim - pArkhyatt
4- Sam Yuen - Park Hyatt - 7:40am
5- Bo Xu - Park Hyatt
6- Arman - ritz
8- Steven - Park Hyatt
8- Shengyang@Meta - Ritz
9- Jolley W - Ritz
110- dana Jensen  - W
11- Abel - parkhyaTT  -           7:40aM
12- Wilkins - RitZ -7:40Am
15 - Gogo - ritz - 8:30Am";

    fn at(hour: u32, minute: u32) -> PickupTime {
        PickupTime::At(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
    }

    #[test]
    fn test_parse_line_full_entry() {
        let entry = parse_line("1- Sam Yuen - Park Hyatt - 7:40am").unwrap();
        assert_eq!(
            entry,
            EntryLine::Entry {
                label: 1,
                name: "Sam Yuen".to_string(),
                location: Some("Park Hyatt".to_string()),
                time: Some("7:40am".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_line_without_time() {
        let entry = parse_line("6- Arman - ritz").unwrap();
        assert_eq!(
            entry,
            EntryLine::Entry {
                label: 6,
                name: "Arman".to_string(),
                location: Some("ritz".to_string()),
                time: None,
            }
        );
    }

    #[test]
    fn test_parse_line_remark_only_time_is_absent() {
        let entry = parse_line("7- Kim - Ritz - (tbc)").unwrap();
        match entry {
            EntryLine::Entry { time, .. } => assert_eq!(time, None),
            _ => panic!("Expected Entry variant"),
        }
    }

    #[test]
    fn test_parse_line_missing_name() {
        assert!(matches!(parse_line("7-"), Err(ParsingError::MissingName)));
        assert!(matches!(
            parse_line("7 -  - Ritz"),
            Err(ParsingError::MissingName)
        ));
    }

    #[test]
    fn test_parse_line_header_and_unlabelled() {
        assert_eq!(
            parse_line("Pickup time: 3 May").unwrap(),
            EntryLine::Header(Some("3 May".to_string()))
        );
        assert_eq!(parse_line("Pickup time:").unwrap(), EntryLine::Header(None));
        assert_eq!(
            parse_line("Drivers please be early").unwrap(),
            EntryLine::Unlabelled
        );
    }

    #[test]
    fn test_parse_single_line_example() {
        let report = parse("1- Sam Yuen - Park Hyatt - 7:40am", &Config::default());
        assert_eq!(report.records().len(), 1);

        let record = &report.records()[0];
        assert_eq!(record.name(), "Sam Yuen");
        assert_eq!(record.location(), "parkhyatt");
        assert_eq!(record.time(), at(7, 40));
        assert_eq!(record.time().to_string(), "07:40am");
        assert_eq!(record.date(), None);
        assert!(report.issues().is_empty());
    }

    #[test]
    fn test_parse_uses_default_time() {
        let report = parse("6- Arman - ritz", &Config::default());
        let record = &report.records()[0];
        assert_eq!(record.raw_time(), "8:00am");
        assert_eq!(record.time().to_string(), "08:00am");
    }

    #[test]
    fn test_parse_sample_list() {
        let report = parse(SAMPLE, &Config::default());

        assert_eq!(report.records().len(), 13);
        assert!(report.issues().is_empty());
        assert!(report.skipped().is_empty());

        let eric = &report.records()[0];
        assert_eq!(eric.name(), "Eric peng");
        assert_eq!(eric.location(), "ritz");
        assert_eq!(eric.time(), at(9, 0));

        let dana = &report.records()[9];
        assert_eq!(dana.name(), "dana Jensen");
        assert_eq!(dana.location(), "w");
        assert_eq!(dana.line_number(), 10);
    }

    #[test]
    fn test_parse_malformed_line_is_recovered() {
        let input = "1- Ann - Ritz\n2-\n3- Bob - Ritz";
        let report = parse(input, &Config::default());

        let names: Vec<_> = report.records().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Ann", "Bob"]);
        assert_eq!(report.issues().len(), 1);
        assert!(matches!(
            &report.issues()[0],
            Issue::MalformedEntry { line_number: 2, .. }
        ));
        assert_eq!(report.skipped()[0].reason(), SkipReason::Malformed);
    }

    #[test]
    fn test_parse_unparseable_time_is_flagged() {
        let report = parse("1- Ann - Ritz - after lunch", &Config::default());

        assert_eq!(report.records().len(), 1);
        assert_eq!(report.records()[0].time(), PickupTime::Invalid);
        assert_eq!(
            report.issues(),
            &[Issue::UnparseableTime {
                line_number: 1,
                name: "Ann".to_string(),
                raw_time: "after lunch".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_skips_remarks_and_unlabelled_lines() {
        let input = "Shuttle list for Saturday\n\
                     e.g. 1- Name - Hotel - 8:00am\n\
                     \n\
                     1- Ann - Ritz";
        let report = parse(input, &Config::default());

        assert_eq!(report.records().len(), 1);
        assert!(report.issues().is_empty());
        let reasons: Vec<_> = report.skipped().iter().map(|s| s.reason()).collect();
        assert_eq!(
            reasons,
            vec![SkipReason::Unlabelled, SkipReason::Remark, SkipReason::Blank]
        );
    }

    #[test]
    fn test_parse_numbered_line_without_delimiter_is_skipped() {
        let report = parse("1 Ann - Ritz\n2- Bob - Ritz", &Config::default());

        assert_eq!(report.records().len(), 1);
        assert_eq!(report.records()[0].name(), "Bob");
        assert_eq!(report.skipped().len(), 1);
        assert_eq!(report.skipped()[0].reason(), SkipReason::Unlabelled);
        assert_eq!(report.skipped()[0].line_number(), 1);

        assert!(missing_delimiter("1 Ann - Ritz"));
        assert!(missing_delimiter("  12Ann"));
        assert!(!missing_delimiter("Drivers please be early"));
    }

    #[test]
    fn test_parse_header_sets_date_until_next_header() {
        let input = "Pickup time: Sat 3 May\n\
                     1- Ann - Ritz\n\
                     2- Bob - W\n\
                     Pickup time: Sun 4 May\n\
                     3- Cid - Ritz\n\
                     Pickup time:\n\
                     4- Dee - Ritz";
        let report = parse(input, &Config::default());

        let dates: Vec<_> = report.records().iter().map(|r| r.date()).collect();
        assert_eq!(
            dates,
            vec![Some("Sat 3 May"), Some("Sat 3 May"), Some("Sun 4 May"), None]
        );
    }

    #[test]
    fn test_parse_missing_location_is_empty() {
        let report = parse("1- Ann", &Config::default());
        assert_eq!(report.records()[0].location(), "");
        assert_eq!(report.records()[0].time().to_string(), "08:00am");
    }

    #[test]
    fn test_parse_invalid_default_time() {
        let config = Config::default().with_default_time("whenever");
        let report = parse("1- Ann - Ritz", &config);
        assert_eq!(report.records()[0].time(), PickupTime::Invalid);
        assert_eq!(report.issues().len(), 1);
    }
}
