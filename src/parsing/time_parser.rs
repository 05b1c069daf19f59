/// # Pickup time parsing
///
/// Times are written on a 12-hour clock, with or without minutes and with or
/// without a space before the meridiem. Casing is irrelevant.
///
/// ## Examples
///
/// `
/// 7:40am
/// 9:00AM
/// 8:30 Pm
/// 9am
/// `
use chrono::NaiveTime;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag_no_case, take_while_m_n},
    character::complete::{char, space0},
    combinator::{all_consuming, map, map_res, opt},
    sequence::preceded,
};

use crate::{
    models::PickupTime,
    parsing::error::{PResult, ParsingError},
    utils::{create_time, normalize_time},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

fn hour_parser(input: &str) -> IResult<&str, u32> {
    map_res(take_while_m_n(1, 2, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<u32>()
    })
    .parse(input)
}

fn minute_parser(input: &str) -> IResult<&str, u32> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<u32>()
    })
    .parse(input)
}

fn meridiem_parser(input: &str) -> IResult<&str, Meridiem> {
    alt((
        map(tag_no_case("am"), |_| Meridiem::Am),
        map(tag_no_case("pm"), |_| Meridiem::Pm),
    ))
    .parse(input)
}

fn clock_combinator(input: &str) -> IResult<&str, (u32, Option<u32>, Meridiem)> {
    (
        hour_parser,
        opt(preceded(char(':'), minute_parser)),
        preceded(space0, meridiem_parser),
    )
        .parse(input)
}

/// Parses a 12-hour clock value into a time of day.
pub fn parse_clock(value: &str) -> PResult<NaiveTime> {
    let (_, (hour, minute, meridiem)) = all_consuming(clock_combinator).parse(value.trim())?;

    if !(1..=12).contains(&hour) {
        return Err(ParsingError::InvalidHour(hour));
    }

    let hour = match meridiem {
        Meridiem::Am => hour % 12,
        Meridiem::Pm => hour % 12 + 12,
    };

    create_time(hour, minute.unwrap_or(0))
}

/// Strips remarks from a raw time field and parses what is left.
pub fn canonicalize_time(raw: &str) -> PickupTime {
    match parse_clock(&normalize_time(raw)) {
        Ok(time) => PickupTime::At(time),
        Err(e) => {
            log::debug!("Unparseable pickup time \"{raw}\": {e}");
            PickupTime::Invalid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_clock_combinator_valid() {
        let (rest, (hour, minute, meridiem)) = clock_combinator("7:40am").unwrap();
        assert_eq!(rest, "");
        assert_eq!(hour, 7);
        assert_eq!(minute, Some(40));
        assert_eq!(meridiem, Meridiem::Am);
    }

    #[test]
    fn test_clock_combinator_without_minutes() {
        let (_, (hour, minute, meridiem)) = clock_combinator("9 PM").unwrap();
        assert_eq!(hour, 9);
        assert_eq!(minute, None);
        assert_eq!(meridiem, Meridiem::Pm);
    }

    #[test]
    fn test_parse_clock_mixed_case() {
        assert_eq!(parse_clock("7:40aM").unwrap(), hm(7, 40));
        assert_eq!(parse_clock("9:00AM").unwrap(), hm(9, 0));
        assert_eq!(parse_clock("8:30Am").unwrap(), hm(8, 30));
        assert_eq!(parse_clock("  8:00am ").unwrap(), hm(8, 0));
    }

    #[test]
    fn test_parse_clock_noon_and_midnight() {
        assert_eq!(parse_clock("12:00pm").unwrap(), hm(12, 0));
        assert_eq!(parse_clock("12:30am").unwrap(), hm(0, 30));
        assert_eq!(parse_clock("1:15pm").unwrap(), hm(13, 15));
    }

    #[test]
    fn test_parse_clock_rejects_24_hour_values() {
        assert!(matches!(
            parse_clock("13:00pm"),
            Err(ParsingError::InvalidHour(13))
        ));
        assert!(matches!(parse_clock("0:10am"), Err(ParsingError::InvalidHour(0))));
        assert!(parse_clock("14:00").is_err());
    }

    #[test]
    fn test_parse_clock_rejects_bad_minutes() {
        assert!(matches!(
            parse_clock("7:75am"),
            Err(ParsingError::UnableToBuildTime(7, 75))
        ));
        assert!(parse_clock("7:5am").is_err());
    }

    #[test]
    fn test_parse_clock_rejects_trailing_text() {
        assert!(parse_clock("7:40am sharp").is_err());
        assert!(parse_clock("morning").is_err());
        assert!(parse_clock("").is_err());
    }

    #[test]
    fn test_canonicalize_time_strips_remark() {
        assert_eq!(
            canonicalize_time("9:00AM(Remark Special time)"),
            PickupTime::At(hm(9, 0))
        );
        assert_eq!(canonicalize_time("after lunch"), PickupTime::Invalid);
    }
}
