use std::sync::LazyLock;

/// Here we will define all the parsing Helper functions
/// Such as primitive parsers
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit1, one_of, space0, space1},
    combinator::{map_res, rest},
    sequence::terminated,
};
use regex::Regex;

// "-" or "~" with any amount of whitespace around it.
static RE_DELIMITER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*[-~]\s*").unwrap());

/// Numeric label at the start of a record line, e.g. "12-", "15 -", "3." or "4)".
pub(crate) fn label_parser(input: &str) -> IResult<&str, u32> {
    terminated(
        map_res(digit1, |digits: &str| digits.parse::<u32>()),
        (space0, one_of("-~.)")),
    )
    .parse(input)
}

/// `Pickup time: <value>` or `Pickup date: <value>`, any casing.
pub(crate) fn header_parser(input: &str) -> IResult<&str, String> {
    let (input, _) = (
        space0,
        tag_no_case("pickup"),
        space1,
        alt((tag_no_case("time"), tag_no_case("date"))),
        space0,
        char(':'),
    )
        .parse(input)?;
    let (input, value) = rest(input)?;
    Ok((input, value.trim().to_string()))
}

/// Splits what follows the label into at most three trimmed fields:
/// name, location and time. The last field keeps any further delimiters.
pub(crate) fn split_fields(input: &str) -> Vec<&str> {
    RE_DELIMITER.splitn(input, 3).map(str::trim).collect()
}

pub(crate) fn is_remark(line: &str, markers: &[String]) -> bool {
    let line = line.trim_start().to_lowercase();
    markers
        .iter()
        .filter(|marker| !marker.is_empty())
        .any(|marker| line.starts_with(&marker.to_lowercase()))
}
