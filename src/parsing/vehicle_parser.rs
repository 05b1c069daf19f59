/// # Vehicle declaration parsing
///
/// ## One vehicle per text block:
///
/// * Line 1: Car plate
/// * Line 2: Driver mobile
/// * Line 3: Capacity (optional, "capacity:", "cap:" or "seats:" prefix allowed)
///
/// ## Examples
///
/// `
/// SGX1234A
/// 9123 4567
/// capacity: 4
/// `
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit1, space0},
    combinator::{all_consuming, map_res, opt},
    sequence::preceded,
};

use crate::{
    models::VehicleAssignment,
    parsing::error::{PResult, ParsingError},
};

fn capacity_combinator(input: &str) -> IResult<&str, u32> {
    preceded(
        opt((
            alt((
                tag_no_case("capacity"),
                tag_no_case("seats"),
                tag_no_case("cap"),
            )),
            space0,
            opt(char(':')),
            space0,
        )),
        map_res(digit1, |digits: &str| digits.parse::<u32>()),
    )
    .parse(input)
}

fn parse_capacity(line: &str) -> PResult<Option<u32>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (_, capacity) = all_consuming(capacity_combinator)
        .parse(line)
        .map_err(|_| ParsingError::InvalidCapacity(line.to_string()))?;
    Ok(Some(capacity))
}

/// Reads the plate, mobile and optional capacity from a paired-line block.
/// Missing lines give empty fields, completeness is checked when merging.
pub fn parse_vehicle_text(input: &str) -> PResult<VehicleAssignment> {
    let mut lines = input.lines();
    let plate = lines.next().unwrap_or_default();
    let mobile = lines.next().unwrap_or_default();
    let capacity = match lines.next() {
        Some(line) => parse_capacity(line)?,
        None => None,
    };

    Ok(VehicleAssignment::new(plate, mobile, capacity))
}
