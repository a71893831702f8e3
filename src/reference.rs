//! Verse range queries like `1-3,5,9-`.
//!
//! A query is a comma-separated list of parts. Each part is one of:
//! - `"5"` → verse 5 only
//! - `"1-3"` → verses 1 through 3
//! - `"9-"` → verse 9 to the end of the selection
//!
//! Whitespace around parts and dashes is ignored. Verse labels that are not
//! plain numbers (`"4a"`) match on their leading digits.

use std::ops::RangeInclusive;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Empty verse range in query: {0:?}")]
    EmptyPart(String),
    #[error("Not a verse number: {0:?}")]
    NotANumber(String),
    #[error("Verse range runs backwards: {0}-{1}")]
    Backwards(u32, u32),
}

/// Parse a verse range query into inclusive ranges, in query order.
pub fn parse_verse_ranges(query: &str) -> Result<Vec<RangeInclusive<u32>>, ReferenceError> {
    query
        .split(',')
        .map(|part| parse_part(part, query))
        .collect()
}

fn parse_part(part: &str, query: &str) -> Result<RangeInclusive<u32>, ReferenceError> {
    let part = part.trim();
    if part.is_empty() {
        return Err(ReferenceError::EmptyPart(query.to_string()));
    }
    match part.split_once('-') {
        Some((start, end)) => {
            let start = parse_number(start)?;
            let end = end.trim();
            let end = if end.is_empty() {
                u32::MAX
            } else {
                parse_number(end)?
            };
            if end < start {
                return Err(ReferenceError::Backwards(start, end));
            }
            Ok(start..=end)
        }
        None => {
            let n = parse_number(part)?;
            Ok(n..=n)
        }
    }
}

fn parse_number(s: &str) -> Result<u32, ReferenceError> {
    let s = s.trim();
    s.parse::<u32>()
        .map_err(|_| ReferenceError::NotANumber(s.to_string()))
}

/// Leading verse number of a label: `"12"` → 12, `"4a"` → 4, `"x"` → None.
pub fn verse_number(label: &str) -> Option<u32> {
    let digits: String = label
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// True when `label`'s verse number falls inside any of `ranges`.
pub fn in_ranges(label: &str, ranges: &[RangeInclusive<u32>]) -> bool {
    verse_number(label).is_some_and(|n| ranges.iter().any(|r| r.contains(&n)))
}
