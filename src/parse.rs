use std::str::FromStr;

use crate::error::ParseError;
use crate::grid::Grid;

fn parse_fields(line_no: usize, line: &str, expected: usize) -> Result<Vec<i64>, ParseError> {
    let fields = line.split_whitespace().collect::<Vec<_>>();
    if fields.len() != expected {
        return Err(ParseError::FieldCount { line: line_no, expected, found: fields.len() });
    }

    fields
        .into_iter()
        .map(|token| {
            token
                .parse()
                .map_err(|_| ParseError::BadInteger { line: line_no, token: token.to_string() })
        })
        .collect()
}

/// Parse a grid from the text format:
///
/// - line 1: `n m`, two positive integers with `n >= 1` and `m >= 2`;
/// - lines 2 to n+1: `m` color codes each, in `0..=4`, space-separated;
/// - lines n+2 to 2n+1 (optional): `m` positive values each, space-separated. When omitted,
///   every cell gets value 1.
///
/// Blank lines are ignored. Malformed input fails with a [`ParseError`] naming the offending
/// line.
pub fn parse_grid(input: &str) -> Result<Grid, ParseError> {
    let lines = input
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
        .collect::<Vec<_>>();

    let Some(&(header_no, header)) = lines.first() else {
        return Err(ParseError::MissingHeader);
    };
    let dims = parse_fields(header_no, header, 2)?;
    // negative dimensions collapse to 0 and fail validation
    let n = usize::try_from(dims[0]).unwrap_or(0);
    let m = usize::try_from(dims[1]).unwrap_or(0);
    if n < 1 || m < 2 {
        return Err(crate::error::GridInvalidReason::DimensionsTooSmall { n, m }.into());
    }

    let with_values = match lines.len() {
        found if found == n + 1 => false,
        found if found == 2 * n + 1 => true,
        found => {
            return Err(ParseError::LineCount {
                n,
                color_only: n + 1,
                with_values: 2 * n + 1,
                found,
            })
        }
    };

    let mut colors = Vec::with_capacity(n);
    for &(line_no, line) in &lines[1..n + 1] {
        let mut row = Vec::with_capacity(m);
        for code in parse_fields(line_no, line, m)? {
            if !(0..=4).contains(&code) {
                return Err(ParseError::ColorOutOfRange { line: line_no, code });
            }
            row.push(code as u8);
        }
        colors.push(row);
    }

    let values = match with_values {
        false => None,
        true => {
            let mut rows = Vec::with_capacity(n);
            for &(line_no, line) in &lines[n + 1..] {
                let row = parse_fields(line_no, line, m)?;
                if let Some(bad) = row.iter().find(|value| **value < 1) {
                    return Err(ParseError::NonPositiveValue { line: line_no, value: *bad });
                }
                rows.push(row);
            }
            Some(rows)
        }
    };

    Grid::new(n, m, colors, values).map_err(ParseError::from)
}

impl FromStr for Grid {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_grid(s)
    }
}
