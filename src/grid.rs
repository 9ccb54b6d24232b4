use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;
use unordered_pair::UnorderedPair;

use crate::cell::CellColor;
use crate::error::GridInvalidReason;
use crate::location::Location;

/// A colored, valued rectangular grid of `n` rows and `m` columns.
///
/// A grid is validated on construction and immutable afterwards. Cells are addressed by
/// [`Location`]`(i, j)` in row-major order. Black cells are forbidden: they join no pair and
/// contribute nothing to any score.
#[derive(Clone, Debug)]
pub struct Grid {
    colors: Array2<CellColor>,
    values: Array2<i64>,
}

impl Grid {
    /// Construct a grid from explicit dimensions, color codes and optional values.
    ///
    /// `colors` must be `n` rows of `m` codes in `0..=4`. `values`, if supplied, must be `n`
    /// rows of `m` integers with every non-black value at least 1; if omitted, every cell
    /// gets value 1. Requires `n >= 1` and `m >= 2`.
    pub fn new(
        n: usize,
        m: usize,
        colors: Vec<Vec<u8>>,
        values: Option<Vec<Vec<i64>>>,
    ) -> Result<Self, GridInvalidReason> {
        if n < 1 || m < 2 {
            return Err(GridInvalidReason::DimensionsTooSmall { n, m });
        }

        if colors.len() != n {
            return Err(GridInvalidReason::ShapeMismatch { expected: n, found: colors.len() });
        }

        let mut color_cells = Vec::with_capacity(n * m);
        for (i, row) in colors.iter().enumerate() {
            if row.len() != m {
                return Err(GridInvalidReason::ShapeMismatch { expected: m, found: row.len() });
            }

            for (j, code) in row.iter().enumerate() {
                match CellColor::from_repr(*code) {
                    Some(color) => color_cells.push(color),
                    None => {
                        return Err(GridInvalidReason::ColorOutOfRange {
                            location: Location(i, j),
                            code: *code,
                        })
                    }
                }
            }
        }

        // shape is correct by the checks above
        let colors = Array2::from_shape_vec((n, m), color_cells).unwrap();

        let values = match values {
            None => Array2::ones((n, m)),
            Some(rows) => {
                if rows.len() != n {
                    return Err(GridInvalidReason::ShapeMismatch { expected: n, found: rows.len() });
                }

                let mut value_cells = Vec::with_capacity(n * m);
                for (i, row) in rows.iter().enumerate() {
                    if row.len() != m {
                        return Err(GridInvalidReason::ShapeMismatch { expected: m, found: row.len() });
                    }

                    for (j, value) in row.iter().enumerate() {
                        // black cells carry no meaningful value, so anything goes there
                        if *value < 1 && colors[(i, j)] != CellColor::Black {
                            return Err(GridInvalidReason::NonPositiveValue {
                                location: Location(i, j),
                                value: *value,
                            });
                        }
                        value_cells.push(*value);
                    }
                }

                Array2::from_shape_vec((n, m), value_cells).unwrap()
            }
        };

        Ok(Self { colors, values })
    }

    /// The number of rows.
    pub fn n(&self) -> usize {
        self.colors.nrows()
    }

    /// The number of columns.
    pub fn m(&self) -> usize {
        self.colors.ncols()
    }

    /// The color of the cell at `location`.
    pub fn color(&self, location: Location) -> CellColor {
        self.colors[location.as_index()]
    }

    /// The value of the cell at `location`. Meaningless for black cells.
    pub fn value(&self, location: Location) -> i64 {
        self.values[location.as_index()]
    }

    /// Whether the cell at `location` is black, i.e. excluded from pairing and scoring.
    pub fn is_forbidden(&self, location: Location) -> bool {
        self.color(location) == CellColor::Black
    }

    fn in_bounds(&self, location: Location) -> bool {
        location.0 < self.n() && location.1 < self.m()
    }

    fn pairable(&self, a: Location, b: Location) -> bool {
        self.in_bounds(a)
            && self.in_bounds(b)
            && self.color(a).compatible_with(self.color(b))
    }

    /// Whether `a` and `b` form a valid pair: in bounds, orthogonally adjacent, neither
    /// black, and color-compatible.
    pub fn is_valid_pair(&self, a: Location, b: Location) -> bool {
        a.adjacent_to(b) && self.pairable(a, b)
    }

    /// Enumerate every valid pair of cells, each exactly once.
    ///
    /// The iterator is lazy and may be restarted by calling this again. Only the right and
    /// down neighbor of each cell is inspected, so the total work and output are O(n·m).
    pub fn valid_pairs(&self) -> impl Iterator<Item = UnorderedPair<Location>> + '_ {
        (0..self.n())
            .cartesian_product(0..self.m())
            .flat_map(|(i, j)| {
                [Location(i, j + 1), Location(i + 1, j)]
                    .map(|neighbor| UnorderedPair(Location(i, j), neighbor))
            })
            .filter(move |pair| self.pairable(pair.0, pair.1))
    }

    /// The cost of pairing two cells: the absolute difference of their values.
    pub fn cost(&self, pair: UnorderedPair<Location>) -> i64 {
        (self.value(pair.0) - self.value(pair.1)).abs()
    }

    /// The score reduction obtained by pairing two cells instead of leaving both unpaired:
    /// `value(u) + value(v) - |value(u) - value(v)| = 2 * min(value(u), value(v))`.
    pub fn gain(&self, pair: UnorderedPair<Location>) -> i64 {
        2 * self.value(pair.0).min(self.value(pair.1))
    }

    /// The sum of values over all non-black cells; the constant `C` of the cost transform,
    /// and the score of the empty pairing.
    pub fn total_value(&self) -> i64 {
        self.colors
            .indexed_iter()
            .filter(|(_, color)| **color != CellColor::Black)
            .map(|(index, _)| self.values[index])
            .sum()
    }

    /// Score a pairing by the rules' formula: the sum of pair costs plus the value of every
    /// unpaired non-black cell.
    pub fn score_of(&self, pairs: &[UnorderedPair<Location>]) -> i64 {
        let mut used = HashSet::with_capacity(pairs.len() * 2);
        let mut score = 0;

        for pair in pairs {
            score += self.cost(*pair);
            used.insert(pair.0);
            used.insert(pair.1);
        }

        for (index, color) in self.colors.indexed_iter() {
            if *color != CellColor::Black && !used.contains(&Location::from(index)) {
                score += self.values[index];
            }
        }

        score
    }
}

impl Display for Grid {
    /// Dumps the grid one row per line, each cell as its color letter followed by its value,
    /// e.g. `w5 r8 k1`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.n() {
            let row = (0..self.m())
                .map(|j| {
                    let location = Location(i, j);
                    format!("{}{}", self.color(location).display_char(), self.value(location))
                })
                .join(" ");
            writeln!(f, "{}", row)?;
        }

        Ok(())
    }
}
