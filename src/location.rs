use ndarray::Ix;

type Coord = usize;

/// A location `(i, j)` on a grid, where `i` is the row and `j` is the column.
/// The top left corner is `Location(0, 0)`.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
pub struct Location(pub Coord, pub Coord);

impl Location {
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.0, self.1)
    }

    /// The bipartition class of this location in the grid adjacency graph: `(i + j) % 2`.
    ///
    /// Every orthogonal step changes exactly one coordinate by 1, so adjacent locations
    /// always have opposite parity. This is derived from the coordinates and never stored.
    pub fn parity(&self) -> usize {
        (self.0 + self.1) % 2
    }

    /// Whether `self` and `other` are orthogonally adjacent.
    pub fn adjacent_to(&self, other: Location) -> bool {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1) == 1
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.0, value.1)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}
