use thiserror::Error;

use crate::location::Location;

/// Reasons a grid file fails to parse. Every variant names the offending 1-based line.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    /// The input is empty or the first line is not two integers `n m`.
    #[error("line 1: expected a header of two integers `n m`")]
    MissingHeader,
    /// A color or value row does not hold exactly `m` fields.
    #[error("line {line}: expected {expected} integers, found {found}")]
    FieldCount {
        /// 1-based line number.
        line: usize,
        /// The grid width `m`.
        expected: usize,
        /// Number of whitespace-separated fields actually present.
        found: usize,
    },
    /// A field is not an integer.
    #[error("line {line}: {token:?} is not an integer")]
    BadInteger {
        /// 1-based line number.
        line: usize,
        /// The offending field.
        token: String,
    },
    /// A color code outside `0..=4`.
    #[error("line {line}: color code {code} is out of range 0..=4")]
    ColorOutOfRange {
        /// 1-based line number.
        line: usize,
        /// The offending code.
        code: i64,
    },
    /// A declared value below 1.
    #[error("line {line}: cell values must be at least 1, found {value}")]
    NonPositiveValue {
        /// 1-based line number.
        line: usize,
        /// The offending value.
        value: i64,
    },
    /// The input does not hold a header plus `n` color rows, optionally followed by `n` value rows.
    #[error("expected {color_only} or {with_values} lines for a {n}-row grid, found {found}")]
    LineCount {
        /// The declared row count.
        n: usize,
        /// `n + 1`.
        color_only: usize,
        /// `2n + 1`.
        with_values: usize,
        /// Non-blank lines actually present.
        found: usize,
    },
    /// The parsed data violates a grid invariant.
    #[error(transparent)]
    Invalid(#[from] GridInvalidReason),
}

/// Reasons a grid cannot be constructed.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum GridInvalidReason {
    /// Grids must have at least one row and two columns.
    #[error("grid must be at least 1x2, got {n}x{m}")]
    DimensionsTooSmall {
        /// Declared row count.
        n: usize,
        /// Declared column count.
        m: usize,
    },
    /// A color or value row does not hold exactly `m` entries, or the wrong number of rows was supplied.
    #[error("expected {expected} entries, found {found}")]
    ShapeMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        found: usize,
    },
    /// A color code outside `0..=4`.
    #[error("cell {location}: color code {code} is out of range 0..=4")]
    ColorOutOfRange {
        /// The offending cell.
        location: Location,
        /// The offending code.
        code: u8,
    },
    /// A non-black cell declared with a value below 1.
    #[error("cell {location}: non-black cells must have value at least 1, found {value}")]
    NonPositiveValue {
        /// The offending cell.
        location: Location,
        /// The offending value.
        value: i64,
    },
}

/// Reasons the exact solver may abort.
///
/// Neither variant is expected under correct operation; both indicate a broken internal
/// invariant, and the solve is aborted rather than returning a possibly suboptimal pairing.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum SolverFailure {
    /// Bellman-Ford exceeded its relaxation bound, meaning the residual graph contains a
    /// negative cycle. Augmenting only along shortest paths is supposed to rule this out.
    #[error("shortest-path search failed to converge: negative cycle in the residual graph")]
    RelaxationDiverged,
    /// The score recomputed directly from the decoded pair set disagrees with the score
    /// implied by the accumulated flow cost.
    #[error("decoded pairing scores {direct}, but the flow cost implies {from_flow}")]
    ScoreMismatch {
        /// `C + K`: total non-black value plus accumulated flow cost.
        from_flow: i64,
        /// Score recomputed from the pair set with the rules' formula.
        direct: i64,
    },
}
