/// Error taxonomy.
///
///   `ConfigError`: the level or settings are malformed (load time).
///   `InvariantViolation`: the simulation broke a collision invariant (logic fault).

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// No rows, or rows with no columns.
    EmptyMap,
    /// A row whose length differs from the first row.
    RaggedRow { row: usize, expected: usize, found: usize },
    /// A second 'P' symbol. Positions are (row, col).
    MultipleSpawns { first: (usize, usize), second: (usize, usize) },
    /// A symbol outside {'0', '1', 'P'}.
    UnknownSymbol { row: usize, col: usize, symbol: char },
    /// The spawn cell's box is not fully inside the display above the floor.
    SpawnOffscreen { row: usize, col: usize },
    /// A numeric setting out of its legal range.
    InvalidValue { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMap => write!(f, "level map is empty"),
            Self::RaggedRow { row, expected, found } => write!(
                f,
                "level row {row} has {found} columns, expected {expected}"
            ),
            Self::MultipleSpawns { first, second } => write!(
                f,
                "level has more than one spawn: ({}, {}) and ({}, {})",
                first.0, first.1, second.0, second.1
            ),
            Self::UnknownSymbol { row, col, symbol } => {
                write!(f, "unknown map symbol {symbol:?} at row {row}, col {col}")
            }
            Self::SpawnOffscreen { row, col } => write!(
                f,
                "spawn at row {row}, col {col} lies outside the display"
            ),
            Self::InvalidValue { key, reason } => write!(f, "invalid {key}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The character box escaped the display beyond what the safety clamp allows.
#[derive(Clone, Debug, PartialEq)]
pub struct InvariantViolation {
    pub frame: u64,
    pub detail: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invariant violated at frame {}: {}", self.frame, self.detail)
    }
}

impl std::error::Error for InvariantViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages_name_the_location() {
        let e = ConfigError::RaggedRow { row: 3, expected: 10, found: 9 };
        assert_eq!(e.to_string(), "level row 3 has 9 columns, expected 10");

        let e = ConfigError::UnknownSymbol { row: 0, col: 2, symbol: 'x' };
        assert!(e.to_string().contains("'x'"));

        let e = ConfigError::SpawnOffscreen { row: 2, col: 27 };
        assert_eq!(e.to_string(), "spawn at row 2, col 27 lies outside the display");
    }

    #[test]
    fn invariant_message_includes_frame() {
        let e = InvariantViolation { frame: 42, detail: "left edge -3".into() };
        assert_eq!(e.to_string(), "invariant violated at frame 42: left edge -3");
    }
}
