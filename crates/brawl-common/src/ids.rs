//! ID types for combatants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one of the two combatants in a session.
///
/// Ids are stable for the lifetime of a session and double as indices into
/// the session's fighter registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    /// First combatant (spawns on the left).
    pub const ONE: Self = Self(0);

    /// Second combatant (spawns on the right).
    pub const TWO: Self = Self(1);

    /// Both ids, in update order.
    pub const BOTH: [Self; 2] = [Self::ONE, Self::TWO];

    /// Returns the other combatant's id.
    #[must_use]
    pub const fn other(self) -> Self {
        if self.0 == 0 {
            Self::TWO
        } else {
            Self::ONE
        }
    }

    /// Returns the registry index for this id.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_is_involution() {
        assert_eq!(PlayerId::ONE.other(), PlayerId::TWO);
        assert_eq!(PlayerId::TWO.other(), PlayerId::ONE);
        assert_eq!(PlayerId::ONE.other().other(), PlayerId::ONE);
    }

    #[test]
    fn test_index_and_display() {
        assert_eq!(PlayerId::ONE.index(), 0);
        assert_eq!(PlayerId::TWO.index(), 1);
        assert_eq!(PlayerId::TWO.to_string(), "P2");
    }
}
