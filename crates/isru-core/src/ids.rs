use core::fmt;
use core::num::NonZeroU32;

/// Compact handle into an arena owned by the simulation driver.
///
/// Subsystems never own the tanks they read and write; they hold an `Id`
/// and borrow the arena for the duration of one cycle.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based arena slot by storing slot+1.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Recover the 0-based arena slot.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Arena slot as a `usize` for indexing.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Handle of a storage tank in the plant's tank bank.
pub type TankId = Id;
/// Handle of a registered power consumer.
pub type ConsumerId = Id;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_survives_round_trip() {
        for i in [0_u32, 1, 4, 99] {
            let id = TankId::from_index(i);
            assert_eq!(id.index(), i);
            assert_eq!(id.slot(), i as usize);
        }
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<Id>(),
            core::mem::size_of::<Option<Id>>()
        );
    }

    #[test]
    fn display_is_the_slot() {
        assert_eq!(format!("{}", Id::from_index(3)), "3");
        assert_eq!(format!("{:?}", Id::from_index(3)), "Id(3)");
    }
}
