use core::fmt;
use core::num::NonZeroU32;

use crate::LdError;

/// 1-based station number as shown on the factory floor.
///
/// - `NonZero` keeps station numbering 1-based by construction
/// - `Option<StationId>` is the same size as `StationId`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u32", into = "u32")
)]
pub struct StationId(NonZeroU32);

impl StationId {
    /// Create from a 1-based station number.
    pub fn new(number: u32) -> Result<Self, LdError> {
        NonZeroU32::new(number)
            .map(Self)
            .ok_or(LdError::InvalidArg {
                what: "station number must be at least 1",
            })
    }

    /// Create from a 0-based index by storing index+1.
    pub fn from_index(index: usize) -> Self {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    pub fn number(self) -> u32 {
        self.0.get()
    }

    /// Recover the 0-based index.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl TryFrom<u32> for StationId {
    type Error = LdError;

    fn try_from(number: u32) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}

impl From<StationId> for u32 {
    fn from(id: StationId) -> Self {
        id.number()
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.number())
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station {}", self.number())
    }
}
