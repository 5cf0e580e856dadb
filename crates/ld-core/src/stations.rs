//! Static station reference table.
//!
//! The six production stages of the laptop line, each with a display name
//! and a baseline failure rate. These are configuration, not observations:
//! nothing in a run set changes them. An operator proposal produces a new
//! catalog through [`StationCatalog::with_failure_rate`].

use crate::{LdError, LdResult, Real, StationId, ensure_finite};

/// Default station table: (name, baseline failure rate), station 1 first.
pub const DEFAULT_STATIONS: [(&str, Real); 6] = [
    ("Motherboard", 0.02),
    ("CPU", 0.01),
    ("GPU", 0.05),
    ("Memory", 0.15),
    ("Chassis", 0.07),
    ("Display", 0.06),
];

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationSpec {
    #[cfg_attr(feature = "serde", serde(rename = "number"))]
    pub id: StationId,
    pub name: String,
    pub failure_rate: Real,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StationCatalog {
    stations: Vec<StationSpec>,
}

impl StationCatalog {
    /// Build a catalog. Stations must be numbered 1..=n without gaps so
    /// that `Station N ...` metric names line up with catalog entries.
    pub fn new(mut stations: Vec<StationSpec>) -> LdResult<Self> {
        if stations.is_empty() {
            return Err(LdError::InvalidArg {
                what: "station catalog must not be empty",
            });
        }

        stations.sort_by_key(|s| s.id);
        for (i, spec) in stations.iter().enumerate() {
            let expected = StationId::from_index(i);
            if spec.id < expected {
                return Err(LdError::DuplicateStation {
                    number: spec.id.number(),
                });
            }
            if spec.id != expected {
                return Err(LdError::StationOutOfRange {
                    number: spec.id.number(),
                    max: stations.len() as u32,
                });
            }
            let rate = ensure_finite(spec.failure_rate, "station failure rate")?;
            if rate < 0.0 {
                return Err(LdError::InvalidArg {
                    what: "station failure rate must be non-negative",
                });
            }
        }

        Ok(Self { stations })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationSpec> {
        self.stations.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = StationId> + '_ {
        self.stations.iter().map(|s| s.id)
    }

    pub fn get(&self, id: StationId) -> Option<&StationSpec> {
        self.stations.get(id.index())
    }

    pub fn spec(&self, id: StationId) -> LdResult<&StationSpec> {
        self.get(id).ok_or(LdError::UnknownStation {
            number: id.number(),
        })
    }

    pub fn name(&self, id: StationId) -> Option<&str> {
        self.get(id).map(|s| s.name.as_str())
    }

    pub fn failure_rate(&self, id: StationId) -> Option<Real> {
        self.get(id).map(|s| s.failure_rate)
    }

    /// Failure rates in station order.
    pub fn failure_rates(&self) -> Vec<Real> {
        self.stations.iter().map(|s| s.failure_rate).collect()
    }

    pub fn total_failure_rate(&self) -> Real {
        self.stations.iter().map(|s| s.failure_rate).sum()
    }

    /// Copy of this catalog with one station's failure rate replaced.
    pub fn with_failure_rate(&self, id: StationId, rate: Real) -> LdResult<Self> {
        let rate = ensure_finite(rate, "proposed failure rate")?;
        if rate < 0.0 {
            return Err(LdError::InvalidArg {
                what: "proposed failure rate must be non-negative",
            });
        }
        let mut next = self.clone();
        let spec = next
            .stations
            .get_mut(id.index())
            .ok_or(LdError::UnknownStation {
                number: id.number(),
            })?;
        spec.failure_rate = rate;
        Ok(next)
    }
}

impl Default for StationCatalog {
    fn default() -> Self {
        Self {
            stations: DEFAULT_STATIONS
                .iter()
                .enumerate()
                .map(|(i, (name, rate))| StationSpec {
                    id: StationId::from_index(i),
                    name: (*name).to_string(),
                    failure_rate: *rate,
                })
                .collect(),
        }
    }
}
