//! Metric-name vocabulary shared by the results files and the service payload.

use std::borrow::Cow;
use std::fmt;

use ld_core::StationId;

pub const TOTAL_PRODUCTION: &str = "Total Production";
pub const FAULTY_PRODUCTS: &str = "Faulty Products";
pub const FAULTY_RATE: &str = "Faulty Rate";
pub const PRODUCTION_TIME: &str = "Production Time";
pub const FIXING_TIME: &str = "Fixing Time";
pub const SUPPLIER_OCCUPANCY: &str = "Supplier Occupancy";

const OCCUPANCY_SUFFIX: &str = "Occupancy Rate";
const WAIT_TIME_SUFFIX: &str = "Wait Time";
const DOWNTIME_SUFFIX: &str = "Downtime";

/// A known metric. Station-scoped metrics carry their station.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    TotalProduction,
    FaultyProducts,
    FaultyRate,
    ProductionTime,
    FixingTime,
    SupplierOccupancy,
    StationOccupancy(StationId),
    StationWaitTime(StationId),
    StationDowntime(StationId),
}

impl Metric {
    /// Key under which the metric is stored in a run.
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            Metric::TotalProduction => Cow::Borrowed(TOTAL_PRODUCTION),
            Metric::FaultyProducts => Cow::Borrowed(FAULTY_PRODUCTS),
            Metric::FaultyRate => Cow::Borrowed(FAULTY_RATE),
            Metric::ProductionTime => Cow::Borrowed(PRODUCTION_TIME),
            Metric::FixingTime => Cow::Borrowed(FIXING_TIME),
            Metric::SupplierOccupancy => Cow::Borrowed(SUPPLIER_OCCUPANCY),
            Metric::StationOccupancy(id) => Cow::Owned(format!("{id} {OCCUPANCY_SUFFIX}")),
            Metric::StationWaitTime(id) => Cow::Owned(format!("{id} {WAIT_TIME_SUFFIX}")),
            Metric::StationDowntime(id) => Cow::Owned(format!("{id} {DOWNTIME_SUFFIX}")),
        }
    }

    /// Parse a stored metric name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            TOTAL_PRODUCTION => return Some(Metric::TotalProduction),
            FAULTY_PRODUCTS => return Some(Metric::FaultyProducts),
            FAULTY_RATE => return Some(Metric::FaultyRate),
            PRODUCTION_TIME => return Some(Metric::ProductionTime),
            FIXING_TIME => return Some(Metric::FixingTime),
            SUPPLIER_OCCUPANCY => return Some(Metric::SupplierOccupancy),
            _ => {}
        }

        let rest = name.strip_prefix("Station ")?;
        let (number, suffix) = rest.split_once(' ')?;
        let id = StationId::new(number.parse().ok()?).ok()?;
        match suffix {
            OCCUPANCY_SUFFIX => Some(Metric::StationOccupancy(id)),
            WAIT_TIME_SUFFIX => Some(Metric::StationWaitTime(id)),
            DOWNTIME_SUFFIX => Some(Metric::StationDowntime(id)),
            _ => None,
        }
    }

    /// Production metrics in display order.
    pub fn production() -> [Metric; 3] {
        [
            Metric::TotalProduction,
            Metric::FaultyProducts,
            Metric::FaultyRate,
        ]
    }

    /// Time metrics in display order.
    pub fn time() -> [Metric; 3] {
        [
            Metric::ProductionTime,
            Metric::FixingTime,
            Metric::SupplierOccupancy,
        ]
    }

    /// Station metrics in display order.
    pub fn station(id: StationId) -> [Metric; 3] {
        [
            Metric::StationOccupancy(id),
            Metric::StationWaitTime(id),
            Metric::StationDowntime(id),
        ]
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(n: u32) -> StationId {
        StationId::new(n).unwrap()
    }

    #[test]
    fn station_metric_names() {
        assert_eq!(
            Metric::StationOccupancy(station(1)).name(),
            "Station 1 Occupancy Rate"
        );
        assert_eq!(Metric::StationWaitTime(station(3)).name(), "Station 3 Wait Time");
        assert_eq!(Metric::StationDowntime(station(6)).name(), "Station 6 Downtime");
    }

    #[test]
    fn parse_inverts_name() {
        let mut all = vec![
            Metric::TotalProduction,
            Metric::FaultyProducts,
            Metric::FaultyRate,
            Metric::ProductionTime,
            Metric::FixingTime,
            Metric::SupplierOccupancy,
        ];
        for n in 1..=6 {
            all.extend(Metric::station(station(n)));
        }
        for metric in all {
            assert_eq!(Metric::parse(&metric.name()), Some(metric));
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(Metric::parse("Average Total Production"), None);
        assert_eq!(Metric::parse("Station 0 Downtime"), None);
        assert_eq!(Metric::parse("Station x Downtime"), None);
        assert_eq!(Metric::parse("Station 2 Speed"), None);
    }
}
