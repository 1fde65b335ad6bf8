use crate::domain::model::Lap;
use std::collections::HashMap;

/// Laps partitioned by driver code, each list in lap order.
#[derive(Debug, Default)]
pub struct GroupedLaps<'a> {
    by_driver: HashMap<&'a str, Vec<&'a Lap>>,
}

impl<'a> GroupedLaps<'a> {
    pub fn from_laps(laps: &'a [Lap]) -> Self {
        let mut by_driver: HashMap<&'a str, Vec<&'a Lap>> = HashMap::new();
        for lap in laps {
            by_driver.entry(lap.driver.as_str()).or_default().push(lap);
        }

        // sort_by_key is stable: duplicate lap numbers keep input order
        for laps in by_driver.values_mut() {
            laps.sort_by_key(|lap| lap.lap_number);
        }

        Self { by_driver }
    }

    /// Empty for drivers that never set a lap.
    pub fn laps_for(&self, driver: &str) -> &[&'a Lap] {
        self.by_driver.get(driver).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn driver_count(&self) -> usize {
        self.by_driver.len()
    }
}
