use crate::domain::model::{Driver, Lap, SessionSnapshot};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;

fn malformed(record: String, reason: &str) -> EtlError {
    EtlError::MalformedRecord {
        record,
        reason: reason.to_string(),
    }
}

fn check_driver(index: usize, driver: &Driver) -> Result<()> {
    if driver.code.trim().is_empty() {
        return Err(malformed(format!("drivers[{}]", index), "code is empty"));
    }
    Ok(())
}

fn check_lap(index: usize, lap: &Lap) -> Result<()> {
    let record = || format!("laps[{}] (driver '{}', lap {})", index, lap.driver, lap.lap_number);

    if lap.driver.trim().is_empty() {
        return Err(malformed(record(), "driver is empty"));
    }
    if lap.lap_number == 0 {
        return Err(malformed(record(), "lapNumber must be positive"));
    }
    if lap.lap_time_ms == 0 {
        return Err(malformed(record(), "lapTimeMs must be positive"));
    }
    Ok(())
}

impl Validate for SessionSnapshot {
    /// Stops at the first offending record. Orphan laps and lap-less drivers are fine.
    fn validate(&self) -> Result<()> {
        for (index, driver) in self.drivers.iter().enumerate() {
            check_driver(index, driver)?;
        }
        for (index, lap) in self.laps.iter().enumerate() {
            check_lap(index, lap)?;
        }
        Ok(())
    }
}
