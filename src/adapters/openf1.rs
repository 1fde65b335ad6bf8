use crate::core::{SessionSnapshot, SessionSource};
use crate::domain::model::{Driver, Lap, UNKNOWN_COMPOUND, UNKNOWN_TEAM};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openf1.org/v1";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

#[derive(Debug, Clone, Deserialize)]
pub struct RawDriver {
    pub driver_number: u32,
    pub name_acronym: Option<String>,
    pub broadcast_name: Option<String>,
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLap {
    pub driver_number: u32,
    pub lap_number: Option<u32>,
    pub lap_duration: Option<f64>,
    pub is_deleted: Option<bool>,
    pub compound: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStint {
    pub driver_number: u32,
    pub compound: Option<String>,
    pub tyre_compound: Option<String>,
}

/// Session data pulled from the public OpenF1 REST API.
pub struct OpenF1Source {
    client: Client,
    base_url: String,
    session_key: u32,
}

impl OpenF1Source {
    pub fn new(base_url: impl Into<String>, session_key: u32) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_key,
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>> {
        let url = format!(
            "{}/{}?session_key={}",
            self.base_url, resource, self.session_key
        );
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(EtlError::ApiStatusError {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl SessionSource for OpenF1Source {
    async fn fetch_session(&self) -> Result<SessionSnapshot> {
        let (drivers, laps, stints) = tokio::join!(
            self.fetch_json::<RawDriver>("drivers"),
            self.fetch_json::<RawLap>("laps"),
            self.fetch_json::<RawStint>("stints"),
        );

        let stints = stints.unwrap_or_else(|e| {
            tracing::warn!("Stints unavailable, compounds will fall back to UNK: {}", e);
            Vec::new()
        });

        Ok(normalize_session(&drivers?, &laps?, &stints))
    }
}

/// Last listed stint wins for each driver number.
fn stint_compounds(stints: &[RawStint]) -> HashMap<u32, String> {
    stints
        .iter()
        .map(|s| {
            let compound = s
                .compound
                .clone()
                .or_else(|| s.tyre_compound.clone())
                .unwrap_or_else(|| UNKNOWN_COMPOUND.to_string());
            (s.driver_number, compound)
        })
        .collect()
}

fn driver_code(raw: &RawDriver) -> String {
    raw.name_acronym
        .clone()
        .or_else(|| {
            raw.broadcast_name
                .as_ref()
                .map(|name| name.chars().take(3).collect::<String>().to_uppercase())
        })
        .unwrap_or_else(|| raw.driver_number.to_string())
}

pub fn normalize_session(
    drivers: &[RawDriver],
    laps: &[RawLap],
    stints: &[RawStint],
) -> SessionSnapshot {
    let stint_compound = stint_compounds(stints);

    let drivers: Vec<Driver> = drivers
        .iter()
        .map(|d| Driver {
            code: driver_code(d),
            team: d
                .team_name
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNKNOWN_TEAM.to_string()),
            declared_compound: Some(
                stint_compound
                    .get(&d.driver_number)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_COMPOUND.to_string()),
            ),
            number: d.driver_number,
        })
        .collect();

    let code_by_number: HashMap<u32, &str> =
        drivers.iter().map(|d| (d.number, d.code.as_str())).collect();

    let laps: Vec<Lap> = laps
        .iter()
        .filter_map(|l| {
            let lap_number = l.lap_number.filter(|&n| n > 0)?;
            let duration = l.lap_duration.filter(|&d| d > 0.0)?;

            Some(Lap {
                driver: code_by_number
                    .get(&l.driver_number)
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| l.driver_number.to_string()),
                lap_number,
                lap_time_ms: (duration * 1000.0).round() as u64,
                valid: !l.is_deleted.unwrap_or(false),
                compound: Some(
                    l.compound
                        .clone()
                        .filter(|c| !c.is_empty())
                        .or_else(|| stint_compound.get(&l.driver_number).cloned())
                        .unwrap_or_else(|| UNKNOWN_COMPOUND.to_string()),
                ),
            })
        })
        .collect();

    SessionSnapshot { drivers, laps }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_driver(number: u32, acronym: Option<&str>, broadcast: Option<&str>) -> RawDriver {
        RawDriver {
            driver_number: number,
            name_acronym: acronym.map(str::to_string),
            broadcast_name: broadcast.map(str::to_string),
            team_name: None,
        }
    }

    #[test]
    fn test_driver_code_fallbacks() {
        assert_eq!(driver_code(&raw_driver(1, Some("VER"), None)), "VER");
        assert_eq!(driver_code(&raw_driver(44, None, Some("L hamilton"))), "L H");
        assert_eq!(driver_code(&raw_driver(63, None, None)), "63");
    }

    #[test]
    fn test_last_stint_wins() {
        let stints = vec![
            RawStint {
                driver_number: 16,
                compound: Some("SOFT".to_string()),
                tyre_compound: None,
            },
            RawStint {
                driver_number: 16,
                compound: None,
                tyre_compound: Some("HARD".to_string()),
            },
        ];
        assert_eq!(stint_compounds(&stints)[&16], "HARD");
    }

    #[test]
    fn test_normalize_skips_incomplete_laps() {
        let drivers = vec![raw_driver(4, Some("NOR"), None)];
        let laps = vec![
            RawLap {
                driver_number: 4,
                lap_number: Some(1),
                lap_duration: None,
                is_deleted: None,
                compound: None,
            },
            RawLap {
                driver_number: 4,
                lap_number: Some(2),
                lap_duration: Some(95.2104),
                is_deleted: Some(true),
                compound: None,
            },
            RawLap {
                driver_number: 99,
                lap_number: Some(2),
                lap_duration: Some(97.0),
                is_deleted: None,
                compound: Some("SOFT".to_string()),
            },
        ];

        let session = normalize_session(&drivers, &laps, &[]);

        assert_eq!(session.drivers[0].team, "Unknown");
        assert_eq!(session.drivers[0].declared_compound.as_deref(), Some("UNK"));
        assert_eq!(session.laps.len(), 2);
        assert_eq!(session.laps[0].lap_time_ms, 95210);
        assert!(!session.laps[0].valid);
        assert_eq!(session.laps[0].compound.as_deref(), Some("UNK"));
        assert_eq!(session.laps[1].driver, "99");
        assert_eq!(session.laps[1].compound.as_deref(), Some("SOFT"));
    }

    #[test]
    fn test_blank_team_and_compound_fall_back() {
        let mut driver = raw_driver(81, Some("PIA"), None);
        driver.team_name = Some(String::new());
        let laps = vec![RawLap {
            driver_number: 81,
            lap_number: Some(3),
            lap_duration: Some(96.5),
            is_deleted: None,
            compound: Some(String::new()),
        }];

        let session = normalize_session(&[driver], &laps, &[]);

        assert_eq!(session.drivers[0].team, "Unknown");
        assert_eq!(session.laps[0].compound.as_deref(), Some("UNK"));
    }
}
