use crate::domain::model::{AnalysisResult, Run, TeamAggregate};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const RUNS_CSV: &str = "runs.csv";
pub const TEAMS_CSV: &str = "teams.csv";
pub const ANALYSIS_JSON: &str = "analysis.json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisReport<'a> {
    generated_at: DateTime<Utc>,
    runs: &'a [Run],
    teams: &'a [TeamAggregate],
}

/// A rendered report file, not yet written anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFile {
    pub name: String,
    pub contents: Vec<u8>,
}

fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

/// Header: `driver,team,compound,laps,paceMs,degradationMsPerLap,consistencyStd,confidence`.
pub fn runs_to_csv(runs: &[Run]) -> Result<Vec<u8>> {
    if runs.is_empty() {
        // csv only writes headers alongside the first record
        return Ok(b"driver,team,compound,laps,paceMs,degradationMsPerLap,consistencyStd,confidence\n".to_vec());
    }
    to_csv(runs)
}

pub fn teams_to_csv(teams: &[TeamAggregate]) -> Result<Vec<u8>> {
    if teams.is_empty() {
        return Ok(b"team,avgPaceMs,avgDegMsPerLap,interpretation\n".to_vec());
    }
    to_csv(teams)
}

pub fn analysis_to_json(result: &AnalysisResult, generated_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let report = AnalysisReport {
        generated_at,
        runs: &result.runs,
        teams: &result.teams,
    };
    Ok(serde_json::to_vec_pretty(&report)?)
}

/// Renders the requested formats (`csv`, `json`) in a fixed order.
pub fn render_reports(result: &AnalysisResult, formats: &[String]) -> Result<Vec<ReportFile>> {
    let mut files = Vec::new();

    if formats.iter().any(|f| f == "csv") {
        files.push(ReportFile {
            name: RUNS_CSV.to_string(),
            contents: runs_to_csv(&result.runs)?,
        });
        files.push(ReportFile {
            name: TEAMS_CSV.to_string(),
            contents: teams_to_csv(&result.teams)?,
        });
    }

    if formats.iter().any(|f| f == "json") {
        files.push(ReportFile {
            name: ANALYSIS_JSON.to_string(),
            contents: analysis_to_json(result, Utc::now())?,
        });
    }

    Ok(files)
}

pub fn bundle_zip(files: &[ReportFile]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for file in files {
        zip.start_file::<_, ()>(file.name.as_str(), FileOptions::default())?;
        zip.write_all(&file.contents)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
