use chrono::{DateTime, Utc};
use error_stack::{Report, ResultExt};
use people_core::model::Person;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    Json,
}

impl ReportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "text/csv",
            ReportFormat::Json => "application/json",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "people.csv",
            ReportFormat::Json => "people.json",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown report format '{0}', expected 'csv' or 'json'")]
pub struct UnknownReportFormat(String);

impl FromStr for ReportFormat {
    type Err = UnknownReportFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            _ => Err(UnknownReportFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Csv => f.write_str("csv"),
            ReportFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to render {0} report")]
pub struct ReportError(ReportFormat);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub format: ReportFormat,
    pub body: Vec<u8>,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: Option<i64>,
    name: Option<&'a str>,
    city: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated: DateTime<Utc>,
    count: usize,
    people: &'a [Person],
}

const CSV_HEADER: [&str; 3] = ["id", "name", "city"];

pub fn render(
    format: ReportFormat,
    people: &[Person],
    generated: DateTime<Utc>,
) -> Result<RenderedReport, Report<ReportError>> {
    let body = match format {
        ReportFormat::Csv => render_csv(people),
        ReportFormat::Json => render_json(people, generated),
    }?;

    Ok(RenderedReport { format, body })
}

fn render_csv(people: &[Person]) -> Result<Vec<u8>, Report<ReportError>> {
    // header is written by hand so an empty report still has one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .change_context(ReportError(ReportFormat::Csv))?;

    for person in people {
        writer
            .serialize(CsvRow {
                id: person.id,
                name: person.name.as_deref(),
                city: person.city.as_deref(),
            })
            .change_context(ReportError(ReportFormat::Csv))
            .attach_with(|| format!("person {:?}", person.id))?;
    }

    writer
        .into_inner()
        .map_err(csv::IntoInnerError::into_error)
        .change_context(ReportError(ReportFormat::Csv))
}

fn render_json(
    people: &[Person],
    generated: DateTime<Utc>,
) -> Result<Vec<u8>, Report<ReportError>> {
    let report = JsonReport {
        generated,
        count: people.len(),
        people,
    };

    serde_json::to_vec_pretty(&report).change_context(ReportError(ReportFormat::Json))
}
