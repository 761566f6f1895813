//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies are re-exported from [`crate::api`]. The multipart upload
//! is gathered into a [`CoverageForm`] before it becomes a
//! [`crate::models::CoverageRequest`].

use axum::extract::Multipart;

use super::error::AppError;
use crate::config::CoverageSettings;
use crate::models::{CoverageRequest, InputTable};
use crate::parsing::SourceFormat;

pub use crate::api::{CoveragePoint, CoverageReport, CoverageSummary, HealthResponse};

/// A file part from the upload.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Convert into an input table.
    ///
    /// An explicit format wins; otherwise the part's file name extension is
    /// used, falling back to delimited text.
    fn into_table(self, field: &str, format_override: Option<&str>) -> Result<InputTable, AppError> {
        let format = match format_override.map(str::trim).filter(|f| !f.is_empty()) {
            Some(declared) => declared
                .parse::<SourceFormat>()
                .map_err(|e| AppError::BadRequest(format!("{}_format: {}", field, e)))?,
            None => self
                .file_name
                .as_deref()
                .and_then(SourceFormat::from_file_name)
                .unwrap_or_default(),
        };
        let name = self.file_name.unwrap_or_else(|| field.to_string());
        Ok(InputTable::new(name, self.bytes, format))
    }
}

/// Fields of the coverage upload form.
#[derive(Debug, Clone, Default)]
pub struct CoverageForm {
    pub demand_file: Option<UploadedFile>,
    pub riders_file: Option<UploadedFile>,
    pub demand_format: Option<String>,
    pub riders_format: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub city: Option<String>,
    pub interval_minutes: Option<String>,
}

impl CoverageForm {
    /// Drain a multipart body. Unknown parts are ignored.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match name.as_str() {
                "demand_file" | "riders_file" => {
                    let file_name = field.file_name().map(str::to_string);
                    let bytes = field.bytes().await?.to_vec();
                    let upload = Some(UploadedFile { file_name, bytes });
                    if name == "demand_file" {
                        form.demand_file = upload;
                    } else {
                        form.riders_file = upload;
                    }
                }
                "demand_format" => form.demand_format = Some(field.text().await?),
                "riders_format" => form.riders_format = Some(field.text().await?),
                "start_date" => form.start_date = Some(field.text().await?),
                "end_date" => form.end_date = Some(field.text().await?),
                "city" => form.city = Some(field.text().await?),
                "interval_minutes" => form.interval_minutes = Some(field.text().await?),
                other => tracing::debug!("Ignoring multipart field '{}'", other),
            }
        }

        Ok(form)
    }

    /// Validate presence of required parts and build the request.
    ///
    /// `settings` supplies the step when none was posted and the bucket limit.
    pub fn into_request(self, settings: &CoverageSettings) -> Result<CoverageRequest, AppError> {
        let demand_file = required(self.demand_file, "demand_file")?;
        let riders_file = required(self.riders_file, "riders_file")?;
        let start_date = required(self.start_date, "start_date")?;
        let end_date = required(self.end_date, "end_date")?;
        let city = required(self.city, "city")?;

        let interval_minutes = match self.interval_minutes.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse::<i64>().map_err(|_| {
                AppError::BadRequest(format!("interval_minutes must be an integer, got '{}'", raw))
            })?,
            _ => settings.default_interval_minutes,
        };

        let demand = demand_file.into_table("demand", self.demand_format.as_deref())?;
        let riders = riders_file.into_table("riders", self.riders_format.as_deref())?;

        let request = CoverageRequest::from_text_range(
            demand,
            riders,
            &start_date,
            &end_date,
            city,
            interval_minutes,
        )?;
        Ok(request.with_max_points(settings.max_points))
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::BadRequest(format!("Missing form field: {}", field)))
}
