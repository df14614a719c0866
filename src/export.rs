use crate::error::{Result, ScoutError};
use crate::models::{Ad, AdSequence, ExportRow};
use chrono::{Local, NaiveDate};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Placeholder for location fields the ad does not carry
pub const NOT_AVAILABLE: &str = "N/A";

const MILEAGE_KEYS: &[&str] = &["mileage", "milage", "miltal"];
const YEAR_KEYS: &[&str] = &["regdate", "model_year", "year", "modellår"];

// Positions used by the search endpoint when parameters carry no usable id
const MILEAGE_INDEX: usize = 2;
const YEAR_INDEX: usize = 3;

/// Outcome of one CSV export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub written: usize,
    pub skipped: usize,
}

/// `<outdir>/data/<brand>/<model>/<brand>_<model>_<YYYY-MM-DD>.csv`
pub fn export_path(outdir: &Path, brand: &str, model: &str, date: NaiveDate) -> PathBuf {
    outdir
        .join("data")
        .join(brand)
        .join(model)
        .join(format!("{}_{}_{}.csv", brand, model, date.format("%Y-%m-%d")))
}

/// Look a parameter up by id or label, falling back to its position in the
/// first parameter group
fn parameter_value(ad: &Ad, keys: &[&str], index: usize) -> Option<String> {
    let named = ad
        .parameter_groups
        .iter()
        .flat_map(|group| group.parameters.iter())
        .find(|p| {
            keys.iter()
                .any(|k| p.id.eq_ignore_ascii_case(k) || p.label.to_lowercase() == *k)
        });

    named
        .or_else(|| {
            ad.parameter_groups
                .first()
                .and_then(|group| group.parameters.get(index))
        })
        .map(|p| p.value.clone())
}

/// Project one ad onto the seven export columns
pub fn project_row(ad: &Ad) -> Result<ExportRow> {
    let missing = |field: &str| ScoutError::Row {
        ad_id: ad.ad_id.clone(),
        reason: format!("no {} parameter", field),
    };

    let mileage = parameter_value(ad, MILEAGE_KEYS, MILEAGE_INDEX).ok_or_else(|| missing("mileage"))?;
    let year = parameter_value(ad, YEAR_KEYS, YEAR_INDEX).ok_or_else(|| missing("year"))?;

    let location_name = |i: usize| {
        ad.location
            .get(i)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    Ok(ExportRow {
        subject: ad.subject.clone(),
        price: ad.price.value.to_string(),
        mileage,
        year,
        municipality: location_name(0),
        area: location_name(1),
        url: ad.share_url.clone(),
    })
}

/// Write `ads` to today's CSV file for `brand`/`model` under `outdir`
pub fn export_csv(brand: &str, model: &str, ads: &AdSequence, outdir: &Path) -> Result<ExportSummary> {
    export_csv_on(brand, model, ads, outdir, Local::now().date_naive())
}

/// Same as [`export_csv`] with an explicit date stamp.
///
/// The file is truncated if it already exists. Malformed ads are logged
/// and left out; any filesystem or write failure aborts the export.
pub fn export_csv_on(
    brand: &str,
    model: &str,
    ads: &AdSequence,
    outdir: &Path,
    date: NaiveDate,
) -> Result<ExportSummary> {
    let path = export_path(outdir, brand, model, date);
    let io_error = |source| ScoutError::Io {
        path: path.clone(),
        source,
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| ScoutError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let file = File::create(&path).map_err(io_error)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(ExportRow::HEADER)?;

    let mut written = 0;
    let mut skipped = 0;
    for ad in &ads.data {
        match project_row(ad) {
            Ok(row) => {
                writer.write_record(row.as_record())?;
                written += 1;
            }
            Err(e) => {
                warn!("{}", e);
                skipped += 1;
            }
        }
    }

    writer.flush().map_err(io_error)?;
    info!(
        "Wrote {} rows to {} ({} skipped)",
        written,
        path.display(),
        skipped
    );

    Ok(ExportSummary {
        path,
        written,
        skipped,
    })
}
