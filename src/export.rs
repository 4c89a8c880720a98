use thiserror::Error;

use crate::Variant;

pub const EXPORT_FILENAME: &str = "ad_copy_variants.csv";
pub const EXPORT_MIME: &str = "text/csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush csv: {0}")]
    Flush(String),
}

/// `Variant,Score` table, one row per ranked variant, UTF-8.
pub fn variants_to_csv(variants: &[Variant]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Variant", "Score"])?;
    for variant in variants {
        writer.write_record([variant.text.as_str(), format_score(variant.score).as_str()])?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.error().to_string()))
}

/// Shortest round-trip form, always with a fractional part: `80.0`, `62.45`.
pub fn format_score(score: f64) -> String {
    format!("{:?}", score)
}
