//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for dcasim.
#[derive(Debug, thiserror::Error)]
pub enum DcaError {
    #[error("no usable price data for {symbol} in [{start}, {end}): {reason}")]
    DataUnavailable {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
        reason: String,
    },

    #[error("composite series {asset} x {fx} is empty after cleaning in [{start}, {end})")]
    EmptyResult {
        asset: String,
        fx: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("export error: {reason}")]
    Export { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DcaError {
    /// Process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            DcaError::Io(_) => 1,
            DcaError::ConfigParse { .. }
            | DcaError::ConfigMissing { .. }
            | DcaError::ConfigInvalid { .. } => 2,
            DcaError::DataSource { .. } => 3,
            DcaError::DataUnavailable { .. } | DcaError::EmptyResult { .. } => 5,
            DcaError::Export { .. } => 6,
        }
    }
}

impl From<&DcaError> for std::process::ExitCode {
    fn from(err: &DcaError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
