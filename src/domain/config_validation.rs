//! Configuration validation.
//!
//! Validates the `[dca]`, `[data]` and `[output]` fields before a simulation runs. The
//! data directory is checked where it is resolved, since a command-line flag
//! may supply it instead.

use crate::domain::config::{DEFAULT_HISTORY_YEARS, DEFAULT_MONTHLY_AMOUNT, DEFAULT_SCHEDULE_DAY};
use crate::domain::error::DcaError;
use crate::domain::schedule::MAX_SCHEDULE_DAY;
use crate::ports::config_port::ConfigPort;

pub const MAX_HISTORY_YEARS: i64 = 12;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), DcaError> {
    validate_history_years(config)?;
    validate_schedule_day(config)?;
    validate_monthly_amount(config)?;
    validate_symbols(config)?;
    validate_output(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> DcaError {
    DcaError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Present but unparsable integers are rejected rather than defaulted.
fn require_int(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), DcaError> {
    match config.get_string(section, key) {
        Some(s) if s.trim().parse::<i64>().is_err() => {
            Err(invalid(section, key, "must be an integer"))
        }
        _ => Ok(()),
    }
}

fn validate_history_years(config: &dyn ConfigPort) -> Result<(), DcaError> {
    require_int(config, "dca", "history_years")?;
    check_history_years(config.get_int("dca", "history_years", DEFAULT_HISTORY_YEARS))
}

fn validate_schedule_day(config: &dyn ConfigPort) -> Result<(), DcaError> {
    require_int(config, "dca", "schedule_day")?;
    check_schedule_day(config.get_int("dca", "schedule_day", DEFAULT_SCHEDULE_DAY))
}

fn validate_monthly_amount(config: &dyn ConfigPort) -> Result<(), DcaError> {
    if let Some(s) = config.get_string("dca", "monthly_amount") {
        if s.trim().parse::<f64>().is_err() {
            return Err(invalid("dca", "monthly_amount", "must be a number"));
        }
    }
    check_monthly_amount(config.get_double("dca", "monthly_amount", DEFAULT_MONTHLY_AMOUNT))
}

pub fn check_history_years(value: i64) -> Result<(), DcaError> {
    if !(1..=MAX_HISTORY_YEARS).contains(&value) {
        return Err(invalid(
            "dca",
            "history_years",
            "history_years must be between 1 and 12",
        ));
    }
    Ok(())
}

pub fn check_schedule_day(value: i64) -> Result<(), DcaError> {
    if !(1..=MAX_SCHEDULE_DAY as i64).contains(&value) {
        return Err(invalid(
            "dca",
            "schedule_day",
            "schedule_day must be between 1 and 28",
        ));
    }
    Ok(())
}

pub fn check_monthly_amount(value: f64) -> Result<(), DcaError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            "dca",
            "monthly_amount",
            "monthly_amount must be non-negative",
        ));
    }
    Ok(())
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), DcaError> {
    for key in ["asset", "fx"] {
        if let Some(s) = config.get_string("data", key) {
            if s.trim().is_empty() {
                return Err(invalid("data", key, "symbol must not be empty"));
            }
        }
    }
    Ok(())
}

fn validate_output(config: &dyn ConfigPort) -> Result<(), DcaError> {
    // An unrecognised value falls back to whichever default is passed.
    if config.get_string("output", "bom").is_some()
        && config.get_bool("output", "bom", true) != config.get_bool("output", "bom", false)
    {
        return Err(invalid("output", "bom", "must be true or false"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID: &str = "[dca]\nhistory_years = 5\nschedule_day = 5\nmonthly_amount = 1000\n\
                         [data]\npath = ./data\n";

    fn assert_invalid_key(content: &str, expected: &str) {
        let err = validate_config(&config(content)).unwrap_err();
        match err {
            DcaError::ConfigInvalid { key, .. } | DcaError::ConfigMissing { key, .. } => {
                assert_eq!(key, expected)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate_config(&config(VALID)).is_ok());
    }

    #[test]
    fn empty_config_uses_valid_defaults() {
        assert!(validate_config(&config("[dca]\n")).is_ok());
    }

    #[test]
    fn history_years_out_of_range() {
        assert_invalid_key("[dca]\nhistory_years = 0\n[data]\npath = x\n", "history_years");
        assert_invalid_key("[dca]\nhistory_years = 13\n[data]\npath = x\n", "history_years");
    }

    #[test]
    fn schedule_day_out_of_range() {
        assert_invalid_key("[dca]\nschedule_day = 0\n[data]\npath = x\n", "schedule_day");
        assert_invalid_key("[dca]\nschedule_day = 29\n[data]\npath = x\n", "schedule_day");
    }

    #[test]
    fn schedule_day_not_numeric() {
        assert_invalid_key("[dca]\nschedule_day = fifth\n[data]\npath = x\n", "schedule_day");
    }

    #[test]
    fn negative_amount_rejected() {
        assert_invalid_key("[dca]\nmonthly_amount = -1\n[data]\npath = x\n", "monthly_amount");
    }

    #[test]
    fn checks_reject_out_of_range_overrides() {
        assert!(check_history_years(12).is_ok());
        assert!(check_history_years(-1).is_err());
        assert!(check_schedule_day(28).is_ok());
        assert!(check_schedule_day(31).is_err());
        assert!(check_monthly_amount(0.0).is_ok());
        assert!(check_monthly_amount(f64::NAN).is_err());
    }

    #[test]
    fn bom_must_be_boolean() {
        assert_invalid_key("[output]\nbom = maybe\n", "bom");
        assert!(validate_config(&config("[output]\nbom = off\n")).is_ok());
        let err = validate_config(&config("[output]\nbom = 2\n")).unwrap_err();
        assert!(matches!(err, DcaError::ConfigInvalid { section, .. } if section == "output"));
    }

    #[test]
    fn zero_amount_allowed() {
        assert!(validate_config(&config("[dca]\nmonthly_amount = 0\n[data]\npath = x\n")).is_ok());
    }
}
