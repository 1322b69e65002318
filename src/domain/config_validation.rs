//! Configuration validation.
//!
//! Every key is optional; present keys must hold usable values.

use crate::domain::error::StocksimError;
use crate::domain::mock::{MAX_CANDLE_DAYS, MAX_ORDER_COUNT};
use crate::domain::record::parse_timestamp;
use crate::domain::settings::SourceName;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    validate_source(config)?;
    validate_seed(config)?;
    validate_now(config)?;
    validate_mock_counts(config)?;
    validate_page_size(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> StocksimError {
    StocksimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_source(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    let source = match config.get_nonempty("data", "source") {
        None => return Ok(()),
        Some(s) => s.parse::<SourceName>().map_err(|e| invalid("data", "source", e))?,
    };
    if source == SourceName::Csv && config.get_nonempty("data", "dir").is_none() {
        return Err(StocksimError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        });
    }
    Ok(())
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    if config.get_int("data", "seed", 0) < 0 {
        return Err(invalid("data", "seed", "seed must be non-negative"));
    }
    Ok(())
}

fn validate_now(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    match config.get_nonempty("data", "now") {
        Some(raw) if parse_timestamp(&raw).is_none() => Err(invalid(
            "data",
            "now",
            "invalid timestamp, expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
        )),
        _ => Ok(()),
    }
}

fn validate_mock_counts(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    let orders = config.get_int("mock", "orders", 0);
    if !(0..=MAX_ORDER_COUNT as i64).contains(&orders) {
        return Err(invalid(
            "mock",
            "orders",
            format!("orders must be between 0 and {MAX_ORDER_COUNT}"),
        ));
    }
    let candle_days = config.get_int("mock", "candle_days", 1);
    if !(1..=i64::from(MAX_CANDLE_DAYS)).contains(&candle_days) {
        return Err(invalid(
            "mock",
            "candle_days",
            format!("candle_days must be between 1 and {MAX_CANDLE_DAYS}"),
        ));
    }
    Ok(())
}

fn validate_page_size(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    if config.get_int("query", "page_size", 1) < 1 {
        return Err(invalid("query", "page_size", "page_size must be at least 1"));
    }
    Ok(())
}
