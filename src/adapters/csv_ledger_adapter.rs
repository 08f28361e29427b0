//! CSV ledger export adapter implementing LedgerExportPort.

use crate::domain::error::DcaError;
use crate::domain::ledger::{Ledger, PurchaseEvent};
use crate::ports::report_port::LedgerExportPort;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn export_error(e: impl std::fmt::Display) -> DcaError {
    DcaError::Export {
        reason: e.to_string(),
    }
}

/// Flat export row; an undefined average cost becomes an empty cell.
#[derive(Debug, Serialize)]
pub struct LedgerRow {
    pub date: String,
    pub price: f64,
    pub contribution: f64,
    pub units_bought: f64,
    pub cumulative_units: f64,
    pub cumulative_contributed: f64,
    pub average_cost: Option<f64>,
    pub market_value: f64,
    pub pnl: f64,
    pub roi_percent: f64,
}

impl From<&PurchaseEvent> for LedgerRow {
    fn from(e: &PurchaseEvent) -> Self {
        Self {
            date: e.date.format("%Y-%m-%d").to_string(),
            price: e.price,
            contribution: e.contribution,
            units_bought: e.units_bought,
            cumulative_units: e.cumulative_units,
            cumulative_contributed: e.cumulative_contributed,
            average_cost: e.average_cost,
            market_value: e.market_value,
            pnl: e.pnl,
            roi_percent: e.roi_percent,
        }
    }
}

pub struct CsvLedgerAdapter {
    with_bom: bool,
}

impl CsvLedgerAdapter {
    pub fn new(with_bom: bool) -> Self {
        Self { with_bom }
    }

    pub fn write_to<W: Write>(&self, ledger: &Ledger, mut out: W) -> Result<(), DcaError> {
        if self.with_bom {
            out.write_all(UTF8_BOM).map_err(export_error)?;
        }
        let mut wtr = csv::Writer::from_writer(out);
        for event in ledger {
            wtr.serialize(LedgerRow::from(event)).map_err(export_error)?;
        }
        wtr.flush().map_err(export_error)?;
        Ok(())
    }
}

impl Default for CsvLedgerAdapter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LedgerExportPort for CsvLedgerAdapter {
    fn write(&self, ledger: &Ledger, output_path: &Path) -> Result<(), DcaError> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DcaError::Export {
                reason: format!("failed to create {}: {}", parent.display(), e),
            })?;
        }
        let file = File::create(output_path).map_err(|e| DcaError::Export {
            reason: format!("failed to create {}: {}", output_path.display(), e),
        })?;
        self.write_to(ledger, file)?;
        tracing::info!(path = %output_path.display(), rows = ledger.len(), "ledger exported");
        Ok(())
    }
}
