//! Ledger export port.

use crate::domain::error::DcaError;
use crate::domain::ledger::Ledger;
use std::path::Path;

pub trait LedgerExportPort {
    fn write(&self, ledger: &Ledger, output_path: &Path) -> Result<(), DcaError>;
}
