//! The append-only ledger of addresses deployed in a run

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use alloy_primitives::Address;
use tracing::warn;

use crate::{constants::LEDGER_EXTENSION, types::BestEffort};

/// Milliseconds since the Unix epoch, captured once per run to key its ledger file
pub fn run_timestamp() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}

/// The ledger file of a single run on a single network
#[derive(Clone, Debug)]
pub struct AddressLedger {
    /// The file lines are appended to
    path: PathBuf,
}

impl AddressLedger {
    /// The ledger for the run started at `run_timestamp` on `network_name`,
    /// under the `dir` directory
    pub fn new(dir: &Path, network_name: &str, run_timestamp: u128) -> Self {
        let path = dir.join(format!("{network_name}_{run_timestamp}.{LEDGER_EXTENSION}"));
        AddressLedger { path }
    }

    /// The path of the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a deployed module, logging rather than returning any failure
    pub fn record(&self, address: Address, contract_name: &str) -> BestEffort {
        let line = format!("{} - {}\n", address.to_checksum(None), contract_name);
        let outcome = append(&self.path, &line);
        if let BestEffort::Failed(reason) = &outcome {
            warn!(
                "Could not record {} in {}: {}",
                contract_name,
                self.path.display(),
                reason
            );
        }

        outcome
    }
}

/// Append `line` to the file at `file_path`, creating its directory if needed
pub fn append(file_path: &Path, line: &str) -> BestEffort {
    let write = || -> std::io::Result<()> {
        if let Some(dir) = file_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        file.write_all(line.as_bytes())
    };

    match write() {
        Ok(()) => BestEffort::Recorded,
        Err(e) => BestEffort::Failed(e.to_string()),
    }
}
