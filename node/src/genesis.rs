//! Genesis files.
//!
//! A genesis file names the two fixed roles and the ledger parameters a
//! deployment starts from:
//!
//! ```json
//! {
//!   "admin": "admin",
//!   "university": "university",
//!   "config": { "genesis_supply": "1000000", "service_fee_bps": 100 }
//! }
//! ```
//!
//! Identities may be `0x`-hex or labels. `config` may be omitted entirely.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use campus_contracts::CampusCoin;
use campus_protocol::{Address, LedgerConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisFile {
    pub admin: Address,
    pub university: Address,
    #[serde(default)]
    pub config: LedgerConfig,
}

impl GenesisFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read genesis file {}", path.display()))?;
        let genesis: GenesisFile = serde_json::from_str(&raw)
            .with_context(|| format!("invalid genesis file {}", path.display()))?;
        genesis
            .config
            .validate()
            .with_context(|| format!("invalid ledger config in {}", path.display()))?;
        Ok(genesis)
    }

    /// Writes the file as pretty JSON. Refuses to clobber an existing file
    /// unless `force` is set.
    pub fn save(&self, path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!(
                "{} already exists (pass --force to overwrite)",
                path.display()
            );
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let body = serde_json::to_string_pretty(self)?;
        std::fs::write(path, body + "\n")
            .with_context(|| format!("failed to write genesis file {}", path.display()))?;
        Ok(())
    }

    /// Deploys a fresh ledger from this genesis.
    pub fn deploy(&self) -> Result<CampusCoin> {
        CampusCoin::deploy_with_config(self.admin, self.university, self.config.clone())
            .context("genesis config rejected")
    }
}
