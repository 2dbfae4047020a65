//! Snapshot loading and command-line overlays.
//!
//! Logos and signature images may come from files named on the command line
//! instead of data URIs embedded in the snapshot. Overlays are applied once,
//! before the snapshot is frozen for an export.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use coa_common::{CoaSnapshot, CoaStatus, ImageData, Signatory, SignatoryRole};
use tracing::debug;

use crate::error::{CliError, Result};

/// `<role>=<value>` pair, e.g. `tested-by=sig.png` or `lab-manager=Dr. Osei`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    pub role: SignatoryRole,
    pub value: String,
}

impl FromStr for RoleAssignment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (role, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected <role>=<value>, got '{}'", s))?;
        let role = role.parse::<SignatoryRole>().map_err(|e| e.to_string())?;
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("empty value for role '{}'", role));
        }
        Ok(RoleAssignment {
            role,
            value: value.to_string(),
        })
    }
}

/// Command-line changes applied on top of a loaded snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotOverlay {
    pub logo: Option<PathBuf>,
    /// Signature image files by role.
    pub signatures: Vec<RoleAssignment>,
    /// Signer names by role.
    pub signers: Vec<RoleAssignment>,
    pub status: Option<CoaStatus>,
}

impl SnapshotOverlay {
    pub fn is_empty(&self) -> bool {
        self.logo.is_none()
            && self.signatures.is_empty()
            && self.signers.is_empty()
            && self.status.is_none()
    }

    /// Apply every overlay to the snapshot. Image files are read here, so a
    /// bad path or extension fails before any layout work starts.
    pub fn apply(&self, snapshot: &mut CoaSnapshot) -> Result<()> {
        if let Some(path) = &self.logo {
            snapshot.logo = Some(ImageData::from_path(path)?);
        }
        for assignment in &self.signers {
            signatory_mut(snapshot, assignment.role).name = assignment.value.clone();
        }
        for assignment in &self.signatures {
            let image = ImageData::from_path(Path::new(&assignment.value))?;
            signatory_mut(snapshot, assignment.role).signature = Some(image);
        }
        if let Some(status) = self.status {
            snapshot.status = status;
        }
        if !self.is_empty() {
            debug!(
                logo = self.logo.is_some(),
                signatures = self.signatures.len(),
                signers = self.signers.len(),
                "Snapshot overlay applied"
            );
        }
        Ok(())
    }
}

fn signatory_mut(snapshot: &mut CoaSnapshot, role: SignatoryRole) -> &mut Signatory {
    let position = match snapshot.signatories.iter().position(|s| s.role == role) {
        Some(position) => position,
        None => {
            snapshot.signatories.push(Signatory {
                role,
                name: String::new(),
                signature: None,
            });
            snapshot.signatories.len() - 1
        }
    };
    &mut snapshot.signatories[position]
}

/// Parse a `--status` value.
pub fn parse_status(s: &str) -> std::result::Result<CoaStatus, String> {
    match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "draft" => Ok(CoaStatus::Draft),
        "need_approval" => Ok(CoaStatus::NeedApproval),
        "completed" | "final" => Ok(CoaStatus::Completed),
        _ => Err(format!("unknown COA status: {}", s)),
    }
}

/// Load a snapshot from a file, or from stdin when the path is `-`.
pub fn load_snapshot(path: &Path) -> Result<CoaSnapshot> {
    if path == Path::new("-") {
        let mut json = String::new();
        std::io::stdin().read_to_string(&mut json)?;
        return Ok(CoaSnapshot::from_json(&json)?);
    }
    if !path.is_file() {
        return Err(CliError::Args(format!(
            "snapshot file not found: {}",
            path.display()
        )));
    }
    Ok(CoaSnapshot::load(path)?)
}

/// Write a payload to a file, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, payload: &str) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, payload)?;
        }
        None => println!("{}", payload),
    }
    Ok(())
}
