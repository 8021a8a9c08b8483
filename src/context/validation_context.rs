use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single validation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    #[default]
    Unknown,
    Optional,
    Passed,
    Failed,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Unknown => write!(f, "UNKNOWN"),
            ValidationStatus::Optional => write!(f, "OPTIONAL"),
            ValidationStatus::Passed => write!(f, "PASSED"),
            ValidationStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Per-validation state holder.
///
/// Several validators may update the same context during one step. `Failed`
/// is terminal: once reached, later updates are ignored so a success reported
/// by another validator can not hide the failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationContext {
    status: ValidationStatus,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    pub fn is_failed(&self) -> bool {
        self.status == ValidationStatus::Failed
    }

    /// Move to `status` unless the context already failed
    pub fn update_status(&mut self, status: ValidationStatus) {
        if self.is_failed() {
            if status != ValidationStatus::Failed {
                debug!("Ignoring status update to {} on failed validation context", status);
            }
            return;
        }

        self.status = status;
    }
}
