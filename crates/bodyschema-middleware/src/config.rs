use crate::error::{MiddlewareError, Result};

/// Status attached to a rejected body unless configured otherwise.
pub const DEFAULT_REJECTION_STATUS: u16 = 400;

/// Configuration for how rejections are reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiddlewareConfig {
    /// Response status for a body that fails validation.
    pub rejection_status: u16,
    /// Include the offending value in the rejection payload.
    pub expose_value: bool,
}

impl MiddlewareConfig {
    pub fn validate(&self) -> Result<()> {
        if !(400..=599).contains(&self.rejection_status) {
            return Err(MiddlewareError::InvalidStatus(self.rejection_status));
        }
        Ok(())
    }
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            rejection_status: DEFAULT_REJECTION_STATUS,
            expose_value: true,
        }
    }
}
