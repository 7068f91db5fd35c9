//! Generator configuration
//!
//! Defaults are the canonical values of the generated helper API; hand-written
//! steps elsewhere rely on them.

use serde::{Deserialize, Serialize};

use stepforge_common::{Error, Result};

/// Default `waitForElement` timeout in milliseconds
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5000;
/// Default `retryAction` attempt count
pub const DEFAULT_RETRY_COUNT: u32 = 3;
/// Default `retryAction` delay between attempts in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// What to do when one step text is bound more than once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Emit every binding silently
    Allow,
    /// Emit every binding and log a warning per colliding text
    #[default]
    Warn,
    /// Fail generation
    Reject,
}

/// Parameter defaults of the generated helper functions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperDefaults {
    pub wait_timeout_ms: u64,
    pub retry_count: u32,
    pub retry_delay_ms: u64,
}

impl Default for HelperDefaults {
    fn default() -> Self {
        Self {
            wait_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

/// Generator options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub collision_policy: CollisionPolicy,
    /// Directory page objects are imported from, relative to the module
    pub page_object_dir: String,
    /// Directory of the test-data manager and integration validator
    pub support_dir: String,
    pub helpers: HelperDefaults,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            collision_policy: CollisionPolicy::default(),
            page_object_dir: "../pages".to_string(),
            support_dir: "../support".to_string(),
            helpers: HelperDefaults::default(),
        }
    }
}

impl GeneratorOptions {
    /// Reject options that would produce a broken module
    pub fn validate(&self) -> Result<()> {
        if self.helpers.retry_count == 0 {
            return Err(Error::InvalidConfig(
                "helpers.retry_count must be at least 1".to_string(),
            ));
        }
        for (name, dir) in [
            ("page_object_dir", &self.page_object_dir),
            ("support_dir", &self.support_dir),
        ] {
            if dir.contains(['\n', '\r']) {
                return Err(Error::InvalidConfig(format!("{} must be a single line", name)));
            }
        }
        Ok(())
    }
}
