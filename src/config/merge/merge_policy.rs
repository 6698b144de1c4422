//! Base builder carrying the built-in defaults.

use crate::toc::emitter::DEFAULT_VIEW_NAME;
use crate::toc::grouped::{DEFAULT_FILES_NAME, DEFAULT_PREFIX_WIDTH};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder with the scalar defaults every later source overrides.
///
/// Struct-level serde defaults cover the rest, so a missing section is never
/// an error.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("index.view_name", DEFAULT_VIEW_NAME)?
        .set_default("index.files_name", DEFAULT_FILES_NAME)?
        .set_default("index.group_prefix_width", DEFAULT_PREFIX_WIDTH as i64)?
        .set_default("build.fail_on_collision", false)
}
