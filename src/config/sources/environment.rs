//! Environment variable source: TOCBUILD__ prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

pub const ENV_PREFIX: &str = "TOCBUILD";

/// Add environment variable overlay to builder.
/// `TOCBUILD__INDEX__VIEW_NAME=By-ATC` sets `index.view_name`; page depths
/// are given comma separated.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("index.page_depths"),
    );
    Ok(builder)
}
