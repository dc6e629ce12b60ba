use anyhow::{Context, Result};

use semantix::config::SemantixConfig;

/// Print the resolved configuration as TOML.
pub fn show_config(config: &SemantixConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("failed to render config")?;
    match semantix::config::default_config_path() {
        Some(path) => println!("# default location: {}", path.display()),
        None => println!("# no home directory; defaults in effect"),
    }
    print!("{rendered}");
    Ok(())
}
