//! List the fonts the render service accepts.

use shorts_common::config::AppConfig;
use shorts_composition::{FontChoice, GlobalSettings};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let default = GlobalSettings::from_defaults(&config.defaults).font;

    println!("Fonts:");
    for font in FontChoice::ALL {
        let marker = if font == default { " (default)" } else { "" };
        println!("  {:<16} {}{marker}", font.wire_id(), font.display_name());
    }

    Ok(())
}
