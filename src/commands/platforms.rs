//! Platforms command: list the platform table

use console::Style;

use crate::config;
use crate::error::Result;
use crate::platform::Platform;
use crate::platform::loader::PlatformLoader;

/// Run platforms command
pub fn run() -> Result<()> {
    let platforms = PlatformLoader::new(config::config_dir()).load()?;
    print!("{}", render(&platforms));
    Ok(())
}

fn render(platforms: &[Platform]) -> String {
    let header = format!(
        "{:<12} {:<20} {:<12} {}",
        "ID", "NAME", "PROJECT", "GLOBAL"
    );
    let mut out = format!("{}\n", Style::new().bold().apply_to(header));
    for platform in platforms {
        out.push_str(&format!(
            "{:<12} {:<20} {:<12} {}\n",
            platform.id,
            platform.name,
            platform.directory,
            platform.global_directory.as_deref().unwrap_or("-")
        ));
    }
    out
}
