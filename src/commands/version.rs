//! Version command implementation

use crate::error::Result;
use crate::installer::paths::MAPPING_RULE;

/// Run version command
pub fn run() -> Result<()> {
    println!("rulekit {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version: {}", rustc_version());
    println!("  Profile: {}", build_profile());
    println!("  Path mapping: {}", MAPPING_RULE);

    Ok(())
}

fn rustc_version() -> &'static str {
    // Minimum supported rustc, from Cargo.toml
    env!("CARGO_PKG_RUST_VERSION")
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
