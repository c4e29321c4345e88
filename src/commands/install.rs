//! Install command
//!
//! Wires settings, the platform table and the bundle loader to the installer:
//! 1. Load config.yaml and platforms.jsonc
//! 2. Load and verify the bundle
//! 3. Select the platform and the install target
//! 4. Install, print the report, fail if conflicts blocked the install

use std::path::PathBuf;

use crate::bundle;
use crate::cli::InstallArgs;
use crate::config::{self, Settings};
use crate::error::{Result, RulekitError};
use crate::installer::{InstallOptions, InstallTarget, Installer};
use crate::platform::loader::PlatformLoader;
use crate::platform::{Platform, PlatformRegistry};
use crate::ui::report;
use crate::ui::{InteractiveProgressReporter, ProgressReporter, SilentProgressReporter};

/// Run the install command
pub fn run(workspace: Option<PathBuf>, args: InstallArgs, verbose: bool) -> Result<()> {
    let config_dir = config::config_dir();
    let settings = Settings::load(config_dir.as_deref())?;
    let registry = PlatformRegistry::new(PlatformLoader::new(config_dir).load()?);

    let loaded = bundle::load_bundle(&args.bundle)?;
    let platform = select_platform(
        &registry,
        args.platform.as_deref(),
        loaded.platform.as_deref(),
        settings.default_platform.as_deref(),
    )?;
    tracing::debug!("selected platform {}", platform.id);

    let target = resolve_target(workspace, &args, platform)?;
    let options = install_options(&args, &settings);
    let bundle = loaded.into_bundle(platform.id.clone());

    println!(
        "{}",
        report::render_header(&bundle.slug, &target, options.dry_run)
    );

    let show_progress = !args.no_progress && console::Term::stderr().is_term();
    let progress: Box<dyn ProgressReporter> = if show_progress {
        Box::new(InteractiveProgressReporter::new())
    } else {
        Box::new(SilentProgressReporter)
    };

    let report = Installer::new(&target, options)
        .with_progress(progress)
        .install(&bundle)?;

    report::print(&report, verbose);
    report.ensure_not_blocked()
}

/// Pick the platform: `--platform`, then the bundle's own, then the configured default.
///
/// A bundle built for one platform cannot be installed for another.
fn select_platform<'r>(
    registry: &'r PlatformRegistry,
    requested: Option<&str>,
    bundle: Option<&str>,
    default: Option<&str>,
) -> Result<&'r Platform> {
    match (requested, bundle) {
        (Some(requested), Some(bundle)) => {
            let platform = registry.resolve(requested)?;
            let bundle_id = registry.get_by_id(bundle).map_or(bundle, |p| p.id.as_str());
            if bundle_id != platform.id {
                return Err(RulekitError::PlatformMismatch {
                    bundle: bundle.to_string(),
                    requested: requested.to_string(),
                });
            }
            Ok(platform)
        }
        (Some(id), None) | (None, Some(id)) => registry.resolve(id),
        (None, None) => registry.resolve(default.ok_or(RulekitError::NoPlatformSelected)?),
    }
}

fn resolve_target(
    workspace: Option<PathBuf>,
    args: &InstallArgs,
    platform: &Platform,
) -> Result<InstallTarget> {
    if args.global {
        return InstallTarget::global(platform, dirs::home_dir().as_deref());
    }
    if let Some(ref dir) = args.target {
        return InstallTarget::custom(dir, platform);
    }

    let root = match workspace {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    InstallTarget::project(&root, platform)
}

/// Command-line flags layered over config.yaml
fn install_options(args: &InstallArgs, settings: &Settings) -> InstallOptions {
    InstallOptions {
        force: args.force,
        dry_run: args.dry_run,
        skip_conflicts: args.skip_conflicts || settings.skip_conflicts,
        backup: args.backup_override().unwrap_or(settings.backup),
        atomic: args.atomic || settings.atomic,
    }
}
