//! Command-line front end: derive `_headers` and `_redirects` for a build output directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use netlify_push_rules::config::{self, HEADERS_FILE, REDIRECTS_FILE};
use netlify_push_rules::dist::{load_dist_dir, write_rules};
use netlify_push_rules::{ManifestMode, PrecacheConfig, PushRulesPlugin, RulePolicy};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generate Netlify preload headers and SPA redirects from a build's push manifest.
#[derive(Debug, Parser)]
#[command(name = "netlify-push-rules", version, about)]
struct Cli {
  /// Build output directory containing the assets and `push-manifest.json`.
  #[arg(long)]
  dist: PathBuf,

  /// Options file (JSON, or YAML by extension). Defaults to `netlify-push.config.json` in the
  /// current directory when present.
  #[arg(long)]
  config: Option<PathBuf>,

  /// How preload routes are discovered.
  #[arg(long, default_value = "routes")]
  mode: ManifestMode,

  /// Emit the `/*.br` content-encoding block.
  #[arg(long)]
  brotli: bool,

  /// Extra redirect rule, appended after configured ones. May be repeated.
  #[arg(long = "redirect", value_name = "RULE")]
  redirects: Vec<String>,

  /// Precache plugin options (JSON, or YAML by extension); amended in place to ignore the
  /// generated files. Other options are left as they are.
  #[arg(long)]
  precache_config: Option<PathBuf>,

  /// Print the documents instead of writing them.
  #[arg(long)]
  dry_run: bool,

  /// Enable debug logging.
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
    )
    .init();

  let mut policy = load_policy(&cli)?;
  policy.redirects.extend(cli.redirects.iter().cloned());
  policy.compression_hint |= cli.brotli;

  let mut precache = match &cli.precache_config {
    Some(path) => Some(PrecacheConfig::from_path(path)?),
    None => None,
  };
  let original_precache = precache.clone();
  let plugin = PushRulesPlugin::with_precache(policy, cli.mode, precache.as_mut());

  if let (Some(path), Some(amended)) = (&cli.precache_config, &precache) {
    if precache != original_precache && !cli.dry_run {
      amended.write_to(path)?;
      info!(path = %path.display(), "excluded {HEADERS_FILE} and {REDIRECTS_FILE} from precaching");
    }
  }

  let assets = load_dist_dir(&cli.dist)?;

  let Some(rules) = plugin.generate(&assets) else {
    info!("no push manifest found in {}, nothing to do", cli.dist.display());
    return Ok(());
  };

  if cli.dry_run {
    println!("# {HEADERS_FILE}\n{}\n", rules.headers.as_str());
    println!("# {REDIRECTS_FILE}\n{}", rules.redirects.as_str());
    return Ok(());
  }

  write_rules(&cli.dist, &rules)?;
  Ok(())
}

fn load_policy(cli: &Cli) -> Result<RulePolicy> {
  let policy = match &cli.config {
    Some(path) => config::load_policy(path)?,
    None => {
      let cwd = std::env::current_dir().context("failed to resolve current directory")?;
      config::discover_policy(&cwd)?
    }
  };
  Ok(policy)
}
