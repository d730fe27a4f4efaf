//! Build-completion handler wiring a preload strategy to the rule emitter.

use serde_json::Value;
use tracing::{debug, info};

use crate::assets::{AssetCollection, BuildAsset};
use crate::config::{HEADERS_FILE, PrecacheConfig, REDIRECTS_FILE, RulePolicy};
use crate::error::ConfigError;
use crate::manifest::{ManifestMode, PreloadStrategy};
use crate::rules::{GeneratedRules, emit};

/// Result of handling one build-completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
  /// Both rule files were inserted into the asset collection.
  Generated {
    /// Byte size of `_headers`.
    headers_size: usize,
    /// Byte size of `_redirects`.
    redirects_size: usize,
  },
  /// The strategy had nothing to interpret; the collection is unchanged.
  Skipped,
}

/// Interpret `assets` with `strategy` and emit both rule documents.
///
/// Pure: identical inputs always produce byte-identical documents.
pub fn generate<S: PreloadStrategy + ?Sized>(
  policy: &RulePolicy,
  strategy: &S,
  assets: &AssetCollection,
) -> Option<GeneratedRules> {
  let routes = strategy.interpret(assets)?;
  Some(emit(&routes, policy))
}

/// Generates `_headers` and `_redirects` once the build's assets are final.
#[derive(Debug, Clone)]
pub struct PushRulesPlugin<S = ManifestMode> {
  policy: RulePolicy,
  strategy: S,
}

impl PushRulesPlugin<ManifestMode> {
  /// Construct the plugin from untyped options, failing fast on invalid configuration.
  ///
  /// When a precache plugin's configuration is supplied it enables the compression hint if the
  /// plugin serves brotli files, and its ignore list is amended so the generated files are never
  /// precached.
  pub fn from_options(
    options: &Value,
    mode: ManifestMode,
    precache: Option<&mut PrecacheConfig>,
  ) -> Result<Self, ConfigError> {
    let policy = RulePolicy::from_value(options)?;
    Ok(Self::with_precache(policy, mode, precache))
  }

  /// Construct the plugin for a validated policy, cooperating with a precache plugin if present.
  pub fn with_precache(
    policy: RulePolicy,
    mode: ManifestMode,
    precache: Option<&mut PrecacheConfig>,
  ) -> Self {
    let policy = match precache {
      Some(precache) => {
        let policy = policy.with_precache(Some(&*precache));
        if precache.exclude_generated_files() {
          debug!("excluded generated rule files from the precache manifest");
        }
        policy
      }
      None => policy,
    };

    Self::new(policy, mode)
  }
}

impl<S: PreloadStrategy> PushRulesPlugin<S> {
  /// Create a plugin for an already validated policy.
  pub fn new(policy: RulePolicy, strategy: S) -> Self {
    Self { policy, strategy }
  }

  /// Policy fixed at construction.
  pub fn policy(&self) -> &RulePolicy {
    &self.policy
  }

  /// Generate the documents without touching the collection.
  pub fn generate(&self, assets: &AssetCollection) -> Option<GeneratedRules> {
    generate(&self.policy, &self.strategy, assets)
  }

  /// Handle a build-completion event by inserting both rule files into `assets`.
  pub fn on_emit(&self, assets: &mut AssetCollection) -> EmitOutcome {
    let Some(GeneratedRules { headers, redirects }) = self.generate(assets) else {
      info!("no push manifest for this build, leaving assets untouched");
      return EmitOutcome::Skipped;
    };

    let outcome = EmitOutcome::Generated {
      headers_size: headers.size(),
      redirects_size: redirects.size(),
    };
    assets.insert(HEADERS_FILE, headers);
    assets.insert(REDIRECTS_FILE, redirects);
    outcome
  }
}
