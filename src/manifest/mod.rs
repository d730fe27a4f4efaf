//! Interpretation of build outputs into ordered route preload blocks.
//!
//! Two strategies share one interface: the structured push manifest written by the bundler, and
//! a fallback that infers routes from bundle filename conventions. Filename classification lives
//! in its own submodule so its ordered rules can be tested independently.

mod classify;
mod filenames;
mod routes;

use std::str::FromStr;

use crate::assets::AssetCollection;
use crate::models::RoutePreload;

pub use classify::{AssetCategory, classify_asset, requires_anonymous_cors, route_from_bundle};
pub use filenames::{
  FilenameConventionStrategy, MISSING_SCRIPT_PLACEHOLDER, MISSING_STYLE_PLACEHOLDER,
  interpret_filenames,
};
pub use routes::{
  PUSH_MANIFEST_FILE, RouteManifestStrategy, interpret_manifest, interpret_manifest_bytes,
};

/// Turns a finalized asset collection into route preload blocks.
pub trait PreloadStrategy {
  /// Returns `None` when there is nothing to do for this build.
  fn interpret(&self, assets: &AssetCollection) -> Option<Vec<RoutePreload>>;
}

/// Selectable interpretation strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ManifestMode {
  /// Read `push-manifest.json`.
  #[default]
  Routes,
  /// Infer routes from `route-*`, `style*.css` and `bundle*.js` names.
  Filenames,
}

impl PreloadStrategy for ManifestMode {
  fn interpret(&self, assets: &AssetCollection) -> Option<Vec<RoutePreload>> {
    match self {
      Self::Routes => RouteManifestStrategy.interpret(assets),
      Self::Filenames => FilenameConventionStrategy.interpret(assets),
    }
  }
}

impl FromStr for ManifestMode {
  type Err = String;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.trim().to_ascii_lowercase().as_str() {
      "routes" | "manifest" => Ok(Self::Routes),
      "filenames" | "fallback" => Ok(Self::Filenames),
      other => Err(format!(
        "unknown manifest mode '{other}', expected 'routes' or 'filenames'"
      )),
    }
  }
}
