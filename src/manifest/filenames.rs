//! Route inference from bundle filename conventions, for builds without a push manifest.

use tracing::debug;

use crate::assets::AssetCollection;
use crate::manifest::PreloadStrategy;
use crate::manifest::classify::{
  AssetCategory, classify_asset, requires_anonymous_cors, route_from_bundle,
};
use crate::models::{PreloadHint, ResourceType, RoutePreload};

/// Comment emitted when the build produced no shared stylesheet.
pub const MISSING_STYLE_PLACEHOLDER: &str = "# no shared stylesheet";

/// Comment emitted when the build produced no shared main script.
pub const MISSING_SCRIPT_PLACEHOLDER: &str = "# no shared script";

/// Infers one route per `route-*` bundle and preloads the shared stylesheet and script with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameConventionStrategy;

impl PreloadStrategy for FilenameConventionStrategy {
  fn interpret(&self, assets: &AssetCollection) -> Option<Vec<RoutePreload>> {
    Some(interpret_filenames(assets.names()))
  }
}

/// Build route blocks from build output names in collection order.
pub fn interpret_filenames<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<RoutePreload> {
  let mut shared_style: Option<&str> = None;
  let mut shared_script: Option<&str> = None;
  let mut route_bundles: Vec<&str> = Vec::new();

  for name in names {
    match classify_asset(name) {
      AssetCategory::RouteBundle => route_bundles.push(name),
      AssetCategory::SharedStyle => {
        shared_style.get_or_insert(name);
      }
      AssetCategory::SharedScript => {
        shared_script.get_or_insert(name);
      }
      AssetCategory::SourceMap | AssetCategory::Precompressed | AssetCategory::Unrecognized => {
        debug!(asset = name, "not a preload candidate");
      }
    }
  }

  route_bundles
    .into_iter()
    .map(|bundle| {
      let mut block = RoutePreload::new(route_from_bundle(bundle));

      match shared_style {
        Some(style) => block.push_resource(style, ResourceType::Style, false),
        None => block.hints.push(PreloadHint::Placeholder(MISSING_STYLE_PLACEHOLDER)),
      }
      match shared_script {
        Some(script) => {
          block.push_resource(script, ResourceType::Script, requires_anonymous_cors(script))
        }
        None => block.hints.push(PreloadHint::Placeholder(MISSING_SCRIPT_PLACEHOLDER)),
      }
      block.push_resource(bundle, ResourceType::Script, false);

      debug!(route = %block.route, bundle, "inferred route from bundle name");
      block
    })
    .collect()
}
