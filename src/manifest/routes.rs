//! Interpretation of the per-route push manifest emitted by the bundler.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::assets::{AssetCollection, BuildAsset};
use crate::manifest::PreloadStrategy;
use crate::manifest::classify::requires_anonymous_cors;
use crate::models::{ResourceDescriptor, RoutePreload};

/// Asset name of the structured route manifest.
pub const PUSH_MANIFEST_FILE: &str = "push-manifest.json";

/// Reads `push-manifest.json` and preloads every file listed for each route.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteManifestStrategy;

impl PreloadStrategy for RouteManifestStrategy {
  fn interpret(&self, assets: &AssetCollection) -> Option<Vec<RoutePreload>> {
    let Some(manifest) = assets.get(PUSH_MANIFEST_FILE) else {
      debug!("{PUSH_MANIFEST_FILE} not present, skipping rule generation");
      return None;
    };

    Some(interpret_manifest_bytes(manifest.source()))
  }
}

/// Parse raw manifest bytes, degrading to an empty route list on malformed input.
pub fn interpret_manifest_bytes(bytes: &[u8]) -> Vec<RoutePreload> {
  match serde_json::from_slice::<Value>(bytes) {
    Ok(Value::Object(routes)) => interpret_manifest(&routes),
    Ok(other) => {
      warn!("{PUSH_MANIFEST_FILE} is not an object ({other}), emitting base rules only");
      Vec::new()
    }
    Err(err) => {
      warn!("failed to parse {PUSH_MANIFEST_FILE}: {err}, emitting base rules only");
      Vec::new()
    }
  }
}

/// Walk routes and files in document order, producing one block per route.
pub fn interpret_manifest(routes: &Map<String, Value>) -> Vec<RoutePreload> {
  routes
    .iter()
    .map(|(route, files)| {
      let mut block = RoutePreload::new(route.as_str());

      let Some(files) = files.as_object() else {
        warn!(route = %route, "route entry is not an object, emitting an empty block");
        return block;
      };

      for (filename, details) in files {
        match serde_json::from_value::<ResourceDescriptor>(details.clone()) {
          Ok(descriptor) => {
            let cross_origin = requires_anonymous_cors(filename);
            block.push_resource(filename.as_str(), descriptor.resource_type, cross_origin);
          }
          Err(err) => {
            warn!(route = %route, file = %filename, "skipping file without a resource type: {err}");
          }
        }
      }

      debug!(route = %route, hints = block.hints.len(), "interpreted route");
      block
    })
    .collect()
}
