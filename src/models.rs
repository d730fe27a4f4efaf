//! Data structures produced while interpreting the manifest and emitting rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assets::BuildAsset;

/// Category of a preloaded resource, rendered as the `as=` value of a hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
  /// JavaScript, including ES module bundles.
  Script,
  /// Stylesheets.
  Style,
  /// Any other MIME-derived category (`image`, `font`, `fetch`, ...), kept verbatim.
  Other(String),
}

impl ResourceType {
  /// The value written after `as=`.
  pub fn as_str(&self) -> &str {
    match self {
      Self::Script => "script",
      Self::Style => "style",
      Self::Other(value) => value,
    }
  }
}

impl From<String> for ResourceType {
  fn from(value: String) -> Self {
    match value.as_str() {
      "script" => Self::Script,
      "style" => Self::Style,
      _ => Self::Other(value),
    }
  }
}

impl From<&str> for ResourceType {
  fn from(value: &str) -> Self {
    Self::from(value.to_string())
  }
}

impl From<ResourceType> for String {
  fn from(value: ResourceType) -> Self {
    value.as_str().to_string()
  }
}

impl fmt::Display for ResourceType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Per-file descriptor stored in the push manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceDescriptor {
  /// Resource category used to pick the `as=` value.
  #[serde(rename = "type")]
  pub resource_type: ResourceType,
}

/// One resource to preload for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadEntry {
  /// Route path the hint is attached to.
  pub route: String,
  /// Asset filename relative to the site root.
  pub filename: String,
  /// Category rendered as `as=`.
  pub resource_type: ResourceType,
  /// Whether the link must be fetched in anonymous CORS mode.
  pub cross_origin_anonymous: bool,
}

/// A single line inside a route block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreloadHint {
  /// A resource preload link.
  Resource(PreloadEntry),
  /// Comment standing in for a shared resource the build did not produce.
  Placeholder(&'static str),
}

/// All preload hints for one route, in the order they are emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePreload {
  /// Absolute route path such as `/about`.
  pub route: String,
  /// Ordered hints for the route.
  pub hints: Vec<PreloadHint>,
}

impl RoutePreload {
  /// Create an empty block for `route`.
  pub fn new(route: impl Into<String>) -> Self {
    Self {
      route: route.into(),
      hints: Vec::new(),
    }
  }

  /// Append a resource hint for `filename`.
  pub fn push_resource(
    &mut self,
    filename: impl Into<String>,
    resource_type: ResourceType,
    cross_origin_anonymous: bool,
  ) {
    self.hints.push(PreloadHint::Resource(PreloadEntry {
      route: self.route.clone(),
      filename: filename.into(),
      resource_type,
      cross_origin_anonymous,
    }));
  }

  /// Resource entries of this block, skipping placeholders.
  pub fn entries(&self) -> impl Iterator<Item = &PreloadEntry> {
    self.hints.iter().filter_map(|hint| match hint {
      PreloadHint::Resource(entry) => Some(entry),
      PreloadHint::Placeholder(_) => None,
    })
  }
}

/// A generated rule file handed back to the build pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
  /// Full text of the document.
  pub source: String,
}

impl OutputDocument {
  /// Wrap generated text.
  pub fn new(source: impl Into<String>) -> Self {
    Self {
      source: source.into(),
    }
  }

  /// Document text.
  pub fn as_str(&self) -> &str {
    &self.source
  }
}

impl BuildAsset for OutputDocument {
  fn source(&self) -> &[u8] {
    self.source.as_bytes()
  }
}
