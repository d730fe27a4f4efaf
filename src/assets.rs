//! The build-pipeline boundary: an ordered collection of named build assets.

use std::fmt;

/// A finalized build asset exposing its content and byte size.
pub trait BuildAsset {
  /// Raw content of the asset.
  fn source(&self) -> &[u8];

  /// Size of the asset in bytes.
  fn size(&self) -> usize {
    self.source().len()
  }
}

/// Asset held entirely in memory, used for files loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAsset {
  bytes: Vec<u8>,
}

impl RawAsset {
  /// Wrap the provided bytes.
  pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
    Self {
      bytes: bytes.into(),
    }
  }
}

impl BuildAsset for RawAsset {
  fn source(&self) -> &[u8] {
    &self.bytes
  }
}

/// Ordered, name-addressed collection of build assets.
///
/// Insertion order is preserved because fallback route inference and the
/// shared stylesheet/script lookup both depend on it.
#[derive(Default)]
pub struct AssetCollection {
  entries: Vec<(String, Box<dyn BuildAsset>)>,
}

impl AssetCollection {
  /// Create an empty collection.
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert an asset, replacing any existing asset with the same name in place.
  pub fn insert(&mut self, name: impl Into<String>, asset: impl BuildAsset + 'static) {
    let name = name.into();
    let boxed: Box<dyn BuildAsset> = Box::new(asset);
    match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
      Some(slot) => slot.1 = boxed,
      None => self.entries.push((name, boxed)),
    }
  }

  /// Look up an asset by name.
  pub fn get(&self, name: &str) -> Option<&dyn BuildAsset> {
    self
      .entries
      .iter()
      .find(|(existing, _)| existing == name)
      .map(|(_, asset)| asset.as_ref())
  }

  /// Returns `true` when an asset with the given name exists.
  pub fn contains(&self, name: &str) -> bool {
    self.get(name).is_some()
  }

  /// Asset names in insertion order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|(name, _)| name.as_str())
  }

  /// Assets with their names in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn BuildAsset)> {
    self
      .entries
      .iter()
      .map(|(name, asset)| (name.as_str(), asset.as_ref()))
  }

  /// Number of assets in the collection.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when the collection holds no assets.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl fmt::Debug for AssetCollection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map()
      .entries(self.entries.iter().map(|(name, asset)| (name, asset.size())))
      .finish()
  }
}
