//! Loading a build output directory into an asset collection and writing generated rules back.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::assets::{AssetCollection, RawAsset};
use crate::config::{HEADERS_FILE, REDIRECTS_FILE};
use crate::rules::GeneratedRules;

/// Read every regular file below `dist_dir` into a collection keyed by forward-slash relative name.
///
/// Entries are visited in sorted order so the collection order is stable across platforms.
pub fn load_dist_dir(dist_dir: &Path) -> Result<AssetCollection> {
  if !dist_dir.is_dir() {
    bail!("build output directory {} does not exist", dist_dir.display());
  }

  let mut assets = AssetCollection::new();
  collect_files(dist_dir, Path::new(""), &mut assets)?;
  debug!(count = assets.len(), dir = %dist_dir.display(), "loaded build assets");
  Ok(assets)
}

fn collect_files(root: &Path, relative: &Path, assets: &mut AssetCollection) -> Result<()> {
  let current = root.join(relative);
  let mut entries = fs::read_dir(&current)
    .with_context(|| format!("failed to read {}", current.display()))?
    .collect::<std::io::Result<Vec<_>>>()
    .with_context(|| format!("failed to list {}", current.display()))?;
  entries.sort_by_key(|entry| entry.file_name());

  for entry in entries {
    let child_relative = relative.join(entry.file_name());
    let file_type = entry.file_type()?;
    if file_type.is_dir() {
      collect_files(root, &child_relative, assets)?;
    } else if file_type.is_file() {
      let path = entry.path();
      let bytes = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
      assets.insert(asset_name(&child_relative), RawAsset::new(bytes));
    }
  }

  Ok(())
}

fn asset_name(relative: &Path) -> String {
  relative.to_string_lossy().replace('\\', "/")
}

/// Write `_headers` and `_redirects` into `dist_dir`, returning the written paths.
pub fn write_rules(dist_dir: &Path, rules: &GeneratedRules) -> Result<Vec<PathBuf>> {
  let mut written = Vec::with_capacity(2);
  for (name, document) in [(HEADERS_FILE, &rules.headers), (REDIRECTS_FILE, &rules.redirects)] {
    let target = dist_dir.join(name);
    fs::write(&target, document.as_str())
      .with_context(|| format!("failed to write {}", target.display()))?;
    info!(path = %target.display(), bytes = document.as_str().len(), "wrote rule file");
    written.push(target);
  }
  Ok(written)
}
