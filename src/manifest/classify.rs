use std::sync::OnceLock;

use regex::Regex;

/// Role a build output plays when routes are inferred from filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
  /// Source maps, never preloaded.
  SourceMap,
  /// Precompressed `.br`/`.gz` variants of another output, never preloaded.
  Precompressed,
  /// Per-route script bundle (`route-*`).
  RouteBundle,
  /// The shared stylesheet (`style*.css`).
  SharedStyle,
  /// The shared main script (`bundle*.js`).
  SharedScript,
  /// Anything else; ignored.
  Unrecognized,
}

struct ClassificationRule {
  pattern: Regex,
  category: AssetCategory,
}

fn classification_rules() -> &'static [ClassificationRule] {
  static RULES: OnceLock<Vec<ClassificationRule>> = OnceLock::new();
  RULES
    .get_or_init(|| {
      let rule = |pattern: &str, category| ClassificationRule {
        pattern: Regex::new(pattern).expect("invalid classification regex"),
        category,
      };
      vec![
        rule(r"\.map$", AssetCategory::SourceMap),
        rule(r"\.(br|gz)$", AssetCategory::Precompressed),
        rule(r"^route-", AssetCategory::RouteBundle),
        rule(r"^style.*\.css$", AssetCategory::SharedStyle),
        rule(r"^bundle.*\.js$", AssetCategory::SharedScript),
      ]
    })
    .as_slice()
}

/// Classify a build output name; the first matching rule wins.
pub fn classify_asset(name: &str) -> AssetCategory {
  classification_rules()
    .iter()
    .find(|rule| rule.pattern.is_match(name))
    .map_or(AssetCategory::Unrecognized, |rule| rule.category)
}

fn es_module_bundle_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"^bundle.+\.esm\.js$").expect("invalid esm bundle regex"))
}

/// ES module bundles must be preloaded with `crossorigin=anonymous` or the browser drops the preload.
pub fn requires_anonymous_cors(filename: &str) -> bool {
  es_module_bundle_pattern().is_match(filename)
}

fn chunk_suffix_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"\.chunk(\.\w+)?\.js$").expect("invalid chunk suffix regex"))
}

/// Derive the route path served by a `route-*` bundle.
///
/// `route-shop.chunk.a1b2.js` becomes `/shop`; the first `/home` fragment collapses to `/`.
pub fn route_from_bundle(filename: &str) -> String {
  let stem = filename.strip_prefix("route-").unwrap_or(filename);
  let stem = chunk_suffix_pattern().replace(stem, "");
  format!("/{stem}").replacen("/home", "/", 1)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn classifies_in_priority_order() {
    assert_eq!(classify_asset("route-home.chunk.a1b2.js"), AssetCategory::RouteBundle);
    assert_eq!(classify_asset("route-home.chunk.a1b2.js.map"), AssetCategory::SourceMap);
    assert_eq!(classify_asset("style.5f3a.css"), AssetCategory::SharedStyle);
    assert_eq!(classify_asset("style.5f3a.css.map"), AssetCategory::SourceMap);
    assert_eq!(classify_asset("bundle.9c1d.js"), AssetCategory::SharedScript);
    assert_eq!(classify_asset("bundle.9c1d.esm.js"), AssetCategory::SharedScript);
  }

  #[test]
  fn precompressed_variants_are_not_route_bundles() {
    assert_eq!(classify_asset("route-home.chunk.a1.js.br"), AssetCategory::Precompressed);
    assert_eq!(classify_asset("route-home.chunk.a1.js.gz"), AssetCategory::Precompressed);
    assert_eq!(classify_asset("style.5f3a.css.br"), AssetCategory::Precompressed);
    assert_eq!(classify_asset("route-home.chunk.a1.js"), AssetCategory::RouteBundle);
  }

  #[test]
  fn leaves_unknown_assets_unrecognized() {
    for name in ["index.html", "favicon.ico", "assets/style.css", "polyfills.js", "sw.js"] {
      assert_eq!(classify_asset(name), AssetCategory::Unrecognized, "{name}");
    }
  }

  #[test]
  fn flags_only_es_module_bundles() {
    assert!(requires_anonymous_cors("bundle-core.esm.js"));
    assert!(requires_anonymous_cors("bundle.a1b2.esm.js"));
    assert!(!requires_anonymous_cors("bundle-core.js"));
    assert!(!requires_anonymous_cors("route-home.esm.js"));
    assert!(!requires_anonymous_cors("bundle.esm.js"));
  }

  #[test]
  fn collapses_home_route_to_root() {
    assert_eq!(route_from_bundle("route-home.chunk.a1b2.js"), "/");
    assert_eq!(route_from_bundle("route-shop.chunk.a1b2.js"), "/shop");
  }

  #[test]
  fn strips_unhashed_chunk_suffix() {
    assert_eq!(route_from_bundle("route-profile.chunk.js"), "/profile");
  }
}
