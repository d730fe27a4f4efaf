//! Plugin options, the rule policy derived from them, and configuration file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ConfigError, json_type_name};

/// Configuration file searched for in a project directory.
pub const DEFAULT_CONFIG_FILE: &str = "netlify-push.config.json";

/// Name of the generated header rules asset.
pub const HEADERS_FILE: &str = "_headers";

/// Name of the generated redirect rules asset.
pub const REDIRECTS_FILE: &str = "_redirects";

/// Immutable policy applied while emitting the rule documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulePolicy {
  /// Pre-formatted redirect lines, emitted verbatim before the fallback rule.
  pub redirects: Vec<String>,
  /// Emit a `/*.br` block declaring brotli content encoding.
  pub compression_hint: bool,
}

impl RulePolicy {
  /// Build a policy from an untyped options value such as parsed JSON or YAML.
  ///
  /// Fails when `redirects` is present but not an array. A missing or `null`
  /// options value yields the default policy.
  pub fn from_value(options: &Value) -> Result<Self, ConfigError> {
    let object = match options {
      Value::Null => return Ok(Self::default()),
      Value::Object(object) => object,
      other => {
        return Err(ConfigError::InvalidOptions(format!(
          "expected an object, but was of type '{}'",
          json_type_name(other)
        )));
      }
    };

    let redirects = match object.get("redirects") {
      None => Vec::new(),
      Some(Value::Array(values)) => values.iter().map(redirect_line).collect(),
      Some(other) => {
        return Err(ConfigError::RedirectsNotSequence {
          found: json_type_name(other),
        });
      }
    };

    let compression_hint = ["brotli", "compressionHint", "compression_hint"]
      .iter()
      .find_map(|key| object.get(*key))
      .map(|value| match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Null => Ok(false),
        other => Err(ConfigError::InvalidOptions(format!(
          "brotli should be a boolean, but was of type '{}'",
          json_type_name(other)
        ))),
      })
      .transpose()?
      .unwrap_or(false);

    Ok(Self {
      redirects,
      compression_hint,
    })
  }

  /// Force the compression hint on when a cooperating precache plugin serves brotli files.
  pub fn with_precache(mut self, precache: Option<&PrecacheConfig>) -> Self {
    if precache.is_some_and(|config| config.brotli) {
      debug!("precache plugin serves brotli assets, enabling compression hint");
      self.compression_hint = true;
    }
    self
  }
}

fn redirect_line(value: &Value) -> String {
  match value {
    Value::String(line) => line.clone(),
    other => other.to_string(),
  }
}

/// Options of a cooperating service-worker precache plugin.
///
/// Passed explicitly instead of being discovered in the pipeline's plugin list.
///
/// Options this crate does not interpret are kept in `extra` so the file can be written back
/// without losing them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrecacheConfig {
  /// Cache identifier; only plugins carrying one maintain a precache list.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cache_id: Option<String>,
  /// Whether the plugin precaches brotli-compressed variants.
  #[serde(skip_serializing_if = "is_false")]
  pub brotli: bool,
  /// Patterns of asset names the plugin must not precache.
  pub static_file_globs_ignore_patterns: Vec<String>,
  /// Remaining plugin options, untouched.
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

fn is_false(value: &bool) -> bool {
  !*value
}

impl PrecacheConfig {
  /// Exclude the generated rule files from the precache manifest.
  ///
  /// Returns `true` when the pattern list changed.
  pub fn exclude_generated_files(&mut self) -> bool {
    if self.cache_id.is_none() {
      return false;
    }

    let mut changed = false;
    for name in [HEADERS_FILE, REDIRECTS_FILE] {
      let pattern = regex::escape(name);
      if !self.static_file_globs_ignore_patterns.contains(&pattern) {
        self.static_file_globs_ignore_patterns.push(pattern);
        changed = true;
      }
    }
    changed
  }

  /// Read a precache configuration from a JSON or YAML file, chosen by extension.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let value = read_value(path)?;
    serde_json::from_value(value).map_err(|err| ConfigError::Parse {
      path: path.to_path_buf(),
      message: err.to_string(),
    })
  }

  /// Write the configuration back in the format implied by the file extension.
  pub fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
    let rendered = if is_yaml(path) {
      serde_yaml::to_string(self).map_err(|err| err.to_string())
    } else {
      serde_json::to_string_pretty(self).map_err(|err| err.to_string())
    };
    let rendered = rendered.map_err(|message| ConfigError::Parse {
      path: path.to_path_buf(),
      message,
    })?;

    fs::write(path, rendered).map_err(|source| ConfigError::Write {
      path: path.to_path_buf(),
      source,
    })
  }
}

/// Locate the default configuration file inside `project_dir`.
pub fn discover(project_dir: &Path) -> Option<PathBuf> {
  let candidate = project_dir.join(DEFAULT_CONFIG_FILE);
  candidate.is_file().then_some(candidate)
}

/// Load a policy from a JSON or YAML file, chosen by extension.
pub fn load_policy(path: &Path) -> Result<RulePolicy, ConfigError> {
  let value = read_value(path)?;
  debug!(path = %path.display(), "loaded plugin options");
  RulePolicy::from_value(&value)
}

/// Load the policy from the project's default file, or defaults when it does not exist.
pub fn discover_policy(project_dir: &Path) -> Result<RulePolicy, ConfigError> {
  match discover(project_dir) {
    Some(path) => load_policy(&path),
    None => Ok(RulePolicy::default()),
  }
}

fn read_value(path: &Path) -> Result<Value, ConfigError> {
  let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let parsed = if is_yaml(path) {
    serde_yaml::from_str::<Value>(&content).map_err(|err| err.to_string())
  } else {
    serde_json::from_str::<Value>(&content).map_err(|err| err.to_string())
  };

  parsed.map_err(|message| ConfigError::Parse {
    path: path.to_path_buf(),
    message,
  })
}

fn is_yaml(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use tempfile::tempdir;

  #[test]
  fn defaults_to_empty_policy() {
    let policy = RulePolicy::from_value(&json!({})).unwrap();
    assert_eq!(policy, RulePolicy::default());

    let policy = RulePolicy::from_value(&Value::Null).unwrap();
    assert!(policy.redirects.is_empty());
    assert!(!policy.compression_hint);
  }

  #[test]
  fn rejects_redirects_that_are_not_arrays() {
    for value in [json!("/a /b 301"), json!({"/a": "/b"}), json!(3), json!(true)] {
      let err = RulePolicy::from_value(&json!({ "redirects": value })).unwrap_err();
      assert!(matches!(err, ConfigError::RedirectsNotSequence { .. }));
    }
  }

  #[test]
  fn reports_offending_type_in_message() {
    let err = RulePolicy::from_value(&json!({ "redirects": "/a /b" })).unwrap_err();
    assert_eq!(
      err.to_string(),
      "redirects should be an array, but was of type 'string'"
    );
  }

  #[test]
  fn keeps_redirects_in_configured_order() {
    let policy = RulePolicy::from_value(&json!({
      "redirects": ["/old /new 301", "/blog/* https://blog.example.com/:splat 302"],
      "brotli": true
    }))
    .unwrap();

    assert_eq!(policy.redirects, vec![
      "/old /new 301".to_string(),
      "/blog/* https://blog.example.com/:splat 302".to_string(),
    ]);
    assert!(policy.compression_hint);
  }

  #[test]
  fn accepts_compression_hint_alias() {
    let policy = RulePolicy::from_value(&json!({ "compressionHint": true })).unwrap();
    assert!(policy.compression_hint);
  }

  #[test]
  fn rejects_non_object_options() {
    let err = RulePolicy::from_value(&json!(["/a /b"])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidOptions(_)));
  }

  #[test]
  fn precache_brotli_enables_compression_hint() {
    let precache = PrecacheConfig {
      brotli: true,
      ..PrecacheConfig::default()
    };

    let policy = RulePolicy::default().with_precache(Some(&precache));
    assert!(policy.compression_hint);

    let policy = RulePolicy::default().with_precache(None);
    assert!(!policy.compression_hint);
  }

  #[test]
  fn excludes_generated_files_once() {
    let mut precache = PrecacheConfig {
      cache_id: Some("app".into()),
      brotli: false,
      static_file_globs_ignore_patterns: vec![r"\.map$".into()],
      ..PrecacheConfig::default()
    };

    assert!(precache.exclude_generated_files());
    assert!(!precache.exclude_generated_files());
    assert_eq!(precache.static_file_globs_ignore_patterns, vec![
      r"\.map$".to_string(),
      "_headers".to_string(),
      "_redirects".to_string(),
    ]);
  }

  #[test]
  fn leaves_plugins_without_cache_id_untouched() {
    let mut precache = PrecacheConfig::default();
    assert!(!precache.exclude_generated_files());
    assert!(precache.static_file_globs_ignore_patterns.is_empty());
  }

  #[test]
  fn discovers_json_configuration() {
    let temp = tempdir().expect("failed to create temp dir");
    fs::write(
      temp.path().join(DEFAULT_CONFIG_FILE),
      r#"{"redirects": ["/a /b 301"]}"#,
    )
    .expect("failed to write config");

    let policy = discover_policy(temp.path()).expect("configuration should load");
    assert_eq!(policy.redirects, vec!["/a /b 301".to_string()]);
  }

  #[test]
  fn missing_default_file_yields_defaults() {
    let temp = tempdir().expect("failed to create temp dir");
    let policy = discover_policy(temp.path()).expect("missing file is not an error");
    assert_eq!(policy, RulePolicy::default());
  }

  #[test]
  fn loads_yaml_configuration() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("push.yaml");
    fs::write(&path, "redirects:\n  - /a /b 301\nbrotli: true\n").expect("failed to write config");

    let policy = load_policy(&path).expect("yaml configuration should load");
    assert_eq!(policy.redirects, vec!["/a /b 301".to_string()]);
    assert!(policy.compression_hint);
  }

  #[test]
  fn yaml_scalar_redirects_fail_fast() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("push.yml");
    fs::write(&path, "redirects: /a /b 301\n").expect("failed to write config");

    let err = load_policy(&path).unwrap_err();
    assert!(matches!(err, ConfigError::RedirectsNotSequence { found: "string" }));
  }

  #[test]
  fn explicit_missing_file_is_an_error() {
    let temp = tempdir().expect("failed to create temp dir");
    let err = load_policy(&temp.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
  }

  #[test]
  fn reads_precache_configuration() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("sw.json");
    fs::write(
      &path,
      r#"{"cacheId": "app", "brotli": true, "staticFileGlobsIgnorePatterns": ["\\.map$"]}"#,
    )
    .expect("failed to write config");

    let precache = PrecacheConfig::from_path(&path).expect("precache config should load");
    assert_eq!(precache.cache_id.as_deref(), Some("app"));
    assert!(precache.brotli);
    assert_eq!(precache.static_file_globs_ignore_patterns.len(), 1);
  }

  #[test]
  fn amending_precache_file_keeps_unrelated_options() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("sw.json");
    fs::write(
      &path,
      r#"{"cacheId":"app","navigateFallback":"/index.html","staticFileGlobs":["build/**/*.js"],"staticFileGlobsIgnorePatterns":["\\.map$"]}"#,
    )
    .expect("failed to write config");

    let mut precache = PrecacheConfig::from_path(&path).expect("precache config should load");
    assert!(precache.exclude_generated_files());
    precache.write_to(&path).expect("precache config should be written");

    let written: Value =
      serde_json::from_str(&fs::read_to_string(&path).expect("failed to read config"))
        .expect("written config is json");
    assert_eq!(written, serde_json::json!({
      "cacheId": "app",
      "navigateFallback": "/index.html",
      "staticFileGlobs": ["build/**/*.js"],
      "staticFileGlobsIgnorePatterns": ["\\.map$", "_headers", "_redirects"]
    }));
  }

  #[test]
  fn amending_yaml_precache_file_stays_yaml() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("sw.yaml");
    fs::write(&path, "cacheId: app\nminify: true\n").expect("failed to write config");

    let mut precache = PrecacheConfig::from_path(&path).expect("precache config should load");
    precache.exclude_generated_files();
    precache.write_to(&path).expect("precache config should be written");

    let content = fs::read_to_string(&path).expect("failed to read config");
    let reread: Value = serde_yaml::from_str(&content).expect("written config is yaml");
    assert!(!content.trim_start().starts_with('{'));
    assert_eq!(reread["minify"], Value::Bool(true));
    assert_eq!(reread["staticFileGlobsIgnorePatterns"], serde_json::json!(["_headers", "_redirects"]));
  }
}
