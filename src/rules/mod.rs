//! Serialization of route preload blocks and policy into Netlify rule files.

mod headers;
mod redirects;

use tracing::info;

use crate::config::RulePolicy;
use crate::models::{OutputDocument, RoutePreload};

pub use headers::{HeaderBlock, base_blocks, preload_link, render_headers, route_block};
pub use redirects::{SPA_FALLBACK_RULE, render_redirects};

/// The two generated rule documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRules {
  /// Contents of `_headers`.
  pub headers: OutputDocument,
  /// Contents of `_redirects`.
  pub redirects: OutputDocument,
}

/// Emit both documents for the interpreted routes under `policy`.
pub fn emit(routes: &[RoutePreload], policy: &RulePolicy) -> GeneratedRules {
  let headers = OutputDocument::new(render_headers(routes, policy.compression_hint));
  let redirects = OutputDocument::new(render_redirects(&policy.redirects));

  info!(
    blocks = headers::block_count(routes, policy.compression_hint),
    routes = routes.len(),
    redirects = policy.redirects.len(),
    "emitted rule documents"
  );

  GeneratedRules { headers, redirects }
}
