//! `_headers` document assembly.

use crate::models::{PreloadEntry, PreloadHint, RoutePreload};

/// A path pattern followed by its directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
  /// Path pattern matched by the host.
  pub pattern: String,
  /// `Key: value` directives, one per line.
  pub directives: Vec<String>,
}

impl HeaderBlock {
  fn new(pattern: impl Into<String>, directives: &[&str]) -> Self {
    Self {
      pattern: pattern.into(),
      directives: directives.iter().map(|line| line.to_string()).collect(),
    }
  }

  fn render_into(&self, out: &mut String) {
    if !out.is_empty() {
      out.push('\n');
    }
    out.push_str(&self.pattern);
    for directive in &self.directives {
      out.push_str("\n\t");
      out.push_str(directive);
    }
  }
}

/// Cache policy blocks emitted ahead of any route block.
pub fn base_blocks(compression_hint: bool) -> Vec<HeaderBlock> {
  let mut blocks = vec![
    HeaderBlock::new("/*", &[
      "Cache-Control: public, max-age=3600, no-cache",
      "Access-Control-Max-Age: 600",
    ]),
    HeaderBlock::new("/sw.js", &["Cache-Control: private, no-cache"]),
    HeaderBlock::new("/*.chunk.*.js", &["Cache-Control: public, max-age=31536000"]),
  ];

  if compression_hint {
    blocks.push(HeaderBlock::new("/*.br", &["content-encoding: br"]));
  }

  blocks
}

/// Format one preload `Link` directive.
pub fn preload_link(entry: &PreloadEntry) -> String {
  let mut line = format!(
    "Link: </{}>; rel=preload; as={}",
    entry.filename, entry.resource_type
  );
  if entry.cross_origin_anonymous {
    line.push_str("; crossorigin=anonymous");
  }
  line
}

/// Convert a route block into its header block, keeping hint order.
pub fn route_block(route: &RoutePreload) -> HeaderBlock {
  HeaderBlock {
    pattern: route.route.clone(),
    directives: route
      .hints
      .iter()
      .map(|hint| match hint {
        PreloadHint::Resource(entry) => preload_link(entry),
        PreloadHint::Placeholder(comment) => comment.to_string(),
      })
      .collect(),
  }
}

/// Render the complete `_headers` text.
pub fn render_headers(routes: &[RoutePreload], compression_hint: bool) -> String {
  let mut out = String::new();
  for block in base_blocks(compression_hint) {
    block.render_into(&mut out);
  }
  for route in routes {
    route_block(route).render_into(&mut out);
  }
  out
}

/// Count of path-pattern lines, used in log output.
pub(crate) fn block_count(routes: &[RoutePreload], compression_hint: bool) -> usize {
  base_blocks(compression_hint).len() + routes.len()
}
