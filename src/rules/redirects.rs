//! `_redirects` document assembly.

/// Rewrite serving the application shell for every unmatched path.
pub const SPA_FALLBACK_RULE: &str = "/* /index.html 200";

/// Join configured rules verbatim and append the single-page fallback.
pub fn render_redirects(redirects: &[String]) -> String {
  redirects
    .iter()
    .map(String::as_str)
    .chain(std::iter::once(SPA_FALLBACK_RULE))
    .collect::<Vec<_>>()
    .join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_fallback_without_configured_rules() {
    assert_eq!(render_redirects(&[]), "/* /index.html 200");
  }

  #[test]
  fn configured_rules_precede_fallback() {
    let rules = vec!["/old /new 301".to_string()];
    assert_eq!(render_redirects(&rules), "/old /new 301\n/* /index.html 200");
  }

  #[test]
  fn keeps_rules_verbatim_and_ordered() {
    let rules = vec![
      "/b   /c 302!".to_string(),
      "not even a rule".to_string(),
    ];
    assert_eq!(
      render_redirects(&rules),
      "/b   /c 302!\nnot even a rule\n/* /index.html 200"
    );
  }
}
