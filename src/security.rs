//! Content security policy rendering and HTML post-processing.
//!
//! Emitted HTML templates carry two placeholders: `%%CSP_CONTENT%%` for the
//! rendered policy and `%%nonce%%` for the hash of the first inline script.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

use crate::config::OrderedMap;

/// Placeholder replaced by the rendered policy.
pub const CSP_PLACEHOLDER: &str = "%%CSP_CONTENT%%";

/// Placeholder replaced by the inline script nonce.
pub const NONCE_PLACEHOLDER: &str = "%%nonce%%";

/// Security settings for one environment (`[environments.<env>.security]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecuritySettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_security_policy: Option<CspSettings>,
}

/// Content security policy directives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CspSettings {
    #[serde(default)]
    pub enabled: bool,

    /// Directive name to source list, in declaration order.
    #[serde(default)]
    pub content: OrderedMap<DirectiveValue>,
}

/// A directive's sources, written as one string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectiveValue {
    One(String),
    Many(Vec<String>),
}

impl DirectiveValue {
    fn sources(&self) -> Vec<&str> {
        match self {
            DirectiveValue::One(s) => vec![s.as_str()],
            DirectiveValue::Many(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl CspSettings {
    /// Render the policy as `directive src src;directive src`.
    pub fn render(&self) -> String {
        self.content
            .iter()
            .map(|(directive, value)| format!("{} {}", directive, value.sources().join(" ")))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl SecuritySettings {
    /// The active policy, if both security and CSP are enabled.
    pub fn active_policy(&self) -> Option<&CspSettings> {
        if !self.enabled {
            return None;
        }
        self.content_security_policy
            .as_ref()
            .filter(|csp| csp.enabled && !csp.content.is_empty())
    }

    /// Fill the policy and nonce placeholders in an HTML document.
    ///
    /// Documents are returned unchanged when no policy is active.
    pub fn apply(&self, html: &str) -> String {
        let Some(policy) = self.active_policy() else {
            return html.to_string();
        };

        let nonce = inline_script_nonces(html).into_iter().next().unwrap_or_default();
        html.replacen(CSP_PLACEHOLDER, &policy.render(), 1)
            .replace(NONCE_PLACEHOLDER, &nonce)
    }

    /// Post-process an emitted HTML file in place.
    pub fn apply_to_file(&self, path: &Path) -> Result<bool, SecurityError> {
        let io_err = |source| SecurityError::Io {
            path: path.display().to_string(),
            source,
        };
        let html = fs::read_to_string(path).map_err(io_err)?;
        let processed = self.apply(&html);
        if processed == html {
            return Ok(false);
        }
        fs::write(path, processed).map_err(io_err)?;
        Ok(true)
    }
}

/// `nonce-<base64 sha256>` for every inline (no `src`) script, in document order.
pub fn inline_script_nonces(html: &str) -> Vec<String> {
    let Ok(re) = Regex::new(r"(?is)<script([^>]*)>(.*?)</script>") else {
        return Vec::new();
    };

    re.captures_iter(html)
        .filter(|caps| !caps[1].to_lowercase().contains("src="))
        .map(|caps| {
            let digest = Sha256::digest(caps[2].as_bytes());
            format!("nonce-{}", BASE64.encode(digest))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> SecuritySettings {
        let mut content = OrderedMap::new();
        content.insert("default-src", DirectiveValue::One("'self'".to_string()));
        content.insert(
            "script-src",
            DirectiveValue::Many(vec!["'self'".to_string(), "cdn.example.com".to_string()]),
        );
        SecuritySettings {
            enabled: true,
            content_security_policy: Some(CspSettings {
                enabled: true,
                content,
            }),
        }
    }

    #[test]
    fn test_render_policy() {
        let rendered = policy().content_security_policy.unwrap().render();
        assert_eq!(rendered, "default-src 'self';script-src 'self' cdn.example.com");
    }

    #[test]
    fn test_nonce_only_for_inline_scripts() {
        let html = r#"<script src="/app.js"></script><script>window.a = 1;</script>"#;
        let nonces = inline_script_nonces(html);
        assert_eq!(nonces.len(), 1);

        let expected = BASE64.encode(Sha256::digest(b"window.a = 1;"));
        assert_eq!(nonces[0], format!("nonce-{}", expected));
    }

    #[test]
    fn test_apply_fills_placeholders() {
        let html = r#"<meta content="%%CSP_CONTENT%%"><script nonce="%%nonce%%">boot()</script>"#;
        let out = policy().apply(html);
        assert!(out.contains("default-src 'self'"));
        assert!(!out.contains(NONCE_PLACEHOLDER));
        assert!(out.contains("nonce-"));
    }

    #[test]
    fn test_disabled_policy_leaves_html() {
        let mut settings = policy();
        settings.enabled = false;
        let html = "<meta content=\"%%CSP_CONTENT%%\">";
        assert_eq!(settings.apply(html), html);
    }

    #[test]
    fn test_apply_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, "<meta content=\"%%CSP_CONTENT%%\">").unwrap();

        assert!(policy().apply_to_file(&path).unwrap());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("script-src 'self' cdn.example.com"));
    }
}
