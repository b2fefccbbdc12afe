//! Derivation of the dashboard embed reference from the refresh signal.
//!
//! Embedded dashboards cache aggressively, so each successful upload has to
//! change the embed URL. The base target comes from configuration and the
//! discriminator comes from the [`RefreshSignal`]; nothing here reads a clock.

use std::fmt;

use thiserror::Error;
use url::Url;

use crate::RefreshSignal;

/// Query parameter that carries the refresh discriminator.
pub const REFRESH_PARAM: &str = ":refresh_key";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedTargetError {
    #[error("invalid embed url: {0}")]
    InvalidUrl(String),
    #[error("unsupported embed url scheme: {0}")]
    UnsupportedScheme(String),
}

/// Fixed base location of the dashboard embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedTarget {
    base: Url,
}

impl EmbedTarget {
    /// Parses the configured base URL.
    ///
    /// Any refresh parameter already present is dropped so that the base never
    /// collides with a derived reference.
    pub fn parse(raw: &str) -> Result<Self, EmbedTargetError> {
        let mut base =
            Url::parse(raw.trim()).map_err(|err| EmbedTargetError::InvalidUrl(err.to_string()))?;
        match base.scheme() {
            "http" | "https" => {}
            other => return Err(EmbedTargetError::UnsupportedScheme(other.to_string())),
        }

        let retained = base.query().map(|query| {
            query
                .split('&')
                .filter(|pair| !pair.is_empty() && !is_refresh_pair(pair))
                .collect::<Vec<_>>()
                .join("&")
        });
        match retained {
            Some(query) if !query.is_empty() => base.set_query(Some(&query)),
            _ => base.set_query(None),
        }

        Ok(Self { base })
    }

    pub fn as_str(&self) -> &str {
        self.base.as_str()
    }
}

/// URL handed to the embed host. Never mutated; a new one is derived per signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmbedReference(String);

impl EmbedReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmbedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pure derivation: `Unset` yields the base unchanged, every stamp yields the
/// base plus `:refresh_key=<stamp>`.
pub fn compute_embed_reference(signal: RefreshSignal, target: &EmbedTarget) -> EmbedReference {
    let stamp = match signal {
        RefreshSignal::Unset => return EmbedReference(target.as_str().to_owned()),
        RefreshSignal::Stamp(stamp) => stamp,
    };

    let discriminator = format!("{REFRESH_PARAM}={stamp}");
    let mut pairs: Vec<&str> = target
        .base
        .query()
        .map(|query| query.split('&').filter(|pair| !pair.is_empty()).collect())
        .unwrap_or_default();
    pairs.push(&discriminator);

    let mut url = target.base.clone();
    url.set_query(Some(&pairs.join("&")));
    EmbedReference(url.into())
}

fn is_refresh_pair(pair: &str) -> bool {
    pair.split('=').next() == Some(REFRESH_PARAM)
}

/// How the host page embeds the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedDelivery {
    Iframe { height: u32 },
    /// `<tableau-viz>` web component.
    WebComponent,
}

impl Default for EmbedDelivery {
    fn default() -> Self {
        EmbedDelivery::Iframe { height: 827 }
    }
}

/// Host markup for the reference. A new reference yields new markup, which is
/// what makes the host refetch.
pub fn render_embed_markup(reference: &EmbedReference, delivery: EmbedDelivery) -> String {
    let src = escape_attribute(reference.as_str());
    match delivery {
        EmbedDelivery::Iframe { height } => format!(
            "<iframe src=\"{src}\" width=\"100%\" height=\"{height}\" frameborder=\"0\" allowfullscreen title=\"Dashboard\"></iframe>"
        ),
        EmbedDelivery::WebComponent => {
            format!("<tableau-viz src=\"{src}\" toolbar=\"hidden\" hide-tabs></tableau-viz>")
        }
    }
}

fn escape_attribute(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_pair_matches_only_the_discriminator_key() {
        assert!(is_refresh_pair(":refresh_key=12"));
        assert!(is_refresh_pair(":refresh_key"));
        assert!(!is_refresh_pair(":refresh_key_old=12"));
        assert!(!is_refresh_pair(":embed=y"));
    }

    #[test]
    fn attribute_escaping_covers_query_separators() {
        assert_eq!(escape_attribute("a?x=1&y=\"2\""), "a?x=1&amp;y=&quot;2&quot;");
    }
}
