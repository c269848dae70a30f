//! Link resolution: turns a user supplied share link into a playable media URL.
//!
//! Rules, first match wins:
//! 1. `<provider>/u/<id>` or `<provider>/api/file/<id>` is a direct file on the
//!    canonical host.
//! 2. `<provider>/l/<id>` or `<provider>/api/list/<id>` needs one list lookup; the
//!    first file of the list is used. Any lookup failure falls back to the input.
//! 3. Anything else is passed through unchanged.
//!
//! `<provider>` also matches subdomains (`www.`), and trailing path segments after
//! the id (a file name, say) are ignored.

mod lookup;

use std::sync::Arc;

use url::Url;

pub use lookup::{HttpListLookup, ListLookup};

#[cfg(test)]
pub use lookup::MockListLookup;

/// Default canonical provider host
pub const DEFAULT_CANONICAL_HOST: &str = "pixeldrain.com";
/// Default alternate provider host serving the same content
pub const DEFAULT_ALIAS_HOST: &str = "pixeldrain.net";

/// Provider hosts recognized by the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Host used for every playable URL
    pub canonical_host: String,
    /// Equivalent hosts normalized to the canonical one
    pub alias_hosts: Vec<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            canonical_host: DEFAULT_CANONICAL_HOST.to_string(),
            alias_hosts: vec![DEFAULT_ALIAS_HOST.to_string()],
        }
    }
}

impl ProviderConfig {
    fn hosts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical_host.as_str())
            .chain(self.alias_hosts.iter().map(String::as_str))
    }

    /// A provider host or one of its subdomains (`www.pixeldrain.com`)
    fn is_provider_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.hosts().any(|h| {
            let h = h.to_ascii_lowercase();
            host == h
                || host
                    .strip_suffix(h.as_str())
                    .is_some_and(|sub| sub.ends_with('.') && sub.len() > 1)
        })
    }

    /// `pixeldrain.net/u/x` without a scheme
    fn starts_with_provider_host(&self, input: &str) -> bool {
        let host = input
            .split(['/', ':', '?', '#'])
            .next()
            .unwrap_or_default();
        self.is_provider_host(host)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Points at exactly one playable file
    Direct,
    /// Passed through as given (unknown link or failed lookup)
    Unresolved,
}

/// Result of resolving one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub kind: LinkKind,
    pub playable_url: String,
    pub original_url: String,
}

impl ResolvedLink {
    fn direct(playable_url: String, original_url: &str) -> Self {
        Self {
            kind: LinkKind::Direct,
            playable_url,
            original_url: original_url.to_string(),
        }
    }

    fn unresolved(original_url: &str) -> Self {
        Self {
            kind: LinkKind::Unresolved,
            playable_url: original_url.to_string(),
            original_url: original_url.to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Reference {
    File(String),
    List(String),
}

/// Whether the input starts with `<scheme>://`. A `://` further along (inside a
/// query string, say) does not count.
fn has_scheme(input: &str) -> bool {
    input.split_once("://").is_some_and(|(scheme, _)| {
        scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Ids are `[A-Za-z0-9_-]+`
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

pub struct LinkResolver {
    provider: ProviderConfig,
    lookup: Arc<dyn ListLookup>,
}

impl LinkResolver {
    pub fn new(provider: ProviderConfig, lookup: Arc<dyn ListLookup>) -> Self {
        Self { provider, lookup }
    }

    /// Resolve an input link. Never fails: unknown input and failed lookups
    /// come back `Unresolved` with the input untouched.
    pub async fn resolve(&self, input: &str) -> ResolvedLink {
        match self.classify(input) {
            Some(Reference::File(id)) => ResolvedLink::direct(self.file_url(&id), input),
            Some(Reference::List(id)) => match self.lookup.first_file_id(&id).await {
                Ok(file_id) if is_valid_id(&file_id) => {
                    tracing::debug!("List '{}' resolved to file '{}'", id, file_id);
                    ResolvedLink::direct(self.file_url(&file_id), input)
                }
                Ok(file_id) => {
                    tracing::warn!("List '{}' returned an unusable file id '{}'", id, file_id);
                    ResolvedLink::unresolved(input)
                }
                Err(e) => {
                    tracing::warn!("List '{}' could not be resolved: {}", id, e);
                    ResolvedLink::unresolved(input)
                }
            },
            None => ResolvedLink::unresolved(input),
        }
    }

    fn file_url(&self, id: &str) -> String {
        format!("https://{}/api/file/{}", self.provider.canonical_host, id)
    }

    fn classify(&self, input: &str) -> Option<Reference> {
        let trimmed = input.trim();
        let candidate =
            if !has_scheme(trimmed) && self.provider.starts_with_provider_host(trimmed) {
                format!("https://{}", trimmed)
            } else {
                trimmed.to_string()
            };

        let url = Url::parse(&candidate).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        if !self.provider.is_provider_host(url.host_str()?) {
            return None;
        }

        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        let (is_list, id) = match segments.as_slice() {
            ["u", id, ..] | ["api", "file", id, ..] => (false, *id),
            ["l", id, ..] | ["api", "list", id, ..] => (true, *id),
            _ => return None,
        };
        if !is_valid_id(id) {
            return None;
        }

        let id = id.to_string();
        Some(if is_list {
            Reference::List(id)
        } else {
            Reference::File(id)
        })
    }
}
