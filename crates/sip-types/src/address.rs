//! Addressing types: URIs, name-addr header values and Contact.
//!
//! These are structural values produced by the parsing layer. Equality is
//! structural; [`NameAddr::same_uri`] is the tag-insensitive comparison the
//! dialog matcher relies on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// URI scheme. Only the two SIP schemes are meaningful to the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    Sip,
    Sips,
}

/// A structured SIP URI.
///
/// No parsing happens here; the wire form is the parsing layer's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uri {
    pub scheme: Scheme,
    pub user: Option<String>,
    pub host: String,
    pub port: Option<u16>,
}

impl Uri {
    pub fn sip(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: Scheme::Sip,
            user: Some(user.into()),
            host: host.into(),
            port: None,
        }
    }

    pub fn sips(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: Scheme::Sips,
            user: Some(user.into()),
            host: host.into(),
            port: None,
        }
    }

    /// Host-only URI, as seen in Record-Route entries for proxies.
    pub fn sip_host(host: impl Into<String>) -> Self {
        Self {
            scheme: Scheme::Sip,
            user: None,
            host: host.into(),
            port: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn is_secure(&self) -> bool {
        self.scheme == Scheme::Sips
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = match self.scheme {
            Scheme::Sip => "sip",
            Scheme::Sips => "sips",
        };
        match (&self.user, self.port) {
            (Some(user), Some(port)) => write!(f, "{}:{}@{}:{}", scheme, user, self.host, port),
            (Some(user), None) => write!(f, "{}:{}@{}", scheme, user, self.host),
            (None, Some(port)) => write!(f, "{}:{}:{}", scheme, self.host, port),
            (None, None) => write!(f, "{}:{}", scheme, self.host),
        }
    }
}

/// A To/From/Record-Route header value: display name, URI and the optional
/// `tag` parameter that distinguishes dialog instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameAddr {
    pub display_name: Option<String>,
    pub uri: Uri,
    pub tag: Option<String>,
}

impl NameAddr {
    pub fn new(uri: Uri) -> Self {
        Self {
            display_name: None,
            uri,
            tag: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// URI-level comparison, ignoring display name and tag.
    ///
    /// Dialog matching compares endpoint identities, not the per-dialog tag
    /// parameter, so this is deliberately weaker than `==`.
    pub fn same_uri(&self, other: &NameAddr) -> bool {
        self.uri == other.uri
    }
}

impl fmt::Display for NameAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.display_name {
            write!(f, "\"{}\" <{}>", name, self.uri)?;
        } else {
            write!(f, "<{}>", self.uri)?;
        }
        if let Some(tag) = &self.tag {
            write!(f, ";tag={}", tag)?;
        }
        Ok(())
    }
}

/// A Contact header value. The peer's preferred target for future requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact(pub NameAddr);

impl Contact {
    pub fn new(uri: Uri) -> Self {
        Contact(NameAddr::new(uri))
    }

    pub fn uri(&self) -> &Uri {
        &self.0.uri
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_display_forms() {
        assert_eq!(Uri::sip("alice", "atlanta.com").to_string(), "sip:alice@atlanta.com");
        assert_eq!(
            Uri::sip("bob", "biloxi.com").with_port(5062).to_string(),
            "sip:bob@biloxi.com:5062"
        );
        assert_eq!(Uri::sip_host("proxy.example.com").to_string(), "sip:proxy.example.com");
    }

    #[test]
    fn same_uri_ignores_tag_and_display_name() {
        let a = NameAddr::new(Uri::sip("alice", "atlanta.com"))
            .with_display_name("Alice")
            .with_tag("1928301774");
        let b = NameAddr::new(Uri::sip("alice", "atlanta.com"));
        assert!(a.same_uri(&b));
        assert_ne!(a, b);
    }
}
