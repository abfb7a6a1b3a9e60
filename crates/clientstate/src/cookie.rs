//! Cookie carriers for state tokens.
//!
//! The codec only produces and consumes the token string; these types carry
//! it to and from HTTP headers.

use std::fmt;

/// A cookie holding a state token.
///
/// New cookies are `Secure` and `HttpOnly`; state tokens are never meant to
/// be readable from scripts or sent over plain HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCookie {
    name: String,
    value: String,
    path: Option<String>,
    max_age: Option<u64>,
    secure: bool,
    http_only: bool,
}

impl StateCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            max_age: None,
            secure: true,
            http_only: true,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_max_age(mut self, secs: u64) -> Self {
        self.max_age = Some(secs);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn max_age(&self) -> Option<u64> {
        self.max_age
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn is_http_only(&self) -> bool {
        self.http_only
    }

    /// Find the cookie called `name` in a request `Cookie` header
    /// (`a=1; b=2`). Returns the first match.
    pub fn from_header(header: &str, name: &str) -> Option<Self> {
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| key.trim() == name)
            .map(|(key, value)| Self::new(key.trim(), value.trim().trim_matches('"')))
    }
}

/// Renders the `Set-Cookie` header value.
impl fmt::Display for StateCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if let Some(path) = &self.path {
            write!(f, "; Path={}", path)?;
        }
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={}", max_age)?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        Ok(())
    }
}
