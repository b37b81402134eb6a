//! Tab location.

use std::fmt;

use url::Url;

use crate::error::DefinitionError;

const RELATIVE_BASE: &str = "http://localhost/";

/// Location of the current tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    /// Parse an absolute URL.
    pub fn parse(href: &str) -> Result<Self, DefinitionError> {
        let url = Url::parse(href).map_err(|source| DefinitionError::InvalidLocation {
            location: href.to_string(),
            source,
        })?;
        Ok(Self { url })
    }

    /// Build a location from an origin-less path such as `/home?a=b#top`.
    pub fn from_relative(path: &str) -> Result<Self, DefinitionError> {
        let invalid = |source: url::ParseError| DefinitionError::InvalidLocation {
            location: path.to_string(),
            source,
        };
        let base = Url::parse(RELATIVE_BASE).map_err(invalid)?;
        let url = base.join(path).map_err(invalid)?;
        Ok(Self { url })
    }

    /// Accept either an absolute URL or an origin-less path.
    ///
    /// Input starting with `//` names a host, not a path, and is parsed as
    /// an absolute URL, so it fails without a scheme.
    pub fn from_input(input: &str) -> Result<Self, DefinitionError> {
        if input.starts_with('/') && !input.starts_with("//") {
            Self::from_relative(input)
        } else {
            Self::parse(input)
        }
    }

    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.url.fragment()
    }

    /// Path, query and fragment without the origin; this is the string page
    /// patterns are tested against.
    pub fn relative(&self) -> String {
        let mut relative = self.url.path().to_string();
        if let Some(query) = self.url.query() {
            relative.push('?');
            relative.push_str(query);
        }
        if let Some(fragment) = self.url.fragment() {
            relative.push('#');
            relative.push_str(fragment);
        }
        relative
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
