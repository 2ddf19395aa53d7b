use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Directory segment shared by every detail page.
const DETAIL_DIR: &str = "/eng/";

/// Extension of every detail page.
const DETAIL_EXT: &str = ".html";

/// File-name prefix that marks a product detail page.
const PRODUCT_PREFIX: &str = "cosmetic_";

/// The kind of database entity an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Ingredient,
    Product,
}

impl EntityKind {
    /// Namespace tag used in the textual form of a [`CanonicalId`].
    fn tag(self) -> &'static str {
        match self {
            Self::Ingredient => "i",
            Self::Product => "p",
        }
    }

    /// File-name prefix of this kind's detail pages.
    fn file_prefix(self) -> &'static str {
        match self {
            Self::Ingredient => "",
            Self::Product => PRODUCT_PREFIX,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingredient => write!(f, "ingredient"),
            Self::Product => write!(f, "product"),
        }
    }
}

/// Stable dedup key derived from a resolved detail-page address.
///
/// Every alias of an ingredient links to the same detail page, so two names
/// are the same entity exactly when their identifiers are equal. The kind is
/// part of the identity: an ingredient and a product whose tokens coincide
/// never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalId {
    kind: EntityKind,
    token: String,
}

impl CanonicalId {
    /// Build an identifier from a bare page token such as `0f1b7f1402`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAddress`] if the token is empty or contains
    /// characters that cannot appear in a detail-page file name.
    pub fn new(kind: EntityKind, token: &str) -> Result<Self> {
        if is_valid_token(token) {
            Ok(Self {
                kind,
                token: token.to_owned(),
            })
        } else {
            Err(Error::MalformedAddress {
                address: token.to_owned(),
                kind,
            })
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The path-embedded token, without kind prefix.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Detail-page address of this entity under `base_url`.
    pub fn address(&self, base_url: &str) -> String {
        format!(
            "{}{DETAIL_DIR}{}{}{DETAIL_EXT}",
            base_url.trim_end_matches('/'),
            self.kind.file_prefix(),
            self.token
        )
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.tag(), self.token)
    }
}

impl Serialize for CanonicalId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Derive the canonical identifier of the detail page at `address`.
///
/// Accepts `<base>/eng/<token>.html` for ingredients and
/// `<base>/eng/cosmetic_<token>.html` for products. Query strings and
/// fragments are ignored; the host is not checked.
///
/// # Errors
///
/// Returns [`Error::MalformedAddress`] if the address is not a detail page of
/// the requested kind. Callers treat this as "not yet resolvable".
pub fn identifier_from_address(address: &str, kind: EntityKind) -> Result<CanonicalId> {
    let address = address.trim();
    let malformed = || Error::MalformedAddress {
        address: address.to_owned(),
        kind,
    };

    let path = address
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let start = path.rfind(DETAIL_DIR).ok_or_else(malformed)? + DETAIL_DIR.len();
    let file = path[start..].strip_suffix(DETAIL_EXT).ok_or_else(malformed)?;

    let token = match kind {
        EntityKind::Product => file.strip_prefix(PRODUCT_PREFIX).ok_or_else(malformed)?,
        EntityKind::Ingredient if file.starts_with(PRODUCT_PREFIX) => return Err(malformed()),
        EntityKind::Ingredient => file,
    };

    CanonicalId::new(kind, token).map_err(|_| malformed())
}

fn is_valid_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
