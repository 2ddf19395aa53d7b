use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::identity::{CanonicalId, EntityKind, identifier_from_address};
use crate::model::lookup::NameLookup;
use crate::resolve::{LinkState, Resolution, Resolver, SearchRequest};
use crate::site::page::text_of;
use crate::site::selectors::ingredient as sel;
use crate::site::{Page, SiteClient};
use crate::text::normalize;

/// Prefix marking the display name of a skipped entity.
pub const SKIP_TAG: &str = "SKIP: ";

static MOLECULAR_WEIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"molecular weight[^\da-z.]*(\d+(?:\.\d+)?)").expect("invalid regex"));

static HLB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"hlb[^\da-z.]*(\d+(?:\.\d+)?)").expect("invalid regex"));

static CAS_NO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"cas no[^\da-z]*(\d+-\d+-\d+)").expect("invalid regex"));

/// An ingredient, from a bare name up to a fully extracted detail page.
///
/// Created unresolved; [`Ingredient::link`] resolves it and
/// [`Ingredient::sync`] fills in the chemistry from its detail page.
#[derive(Debug, Clone, Default)]
pub struct Ingredient {
    name: String,
    /// CAS Registry Number. Used as the search key when present.
    pub cas_no: Option<String>,
    /// Molar mass in g/mol.
    pub mass: Option<f64>,
    /// Hydrophilic-lipophilic balance.
    pub hlb: Option<f64>,
    pub aliases: Vec<String>,
    pub description: Option<String>,
    id: Option<CanonicalId>,
    address: Option<String>,
    state: LinkState,
    synced: bool,
}

impl Ingredient {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_owned(),
            ..Self::default()
        }
    }

    /// Give the search a CAS number to prefer over the name.
    pub fn with_cas(mut self, cas_no: &str) -> Self {
        let cas_no = cas_no.trim();
        self.cas_no = (!cas_no.is_empty()).then(|| cas_no.to_owned());
        self
    }

    /// An ingredient already linked to a known identifier.
    pub fn linked(name: &str, id: CanonicalId, address: String) -> Self {
        Self {
            name: name.trim().to_owned(),
            id: Some(id),
            address: Some(address),
            state: LinkState::Linked,
            ..Self::default()
        }
    }

    /// Display name. Skipped ingredients carry the [`SKIP_TAG`] prefix.
    pub fn name(&self) -> String {
        match self.state {
            LinkState::Skipped => format!("{SKIP_TAG}{}", self.name),
            _ => self.name.clone(),
        }
    }

    pub fn id(&self) -> Option<&CanonicalId> {
        self.id.as_ref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_linked(&self) -> bool {
        self.state == LinkState::Linked
    }

    pub fn is_skipped(&self) -> bool {
        self.state == LinkState::Skipped
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Whether `name` (normalized) is this ingredient's name or an alias.
    pub fn answers_to(&self, name: &str) -> bool {
        let wanted = normalize(name);
        !wanted.is_empty()
            && (normalize(&self.name) == wanted || self.aliases.iter().any(|a| *a == wanted))
    }

    /// Link to an explicit detail address.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedAddress`] if `address` is not an
    /// ingredient page; the ingredient is left as it was.
    pub fn link_to(&mut self, address: &str) -> Result<()> {
        let id = identifier_from_address(address, EntityKind::Ingredient)?;
        self.id = Some(id);
        self.address = Some(address.trim().to_owned());
        self.state = LinkState::Linked;
        Ok(())
    }

    /// Resolve this ingredient, searching by CAS number or name.
    ///
    /// Already linked or skipped ingredients return immediately without a
    /// request. Returns the detail page when the search landed on it.
    ///
    /// # Errors
    ///
    /// Propagates resolver errors, plus [`crate::Error::MalformedAddress`]
    /// if the resolved address is not an ingredient page. On error the
    /// ingredient stays unlinked.
    pub fn link<C: SiteClient>(&mut self, resolver: &mut Resolver<C>) -> Result<Option<Page>> {
        if self.state != LinkState::Unlinked {
            return Ok(None);
        }

        let request = SearchRequest::new(EntityKind::Ingredient, &self.name)
            .priority_key(self.cas_no.as_deref());
        match resolver.resolve(&request)? {
            Resolution::Linked { address, page } => {
                self.link_to(&address)?;
                Ok(page)
            }
            Resolution::Skipped => {
                self.state = LinkState::Skipped;
                Ok(None)
            }
        }
    }

    /// Link if needed, then read the detail page.
    ///
    /// Skipped ingredients are left untouched.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Ingredient::link`] and the page fetch.
    pub fn sync<C: SiteClient>(&mut self, resolver: &mut Resolver<C>, lookup: &NameLookup) -> Result<()> {
        let landed = self.link(resolver)?;
        let Some(address) = self.address.clone().filter(|_| self.is_linked()) else {
            return Ok(());
        };

        let page = match landed {
            Some(page) => page,
            None => resolver.fetch(&address)?,
        };
        self.extract(&page, lookup);
        Ok(())
    }

    /// Populate this ingredient from its detail page.
    ///
    /// Fields the page lacks are left unset.
    pub fn extract(&mut self, page: &Page, lookup: &NameLookup) {
        if let Ok(id) = identifier_from_address(&page.url, EntityKind::Ingredient) {
            self.id = Some(id);
            self.address = Some(page.url.clone());
            self.state = LinkState::Linked;
        }

        let site_name = page
            .first_text(&sel::NAME)
            .map(|n| normalize(&n))
            .filter(|n| !n.is_empty());
        if let Some(name) = self.id.as_ref().and_then(|id| lookup.get(id)) {
            self.name = name.to_owned();
        } else if let Some(name) = site_name {
            self.name = name;
        }

        if let Some(aliases) = page.first_text(&sel::ALIASES) {
            self.aliases = aliases
                .split(',')
                .map(normalize)
                .filter(|a| !a.is_empty())
                .collect();
        }

        if let Some(chemistry) = page.first(&sel::CHEMISTRY) {
            let (mass, hlb, cas_no) = parse_chemistry(&text_of(chemistry, "\n"));
            self.mass = mass;
            self.hlb = hlb;
            if cas_no.is_some() {
                self.cas_no = cas_no;
            }
        }

        self.description = page.first_text(&sel::DESCRIPTION).filter(|d| !d.is_empty());
        self.synced = true;
        tracing::debug!(name = %self.name, id = ?self.id, "ingredient synced");
    }
}

/// Molar mass, HLB and CAS number from the chemistry block.
fn parse_chemistry(text: &str) -> (Option<f64>, Option<f64>, Option<String>) {
    let text = text.to_lowercase();
    let number = |re: &Regex| {
        re.captures(&text)
            .and_then(|c| c[1].parse::<f64>().ok())
    };
    let cas_no = CAS_NO.captures(&text).map(|c| c[1].to_owned());
    (number(&MOLECULAR_WEIGHT), number(&HLB), cas_no)
}
