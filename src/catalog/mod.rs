//! Read-only quiz content for the three domains.
//!
//! Catalogs are TOML files embedded at build time. Item order in the file is
//! the catalog order used for chunked unlocking.

use std::collections::HashSet;
use std::fmt;

use rust_embed::Embed;
use rust_i18n::t;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

#[derive(Embed)]
#[folder = "assets/catalog/"]
struct CatalogAssets;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Classification,
    Identification,
    Concepts,
}

impl Domain {
    pub const ALL: [Domain; 3] = [
        Domain::Classification,
        Domain::Identification,
        Domain::Concepts,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Classification => "classification",
            Domain::Identification => "identification",
            Domain::Concepts => "concepts",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classification" | "diseases" => Some(Domain::Classification),
            "identification" | "syndromes" => Some(Domain::Identification),
            "concepts" => Some(Domain::Concepts),
            _ => None,
        }
    }

    /// Highest selectable difficulty. Classification has an extra level that
    /// shuffles the answer labels in full random mode.
    pub fn max_difficulty(self) -> u8 {
        match self {
            Domain::Classification => 4,
            Domain::Identification | Domain::Concepts => 3,
        }
    }

    /// Whether answers are other catalog items (with sampled distractors)
    /// rather than the four fixed classification labels.
    pub fn uses_item_options(self) -> bool {
        !matches!(self, Domain::Classification)
    }

    pub fn label(self) -> String {
        match self {
            Domain::Classification => t!("domain.classification").to_string(),
            Domain::Identification => t!("domain.identification").to_string(),
            Domain::Concepts => t!("domain.concepts").to_string(),
        }
    }

    fn asset_file(self) -> String {
        format!("{}.toml", self.as_str())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode of inheritance of a monogenic disease.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    XDominant,
    XRecessive,
    AutoRecessive,
    AutoDominant,
}

impl Classification {
    /// Fixed display order of the answer buttons.
    pub const ALL: [Classification; 4] = [
        Classification::XDominant,
        Classification::XRecessive,
        Classification::AutoRecessive,
        Classification::AutoDominant,
    ];

    pub fn label(self) -> String {
        match self {
            Classification::XDominant => t!("classification.x_dominant").to_string(),
            Classification::XRecessive => t!("classification.x_recessive").to_string(),
            Classification::AutoRecessive => t!("classification.auto_recessive").to_string(),
            Classification::AutoDominant => t!("classification.auto_dominant").to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassificationItem {
    pub id: ItemId,
    pub display_name: String,
    pub classification: Classification,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentificationItem {
    pub id: ItemId,
    pub display_name: String,
    pub feature_lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConceptItem {
    pub id: ItemId,
    pub display_name: String,
    pub description_lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogItem {
    Classification(ClassificationItem),
    Identification(IdentificationItem),
    Concept(ConceptItem),
}

impl CatalogItem {
    pub fn id(&self) -> &ItemId {
        match self {
            CatalogItem::Classification(item) => &item.id,
            CatalogItem::Identification(item) => &item.id,
            CatalogItem::Concept(item) => &item.id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            CatalogItem::Classification(item) => &item.display_name,
            CatalogItem::Identification(item) => &item.display_name,
            CatalogItem::Concept(item) => &item.display_name,
        }
    }

    pub fn domain(&self) -> Domain {
        match self {
            CatalogItem::Classification(_) => Domain::Classification,
            CatalogItem::Identification(_) => Domain::Identification,
            CatalogItem::Concept(_) => Domain::Concepts,
        }
    }

    /// Text shown as the prompt body. Classification prompts show only the
    /// disease name, so they have no extra lines.
    pub fn prompt_lines(&self) -> &[String] {
        match self {
            CatalogItem::Classification(_) => &[],
            CatalogItem::Identification(item) => &item.feature_lines,
            CatalogItem::Concept(item) => &item.description_lines,
        }
    }

    pub fn classification(&self) -> Option<Classification> {
        match self {
            CatalogItem::Classification(item) => Some(item.classification),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    domain: Domain,
    items: Vec<RawItem>,
}

#[derive(Deserialize)]
struct RawItem {
    id: String,
    name: String,
    #[serde(default)]
    classification: Option<Classification>,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    description: Vec<String>,
}

impl RawItem {
    fn into_item(self, domain: Domain) -> Result<CatalogItem, CatalogError> {
        let shape_error = |id: String| CatalogError::ItemShape { id, domain };
        let id = ItemId::new(self.id.trim());
        match domain {
            Domain::Classification => {
                let Some(classification) = self.classification else {
                    return Err(shape_error(self.id));
                };
                Ok(CatalogItem::Classification(ClassificationItem {
                    id,
                    display_name: self.name,
                    classification,
                }))
            }
            Domain::Identification => {
                if self.features.is_empty() || self.classification.is_some() {
                    return Err(shape_error(self.id));
                }
                Ok(CatalogItem::Identification(IdentificationItem {
                    id,
                    display_name: self.name,
                    feature_lines: self.features,
                }))
            }
            Domain::Concepts => {
                if self.description.is_empty() || self.classification.is_some() {
                    return Err(shape_error(self.id));
                }
                Ok(CatalogItem::Concept(ConceptItem {
                    id,
                    display_name: self.name,
                    description_lines: self.description,
                }))
            }
        }
    }
}

/// Ordered, immutable collection of items for one domain.
#[derive(Clone, Debug)]
pub struct Catalog {
    domain: Domain,
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(domain: Domain, items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        if items.is_empty() {
            return Err(CatalogError::Empty(domain));
        }
        let mut seen = HashSet::new();
        for item in &items {
            if item.domain() != domain {
                return Err(CatalogError::ItemShape {
                    id: item.id().to_string(),
                    domain,
                });
            }
            if !seen.insert(item.id().clone()) {
                return Err(CatalogError::DuplicateId {
                    id: item.id().to_string(),
                    domain,
                });
            }
        }
        Ok(Self { domain, items })
    }

    pub fn from_toml(domain: Domain, content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content).map_err(|source| CatalogError::Parse {
            file: domain.asset_file(),
            source,
        })?;
        if file.domain != domain {
            return Err(CatalogError::DomainMismatch {
                expected: domain,
                found: file.domain,
            });
        }
        let items = file
            .items
            .into_iter()
            .map(|raw| raw.into_item(domain))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(domain, items)
    }

    pub fn bundled(domain: Domain) -> Result<Self, CatalogError> {
        let filename = domain.asset_file();
        let file = CatalogAssets::get(&filename)
            .ok_or_else(|| CatalogError::MissingAsset(filename.clone()))?;
        let content = std::str::from_utf8(file.data.as_ref())
            .map_err(|_| CatalogError::Encoding(filename.clone()))?;
        let catalog = Self::from_toml(domain, content)?;
        tracing::debug!(domain = %domain, items = catalog.len(), "loaded bundled catalog");
        Ok(catalog)
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id() == id)
    }
}
