//! Template catalog
//!
//! Templates are looked up by exact, case-sensitive name. "Milk" and "milk"
//! are different templates and there is no fuzzy fallback.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Item placement rule used when filling anchor slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlacementType {
    BakeryShelf,
    Fridge,
    #[default]
    DefaultShelf,
}

/// A spawnable product template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    /// Asset spawned for a box of this product (`None`: cannot be boxed)
    #[serde(default)]
    pub box_asset: Option<String>,
    /// Asset spawned for a single shelf item
    #[serde(default)]
    pub item_asset: Option<String>,
    #[serde(default)]
    pub placement_type: PlacementType,
    #[serde(default)]
    pub selling_price: f32,
}

impl Template {
    /// Template with both assets named after itself
    pub fn new(name: &str, placement_type: PlacementType) -> Self {
        Self {
            name: name.to_string(),
            box_asset: Some(format!("{}Box", name)),
            item_asset: Some(name.to_string()),
            placement_type,
            selling_price: 0.0,
        }
    }
}

/// Name -> template lookup
pub trait TemplateCatalog {
    fn resolve_by_name(&self, name: &str) -> Option<&Template>;
}

/// Linear-scan catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    templates: Vec<Template>,
}

impl Catalog {
    pub fn new(templates: Vec<Template>) -> Result<Self, CatalogError> {
        for (i, t) in templates.iter().enumerate() {
            if templates[..i].iter().any(|other| other.name == t.name) {
                return Err(CatalogError::DuplicateTemplate {
                    name: t.name.clone(),
                });
            }
        }
        Ok(Self { templates })
    }

    /// Parse a JSON array of templates
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let templates: Vec<Template> = serde_json::from_str(json)?;
        let catalog = Self::new(templates)?;
        log::info!("Loaded catalog with {} templates", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateCatalog for Catalog {
    fn resolve_by_name(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }
}
