//! Read-only material catalog: category → subcategory → entry.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::calc::MaterialUnit;

const EMBEDDED_CATALOG: &str = include_str!("../data/catalog.json");

fn default_unit() -> MaterialUnit {
    MaterialUnit::SquareMeter
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub brands: Vec<String>,
    pub price: f64,
    #[serde(default = "default_unit")]
    pub unit: MaterialUnit,
    #[serde(default)]
    pub description: String,
}

/// A catalog entry together with where it lives in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material<'a> {
    pub category: &'a str,
    pub name: &'a str,
    pub entry: &'a CatalogEntry,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: BTreeMap<String, BTreeMap<String, CatalogEntry>>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid catalog document")
    }

    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load the catalog from `path`, or the embedded default when no path is set.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let catalog = match path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading catalog");
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("failed to read catalog {}", path.display()))?;
                Self::from_json(&raw)?
            }
            None => Self::embedded()?,
        };
        tracing::debug!(materials = catalog.materials().len(), "Catalog ready");
        Ok(catalog)
    }

    pub fn categories(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    pub fn category(&self, index: usize) -> Option<(&str, Vec<&str>)> {
        let (name, subs) = self.categories.iter().nth(index)?;
        Some((name.as_str(), subs.keys().map(String::as_str).collect()))
    }

    pub fn subcategory(&self, category: usize, index: usize) -> Option<Material<'_>> {
        let (cat, subs) = self.categories.iter().nth(category)?;
        let (name, entry) = subs.iter().nth(index)?;
        Some(Material {
            category: cat,
            name,
            entry,
        })
    }

    /// Every entry in catalog order.
    pub fn materials(&self) -> Vec<Material<'_>> {
        self.categories
            .iter()
            .flat_map(|(cat, subs)| {
                subs.iter().map(move |(name, entry)| Material {
                    category: cat,
                    name,
                    entry,
                })
            })
            .collect()
    }

    pub fn material(&self, index: usize) -> Option<Material<'_>> {
        self.materials().into_iter().nth(index)
    }

    /// Case-insensitive lookup by subcategory name.
    pub fn find_material(&self, name: &str) -> Option<Material<'_>> {
        let needle = name.trim().to_lowercase();
        self.materials()
            .into_iter()
            .find(|m| m.name.to_lowercase() == needle)
    }

    /// Entries whose unit price does not exceed `budget`, cheapest first.
    pub fn within_budget(&self, budget: f64) -> Vec<Material<'_>> {
        let mut found: Vec<Material<'_>> = self
            .materials()
            .into_iter()
            .filter(|m| m.entry.price <= budget)
            .collect();
        found.sort_by(|a, b| a.entry.price.total_cmp(&b.entry.price));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Пол": {
            "Ламинат": {"brands": ["Tarkett"], "price": 1200, "description": "33 класс"},
            "Паркет": {"brands": ["Barlinek"], "price": 1800, "description": "Дуб"}
        },
        "Стены": {
            "Обои": {"brands": [], "price": 900, "unit": "рулон"}
        }
    }"#;

    #[test]
    fn budget_lookup_filters_by_price() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let names: Vec<&str> = catalog.within_budget(1500.0).iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Обои", "Ламинат"]);
        assert_eq!(catalog.within_budget(1200.0).len(), 2);
        assert!(catalog.within_budget(100.0).is_empty());
    }

    #[test]
    fn find_material_ignores_case() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let found = catalog.find_material("ламинат").unwrap();
        assert_eq!(found.category, "Пол");
        assert_eq!(found.entry.unit, MaterialUnit::SquareMeter);
        assert!(catalog.find_material("Бетон").is_none());
    }

    #[test]
    fn index_navigation() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.categories(), vec!["Пол", "Стены"]);
        let (name, subs) = catalog.category(1).unwrap();
        assert_eq!(name, "Стены");
        assert_eq!(subs, vec!["Обои"]);
        assert_eq!(catalog.subcategory(0, 1).unwrap().name, "Паркет");
        assert!(catalog.subcategory(5, 0).is_none());
        assert_eq!(catalog.material(2).unwrap().entry.unit, MaterialUnit::Roll);
    }

    #[test]
    fn embedded_catalog_parses() {
        let catalog = Catalog::embedded().unwrap();
        assert!(catalog.find_material("Ламинат").is_some());
        assert!(!catalog.materials().is_empty());
    }
}
