//! Category and facet taxonomies.
//!
//! A taxonomy is an ordered list of named categories with per-language keyword
//! lists, a fallback name, optional secondary facets, and an optional relevance
//! list. Order is significant: ties and facet matches resolve by position.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::lexicon::KeywordList;
use crate::error::{AppError, AppResult};

fn default_fallback() -> String {
    "other".to_string()
}

/// A topical category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Suggested remedy, with `{facet}` placeholders filled by facet labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    pub keywords: KeywordList,
}

/// One label of a facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetLabel {
    pub name: String,
    pub keywords: KeywordList,
}

/// A secondary taxonomy; the first label with a contained keyword wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub name: String,
    pub labels: Vec<FacetLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTaxonomy {
    pub categories: Vec<Category>,
    #[serde(default = "default_fallback")]
    pub fallback: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,
    /// Empty means every post is relevant.
    #[serde(default, skip_serializing_if = "KeywordList::is_empty")]
    pub relevance: KeywordList,
}

impl CategoryTaxonomy {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            fallback: default_fallback(),
            facets: Vec::new(),
            relevance: KeywordList::default(),
        }
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Validates names and keyword lists, normalising keywords to lowercase.
    pub fn validate(&mut self) -> AppResult<()> {
        if self.categories.is_empty() {
            return Err(AppError::config("taxonomy: at least one category is required"));
        }

        self.fallback = self.fallback.trim().to_string();
        if self.fallback.is_empty() {
            return Err(AppError::config("taxonomy: fallback name is blank"));
        }

        let mut seen = HashSet::new();
        for category in &mut self.categories {
            category.name = category.name.trim().to_string();
            if category.name.is_empty() {
                return Err(AppError::config("taxonomy: category name is blank"));
            }
            if !seen.insert(category.name.to_lowercase()) {
                return Err(AppError::config(format!(
                    "taxonomy: duplicate category '{}'",
                    category.name
                )));
            }
            let context = format!("taxonomy.{}", category.name);
            category.keywords.normalize(&context)?;
            if category.keywords.is_empty() {
                return Err(AppError::config(format!("{}: keyword list is empty", context)));
            }
        }

        if seen.contains(&self.fallback.to_lowercase()) {
            return Err(AppError::config(format!(
                "taxonomy: fallback '{}' shadows a category",
                self.fallback
            )));
        }

        let mut facet_names = HashSet::new();
        for facet in &mut self.facets {
            facet.name = facet.name.trim().to_string();
            if facet.name.is_empty() || !facet_names.insert(facet.name.clone()) {
                return Err(AppError::config(format!(
                    "taxonomy.facets: blank or duplicate facet '{}'",
                    facet.name
                )));
            }
            if facet.labels.is_empty() {
                return Err(AppError::config(format!(
                    "taxonomy.facets.{}: no labels",
                    facet.name
                )));
            }
            let mut label_names = HashSet::new();
            for label in &mut facet.labels {
                label.name = label.name.trim().to_string();
                let context = format!("taxonomy.facets.{}.{}", facet.name, label.name);
                if label.name.is_empty() || !label_names.insert(label.name.clone()) {
                    return Err(AppError::config(format!("{}: blank or duplicate label", context)));
                }
                label.keywords.normalize(&context)?;
                if label.keywords.is_empty() {
                    return Err(AppError::config(format!("{}: keyword list is empty", context)));
                }
            }
        }

        self.relevance.normalize("taxonomy.relevance")?;
        Ok(())
    }

    /// Chinese keywords the segmenter should keep whole.
    pub(crate) fn zh_vocabulary(&self) -> impl Iterator<Item = &String> {
        self.categories
            .iter()
            .flat_map(|c| c.keywords.zh.iter())
            .chain(
                self.facets
                    .iter()
                    .flat_map(|f| f.labels.iter())
                    .flat_map(|l| l.keywords.zh.iter()),
            )
    }
}
