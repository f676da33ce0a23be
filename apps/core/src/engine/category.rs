//! Category Classifier.
//!
//! Each category scores `2` per keyword contained in the lowercased text and `1`
//! per extracted keyword equal to one of its keywords. Every category sharing a
//! positive maximum is returned, in taxonomy order; otherwise the fallback.

use std::collections::BTreeMap;

use super::language::Language;
use super::taxonomy::CategoryTaxonomy;

const TEXT_MATCH_WEIGHT: usize = 2;
const KEYWORD_MATCH_WEIGHT: usize = 1;

pub struct CategoryClassifier<'a> {
    taxonomy: &'a CategoryTaxonomy,
}

impl<'a> CategoryClassifier<'a> {
    pub fn new(taxonomy: &'a CategoryTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Per-category scores in taxonomy order.
    pub fn scores(&self, text: &str, keywords: &[String], language: Language) -> Vec<(&'a str, usize)> {
        let text_lower = text.to_lowercase();
        let extracted: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

        self.taxonomy
            .categories
            .iter()
            .map(|category| {
                let list = category.keywords.for_language_or_en(language);
                let contained = list
                    .iter()
                    .filter(|k| text_lower.contains(k.as_str()))
                    .count();
                let matched = extracted.iter().filter(|k| list.contains(k)).count();
                (
                    category.name.as_str(),
                    contained * TEXT_MATCH_WEIGHT + matched * KEYWORD_MATCH_WEIGHT,
                )
            })
            .collect()
    }

    /// Categories for a post. Never empty.
    pub fn classify(&self, text: &str, keywords: &[String], language: Language) -> Vec<String> {
        let scores = self.scores(text, keywords, language);
        let best = scores.iter().map(|(_, s)| *s).max().unwrap_or(0);

        if best == 0 {
            return vec![self.taxonomy.fallback.clone()];
        }

        scores
            .into_iter()
            .filter(|(_, s)| *s == best)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// First matching label per facet, `fallback` when none matches.
    pub fn label_facets(&self, text: &str) -> BTreeMap<String, String> {
        let text_lower = text.to_lowercase();
        self.taxonomy
            .facets
            .iter()
            .map(|facet| {
                let label = facet
                    .labels
                    .iter()
                    .find(|label| label.keywords.any_contained(&text_lower))
                    .map(|label| label.name.clone())
                    .unwrap_or_else(|| self.taxonomy.fallback.clone());
                (facet.name.clone(), label)
            })
            .collect()
    }

    /// True when no relevance list is configured or any of its keywords is contained.
    pub fn is_relevant(&self, text: &str) -> bool {
        let relevance = &self.taxonomy.relevance;
        relevance.is_empty() || relevance.any_contained(&text.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::lexicon::KeywordList;
    use crate::engine::taxonomy::{Category, Facet, FacetLabel};

    fn taxonomy() -> CategoryTaxonomy {
        let mut taxonomy = CategoryTaxonomy::new(vec![
            Category {
                name: "technical".to_string(),
                solution: None,
                keywords: KeywordList::from_slices(&["崩溃", "闪退"], &["crash", "bug", "slow", "problem"]),
            },
            Category {
                name: "performance".to_string(),
                solution: None,
                keywords: KeywordList::from_slices(&["卡顿"], &["slow", "memory"]),
            },
            Category {
                name: "service".to_string(),
                solution: None,
                keywords: KeywordList::from_slices(&[], &["support", "help"]),
            },
        ]);
        taxonomy.facets.push(Facet {
            name: "sector".to_string(),
            labels: vec![
                FacetLabel {
                    name: "finance".to_string(),
                    keywords: KeywordList::from_slices(&["银行"], &["bank"]),
                },
                FacetLabel {
                    name: "retail".to_string(),
                    keywords: KeywordList::from_slices(&["购物"], &["shopping", "bank holiday sale"]),
                },
            ],
        });
        taxonomy.validate().unwrap();
        taxonomy
    }

    #[test]
    fn test_single_best_category() {
        let t = taxonomy();
        let classifier = CategoryClassifier::new(&t);
        assert_eq!(
            classifier.classify("problem", &["problem".to_string()], Language::En),
            vec!["technical"]
        );
    }

    #[test]
    fn test_ties_return_all_in_taxonomy_order() {
        let t = taxonomy();
        let classifier = CategoryClassifier::new(&t);
        assert_eq!(
            classifier.classify("so slow", &[], Language::En),
            vec!["technical", "performance"]
        );
    }

    #[test]
    fn test_extracted_keywords_break_ties() {
        let t = taxonomy();
        let classifier = CategoryClassifier::new(&t);
        let keywords = vec!["Memory".to_string()];
        assert_eq!(
            classifier.classify("slow app, memory hog", &keywords, Language::En),
            vec!["performance"]
        );
    }

    #[test]
    fn test_no_match_returns_fallback() {
        let t = taxonomy();
        let classifier = CategoryClassifier::new(&t);
        assert_eq!(classifier.classify("lovely weather", &[], Language::En), vec!["other"]);
        assert_eq!(classifier.classify("", &[], Language::Unknown), vec!["other"]);
    }

    #[test]
    fn test_language_lists_and_fallback() {
        let t = taxonomy();
        let classifier = CategoryClassifier::new(&t);
        assert_eq!(classifier.classify("又崩溃了", &[], Language::Zh), vec!["technical"]);
        // service has no zh list, so its en list applies
        assert_eq!(classifier.classify("求support", &[], Language::Zh), vec!["service"]);
        // zh keywords are not consulted for English text
        assert_eq!(classifier.classify("卡顿 lag", &[], Language::En), vec!["other"]);
    }

    #[test]
    fn test_case_insensitive_matching() {
        let t = taxonomy();
        let classifier = CategoryClassifier::new(&t);
        assert_eq!(classifier.classify("CRASH after update", &[], Language::En), vec!["technical"]);
    }

    #[test]
    fn test_facets_first_label_wins() {
        let t = taxonomy();
        let classifier = CategoryClassifier::new(&t);
        let facets = classifier.label_facets("bank holiday sale was a mess");
        assert_eq!(facets.get("sector").map(String::as_str), Some("finance"));
        let facets = classifier.label_facets("网上购物太麻烦");
        assert_eq!(facets.get("sector").map(String::as_str), Some("retail"));
        let facets = classifier.label_facets("nothing here");
        assert_eq!(facets.get("sector").map(String::as_str), Some("other"));
    }

    #[test]
    fn test_relevance_gate() {
        let mut t = taxonomy();
        assert!(CategoryClassifier::new(&t).is_relevant("anything at all"));

        t.relevance = KeywordList::from_slices(&["排队"], &["queue"]);
        let classifier = CategoryClassifier::new(&t);
        assert!(classifier.is_relevant("The QUEUE never moves"));
        assert!(classifier.is_relevant("银行排队两小时"));
        assert!(!classifier.is_relevant("lovely weather"));
    }
}
