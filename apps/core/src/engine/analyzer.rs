//! Classification Engine - main orchestrator of the engine module.
//!
//! Runs the components in a fixed order for each post:
//! 1. Language detection (once)
//! 2. Sentiment
//! 3. Keyword extraction from the post text
//! 4. Categories from the text and the extracted keywords
//! 5. Facets and relevance
//! 6. Difficulty or opportunity score
//! 7. Complaint flag
//!
//! No component calls back into another, and nothing here performs I/O.

use std::sync::Arc;
use tracing::{debug, info};

use super::category::CategoryClassifier;
use super::keywords::{ExtractionMethod, KeywordExtractor};
use super::language::detect;
use super::record::ClassificationRecord;
use super::scoring::{Score, ScoreMode, SeverityScorer};
use super::sentiment::{SentimentLabel, SentimentScorer, SentimentStrategy};
use crate::config::EngineConfig;
use crate::models::RawPost;

/// Negative posts above this confidence are complaints.
const COMPLAINT_CONFIDENCE: f64 = 0.5;

/// Per-engine choices that are not part of the rules themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub mode: ScoreMode,
    /// Keywords kept per post.
    pub top_n: usize,
    pub sentiment: SentimentStrategy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            mode: ScoreMode::Difficulty,
            top_n: 10,
            sentiment: SentimentStrategy::Auto,
        }
    }
}

/// Classifies posts against a shared, validated configuration
pub struct ClassificationEngine {
    config: Arc<EngineConfig>,
    settings: EngineSettings,
    keyword_extractor: KeywordExtractor,
}

impl ClassificationEngine {
    /// Create an engine over `config`
    pub fn new(config: Arc<EngineConfig>, settings: EngineSettings) -> Self {
        let keyword_extractor =
            KeywordExtractor::new(&config.lexicon().stopwords, config.segmenter().clone());
        info!(
            mode = %settings.mode,
            top_n = settings.top_n,
            sentiment = ?settings.sentiment,
            categories = config.taxonomy().categories.len(),
            "Classification engine ready"
        );
        Self {
            config,
            settings,
            keyword_extractor,
        }
    }

    /// Create an engine with default settings in the given mode
    pub fn with_mode(config: Arc<EngineConfig>, mode: ScoreMode) -> Self {
        Self::new(
            config,
            EngineSettings {
                mode,
                ..EngineSettings::default()
            },
        )
    }

    pub fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn keyword_extractor(&self) -> &KeywordExtractor {
        &self.keyword_extractor
    }

    /// Classify a post in the engine's mode
    pub fn classify(&self, post: &RawPost) -> ClassificationRecord {
        self.classify_with_mode(post, self.settings.mode)
    }

    /// Classify a post, scoring it in `mode`
    pub fn classify_with_mode(&self, post: &RawPost, mode: ScoreMode) -> ClassificationRecord {
        let config = &self.config;
        let lexicon = config.lexicon();
        let text = post.text.as_str();

        // 1. Language, detected once for every later step
        let language = detect(text);

        // 2. Sentiment
        let sentiment = SentimentScorer::new(lexicon, config.segmenter(), self.settings.sentiment)
            .score(text, language);

        // 3. Keywords; an empty list only narrows categorisation to the text
        let (method, ranked) =
            self.keyword_extractor
                .extract_detailed(&[text], language, self.settings.top_n);
        if method == ExtractionMethod::Frequency && !ranked.is_empty() {
            debug!(post_id = %post.id, "Keywords ranked by frequency");
        }
        let keywords: Vec<String> = ranked.into_iter().map(|k| k.keyword).collect();

        // 4-5. Categories, facets, relevance
        let classifier = CategoryClassifier::new(config.taxonomy());
        let categories = classifier.classify(text, &keywords, language);
        let facets = classifier.label_facets(text);
        let is_relevant = classifier.is_relevant(text);

        // 6. Score
        let profile = match mode {
            ScoreMode::Difficulty => &lexicon.difficulty,
            ScoreMode::Opportunity => &lexicon.opportunity,
        };
        let value = SeverityScorer::new(profile, mode).score(
            text,
            language,
            &sentiment,
            &post.engagement,
        );

        let optimization_potential = match mode {
            ScoreMode::Opportunity => Some(profile.optimization_potential(text)),
            ScoreMode::Difficulty => None,
        };

        // 7. Complaint flag
        let is_complaint = sentiment.label == SentimentLabel::Negative
            && sentiment.confidence > COMPLAINT_CONFIDENCE;

        debug!(
            post_id = %post.id,
            language = %language,
            sentiment = %sentiment.label,
            score = value,
            categories = ?categories,
            is_complaint,
            "Post classified"
        );

        ClassificationRecord {
            post_id: post.id.clone(),
            created_at: post.created_at,
            language,
            sentiment,
            categories,
            score: Score::new(mode, value),
            keywords,
            is_complaint,
            engagement: post.engagement,
            facets,
            is_relevant,
            optimization_potential,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::language::Language;
    use crate::engine::scoring::OptimizationPotential;
    use crate::models::EngagementCounts;

    fn engine(mode: ScoreMode) -> ClassificationEngine {
        let config = Arc::new(EngineConfig::builtin_complaints().unwrap());
        ClassificationEngine::with_mode(config, mode)
    }

    #[test]
    fn test_chinese_complaint() {
        let record = engine(ScoreMode::Difficulty).classify(&RawPost::new("p1", "这个软件总是崩溃，太慢了"));

        assert_eq!(record.language, Language::Zh);
        assert_eq!(record.sentiment.label, SentimentLabel::Negative);
        assert!(record.score.value() >= 4, "score was {:?}", record.score);
        assert_eq!(record.score.mode(), ScoreMode::Difficulty);
        assert!(record.categories.contains(&"technical".to_string()));
    }

    #[test]
    fn test_mode_override() {
        let engine = engine(ScoreMode::Difficulty);
        let post = RawPost::new("p1", "hello there").with_engagement(EngagementCounts::new(150, 40, 0));

        assert_eq!(engine.classify(&post).score, Score::Difficulty(1));
        assert_eq!(
            engine.classify_with_mode(&post, ScoreMode::Opportunity).score,
            Score::Opportunity(4)
        );
    }

    #[test]
    fn test_passthrough_fields() {
        let post = RawPost::new("abc-123", "login error").with_engagement(EngagementCounts::new(3, 1, 2));
        let record = engine(ScoreMode::Difficulty).classify(&post);

        assert_eq!(record.post_id, "abc-123");
        assert_eq!(record.engagement, EngagementCounts::new(3, 1, 2));
        assert!(record.facets.is_empty());
        assert!(record.is_relevant);
        assert!(record.optimization_potential.is_none());
    }

    #[test]
    fn test_potential_only_in_opportunity_mode() {
        let engine = engine(ScoreMode::Difficulty);
        let post = RawPost::new("p1", "排队等待太久了");

        assert_eq!(engine.classify(&post).optimization_potential, None);
        assert_eq!(
            engine
                .classify_with_mode(&post, ScoreMode::Opportunity)
                .optimization_potential,
            Some(OptimizationPotential::High)
        );
    }

    #[test]
    fn test_keywords_respect_top_n() {
        let config = Arc::new(EngineConfig::builtin_complaints().unwrap());
        let engine = ClassificationEngine::new(
            config,
            EngineSettings {
                top_n: 2,
                ..EngineSettings::default()
            },
        );
        let record = engine.classify(&RawPost::new("p1", "checkout button broken on mobile safari browser"));
        assert_eq!(record.keywords.len(), 2);
    }

    #[test]
    fn test_empty_text_still_classifies() {
        let record = engine(ScoreMode::Opportunity).classify(&RawPost::new("p1", ""));
        assert_eq!(record.language, Language::Unknown);
        assert_eq!(record.categories, vec!["other"]);
        assert_eq!(record.score, Score::Opportunity(1));
        assert!(record.keywords.is_empty());
        assert!(!record.is_complaint);
    }
}
