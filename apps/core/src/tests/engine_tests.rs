//! Engine Tests
//!
//! Properties that must hold for every post, and the worked examples the
//! engine is expected to reproduce exactly.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::engine::{
    detect, ClassificationEngine, EngineSettings, Language, OptimizationPotential, Score, ScoreMode,
    SentimentLabel, SentimentStrategy,
};
use crate::models::{EngagementCounts, RawPost};

// ============================================================================
// Test Fixtures
// ============================================================================

const CORPUS: &[&str] = &[
    "这个软件总是崩溃，太慢了",
    "This app keeps crashing every time I open it!!!",
    "Love the new update, great job",
    "problem",
    "",
    "12345 ???",
    "客服一直不回复，真的非常失望",
    "Checkout is SO slow and the support team never answers. Terrible experience, I want a refund.",
    "WeChat 登录 失败",
    "The database server is down again, critical outage affecting all users, please fix ASAP",
    "银行排队等待太久，每次都要来回跑",
    "想要一个一键导出的功能",
];

fn complaints_config() -> Arc<EngineConfig> {
    Arc::new(EngineConfig::builtin_complaints().expect("complaints preset must load"))
}

fn process_config() -> Arc<EngineConfig> {
    Arc::new(EngineConfig::builtin_process_optimization().expect("process preset must load"))
}

fn engine(mode: ScoreMode) -> ClassificationEngine {
    ClassificationEngine::with_mode(complaints_config(), mode)
}

fn lexicon_engine(mode: ScoreMode) -> ClassificationEngine {
    ClassificationEngine::new(
        complaints_config(),
        EngineSettings {
            mode,
            sentiment: SentimentStrategy::Lexicon,
            ..EngineSettings::default()
        },
    )
}

// ============================================================================
// Properties
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    #[test]
    fn test_detection_is_pure() {
        for text in CORPUS {
            let first = detect(text);
            assert_eq!(first, detect(text), "detection changed for '{}'", text);
        }
    }

    #[test]
    fn test_sentiment_range_and_confidence() {
        for engine in [engine(ScoreMode::Difficulty), lexicon_engine(ScoreMode::Difficulty)] {
            for text in CORPUS {
                let record = engine.classify(&RawPost::new("p", *text));
                let s = record.sentiment;
                assert!((-1.0..=1.0).contains(&s.score), "score {} out of range for '{}'", s.score, text);
                assert_eq!(s.confidence, s.score.abs(), "confidence mismatch for '{}'", text);
            }
        }
    }

    #[test]
    fn test_score_bounds_per_mode() {
        let viral = EngagementCounts::new(10_000, 5_000, 100);
        for text in CORPUS {
            let post = RawPost::new("p", *text).with_engagement(viral);

            let difficulty = engine(ScoreMode::Difficulty).classify(&post).score;
            assert!(matches!(difficulty, Score::Difficulty(1..=5)), "{:?} for '{}'", difficulty, text);

            let opportunity = engine(ScoreMode::Opportunity).classify(&post).score;
            assert!(matches!(opportunity, Score::Opportunity(1..=10)), "{:?} for '{}'", opportunity, text);
        }
    }

    #[test]
    fn test_score_monotone_in_engagement() {
        let engine = engine(ScoreMode::Opportunity);
        for text in CORPUS {
            let mut previous = 0;
            for likes in [0, 5, 10, 11, 30, 50, 51, 100, 101, 1_000] {
                let post = RawPost::new("p", *text).with_engagement(EngagementCounts::new(likes, 0, 0));
                let value = engine.classify(&post).score.value();
                assert!(value >= previous, "score dropped at likes={} for '{}'", likes, text);
                previous = value;
            }
        }
    }

    #[test]
    fn test_score_monotone_in_length() {
        let engine = engine(ScoreMode::Difficulty);
        for text in CORPUS {
            let short = engine.classify(&RawPost::new("p", *text)).score.value();
            // full-width stops add length without adding letters or tokens
            let padded = format!("{} {}", text, "。".repeat(250));
            let long = engine.classify(&RawPost::new("p", padded)).score.value();
            assert!(long >= short, "long text scored lower for '{}'", text);
        }
    }

    #[test]
    fn test_categories_never_empty() {
        let engine = engine(ScoreMode::Difficulty);
        for text in CORPUS {
            let record = engine.classify(&RawPost::new("p", *text));
            assert!(!record.categories.is_empty(), "no category for '{}'", text);
        }
    }

    #[test]
    fn test_unmatched_text_is_other() {
        let record = engine(ScoreMode::Difficulty).classify(&RawPost::new("p", "lovely weather today"));
        assert_eq!(record.categories, vec!["other"]);
    }

    #[test]
    fn test_keywords_bounded_by_top_n() {
        for top_n in [1, 3, 10] {
            let engine = ClassificationEngine::new(
                complaints_config(),
                EngineSettings {
                    top_n,
                    ..EngineSettings::default()
                },
            );
            for text in CORPUS {
                let record = engine.classify(&RawPost::new("p", *text));
                assert!(record.keywords.len() <= top_n, "too many keywords for '{}'", text);
            }
        }
    }

    #[test]
    fn test_reclassification_is_identical() {
        let engine = engine(ScoreMode::Opportunity);
        for text in CORPUS {
            let post = RawPost::new("p", *text).with_engagement(EngagementCounts::new(42, 7, 1));
            let first = engine.classify(&post);
            let second = engine.classify(&post);
            assert_eq!(first, second, "record changed for '{}'", text);
            assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClassificationEngine>();
        assert_send_sync::<EngineConfig>();
    }
}

// ============================================================================
// Worked Examples
// ============================================================================

#[cfg(test)]
mod example_tests {
    use super::*;

    #[test]
    fn test_chinese_crash_report() {
        let record = engine(ScoreMode::Difficulty).classify(&RawPost::new("zh-1", "这个软件总是崩溃，太慢了"));

        assert_eq!(record.language, Language::Zh);
        assert_eq!(record.sentiment.label, SentimentLabel::Negative);
        assert!(record.score.value() >= 4, "difficulty was {:?}", record.score);
    }

    #[test]
    fn test_single_word_problem() {
        let record = lexicon_engine(ScoreMode::Difficulty).classify(&RawPost::new("en-1", "problem"));

        assert_eq!(record.language, Language::En);
        assert_eq!(record.categories, vec!["technical"]);
        assert_eq!(record.sentiment.confidence, 1.0);
        assert!(record.is_complaint);
    }

    #[test]
    fn test_complaint_boundary_is_strict() {
        let record = lexicon_engine(ScoreMode::Difficulty).classify(&RawPost::new("en-2", "problem today"));

        assert_eq!(record.sentiment.label, SentimentLabel::Negative);
        assert_eq!(record.sentiment.confidence, 0.5);
        assert!(!record.is_complaint, "confidence of exactly 0.5 must not be a complaint");
    }

    #[test]
    fn test_engagement_bonus_regardless_of_text() {
        let engine = engine(ScoreMode::Opportunity);
        let engagement = EngagementCounts::new(150, 40, 0);

        for text in ["hello there", "lovely weather today", ""] {
            let quiet = engine.classify(&RawPost::new("p", text)).score.value();
            let loud = engine
                .classify(&RawPost::new("p", text).with_engagement(engagement))
                .score
                .value();
            assert_eq!(loud, quiet + 3, "engagement bonus missing for '{}'", text);
        }
    }

    #[test]
    fn test_positive_post_is_not_a_complaint() {
        let record = engine(ScoreMode::Difficulty).classify(&RawPost::new("en-3", "Love the new update, great job"));
        assert_eq!(record.sentiment.label, SentimentLabel::Positive);
        assert!(!record.is_complaint);
    }

    #[test]
    fn test_process_optimization_facets() {
        let engine = ClassificationEngine::with_mode(process_config(), ScoreMode::Opportunity);
        let record = engine.classify(&RawPost::new("zh-2", "银行排队等待太久，每次都要来回跑"));

        assert!(record.is_relevant);
        assert_eq!(record.categories, vec!["efficiency"]);
        assert_eq!(record.facet("business_sector"), Some("financial_services"));
        assert_eq!(record.facet("process_type"), Some("booking_queueing"));
        // intensity "太" +1, frequency "每次" +2
        assert_eq!(record.score, Score::Opportunity(4));
    }

    #[test]
    fn test_compounds_not_split_by_short_sentiment_words() {
        let record = engine(ScoreMode::Difficulty).classify(&RawPost::new("zh-3", "我的信用卡被扣费了"));

        assert_eq!(record.language, Language::Zh);
        assert_eq!(record.sentiment.label, SentimentLabel::Neutral);
        assert_eq!(record.keywords, vec!["信用卡", "扣费"]);

        // 快 alone is positive; inside 快递 it is not
        let record = engine(ScoreMode::Difficulty).classify(&RawPost::new("zh-4", "快递太慢了"));
        assert_eq!(record.sentiment.label, SentimentLabel::Negative);
        assert_eq!(record.sentiment.score, -0.25);
    }

    #[test]
    fn test_opportunity_potential_labels() {
        let engine = ClassificationEngine::with_mode(process_config(), ScoreMode::Opportunity);
        let potential = |text: &str| engine.classify(&RawPost::new("p", text)).optimization_potential;

        assert_eq!(potential("希望银行开户能一键完成"), Some(OptimizationPotential::High));
        assert_eq!(potential("审批流程需要优化"), Some(OptimizationPotential::Medium));
        assert_eq!(potential("排队习惯了"), Some(OptimizationPotential::Low));
        assert_eq!(potential("银行排队等待太久，每次都要来回跑"), Some(OptimizationPotential::High));
        assert_eq!(potential("办理手续需要带身份证"), Some(OptimizationPotential::Medium));

        let difficulty = ClassificationEngine::with_mode(process_config(), ScoreMode::Difficulty);
        assert_eq!(difficulty.classify(&RawPost::new("p", "排队太久")).optimization_potential, None);
    }

    #[test]
    fn test_irrelevant_post_still_classified() {
        let engine = ClassificationEngine::with_mode(process_config(), ScoreMode::Opportunity);
        let record = engine.classify(&RawPost::new("en-4", "What a beautiful sunset"));

        assert!(!record.is_relevant);
        assert_eq!(record.categories, vec!["other"]);
        assert_eq!(record.facet("business_sector"), Some("other"));
        assert_eq!(record.facet("process_type"), Some("other"));
    }
}
