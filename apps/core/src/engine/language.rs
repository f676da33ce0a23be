//! Language detection by character-class counting.
//!
//! No language model is involved: a post is Chinese when CJK ideographs outnumber
//! ASCII letters, English when it has any ASCII letters otherwise, and unknown when
//! it has neither. Deterministic and side-effect free.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Detected language of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Zh,
    En,
    Unknown,
}

impl Language {
    /// Returns the language code
    pub fn code(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
            Language::Unknown => "unknown",
        }
    }

    /// Language whose rules apply downstream. Unknown text is handled with the English rules.
    pub fn ruleset(&self) -> Language {
        match self {
            Language::Zh => Language::Zh,
            Language::En | Language::Unknown => Language::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// True for characters in the CJK Unified Ideographs block.
pub fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Classify a text span as `zh`, `en` or `unknown`.
pub fn detect(text: &str) -> Language {
    let (cjk, ascii) = text.chars().fold((0usize, 0usize), |(cjk, ascii), c| {
        if is_cjk(c) {
            (cjk + 1, ascii)
        } else if c.is_ascii_alphabetic() {
            (cjk, ascii + 1)
        } else {
            (cjk, ascii)
        }
    });

    if cjk > ascii {
        Language::Zh
    } else if ascii > 0 {
        Language::En
    } else {
        Language::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chinese_detection() {
        assert_eq!(detect("这个软件总是崩溃，太慢了"), Language::Zh);
    }

    #[test]
    fn test_english_detection() {
        assert_eq!(detect("This app keeps crashing"), Language::En);
    }

    #[test]
    fn test_mixed_text_majority_wins() {
        // 4 CJK chars vs 3 ASCII letters
        assert_eq!(detect("APP 又崩溃了"), Language::Zh);
        // 2 CJK chars vs 11 ASCII letters
        assert_eq!(detect("WeChat login 失败"), Language::En);
    }

    #[test]
    fn test_tie_goes_to_english() {
        assert_eq!(detect("ab崩溃"), Language::En);
    }

    #[test]
    fn test_unknown_for_empty_and_symbols() {
        assert_eq!(detect(""), Language::Unknown);
        assert_eq!(detect("12345 !!! ???"), Language::Unknown);
        assert_eq!(detect("😡😡😡"), Language::Unknown);
    }

    #[test]
    fn test_unknown_uses_english_rules() {
        assert_eq!(Language::Unknown.ruleset(), Language::En);
        assert_eq!(Language::Zh.ruleset(), Language::Zh);
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::Zh.code(), "zh");
        assert_eq!(Language::En.code(), "en");
        assert_eq!(Language::Unknown.to_string(), "unknown");
    }
}
