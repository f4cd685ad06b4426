//! 预处理 / 后处理改写规则
//!
//! 每条规则是一个 (正则, 替换) 对，按顺序执行；单条规则重复应用直到文本不再变化。

use regex::Regex;

use crate::config::{RuleConfig, RuleSpec};
use crate::error::{NormalizeError, NormalizeResult};

/// 单条规则的最大重复次数
const MAX_PASSES: usize = 16;

const QUOTES: &str = r#"["„“”«»‹›]"#;
const DASHES: &str = r"\s*[-‐‑‒–—―]+\s*";
const SPACES: &str = r" {2,}";
const THOUSANDS: &str = r"(\d)\.(\d{3})\b";
const SPACE_BEFORE_PUNCT: &str = r" ([.,?!])";

/// 改写规则
#[derive(Debug, Clone)]
pub struct RewriteRule {
    name: String,
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    pub fn new(name: &str, pattern: &str, replacement: &str) -> NormalizeResult<Self> {
        let pattern = Regex::new(pattern).map_err(|e| NormalizeError::InvalidRule {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name: name.to_string(),
            pattern,
            replacement: replacement.to_string(),
        })
    }

    pub fn from_spec(spec: &RuleSpec) -> NormalizeResult<Self> {
        Self::new(&spec.name, &spec.pattern, &spec.replacement)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        for _ in 0..MAX_PASSES {
            let next = self
                .pattern
                .replace_all(&current, self.replacement.as_str())
                .into_owned();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

/// 有序规则列表
#[derive(Debug, Clone, Default)]
pub struct RewriteRules {
    rules: Vec<RewriteRule>,
}

impl RewriteRules {
    pub fn new(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    /// 预处理规则：引号、破折号、空格、千位分隔点，再接用户规则
    pub fn pre(config: &RuleConfig) -> NormalizeResult<Self> {
        let mut rules = Vec::new();
        if config.strip_quotes {
            rules.push(RewriteRule::new("strip_quotes", QUOTES, "")?);
        }
        if config.collapse_dashes {
            rules.push(RewriteRule::new("collapse_dashes", DASHES, " ")?);
        }
        if config.collapse_spaces {
            rules.push(RewriteRule::new("collapse_spaces", SPACES, " ")?);
        }
        if config.thousands_separator {
            rules.push(RewriteRule::new("thousands_separator", THOUSANDS, "${1}${2}")?);
        }
        for spec in &config.extra_pre {
            rules.push(RewriteRule::from_spec(spec)?);
        }
        Ok(Self { rules })
    }

    /// 后处理规则：删除标点前的空格，再接用户规则
    ///
    /// 首字母大写不是正则规则，见 [`capitalize_first`]。
    pub fn post(config: &RuleConfig) -> NormalizeResult<Self> {
        let mut rules = vec![RewriteRule::new("space_before_punct", SPACE_BEFORE_PUNCT, "${1}")?];
        for spec in &config.extra_post {
            rules.push(RewriteRule::from_spec(spec)?);
        }
        Ok(Self { rules })
    }

    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(RewriteRule::name).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// 首字符大写
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pre() -> RewriteRules {
        RewriteRules::pre(&RuleConfig::default()).expect("builtin rules")
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(pre().apply("230.000"), "230000");
        assert_eq!(pre().apply("23.000 m"), "23000 m");
        assert_eq!(pre().apply("1.234.567 Euro"), "1234567 Euro");
        assert_eq!(pre().apply("1.2345"), "1.2345");
        assert_eq!(pre().apply("am 4. Mai"), "am 4. Mai");
    }

    #[test]
    fn test_thousands_separator_can_be_disabled() {
        let config = RuleConfig {
            thousands_separator: false,
            ..RuleConfig::default()
        };
        let rules = RewriteRules::pre(&config).expect("rules");
        assert_eq!(rules.apply("Version 2.000"), "Version 2.000");
        assert!(!rules.names().contains(&"thousands_separator"));
    }

    #[test]
    fn test_quotes_dashes_spaces() {
        assert_eq!(pre().apply("„Hallo“ sagte er"), "Hallo sagte er");
        assert_eq!(pre().apply("Berlin – Hamburg"), "Berlin Hamburg");
        assert_eq!(pre().apply("E-Mail"), "E Mail");
        assert_eq!(pre().apply("a   b"), "a b");
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            pre().names(),
            vec!["strip_quotes", "collapse_dashes", "collapse_spaces", "thousands_separator"]
        );
    }

    #[test]
    fn test_post_rules() {
        let post = RewriteRules::post(&RuleConfig::default()).expect("rules");
        assert_eq!(post.apply("Büro der e u ."), "Büro der e u.");
        assert_eq!(post.apply("ja , nein ? doch !"), "ja, nein? doch!");
    }

    #[test]
    fn test_extra_rules_appended() {
        let config = RuleConfig {
            extra_pre: vec![RuleSpec {
                name: "ampersand".to_string(),
                pattern: "&".to_string(),
                replacement: " und ".to_string(),
            }],
            ..RuleConfig::default()
        };
        let rules = RewriteRules::pre(&config).expect("rules");
        assert_eq!(rules.names().last(), Some(&"ampersand"));
        assert_eq!(rules.apply("A&B"), "A und B");
    }

    #[test]
    fn test_invalid_rule_reports_name() {
        let err = RewriteRule::new("broken", "(", "").unwrap_err();
        match err {
            NormalizeError::InvalidRule { name, .. } => assert_eq!(name, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("doktor Hunt"), "Doktor Hunt");
        assert_eq!(capitalize_first("ß"), "SS");
        assert_eq!(capitalize_first("über"), "Über");
        assert_eq!(capitalize_first(""), "");
    }
}
