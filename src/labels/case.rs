//! 大小写变体展开
//!
//! 从同一张标签表派生小写或大写变体，不需要重复维护数据。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::labels::table::{LabelEntry, LabelTable};

/// 大小写模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    /// 保持原样
    #[default]
    #[serde(alias = "cased")]
    AsIs,
    /// 书面形式转小写
    #[serde(alias = "lower_cased")]
    Lower,
    /// 规范形式转大写，书面形式不变
    ///
    /// 与 `Lower` 不对称（一个改书面形式，一个改规范形式），配置校验时会给出警告。
    #[serde(alias = "caps")]
    UpperCanonical,
}

impl CaseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseMode::AsIs => "as_is",
            CaseMode::Lower => "lower",
            CaseMode::UpperCanonical => "upper_canonical",
        }
    }
}

impl fmt::Display for CaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "as_is" | "cased" => Ok(CaseMode::AsIs),
            "lower" | "lower_cased" => Ok(CaseMode::Lower),
            "upper_canonical" | "caps" => Ok(CaseMode::UpperCanonical),
            other => Err(format!("unknown case mode: {}", other)),
        }
    }
}

/// 按模式展开标签表（纯函数）
pub fn expand_case(table: &LabelTable, mode: CaseMode) -> LabelTable {
    let entries = table
        .entries()
        .iter()
        .map(|entry| match mode {
            CaseMode::AsIs => entry.clone(),
            CaseMode::Lower => LabelEntry {
                surface: entry.surface.to_lowercase(),
                ..entry.clone()
            },
            CaseMode::UpperCanonical => LabelEntry {
                alternatives: entry.alternatives.iter().map(|alt| alt.to_uppercase()).collect(),
                ..entry.clone()
            },
        })
        .collect();
    LabelTable::new(table.source(), entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LabelTable {
        LabelTable::parse("sample", "Dr.\tDoktor\nEU\te u\nSt.\tSankt\tStraße\n").expect("parse")
    }

    #[test]
    fn test_lower_changes_surface_only() {
        let lower = expand_case(&sample(), CaseMode::Lower);
        assert_eq!(lower.entries()[0].surface, "dr.");
        assert_eq!(lower.entries()[0].alternatives, vec!["Doktor"]);
        assert_eq!(lower.entries()[1].surface, "eu");
    }

    #[test]
    fn test_upper_canonical_changes_alternatives_only() {
        let caps = expand_case(&sample(), CaseMode::UpperCanonical);
        assert_eq!(caps.entries()[0].surface, "Dr.");
        assert_eq!(caps.entries()[0].alternatives, vec!["DOKTOR"]);
        assert_eq!(caps.entries()[2].alternatives, vec!["SANKT", "STRASSE"]);
    }

    #[test]
    fn test_expansion_is_idempotent() {
        for mode in [CaseMode::AsIs, CaseMode::Lower, CaseMode::UpperCanonical] {
            let once = expand_case(&sample(), mode);
            let twice = expand_case(&once, mode);
            assert_eq!(once, twice, "mode {}", mode);
        }
    }

    #[test]
    fn test_parse_case_mode_aliases() {
        assert_eq!("cased".parse::<CaseMode>(), Ok(CaseMode::AsIs));
        assert_eq!("lower_cased".parse::<CaseMode>(), Ok(CaseMode::Lower));
        assert_eq!("caps".parse::<CaseMode>(), Ok(CaseMode::UpperCanonical));
        assert_eq!("upper-canonical".parse::<CaseMode>(), Ok(CaseMode::UpperCanonical));
        assert!("title".parse::<CaseMode>().is_err());
    }

    #[test]
    fn test_serde_aliases() {
        let mode: CaseMode = serde_json::from_str("\"caps\"").expect("deserialize");
        assert_eq!(mode, CaseMode::UpperCanonical);
        assert_eq!(serde_json::to_string(&CaseMode::Lower).expect("serialize"), "\"lower\"");
    }
}
