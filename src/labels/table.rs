// 标签表
//
// 制表符分隔的映射表：第一列为书面形式，其余列为一个或多个规范（口语）形式
// 被各个语法共享使用

use std::path::Path;

use crate::error::{NormalizeError, NormalizeResult};
use crate::wfst::Weight;

/// 标签条目
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEntry {
    /// 书面形式（非空）
    pub surface: String,
    /// 规范形式候选，至少一个；空串表示删除
    pub alternatives: Vec<String>,
    /// 条目权重（默认 0）
    pub weight: Weight,
}

impl LabelEntry {
    pub fn new(surface: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            alternatives: vec![canonical.into()],
            weight: 0.0,
        }
    }

    pub fn with_alternatives(surface: impl Into<String>, alternatives: Vec<String>) -> Self {
        Self {
            surface: surface.into(),
            alternatives,
            weight: 0.0,
        }
    }

    /// 首选规范形式
    pub fn canonical(&self) -> &str {
        self.alternatives
            .first()
            .map(String::as_str)
            .unwrap_or(self.surface.as_str())
    }
}

/// 标签表（构造后不可变）
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTable {
    source: String,
    entries: Vec<LabelEntry>,
}

impl LabelTable {
    pub fn new(source: impl Into<String>, entries: Vec<LabelEntry>) -> Self {
        Self {
            source: source.into(),
            entries,
        }
    }

    /// 由内存中的 (书面, 规范) 对构造
    pub fn from_pairs(source: impl Into<String>, pairs: &[(&str, &str)]) -> Self {
        let entries = pairs
            .iter()
            .map(|(surface, canonical)| LabelEntry::new(*surface, *canonical))
            .collect();
        Self::new(source, entries)
    }

    /// 解析 TSV 内容
    ///
    /// - 只有一列的行视为恒等映射
    /// - 空行或第一列为空时报错，错误信息带行号
    pub fn parse(source: &str, content: &str) -> NormalizeResult<Self> {
        let mut entries = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                return Err(NormalizeError::DataLoad {
                    path: source.to_string(),
                    reason: format!("line {}: empty line (no columns)", line_no + 1),
                });
            }

            let mut columns = line.split('\t');
            let surface = columns.next().unwrap_or_default();
            if surface.is_empty() {
                return Err(NormalizeError::DataLoad {
                    path: source.to_string(),
                    reason: format!("line {}: empty surface form", line_no + 1),
                });
            }

            let mut alternatives: Vec<String> = columns.map(str::to_string).collect();
            if alternatives.is_empty() {
                alternatives.push(surface.to_string());
            }
            entries.push(LabelEntry::with_alternatives(surface, alternatives));
        }

        Ok(Self::new(source, entries))
    }

    /// 从文件读取并解析
    pub fn load(path: &Path) -> NormalizeResult<Self> {
        let source = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| NormalizeError::DataLoad {
            path: source.clone(),
            reason: e.to_string(),
        })?;
        Self::parse(&source, &content)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 展开为 (书面, 规范, 权重) 三元组，每个候选一条
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, Weight)> + '_ {
        self.entries.iter().flat_map(|entry| {
            entry
                .alternatives
                .iter()
                .map(move |alt| (entry.surface.as_str(), alt.as_str(), entry.weight))
        })
    }

    /// 所有规范形式（去重，保持首次出现顺序）
    pub fn canonical_forms(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .flat_map(|entry| entry.alternatives.iter().map(String::as_str))
            .filter(|form| seen.insert(*form))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_columns() {
        let table = LabelTable::parse("test", "Dr.\tDoktor\nSt.\tSankt\tStraße\r\nkm\n").expect("parse");
        assert_eq!(table.len(), 3);
        assert_eq!(table.entries()[0], LabelEntry::new("Dr.", "Doktor"));
        assert_eq!(table.entries()[1].alternatives, vec!["Sankt", "Straße"]);
        // 单列：恒等映射
        assert_eq!(table.entries()[2].alternatives, vec!["km"]);
    }

    #[test]
    fn test_parse_deletion_entry() {
        let table = LabelTable::parse("test", "ähm\t\n").expect("parse");
        assert_eq!(table.entries()[0].alternatives, vec![""]);
    }

    #[test]
    fn test_parse_rejects_empty_surface() {
        let err = LabelTable::parse("broken.tsv", "Dr.\tDoktor\n\tnichts\n").unwrap_err();
        match err {
            NormalizeError::DataLoad { path, reason } => {
                assert_eq!(path, "broken.tsv");
                assert!(reason.contains("line 2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_blank_line() {
        let err = LabelTable::parse("gaps.tsv", "Dr.\tDoktor\n\nkm\n").unwrap_err();
        match err {
            NormalizeError::DataLoad { path, reason } => {
                assert_eq!(path, "gaps.tsv");
                assert!(reason.contains("line 2"), "reason: {reason}");
                assert!(reason.contains("empty line"));
            }
            other => panic!("unexpected error: {other}"),
        }
        // 只含空白或 \r 的行同样拒绝
        assert!(LabelTable::parse("crlf.tsv", "Dr.\tDoktor\r\n\r\n").is_err());
        assert!(LabelTable::parse("spaces.tsv", "  \nDr.\tDoktor\n").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let err = LabelTable::load(&temp.path().join("missing.tsv")).unwrap_err();
        assert!(matches!(err, NormalizeError::DataLoad { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("custom.tsv");
        std::fs::write(&path, "Dr.\tdoctor\n").expect("write table");
        let table = LabelTable::load(&path).expect("load");
        assert_eq!(table.entries()[0].canonical(), "doctor");
        assert!(table.source().ends_with("custom.tsv"));
    }

    #[test]
    fn test_pairs_and_canonical_forms() {
        let table = LabelTable::parse("months", "Jan.\tJanuar\n1\tJanuar\nMai\tMai\n").expect("parse");
        let pairs: Vec<_> = table.pairs().collect();
        assert_eq!(pairs[0], ("Jan.", "Januar", 0.0));
        assert_eq!(table.canonical_forms(), vec!["Januar", "Mai"]);
    }
}
