//! 内置标签表
//!
//! 默认使用编译期内嵌的数据；配置了 `data_dir` 时改为从该目录读取同名文件。

use std::path::Path;
use std::sync::Arc;

use crate::error::NormalizeResult;
use crate::labels::cache::LabelCache;
use crate::labels::table::LabelTable;

const EMBEDDED_WHITELIST: &str = include_str!("../../data/whitelist.tsv");
const EMBEDDED_MEASUREMENTS: &str = include_str!("../../data/measure/measurements.tsv");
const EMBEDDED_MONTHS: &str = include_str!("../../data/months/abbr_to_name.tsv");
const EMBEDDED_ORDINAL_STEMS: &str = include_str!("../../data/ordinals/stems.tsv");
const EMBEDDED_DAYS: &str = include_str!("../../data/numbers/days.tsv");

/// 内置标签表
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTable {
    /// 白名单（称谓、缩写）
    Whitelist,
    /// 计量单位缩写
    Measurements,
    /// 月份缩写/全名 → 月份全名
    Months,
    /// 基数词 → 序数词词干
    OrdinalStems,
    /// 日期中的日（数字 → 基数词）
    Days,
}

impl BuiltinTable {
    pub const ALL: [BuiltinTable; 5] = [
        BuiltinTable::Whitelist,
        BuiltinTable::Measurements,
        BuiltinTable::Months,
        BuiltinTable::OrdinalStems,
        BuiltinTable::Days,
    ];

    /// 相对于数据目录的文件名
    pub fn file_name(&self) -> &'static str {
        match self {
            BuiltinTable::Whitelist => "whitelist.tsv",
            BuiltinTable::Measurements => "measure/measurements.tsv",
            BuiltinTable::Months => "months/abbr_to_name.tsv",
            BuiltinTable::OrdinalStems => "ordinals/stems.tsv",
            BuiltinTable::Days => "numbers/days.tsv",
        }
    }

    fn embedded(&self) -> &'static str {
        match self {
            BuiltinTable::Whitelist => EMBEDDED_WHITELIST,
            BuiltinTable::Measurements => EMBEDDED_MEASUREMENTS,
            BuiltinTable::Months => EMBEDDED_MONTHS,
            BuiltinTable::OrdinalStems => EMBEDDED_ORDINAL_STEMS,
            BuiltinTable::Days => EMBEDDED_DAYS,
        }
    }

    /// 加载标签表
    ///
    /// `data_dir` 为 `None` 时使用内嵌数据，否则读取 `data_dir/<file_name>`（文件缺失即报错）。
    pub fn load(&self, data_dir: Option<&Path>, cache: &LabelCache) -> NormalizeResult<Arc<LabelTable>> {
        match data_dir {
            Some(dir) => cache.load_file(&dir.join(self.file_name())),
            None => cache.load_embedded(self.file_name(), self.embedded()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;

    #[test]
    fn test_embedded_tables_parse() {
        let cache = LabelCache::new();
        for table in BuiltinTable::ALL {
            let loaded = table.load(None, &cache).expect("embedded table");
            assert!(!loaded.is_empty(), "{} is empty", table.file_name());
        }
        assert_eq!(cache.len(), BuiltinTable::ALL.len());
    }

    #[test]
    fn test_month_table_has_twelve_names() {
        let cache = LabelCache::new();
        let months = BuiltinTable::Months.load(None, &cache).expect("months");
        assert_eq!(months.canonical_forms().len(), 12);
    }

    #[test]
    fn test_data_dir_override() {
        let temp = tempfile::tempdir().expect("create temp dir");
        std::fs::write(temp.path().join("whitelist.tsv"), "Dr.\tdoctor\n").expect("write table");

        let cache = LabelCache::new();
        let table = BuiltinTable::Whitelist
            .load(Some(temp.path()), &cache)
            .expect("load from data dir");
        assert_eq!(table.entries()[0].canonical(), "doctor");

        let err = BuiltinTable::Months.load(Some(temp.path()), &cache).unwrap_err();
        assert!(matches!(err, NormalizeError::DataLoad { .. }));
    }
}
