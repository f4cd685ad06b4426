//! 序数词尾改写
//!
//! 基数词末尾换成序数词干后接后缀：`drei` + `ten` → `dritten`。
//! 末尾不是已知基数词时直接接后缀，但带惩罚权重，保证已知词干总是优先。

use crate::error::NormalizeResult;
use crate::grammar::transducer_from_table;
use crate::labels::LabelTable;
use crate::wfst::{ByteClass, Fst, Weight};

/// 未匹配词干时的惩罚
pub const STEMLESS_PENALTY: Weight = 0.1;

/// 序数词干转换器
#[derive(Debug, Clone)]
pub struct OrdinalStem {
    stems: Fst,
}

impl OrdinalStem {
    pub fn from_table(table: &LabelTable) -> NormalizeResult<Self> {
        Ok(Self {
            stems: transducer_from_table(table)?,
        })
    }

    /// 任意前缀 + (词干 | ε) + `suffix`
    pub fn rewrite_at_end(&self, suffix: Fst) -> NormalizeResult<Fst> {
        let prefix = Fst::class(ByteClass::not_quote())?.star();
        let stem = self
            .stems
            .clone()
            .union_weighted(Fst::epsilon()?, STEMLESS_PENALTY)?;
        prefix.concat(stem)?.concat(suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wfst::{shortest_path, DEFAULT_SEARCH_BUDGET};

    fn stems() -> OrdinalStem {
        let table = LabelTable::parse("stems", "eins\ters\ndrei\tdrit\nvier\tvier\nzwanzig\tzwanzigs\n")
            .expect("parse");
        OrdinalStem::from_table(&table).expect("stems")
    }

    fn rewrite(suffix: &str) -> Fst {
        stems()
            .rewrite_at_end(Fst::insert(suffix).expect("suffix"))
            .expect("rewrite")
    }

    fn run(fst: &Fst, input: &str) -> String {
        shortest_path(fst, input, DEFAULT_SEARCH_BUDGET)
            .expect("path")
            .output
    }

    #[test]
    fn test_known_stem_rewritten() {
        let fst = rewrite("ten");
        assert_eq!(run(&fst, "drei"), "dritten");
        assert_eq!(run(&fst, "eins"), "ersten");
        assert_eq!(run(&fst, "vier"), "vierten");
    }

    #[test]
    fn test_stem_only_rewritten_at_end() {
        let fst = rewrite("ten");
        assert_eq!(run(&fst, "ein und zwanzig"), "ein und zwanzigsten");
        assert_eq!(run(&fst, "dreizehn"), "dreizehnten");
    }

    #[test]
    fn test_unknown_word_gets_suffix_with_penalty() {
        let fst = rewrite("ter");
        let path = shortest_path(&fst, "03", DEFAULT_SEARCH_BUDGET).expect("path");
        assert_eq!(path.output, "03ter");
        assert!((path.weight - STEMLESS_PENALTY).abs() < 1e-6);
    }
}
