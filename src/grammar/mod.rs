//! 规范化语法
//!
//! 分类语法（classify）把原始词元标注为带字段的中间文本，
//! 口语化语法（verbalize）把字段还原为最终读法。
//!
//! 中间文本格式：`tokens { name: "doctor" } tokens { date { day: "zehn" month: "März" } }`

mod classify;
mod date;
mod date_tagger;
mod ordinal;
mod verbalize;
mod whitelist;

pub use classify::{ClassifyGrammar, DATE_WEIGHT, PUNCTUATION, PUNCT_WEIGHT, WHITELIST_WEIGHT, WORD_WEIGHT};
pub use date::{DateGrammar, DAY_SUFFIXES, MONTH_SUFFIX};
pub use date_tagger::DateTagger;
pub use ordinal::{OrdinalStem, STEMLESS_PENALTY};
pub use verbalize::VerbalizeGrammar;
pub use whitelist::{WhitelistGrammar, WhitelistTables, LOWER_CASE_PENALTY};

use crate::error::NormalizeResult;
use crate::labels::LabelTable;
use crate::wfst::{n_shortest, shortest_path, ByteClass, Fst, Path, Weight};

/// 引号字段内部空格的替代标记，最终输出时还原
pub const SPACE_MARKER: char = '\u{00A0}';

/// 命名语法：一个构造完成、只读的转换器
#[derive(Debug, Clone)]
pub struct Grammar {
    name: &'static str,
    fst: Fst,
}

impl Grammar {
    pub fn new(name: &'static str, fst: Fst) -> Self {
        tracing::debug!(
            "语法 {} 构造完成: {} 个状态, {} 条弧",
            name,
            fst.num_states(),
            fst.num_trs()
        );
        Self { name, fst }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fst(&self) -> &Fst {
        &self.fst
    }

    /// 最短路径解码
    pub fn decode(&self, input: &str, budget: usize) -> NormalizeResult<Path> {
        shortest_path(&self.fst, input, budget)
    }

    /// 最多 `n` 个不同输出，按权重升序
    pub fn alternatives(&self, input: &str, n: usize, budget: usize) -> NormalizeResult<Vec<Path>> {
        n_shortest(&self.fst, input, n, budget)
    }
}

// ============================================================================
// 构造辅助
// ============================================================================

/// 由标签表构造转换器（每个候选一条并行路径）
pub fn transducer_from_table(table: &LabelTable) -> NormalizeResult<Fst> {
    Fst::string_map(table.pairs())
}

/// 由标签表的规范形式构造恒等接受器
pub fn acceptor_from_forms(forms: &[&str]) -> NormalizeResult<Fst> {
    Fst::string_map(forms.iter().map(|form| (*form, *form, 0.0)))
}

/// 一个或多个非引号字符
pub fn not_quote_plus() -> NormalizeResult<Fst> {
    Ok(Fst::class(ByteClass::not_quote())?.plus())
}

/// 删除零个或多个空格
pub fn delete_space() -> NormalizeResult<Fst> {
    Ok(Fst::delete(" ")?.star())
}

/// 多个插入候选，各带权重
pub fn insert_one_of(candidates: &[(&str, Weight)]) -> NormalizeResult<Fst> {
    let mut graph = Fst::empty()?;
    for (text, weight) in candidates {
        graph = graph.union(Fst::insert(text)?.add_weight(*weight)?)?;
    }
    Ok(graph)
}

/// 把输出包装为 `name: "<...>"`
pub fn wrap_field(name: &str, fst: Fst) -> NormalizeResult<Fst> {
    Fst::insert(&format!("{}: \"", name))?
        .concat(fst)?
        .concat(Fst::insert("\"")?)
}

/// 删除前后缀字面量，并对其间的内容（非引号字符）应用 `inner`
pub fn extract_between(prefix: &str, suffix: &str, inner: &Fst) -> NormalizeResult<Fst> {
    Fst::delete(prefix)?
        .concat(not_quote_plus()?.compose(inner)?)?
        .concat(Fst::delete(suffix)?)
}

/// `name: "<内容>"` → `inner(内容)`
pub fn extract_field(name: &str, inner: &Fst) -> NormalizeResult<Fst> {
    extract_between(&format!("{}: \"", name), "\"", inner)
}

/// `name: "<内容>"` → `内容`
pub fn field_content(name: &str) -> NormalizeResult<Fst> {
    Fst::delete(&format!("{}: \"", name))?
        .concat(not_quote_plus()?)?
        .concat(Fst::delete("\"")?)
}

/// 删除 `name { ... }` 外层包装
pub fn delete_tokens(name: &str, fst: Fst) -> NormalizeResult<Fst> {
    Fst::delete(name)?
        .concat(delete_space()?)?
        .concat(Fst::delete("{")?)?
        .concat(delete_space()?)?
        .concat(fst)?
        .concat(delete_space()?)?
        .concat(Fst::delete("}")?)
}

/// 删除可选的保序标记
pub fn delete_preserve_order() -> NormalizeResult<Fst> {
    Fst::delete(" preserve_order: true")?.optional()
}

/// 输出中的空格替换为 `SPACE_MARKER`
pub fn convert_space(fst: &Fst) -> NormalizeResult<Fst> {
    let keep = Fst::class(ByteClass::any_except([b' ']))?;
    let mark = Fst::cross(" ", &SPACE_MARKER.to_string(), 0.0)?;
    fst.compose(&keep.union(mark)?.star())
}

/// 还原 `SPACE_MARKER`
pub fn restore_spaces(text: &str) -> String {
    text.replace(SPACE_MARKER, " ")
}
