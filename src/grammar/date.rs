//! 日期口语化语法
//!
//! `date { day: "vier" month: "Mai" year: "2024" }` → `vierten Mai 2024`
//!
//! 支持的字段组合：日 月 [年]、月 年、年。

use crate::error::NormalizeResult;
use crate::grammar::{
    acceptor_from_forms, delete_preserve_order, delete_tokens, extract_field, field_content,
    insert_one_of, Grammar, OrdinalStem,
};
use crate::labels::LabelTable;
use crate::wfst::{Fst, Weight};

/// 日的序数后缀及权重（`ten` 优先）
pub const DAY_SUFFIXES: [(&str, Weight); 2] = [("ten", 0.1), ("te", 0.11)];

/// 数字月份的序数后缀
pub const MONTH_SUFFIX: &str = "ter";

/// 日期口语化语法
#[derive(Debug, Clone)]
pub struct DateGrammar {
    fields: Fst,
    grammar: Grammar,
}

impl DateGrammar {
    /// `months` 为月份表，其规范形式即合法的月份全名
    pub fn new(ordinal: &OrdinalStem, months: &LabelTable) -> NormalizeResult<Self> {
        let day = ordinal.rewrite_at_end(insert_one_of(&DAY_SUFFIXES)?)?;

        // 月份全名原样保留，其余内容按序数改写
        let names = months.canonical_forms();
        let month = acceptor_from_forms(&names)?.union(
            Fst::any_string_except(names.iter().copied())?
                .compose(&ordinal.rewrite_at_end(Fst::insert(MONTH_SUFFIX)?)?)?,
        )?;

        let day = extract_field("day", &day)?;
        let month = extract_field("month", &month)?;
        let year = field_content("year")?;
        let space = || Fst::accept(" ");

        let day_month_year = day
            .concat(space()?)?
            .concat(month.clone())?
            .concat(space()?.concat(year.clone())?.optional()?)?;
        let month_year = month.concat(space()?)?.concat(year.clone())?;
        let graph = day_month_year.union(month_year)?.union(year)?;

        let fields = graph.concat(delete_preserve_order()?)?.connect()?;
        let fst = delete_tokens("date", fields.clone())?;
        Ok(Self {
            fields,
            grammar: Grammar::new("date", fst),
        })
    }

    /// 不带 `date { }` 包装的字段转换器
    pub fn fields(&self) -> &Fst {
        &self.fields
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn fst(&self) -> &Fst {
        self.grammar.fst()
    }
}
