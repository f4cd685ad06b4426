//! 日期分类语法
//!
//! `4. Mai 2024` → `date { day: "vier" month: "Mai" year: "2024" }`
//!
//! 日必须带句点；月份可以是全名或缩写，统一为全名；年份为四位数字，可省略。

use crate::error::NormalizeResult;
use crate::grammar::{transducer_from_table, wrap_field, Grammar};
use crate::labels::LabelTable;
use crate::wfst::{ByteClass, Fst};

/// 日期分类语法
#[derive(Debug, Clone)]
pub struct DateTagger {
    grammar: Grammar,
}

impl DateTagger {
    /// `days`: 日数字 → 基数词；`months`: 月份写法 → 全名
    pub fn new(days: &LabelTable, months: &LabelTable) -> NormalizeResult<Self> {
        let day = wrap_field("day", transducer_from_table(days)?)?.concat(Fst::delete(".")?)?;
        let month = wrap_field("month", transducer_from_table(months)?)?;
        let digit = || Fst::class(ByteClass::digit());
        let year = wrap_field(
            "year",
            digit()?.concat(digit()?)?.concat(digit()?)?.concat(digit()?)?,
        )?;

        let fields = day
            .concat(Fst::accept(" ")?)?
            .concat(month)?
            .concat(Fst::accept(" ")?.concat(year)?.optional()?)?;

        let fst = Fst::insert("date { ")?
            .concat(fields)?
            .concat(Fst::insert(" }")?)?
            .connect()?;
        Ok(Self {
            grammar: Grammar::new("date_tagger", fst),
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn fst(&self) -> &Fst {
        self.grammar.fst()
    }
}
