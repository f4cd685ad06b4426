//! 分类总语法
//!
//! 以空格分隔的每个词元（或多词片段）被包装为 `tokens { ... }`：
//! 白名单 > 日期 > 原样保留的单词，由权重决定优先级。
//! 紧跟在词元后的标点拆成独立的 `tokens { name: "." }`，前面插入空格，
//! 由后处理规则再删掉。

use crate::error::NormalizeResult;
use crate::grammar::{wrap_field, DateTagger, Grammar, WhitelistGrammar};
use crate::wfst::{ByteClass, Fst, Weight};

pub const WHITELIST_WEIGHT: Weight = 1.01;
pub const DATE_WEIGHT: Weight = 1.1;
pub const PUNCT_WEIGHT: Weight = 2.1;
/// 原样保留单词的权重，远高于其他类别
pub const WORD_WEIGHT: Weight = 100.0;

/// 拆成独立词元的标点
pub const PUNCTUATION: &str = ".,?!";

/// 分类总语法
#[derive(Debug, Clone)]
pub struct ClassifyGrammar {
    grammar: Grammar,
}

impl ClassifyGrammar {
    pub fn new(whitelist: &WhitelistGrammar, date: &DateTagger) -> NormalizeResult<Self> {
        let word = wrap_field("name", Fst::class(ByteClass::not_space())?.plus())?;

        let classify = whitelist
            .fst()
            .clone()
            .add_weight(WHITELIST_WEIGHT)?
            .union(date.fst().clone().add_weight(DATE_WEIGHT)?)?
            .union(word.add_weight(WORD_WEIGHT)?)?;
        let token = Self::tokens(classify)?;

        let punct_mark = Fst::class(ByteClass::one_of(PUNCTUATION.bytes()))?;
        let punct = Self::tokens(wrap_field("name", punct_mark)?.add_weight(PUNCT_WEIGHT)?)?;

        // 词元（或单独的标点）后可以紧跟若干标点
        let token_plus_punct = token
            .union(punct.clone())?
            .concat(Fst::insert(" ")?.concat(punct)?.star())?;

        let fst = token_plus_punct
            .clone()
            .concat(Fst::accept(" ")?.concat(token_plus_punct)?.star())?
            .connect()?;

        Ok(Self {
            grammar: Grammar::new("classify", fst),
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    fn tokens(fst: Fst) -> NormalizeResult<Fst> {
        Fst::insert("tokens { ")?
            .concat(fst)?
            .concat(Fst::insert(" }")?)
    }
}
