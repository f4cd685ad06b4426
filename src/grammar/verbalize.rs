//! 口语化总语法：`tokens { ... }` 序列 → 最终文本

use crate::error::NormalizeResult;
use crate::grammar::{field_content, DateGrammar, Grammar};
use crate::wfst::Fst;

/// 口语化总语法
#[derive(Debug, Clone)]
pub struct VerbalizeGrammar {
    grammar: Grammar,
}

impl VerbalizeGrammar {
    pub fn new(date: &DateGrammar) -> NormalizeResult<Self> {
        let verbalize = field_content("name")?.union(date.fst().clone())?;
        let token = Fst::delete("tokens { ")?
            .concat(verbalize)?
            .concat(Fst::delete(" }")?)?;
        let fst = token
            .clone()
            .concat(Fst::accept(" ")?.concat(token)?.star())?
            .connect()?;

        Ok(Self {
            grammar: Grammar::new("verbalize", fst),
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::OrdinalStem;
    use crate::labels::LabelTable;
    use crate::wfst::DEFAULT_SEARCH_BUDGET;

    fn verbalize(input: &str) -> String {
        let stems = LabelTable::parse("stems", "vier\tvier\n").expect("stems");
        let months = LabelTable::parse("months", "Mai\n").expect("months");
        let date = DateGrammar::new(&OrdinalStem::from_table(&stems).expect("stems"), &months).expect("date");
        VerbalizeGrammar::new(&date)
            .expect("verbalizer")
            .grammar()
            .decode(input, DEFAULT_SEARCH_BUDGET)
            .expect("path")
            .output
    }

    #[test]
    fn test_names_and_dates() {
        assert_eq!(
            verbalize("tokens { name: \"am\" } tokens { date { day: \"vier\" month: \"Mai\" } }"),
            "am vierten Mai"
        );
    }

    #[test]
    fn test_name_content_kept_verbatim() {
        assert_eq!(
            verbalize("tokens { name: \"zum\u{a0}Beispiel\" } tokens { name: \"hier.\" }"),
            "zum\u{a0}Beispiel hier."
        );
    }

    #[test]
    fn test_punctuation_tokens() {
        assert_eq!(
            verbalize("tokens { name: \"Mai\" } tokens { name: \".\" }"),
            "Mai ."
        );
    }
}
