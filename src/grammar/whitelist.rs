//! 白名单分类语法
//!
//! 称谓、缩写等固定写法直接映射为口语形式，输出 `name: "<口语>"`。

use crate::error::NormalizeResult;
use crate::grammar::{convert_space, transducer_from_table, wrap_field, Grammar};
use crate::labels::{expand_case, CaseMode, LabelTable};
use crate::wfst::{Fst, Weight};

/// 小写变体相对主表的附加权重
pub const LOWER_CASE_PENALTY: Weight = 0.0001;

/// 白名单语法的输入表
#[derive(Debug, Clone, Copy)]
pub struct WhitelistTables<'a> {
    /// 内置白名单
    pub builtin: &'a LabelTable,
    /// 计量单位缩写（仅非确定模式使用）
    pub measurements: Option<&'a LabelTable>,
    /// 用户自定义白名单
    pub custom: Option<&'a LabelTable>,
}

/// 白名单分类语法
#[derive(Debug, Clone)]
pub struct WhitelistGrammar {
    grammar: Grammar,
}

impl WhitelistGrammar {
    pub fn new(tables: WhitelistTables<'_>, case_mode: CaseMode, deterministic: bool) -> NormalizeResult<Self> {
        // 自定义表和计量单位表只按请求的大小写模式展开，不并入小写变体
        let at_case = |table: &LabelTable| Self::table_fst(&expand_case(table, case_mode), deterministic);

        let graph = match tables.custom {
            // 确定模式下自定义表完全替换内置数据
            Some(custom) if deterministic => at_case(custom)?,
            custom => {
                let mut graph = Self::cased(tables.builtin, case_mode, deterministic)?;
                if let Some(custom) = custom {
                    graph = graph.union(at_case(custom)?)?;
                }
                if !deterministic {
                    match tables.measurements {
                        Some(measurements) => graph = graph.union(at_case(measurements)?)?,
                        None => tracing::debug!("未提供计量单位表，跳过"),
                    }
                }
                graph
            }
        };

        let fst = wrap_field("name", convert_space(&graph)?)?;
        Ok(Self {
            grammar: Grammar::new("whitelist", fst),
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn fst(&self) -> &Fst {
        self.grammar.fst()
    }

    /// 按大小写模式展开；非确定模式下额外并入小写变体（略低优先）
    fn cased(table: &LabelTable, case_mode: CaseMode, deterministic: bool) -> NormalizeResult<Fst> {
        let base = Self::table_fst(&expand_case(table, case_mode), deterministic)?;
        if deterministic || case_mode == CaseMode::Lower {
            return Ok(base);
        }
        let lower = Self::table_fst(&expand_case(table, CaseMode::Lower), deterministic)?;
        base.union_weighted(lower, LOWER_CASE_PENALTY)
    }

    /// 确定模式只保留首选规范形式
    fn table_fst(table: &LabelTable, deterministic: bool) -> NormalizeResult<Fst> {
        if deterministic {
            Fst::string_map(
                table
                    .entries()
                    .iter()
                    .map(|entry| (entry.surface.as_str(), entry.canonical(), entry.weight)),
            )
        } else {
            transducer_from_table(table)
        }
    }
}
