//! 最短路径解码
//!
//! 输入串先转成线性接受器，与转换器复合得到解码格，再由 `rustfst` 求最短路径。
//! n-best 在输出投影上去 ε、确定化之后再取 n 条，每个输出串只出现一次。

use rustfst::algorithms::compose::compose;
use rustfst::algorithms::determinize::determinize;
use rustfst::algorithms::rm_epsilon::rm_epsilon;
use rustfst::prelude::{
    connect, project, shortest_path_with_config, tr_sort, CoreFst, ExpandedFst, ILabelCompare,
    OLabelCompare, ProjectType, Semiring, ShortestPathConfig, TropicalWeight,
};
use rustfst::prelude::Fst as _;
use rustfst::utils::acceptor;

use crate::error::{NormalizeError, NormalizeResult};
use crate::wfst::class::{labels_text, text_labels};
use crate::wfst::fst::{Fst, StdFst, Weight};

/// 解码格允许的最大状态数
pub const DEFAULT_SEARCH_BUDGET: usize = 200_000;

/// 解码得到的路径
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub output: String,
    pub weight: Weight,
}

/// 线性输入 ∘ 转换器，修剪后的解码格
///
/// 状态数超过 `budget` 时返回 `SearchBudgetExceeded`，语言为空时返回 `NoAcceptingPath`。
fn lattice(fst: &Fst, input: &str, budget: usize) -> NormalizeResult<StdFst> {
    let labels = text_labels(input);
    let mut linear: StdFst = acceptor(&labels, TropicalWeight::one());
    tr_sort(&mut linear, OLabelCompare {});
    let mut grammar = fst.inner.clone();
    tr_sort(&mut grammar, ILabelCompare {});

    let mut lattice: StdFst = compose(linear, grammar)?;
    if lattice.num_states() > budget {
        return Err(NormalizeError::SearchBudgetExceeded { budget });
    }
    connect(&mut lattice)?;
    if lattice.start().is_none() {
        return Err(NormalizeError::NoAcceptingPath {
            input: input.to_string(),
        });
    }
    Ok(lattice)
}

/// 取最多 `n` 条最短路径，按权重升序
fn best_paths(lattice: &StdFst, n: usize) -> NormalizeResult<Vec<Path>> {
    let config = ShortestPathConfig::default().with_nshortest(n);
    let best: StdFst = shortest_path_with_config(lattice, config)?;
    let mut paths: Vec<Path> = best
        .paths_iter()
        .map(|path| Path {
            output: labels_text(&path.olabels),
            weight: *path.weight.value(),
        })
        .collect();
    // 稳定排序，等权时保持 rustfst 给出的顺序
    paths.sort_by(|a, b| a.weight.total_cmp(&b.weight));
    Ok(paths)
}

/// 求最小权重接受路径
///
/// 输入不在转换器语言内时返回 `NoAcceptingPath`，不做原样透传。
pub fn shortest_path(fst: &Fst, input: &str, budget: usize) -> NormalizeResult<Path> {
    let lattice = lattice(fst, input, budget)?;
    best_paths(&lattice, 1)?
        .into_iter()
        .next()
        .ok_or_else(|| NormalizeError::NoAcceptingPath {
            input: input.to_string(),
        })
}

/// 求权重最小的 `n` 个不同输出，按权重升序
///
/// 同一输出的多条路径在确定化时合并为一条，取其中最小的权重。
pub fn n_shortest(fst: &Fst, input: &str, n: usize, budget: usize) -> NormalizeResult<Vec<Path>> {
    if n == 0 {
        return Ok(Vec::new());
    }
    let mut lattice = lattice(fst, input, budget)?;
    project(&mut lattice, ProjectType::ProjectOutput);
    rm_epsilon(&mut lattice)?;
    let outputs: StdFst = determinize(&lattice)?;

    let paths = best_paths(&outputs, n)?;
    if paths.is_empty() {
        return Err(NormalizeError::NoAcceptingPath {
            input: input.to_string(),
        });
    }
    Ok(paths)
}
