//! 加权有限状态转换器
//!
//! 底层使用 `rustfst` 的 `VectorFst<TropicalWeight>`：路径权重为弧权重之和，
//! 权重越小越优先。这里只提供按字节标签构造语法所需的薄封装，
//! 并、串接、闭包都交给 `rustfst` 的算法完成。

use std::collections::BTreeMap;

use rustfst::algorithms::closure::{closure, ClosureType};
use rustfst::algorithms::concat::concat;
use rustfst::algorithms::union::union;
use rustfst::prelude::{CoreFst, ExpandedFst, MutableFst, Semiring, Tr, TropicalWeight, VectorFst};
use rustfst::{Label, StateId, EPS_LABEL};

use crate::error::NormalizeResult;
use crate::wfst::class::{byte_label, ByteClass};

pub type Weight = f32;
pub type StdFst = VectorFst<TropicalWeight>;

/// 加权转换器
///
/// 构造操作均按值消费 `self` 并返回新的转换器，便于链式组合：
/// `Fst::delete("day: \"")?.concat(content)?.concat(Fst::delete("\"")?)`
#[derive(Debug, Clone)]
pub struct Fst {
    pub(crate) inner: StdFst,
}

impl Fst {
    /// 空语言（只有一个非接受的起始状态）
    pub fn empty() -> NormalizeResult<Self> {
        let mut fst = StdFst::new();
        let start = fst.add_state();
        fst.set_start(start)?;
        Ok(Self { inner: fst })
    }

    /// 只接受空串
    pub fn epsilon() -> NormalizeResult<Self> {
        Self::chain(Vec::new(), 0.0)
    }

    pub fn num_states(&self) -> usize {
        self.inner.num_states()
    }

    pub fn num_trs(&self) -> usize {
        (0..self.inner.num_states())
            .filter_map(|s| self.inner.num_trs(s as StateId).ok())
            .sum()
    }

    // ------------------------------------------------------------------
    // 基本构造
    // ------------------------------------------------------------------

    /// 依次读入 `pairs` 中的 (输入, 输出) 标签，形成一条链
    fn chain(pairs: Vec<(Label, Label)>, weight: Weight) -> NormalizeResult<Self> {
        let mut fst = StdFst::new();
        let start = fst.add_state();
        fst.set_start(start)?;
        let end = add_chain(&mut fst, start, pairs)?;
        fst.set_final(end, TropicalWeight::new(weight.max(0.0)))?;
        Ok(Self { inner: fst })
    }

    /// 恒等接受 `text`
    pub fn accept(text: &str) -> NormalizeResult<Self> {
        Self::cross(text, text, 0.0)
    }

    /// 不读输入，插入 `text`
    pub fn insert(text: &str) -> NormalizeResult<Self> {
        Self::cross("", text, 0.0)
    }

    /// 读入 `text`，不产生输出
    pub fn delete(text: &str) -> NormalizeResult<Self> {
        Self::cross(text, "", 0.0)
    }

    /// 读入 `input` 输出 `output`，长度不等时以 ε 补齐
    pub fn cross(input: &str, output: &str, weight: Weight) -> NormalizeResult<Self> {
        Self::chain(aligned_labels(input, output), weight)
    }

    /// 读入一个属于 `class` 的字节并原样输出
    pub fn class(class: ByteClass) -> NormalizeResult<Self> {
        let mut fst = StdFst::new();
        let start = fst.add_state();
        let end = fst.add_state();
        fst.set_start(start)?;
        fst.set_final(end, TropicalWeight::one())?;
        for byte in class.bytes() {
            let label = byte_label(byte);
            fst.add_tr(start, Tr::new(label, label, TropicalWeight::one(), end))?;
        }
        Ok(Self { inner: fst })
    }

    /// 由 (输入, 输出, 权重) 列表构造并集转换器
    ///
    /// 每个条目是从起始状态出发的一条独立链；相同输入的不同输出保留为并行路径。
    pub fn string_map<'a, I>(entries: I) -> NormalizeResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str, Weight)>,
    {
        let mut fst = StdFst::new();
        let start = fst.add_state();
        fst.set_start(start)?;
        for (input, output, weight) in entries {
            let end = add_chain(&mut fst, start, aligned_labels(input, output))?;
            // 空映射落在起始状态上，取较小的终止权重
            let weight = weight.max(0.0);
            let weight = match fst.final_weight(end)? {
                Some(existing) => existing.value().min(weight),
                None => weight,
            };
            fst.set_final(end, TropicalWeight::new(weight))?;
        }
        Ok(Self { inner: fst })
    }

    /// 接受除 `words` 之外的任意字符串（Σ* − words），输出等于输入
    ///
    /// 由 `words` 的字节前缀树补全得到：每个节点对非子节点字节跳到吸收态，
    /// 词尾节点不接受。
    pub fn any_string_except<'a>(words: impl IntoIterator<Item = &'a str>) -> NormalizeResult<Self> {
        let mut children: Vec<BTreeMap<u8, usize>> = vec![BTreeMap::new()];
        let mut terminal = vec![false];
        for word in words {
            let mut node = 0;
            for byte in word.bytes() {
                node = match children[node].get(&byte) {
                    Some(&child) => child,
                    None => {
                        children.push(BTreeMap::new());
                        terminal.push(false);
                        let child = children.len() - 1;
                        children[node].insert(byte, child);
                        child
                    }
                };
            }
            terminal[node] = true;
        }

        let mut fst = StdFst::new();
        let states: Vec<StateId> = children.iter().map(|_| fst.add_state()).collect();
        let sink = fst.add_state();
        fst.set_start(states[0])?;
        fst.set_final(sink, TropicalWeight::one())?;
        for byte in ByteClass::Any.bytes() {
            let label = byte_label(byte);
            fst.add_tr(sink, Tr::new(label, label, TropicalWeight::one(), sink))?;
        }

        for (node, kids) in children.iter().enumerate() {
            let from = states[node];
            for byte in ByteClass::Any.bytes() {
                let label = byte_label(byte);
                let to = kids.get(&byte).map_or(sink, |&child| states[child]);
                fst.add_tr(from, Tr::new(label, label, TropicalWeight::one(), to))?;
            }
            if !terminal[node] {
                fst.set_final(from, TropicalWeight::one())?;
            }
        }
        Ok(Self { inner: fst })
    }

    // ------------------------------------------------------------------
    // 组合运算
    // ------------------------------------------------------------------

    /// 并集
    pub fn union(self, other: Fst) -> NormalizeResult<Self> {
        let mut fst = self.inner;
        union(&mut fst, &other.inner)?;
        Ok(Self { inner: fst })
    }

    /// 加权并集：来自 `other` 的路径权重增加 `delta`
    ///
    /// 用于让后备转换器始终劣后于主转换器，但仍然可达。
    pub fn union_weighted(self, other: Fst, delta: Weight) -> NormalizeResult<Self> {
        self.union(other.add_weight(delta)?)
    }

    /// 串接
    pub fn concat(self, other: Fst) -> NormalizeResult<Self> {
        let mut fst = self.inner;
        concat(&mut fst, &other.inner)?;
        Ok(Self { inner: fst })
    }

    /// Kleene 闭包（零次或多次）
    pub fn star(self) -> Self {
        let mut fst = self.inner;
        closure(&mut fst, ClosureType::ClosureStar);
        Self { inner: fst }
    }

    /// 一次或多次
    pub fn plus(self) -> Self {
        let mut fst = self.inner;
        closure(&mut fst, ClosureType::ClosurePlus);
        Self { inner: fst }
    }

    /// 零次或一次
    pub fn optional(self) -> NormalizeResult<Self> {
        self.union(Fst::epsilon()?)
    }

    /// 所有路径权重增加 `weight`（加在终止权重上）
    pub fn add_weight(self, weight: Weight) -> NormalizeResult<Self> {
        let delta = weight.max(0.0);
        let mut fst = self.inner;
        for s in 0..fst.num_states() {
            let state = s as StateId;
            if let Some(existing) = fst.final_weight(state)? {
                fst.set_final(state, TropicalWeight::new(existing.value() + delta))?;
            }
        }
        Ok(Self { inner: fst })
    }
}

/// 输入、输出字节按位置配对，短的一侧以 ε 补齐
fn aligned_labels(input: &str, output: &str) -> Vec<(Label, Label)> {
    let ins = input.as_bytes();
    let outs = output.as_bytes();
    (0..ins.len().max(outs.len()))
        .map(|i| {
            let ilabel = ins.get(i).map_or(EPS_LABEL, |&b| byte_label(b));
            let olabel = outs.get(i).map_or(EPS_LABEL, |&b| byte_label(b));
            (ilabel, olabel)
        })
        .collect()
}

/// 从 `from` 出发追加一条链，返回链尾状态
fn add_chain(fst: &mut StdFst, from: StateId, pairs: Vec<(Label, Label)>) -> NormalizeResult<StateId> {
    let mut current = from;
    for (ilabel, olabel) in pairs {
        let next = fst.add_state();
        fst.add_tr(current, Tr::new(ilabel, olabel, TropicalWeight::one(), next))?;
        current = next;
    }
    Ok(current)
}
