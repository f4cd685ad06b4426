// Pipeline 结果类型
//
// - 片段渲染结果 (Rendering)
// - 片段处理记录 (ChunkResult)
// - 可恢复的片段失败 (ChunkFailure)
// - 整体结果 (NormalizationResult)

use serde::{Deserialize, Serialize};

use crate::pipeline::segment::ChunkKind;
use crate::wfst::Weight;

/// 带权候选
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedAlternative {
    pub text: String,
    /// 路径权重，越小越优
    pub weight: Weight,
}

/// 片段的渲染结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rendering {
    /// 确定模式：单一输出
    Single { text: String },
    /// 非确定模式：多个候选，按权重升序，首个即最优
    Alternatives { alternatives: Vec<WeightedAlternative> },
}

impl Rendering {
    /// 最优输出
    pub fn best(&self) -> &str {
        match self {
            Rendering::Single { text } => text,
            Rendering::Alternatives { alternatives } => alternatives
                .first()
                .map(|alt| alt.text.as_str())
                .unwrap_or(""),
        }
    }

    pub fn alternatives(&self) -> Option<&[WeightedAlternative]> {
        match self {
            Rendering::Single { .. } => None,
            Rendering::Alternatives { alternatives } => Some(alternatives),
        }
    }
}

/// 单个片段的处理记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkResult {
    pub kind: ChunkKind,
    /// 原始片段文本
    pub source: String,
    /// 预处理后的文本（标记片段与原文相同）
    pub prepared: String,
    pub rendering: Rendering,
}

/// 已恢复的片段失败（片段按原样保留）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkFailure {
    /// 片段序号
    pub index: usize,
    pub text: String,
    pub reason: String,
}

/// 规范化结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationResult {
    /// 规范化后的文本
    pub text: String,
    /// 是否有改动
    pub changed: bool,
    /// 每个非空片段的处理记录
    pub chunks: Vec<ChunkResult>,
    /// 按原样保留的失败片段
    pub failures: Vec<ChunkFailure>,
    /// 处理耗时（微秒）
    pub elapsed_us: u64,
}

impl NormalizationResult {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// 非确定模式下各片段的候选
    pub fn alternatives(&self) -> impl Iterator<Item = &[WeightedAlternative]> {
        self.chunks
            .iter()
            .filter_map(|chunk| chunk.rendering.alternatives())
    }
}
