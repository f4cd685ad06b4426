// Pipeline 模块 - 规范化处理管道
//
// 分段 → 预处理规则 → 分类/口语化语法解码 → 拼接 → 后处理规则

mod engine;
mod rules;
mod segment;
mod types;

pub use engine::Normalizer;
pub use rules::{capitalize_first, RewriteRule, RewriteRules};
pub use segment::{Chunk, ChunkKind, Segmenter};
pub use types::*;
