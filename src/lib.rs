//! 面向语音合成的文本规范化引擎
//!
//! 书面文本（称谓缩写、日期等）经加权有限状态语法转换为口语形式，
//! 嵌入的标记（`<break=400ms>`、`{voice=2}`）原样保留。
//!
//! ```ignore
//! use tts_norm_lib::{EngineConfig, LabelCache, Normalizer};
//!
//! let cache = LabelCache::new();
//! let engine = Normalizer::new(EngineConfig::default(), &cache)?;
//! let result = engine.normalize("<break=400ms> Dr. Hunt kam am 4. Mai")?;
//! assert_eq!(result.text, "<break=400ms> Doktor Hunt kam am vierten Mai");
//! ```

pub mod config;
pub mod error;
pub mod grammar;
pub mod labels;
pub mod pipeline;
pub mod wfst;

pub use config::{EngineConfig, RecoveryPolicy, RuleConfig, RuleSpec};
pub use error::{NormalizeError, NormalizeResult};
pub use labels::{CaseMode, LabelCache, LabelEntry, LabelTable};
pub use pipeline::{NormalizationResult, Normalizer, Rendering, WeightedAlternative};

/// 初始化日志
///
/// 过滤级别取自环境变量 `TTS_NORM_LOG`，默认 `warn`。重复调用无副作用。
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("TTS_NORM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    // 已经初始化过时 try_init 返回错误，忽略即可
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }

    #[test]
    fn test_public_api() {
        let cache = LabelCache::new();
        let engine = Normalizer::new(EngineConfig::default(), &cache).expect("build engine");
        let result = engine
            .normalize("<break=400ms> Dr. Hunt kam am 4. Mai")
            .expect("normalize");
        assert_eq!(result.text, "<break=400ms> Doktor Hunt kam am vierten Mai");
        assert!(!cache.is_empty());
    }
}
