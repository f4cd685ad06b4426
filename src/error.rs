use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    // 数据加载错误（构造期，致命）
    #[error("Label data load failed: {path} - {reason}")]
    DataLoad { path: String, reason: String },

    // 解码错误（按片段，可恢复）
    #[error("No accepting path for input: {input:?}")]
    NoAcceptingPath { input: String },

    #[error("Decoding lattice exceeded budget of {budget} states")]
    SearchBudgetExceeded { budget: usize },

    // 输入错误
    #[error("Input text is empty")]
    EmptyInput,

    // 配置错误
    #[error("Invalid rewrite rule {name}: {reason}")]
    InvalidRule { name: String, reason: String },

    // 转换器运算错误
    #[error("FST operation failed: {0}")]
    Fst(String),
}

impl NormalizeError {
    /// 是否为单个片段的解码失败（调用方可以跳过该片段继续处理）
    pub fn is_chunk_failure(&self) -> bool {
        matches!(
            self,
            NormalizeError::NoAcceptingPath { .. } | NormalizeError::SearchBudgetExceeded { .. }
        )
    }
}

// rustfst 的算法返回 anyhow::Result
impl From<anyhow::Error> for NormalizeError {
    fn from(e: anyhow::Error) -> Self {
        NormalizeError::Fst(format!("{:#}", e))
    }
}

pub type NormalizeResult<T> = Result<T, NormalizeError>;
