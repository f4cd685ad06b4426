// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use crate::labels::CaseMode;
use crate::wfst::DEFAULT_SEARCH_BUDGET;

// ============================================================================
// 解码失败处理策略
// ============================================================================

/// 片段无接受路径时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// 原样保留该片段，并在结果中记录失败
    #[default]
    PassThrough,
    /// 整个调用失败
    Fail,
}

// ============================================================================
// 改写规则配置
// ============================================================================

/// 用户自定义改写规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    /// 正则表达式
    pub pattern: String,
    /// 替换串，支持 `$1` 等捕获组引用
    #[serde(default)]
    pub replacement: String,
}

/// 预处理/后处理规则开关
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// 删除引号
    #[serde(default = "default_true")]
    pub strip_quotes: bool,
    /// 各类破折号/连字符 → 空格
    #[serde(default = "default_true")]
    pub collapse_dashes: bool,
    /// 连续空格合并
    #[serde(default = "default_true")]
    pub collapse_spaces: bool,
    /// 删除千位分隔点（`230.000` → `230000`）
    ///
    /// 会误伤 `1.000` 形式的版本号等，可以关闭
    #[serde(default = "default_true")]
    pub thousands_separator: bool,
    /// 追加在内置预处理规则之后
    #[serde(default)]
    pub extra_pre: Vec<RuleSpec>,
    /// 追加在内置后处理规则之后
    #[serde(default)]
    pub extra_post: Vec<RuleSpec>,
}

fn default_true() -> bool {
    true
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            strip_quotes: true,
            collapse_dashes: true,
            collapse_spaces: true,
            thousands_separator: true,
            extra_pre: Vec::new(),
            extra_post: Vec::new(),
        }
    }
}

// ============================================================================
// 引擎配置
// ============================================================================

/// 引擎配置（构造期使用，构造后不可变）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub case_mode: CaseMode,
    /// 单一最优输出；关闭后保留多个带权候选
    #[serde(default = "default_true")]
    pub deterministic: bool,
    /// 自定义白名单
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_table_path: Option<PathBuf>,
    /// 从该目录加载内置数据表，而不是使用内嵌副本
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// 非确定模式下每个片段保留的候选数
    #[serde(default = "default_max_alternatives")]
    pub max_alternatives: usize,
    /// 解码格（输入与语法复合后）允许的最大状态数
    #[serde(default = "default_search_budget")]
    pub search_budget: usize,
    #[serde(default)]
    pub on_no_path: RecoveryPolicy,
    #[serde(default)]
    pub rules: RuleConfig,
}

fn default_max_alternatives() -> usize {
    3
}

fn default_search_budget() -> usize {
    DEFAULT_SEARCH_BUDGET
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            case_mode: CaseMode::default(),
            deterministic: true,
            custom_table_path: None,
            data_dir: None,
            max_alternatives: default_max_alternatives(),
            search_budget: default_search_budget(),
            on_no_path: RecoveryPolicy::default(),
            rules: RuleConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法获取配置目录"))?;
        Ok(config_dir.join("TtsNorm").join("config.json"))
    }

    /// 从默认路径加载，文件不存在时使用默认配置
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            tracing::info!("配置文件不存在，使用默认配置: {:?}", path);
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::info!("加载配置: {:?}", path);
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        Ok(config)
    }

    /// 原子写入：先写临时文件，再重命名
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("json.tmp");

        std::fs::write(&temp_path, &content).map_err(|e| {
            tracing::error!("写入临时文件失败: {}", e);
            e
        })?;
        if let Err(e) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            anyhow::bail!("替换配置文件失败: {}", e);
        }
        tracing::info!("配置已保存: {:?}", path);
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// 检查配置，返回警告（不阻止构造）
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.case_mode == CaseMode::UpperCanonical {
            warnings.push(
                "case_mode upper_canonical upper-cases canonical forms only, \
                 while lower changes surface forms only"
                    .to_string(),
            );
        }
        if !self.deterministic && self.max_alternatives == 0 {
            warnings.push("max_alternatives is 0 in non-deterministic mode, using 1".to_string());
        }
        if self.search_budget == 0 {
            warnings.push("search_budget is 0, every decode will fail".to_string());
        }
        warnings
    }

    /// 实际使用的候选数
    pub fn effective_alternatives(&self) -> usize {
        if self.deterministic {
            1
        } else {
            self.max_alternatives.max(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config, EngineConfig::default());
        assert!(config.rules.thousands_separator);
        assert_eq!(config.max_alternatives, 3);
        assert_eq!(config.search_budget, DEFAULT_SEARCH_BUDGET);
        assert_eq!(config.on_no_path, RecoveryPolicy::PassThrough);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "case_mode": "caps",
            "deterministic": false,
            "on_no_path": "fail",
            "rules": { "thousands_separator": false,
                       "extra_pre": [{ "name": "amp", "pattern": "&", "replacement": " und " }] }
        }"#;
        let config: EngineConfig = serde_json::from_str(json).expect("parse");
        assert_eq!(config.case_mode, CaseMode::UpperCanonical);
        assert!(!config.deterministic);
        assert_eq!(config.on_no_path, RecoveryPolicy::Fail);
        assert!(!config.rules.thousands_separator);
        assert!(config.rules.strip_quotes);
        assert_eq!(config.rules.extra_pre[0].replacement, " und ");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("nested").join("config.json");

        let mut config = EngineConfig::default();
        config.case_mode = CaseMode::Lower;
        config.custom_table_path = Some(PathBuf::from("/tmp/custom.tsv"));
        config.save_to(&path).expect("save");

        assert!(!path.with_extension("json.tmp").exists());
        let loaded = EngineConfig::load_from(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("config.json");
        std::fs::write(&path, "{ not json").expect("write");
        assert!(EngineConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_validate_warnings() {
        assert!(EngineConfig::default().validate().is_empty());

        let mut config = EngineConfig::default();
        config.case_mode = CaseMode::UpperCanonical;
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("upper_canonical"));

        let mut config = EngineConfig::default();
        config.deterministic = false;
        config.max_alternatives = 0;
        assert_eq!(config.validate().len(), 1);
        assert_eq!(config.effective_alternatives(), 1);
    }

    #[test]
    fn test_effective_alternatives() {
        let mut config = EngineConfig::default();
        assert_eq!(config.effective_alternatives(), 1);
        config.deterministic = false;
        assert_eq!(config.effective_alternatives(), 3);
    }
}
