//! 规范化主引擎
//!
//! 组合分段、预处理规则、分类/口语化语法解码、后处理规则

use std::time::Instant;
use unicode_normalization::UnicodeNormalization;

use crate::config::{EngineConfig, RecoveryPolicy};
use crate::error::{NormalizeError, NormalizeResult};
use crate::grammar::{
    restore_spaces, ClassifyGrammar, DateGrammar, DateTagger, OrdinalStem, VerbalizeGrammar,
    WhitelistGrammar, WhitelistTables,
};
use crate::labels::{BuiltinTable, LabelCache};
use crate::pipeline::rules::{capitalize_first, RewriteRules};
use crate::pipeline::segment::{ChunkKind, Segmenter};
use crate::pipeline::types::{
    ChunkFailure, ChunkResult, NormalizationResult, Rendering, WeightedAlternative,
};

/// 规范化引擎（构造后只读，可跨线程共享）
pub struct Normalizer {
    config: EngineConfig,
    classify: ClassifyGrammar,
    verbalize: VerbalizeGrammar,
    pre_rules: RewriteRules,
    post_rules: RewriteRules,
}

impl Normalizer {
    /// 构造引擎
    ///
    /// 标签表通过 `cache` 加载；任何数据加载失败都会使构造失败。
    pub fn new(config: EngineConfig, cache: &LabelCache) -> NormalizeResult<Self> {
        let start = Instant::now();
        for warning in config.validate() {
            tracing::warn!("配置警告: {}", warning);
        }

        let data_dir = config.data_dir.as_deref();
        let whitelist = BuiltinTable::Whitelist.load(data_dir, cache)?;
        let measurements = if config.deterministic {
            None
        } else {
            Some(BuiltinTable::Measurements.load(data_dir, cache)?)
        };
        let custom = config
            .custom_table_path
            .as_deref()
            .map(|path| cache.load_file(path))
            .transpose()?;
        let months = BuiltinTable::Months.load(data_dir, cache)?;
        let stems = BuiltinTable::OrdinalStems.load(data_dir, cache)?;
        let days = BuiltinTable::Days.load(data_dir, cache)?;

        let deterministic = config.deterministic;
        let whitelist = WhitelistGrammar::new(
            WhitelistTables {
                builtin: &whitelist,
                measurements: measurements.as_deref(),
                custom: custom.as_deref(),
            },
            config.case_mode,
            deterministic,
        )?;
        let tagger = DateTagger::new(&days, &months)?;
        let date = DateGrammar::new(&OrdinalStem::from_table(&stems)?, &months)?;

        let classify = ClassifyGrammar::new(&whitelist, &tagger)?;
        let verbalize = VerbalizeGrammar::new(&date)?;
        let pre_rules = RewriteRules::pre(&config.rules)?;
        let post_rules = RewriteRules::post(&config.rules)?;

        tracing::info!(
            "规范化引擎构造完成: case_mode={}, deterministic={}, 预处理规则 {:?}, 耗时 {} ms",
            config.case_mode,
            deterministic,
            pre_rules.names(),
            start.elapsed().as_millis()
        );

        Ok(Self {
            config,
            classify,
            verbalize,
            pre_rules,
            post_rules,
        })
    }

    /// 使用独立缓存构造
    pub fn with_config(config: EngineConfig) -> NormalizeResult<Self> {
        Self::new(config, &LabelCache::new())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 规范化文本
    ///
    /// 空输入（或只有空白）返回 `EmptyInput`。
    /// 片段解码失败时按 `on_no_path` 处理：原样保留并记入 `failures`，或直接返回错误。
    pub fn normalize(&self, text: &str) -> NormalizeResult<NormalizationResult> {
        if text.trim().is_empty() {
            return Err(NormalizeError::EmptyInput);
        }
        let start = Instant::now();

        let mut pieces = Vec::new();
        let mut chunks = Vec::new();
        let mut failures = Vec::new();

        for (index, chunk) in Segmenter::segment(text).into_iter().enumerate() {
            if chunk.kind == ChunkKind::Literal {
                pieces.push(chunk.text.clone());
                chunks.push(ChunkResult {
                    kind: chunk.kind,
                    prepared: chunk.text.clone(),
                    rendering: Rendering::Single {
                        text: chunk.text.clone(),
                    },
                    source: chunk.text,
                });
                continue;
            }

            let prepared = self.prepare(&chunk.text);
            if prepared.is_empty() {
                continue;
            }

            let rendering = match self.render(&prepared) {
                Ok(rendering) => rendering,
                Err(e) if e.is_chunk_failure() && self.config.on_no_path == RecoveryPolicy::PassThrough => {
                    tracing::warn!("片段 {} 解码失败，原样保留: {}", index, e);
                    failures.push(ChunkFailure {
                        index,
                        text: prepared.clone(),
                        reason: e.to_string(),
                    });
                    Rendering::Single {
                        text: prepared.clone(),
                    }
                }
                Err(e) => return Err(e),
            };

            pieces.push(rendering.best().to_string());
            chunks.push(ChunkResult {
                kind: chunk.kind,
                source: chunk.text,
                prepared,
                rendering,
            });
        }

        let joined = pieces.join(" ");
        let output = capitalize_first(&self.post_rules.apply(&joined));

        let elapsed_us = start.elapsed().as_micros() as u64;
        let changed = output != text;

        Ok(NormalizationResult {
            text: output,
            changed,
            chunks,
            failures,
            elapsed_us,
        })
    }

    /// 批量规范化，单条失败不影响其余
    pub fn normalize_batch<I, S>(&self, texts: I) -> Vec<NormalizeResult<NormalizationResult>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts
            .into_iter()
            .map(|text| self.normalize(text.as_ref()))
            .collect()
    }

    /// Unicode 归一化、空白折叠、预处理规则
    fn prepare(&self, text: &str) -> String {
        let folded = unicode_normalize(text);
        self.pre_rules.apply(&folded).trim().to_string()
    }

    /// 分类 + 口语化
    fn render(&self, prepared: &str) -> NormalizeResult<Rendering> {
        let budget = self.config.search_budget;

        if self.config.deterministic {
            let tagged = self.classify.grammar().decode(prepared, budget)?;
            tracing::debug!("分类结果: {}", tagged.output);
            let spoken = self.verbalize.grammar().decode(&tagged.output, budget)?;
            return Ok(Rendering::Single {
                text: restore_spaces(&spoken.output),
            });
        }

        let n = self.config.effective_alternatives();
        let tagged = self.classify.grammar().alternatives(prepared, n, budget)?;

        let mut alternatives: Vec<WeightedAlternative> = Vec::new();
        let mut last_error = None;
        for tag in &tagged {
            tracing::debug!("分类候选 ({:.4}): {}", tag.weight, tag.output);
            let spoken = match self.verbalize.grammar().alternatives(&tag.output, n, budget) {
                Ok(spoken) => spoken,
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            };
            for path in spoken {
                let text = restore_spaces(&path.output);
                let weight = tag.weight + path.weight;
                match alternatives.iter_mut().find(|alt| alt.text == text) {
                    Some(existing) if existing.weight > weight => existing.weight = weight,
                    Some(_) => {}
                    None => alternatives.push(WeightedAlternative { text, weight }),
                }
            }
        }

        if alternatives.is_empty() {
            return Err(last_error.unwrap_or_else(|| NormalizeError::NoAcceptingPath {
                input: prepared.to_string(),
            }));
        }
        alternatives.sort_by(|a, b| a.weight.total_cmp(&b.weight));
        alternatives.truncate(n);
        Ok(Rendering::Alternatives { alternatives })
    }
}

/// Unicode 归一化 + 空白折叠
fn unicode_normalize(text: &str) -> String {
    // NFC 归一化
    let nfc: String = text.nfc().collect();

    // 空白折叠：多个连续空白 -> 单个空格
    let mut result = String::with_capacity(nfc.len());
    let mut prev_whitespace = false;

    for ch in nfc.chars() {
        if ch.is_whitespace() {
            if !prev_whitespace {
                result.push(' ');
                prev_whitespace = true;
            }
        } else {
            result.push(ch);
            prev_whitespace = false;
        }
    }

    result.trim().to_string()
}
