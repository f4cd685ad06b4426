//! 标签表缓存
//!
//! 同一来源只解析一次。显式对象，由调用方创建并注入引擎构造，测试可以使用独立实例。
//!
//! 并发首次加载同一来源时只有一个线程真正解析（按来源加锁的单次初始化），
//! 其余线程等待并复用结果。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::NormalizeResult;
use crate::labels::table::LabelTable;

type Slot = Arc<Mutex<Option<Arc<LabelTable>>>>;

/// 标签表缓存（先填充，后只读）
#[derive(Default)]
pub struct LabelCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl LabelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加载文件中的标签表（按规范化路径缓存）
    pub fn load_file(&self, path: &Path) -> NormalizeResult<Arc<LabelTable>> {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));
        let key = key.display().to_string();
        self.get_or_load(&key, || LabelTable::load(path))
    }

    /// 加载内嵌的标签表
    pub fn load_embedded(&self, name: &str, content: &str) -> NormalizeResult<Arc<LabelTable>> {
        let key = format!("builtin:{}", name);
        self.get_or_load(&key, || LabelTable::parse(name, content))
    }

    /// 取缓存，未命中时调用 `loader`；加载失败不写入缓存
    pub fn get_or_load<F>(&self, key: &str, loader: F) -> NormalizeResult<Arc<LabelTable>>
    where
        F: FnOnce() -> NormalizeResult<LabelTable>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.entry(key.to_string()).or_default().clone()
        };

        let mut guard = slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(table) = guard.as_ref() {
            tracing::debug!("标签表缓存命中: {}", key);
            return Ok(table.clone());
        }

        let table = Arc::new(loader()?);
        tracing::debug!("标签表已加载: {} ({} 条)", key, table.len());
        *guard = Some(table.clone());
        Ok(table)
    }

    /// 已缓存的来源数量
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots
            .values()
            .filter(|slot| slot.lock().map(|g| g.is_some()).unwrap_or(false))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
