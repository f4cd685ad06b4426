//! 标签数据
//!
//! - `table`: TSV 标签表解析
//! - `case`: 大小写变体展开
//! - `cache`: 可注入的标签表缓存
//! - `builtin`: 内置数据表

mod builtin;
mod cache;
mod case;
mod table;

pub use builtin::BuiltinTable;
pub use cache::LabelCache;
pub use case::{expand_case, CaseMode};
pub use table::{LabelEntry, LabelTable};
