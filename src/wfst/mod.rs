//! 加权有限状态转换器（WFST）
//!
//! 基于 `rustfst` 的热带半环 `VectorFst`，弧标签为 UTF-8 字节。
//!
//! ## 组成
//! - `class`: 字节标签与字节类
//! - `fst`: 语法构造（并、加权并、串接、闭包）
//! - `compose`: 复合与修剪
//! - `shortest_path`: 最短路径 / n-best 解码
//!
//! 构造完成后的转换器只读，可在多线程间共享解码。

mod class;
mod compose;
mod fst;
mod shortest_path;

pub use class::ByteClass;
pub use fst::{Fst, Weight};
pub use shortest_path::{n_shortest, shortest_path, Path, DEFAULT_SEARCH_BUDGET};
