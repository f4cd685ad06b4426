//! 字节标签与字节类
//!
//! 弧标签取 UTF-8 字节：标签 = 字节值 + 1，0 留给 ε。
//! 需要排除的字符（引号、空格）都是 ASCII，多字节字符的各个字节不会与之冲突，
//! 因此 Σ、"除引号外任意字符"等都可以在 256 个字节上表达。

use std::collections::BTreeSet;

use rustfst::Label;

/// 字节 → 弧标签
pub fn byte_label(byte: u8) -> Label {
    Label::from(byte) + 1
}

/// 弧标签 → 字节，ε 返回 `None`
pub fn label_byte(label: Label) -> Option<u8> {
    label.checked_sub(1).and_then(|b| u8::try_from(b).ok())
}

pub fn text_labels(text: &str) -> Vec<Label> {
    text.bytes().map(byte_label).collect()
}

/// 由输出标签序列还原文本（跳过 ε）
pub fn labels_text(labels: &[Label]) -> String {
    let bytes: Vec<u8> = labels.iter().filter_map(|&l| label_byte(l)).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// 字节类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteClass {
    /// 任意字节
    Any,
    /// 除给定字节外的任意字节
    AnyExcept(BTreeSet<u8>),
    /// 给定字节之一
    OneOf(BTreeSet<u8>),
}

impl ByteClass {
    pub fn any_except(bytes: impl IntoIterator<Item = u8>) -> Self {
        ByteClass::AnyExcept(bytes.into_iter().collect())
    }

    pub fn one_of(bytes: impl IntoIterator<Item = u8>) -> Self {
        ByteClass::OneOf(bytes.into_iter().collect())
    }

    /// 除双引号外的任意字节（字段内容）
    pub fn not_quote() -> Self {
        Self::any_except([b'"'])
    }

    /// 除空格和双引号外的任意字节（单个词）
    pub fn not_space() -> Self {
        Self::any_except([b' ', b'"'])
    }

    /// ASCII 数字
    pub fn digit() -> Self {
        Self::one_of(b'0'..=b'9')
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            ByteClass::Any => true,
            ByteClass::AnyExcept(excluded) => !excluded.contains(&byte),
            ByteClass::OneOf(allowed) => allowed.contains(&byte),
        }
    }

    /// 类中的全部字节，升序
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(move |&b| self.contains(b))
    }
}
