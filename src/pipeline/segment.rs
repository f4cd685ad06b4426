//! 分段
//!
//! 把输入切分为标记片段（`<...>`、`{...}`，可自闭合，原样保留）
//! 和待规范化的文本片段。切分无损：按顺序拼接所有片段得到原文。

use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    static ref MARKUP: Regex = Regex::new(r"<[^<>]+>|\{[^{}]+\}").expect("markup pattern");
}

/// 片段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChunkKind {
    /// 标记，原样保留
    Literal,
    /// 待规范化文本
    Normalizable,
}

/// 输入片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub kind: ChunkKind,
    /// 在原文中的起始字节偏移
    pub start: usize,
    /// 在原文中的结束字节偏移（不含）
    pub end: usize,
}

impl Chunk {
    fn new(text: &str, kind: ChunkKind, start: usize) -> Self {
        Self {
            text: text.to_string(),
            kind,
            start,
            end: start + text.len(),
        }
    }

    pub fn is_literal(&self) -> bool {
        self.kind == ChunkKind::Literal
    }
}

/// 分段器
pub struct Segmenter;

impl Segmenter {
    /// 切分，不产生空片段
    pub fn segment(text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut last_end = 0;

        for m in MARKUP.find_iter(text) {
            if m.start() > last_end {
                chunks.push(Chunk::new(
                    &text[last_end..m.start()],
                    ChunkKind::Normalizable,
                    last_end,
                ));
            }
            chunks.push(Chunk::new(m.as_str(), ChunkKind::Literal, m.start()));
            last_end = m.end();
        }

        if last_end < text.len() {
            chunks.push(Chunk::new(&text[last_end..], ChunkKind::Normalizable, last_end));
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(chunks: &[Chunk]) -> Vec<(ChunkKind, &str)> {
        chunks.iter().map(|c| (c.kind, c.text.as_str())).collect()
    }

    #[test]
    fn test_tag_then_text() {
        let chunks = Segmenter::segment("<break=400ms> Dr. Hunt");
        assert_eq!(
            kinds(&chunks),
            vec![
                (ChunkKind::Literal, "<break=400ms>"),
                (ChunkKind::Normalizable, " Dr. Hunt"),
            ]
        );
        assert_eq!(chunks[1].start, 13);
        assert_eq!(chunks[1].end, 22);
    }

    #[test]
    fn test_self_closing_and_brace_blocks() {
        let chunks = Segmenter::segment("a<pause/>b{voice=2}c{x/}");
        assert_eq!(
            kinds(&chunks),
            vec![
                (ChunkKind::Normalizable, "a"),
                (ChunkKind::Literal, "<pause/>"),
                (ChunkKind::Normalizable, "b"),
                (ChunkKind::Literal, "{voice=2}"),
                (ChunkKind::Normalizable, "c"),
                (ChunkKind::Literal, "{x/}"),
            ]
        );
    }

    #[test]
    fn test_adjacent_tags_produce_no_empty_chunks() {
        let chunks = Segmenter::segment("<a><b>");
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.is_literal() && !c.text.is_empty()));
    }

    #[test]
    fn test_unbalanced_brackets_are_text() {
        let chunks = Segmenter::segment("3 < 4 und {offen");
        assert_eq!(kinds(&chunks), vec![(ChunkKind::Normalizable, "3 < 4 und {offen")]);
    }

    #[test]
    fn test_round_trip_is_lossless() {
        for input in [
            "",
            "plain text",
            "<break=400ms> Dr. Hunt",
            " {a} <b/> c <d>",
            "Straße <x>ä</x> ü",
        ] {
            let joined: String = Segmenter::segment(input)
                .iter()
                .map(|c| c.text.as_str())
                .collect();
            assert_eq!(joined, input);
        }
    }
}
