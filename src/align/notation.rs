use std::sync::LazyLock;

use regex::Regex;

use super::verse::VerseAccumulator;
use crate::error::{AlignError, AlignResult};

// hyphen with no word character on either side
static NULL_ALIGN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\B-\B").unwrap());
static SPAN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]|\{[^}]*\}").unwrap());

const UP_ALIGN_MARKER: &str = ". . .";
const DOWN_ALIGN_MARKER: &str = "vvv";

/// 片段类别：普通文本参与对齐，`[...]` 增译与 `{...}` 规范化文本不参与
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Plain,
    Added,
    Normalized,
}

impl SpanKind {
    pub fn is_aligned(self) -> bool {
        matches!(self, SpanKind::Plain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub kind: SpanKind,
}

/// 英文单元格的记号分类，每个单元格只分类一次。
///
/// 判定顺序即优先级：空对齐 `-` > 括号片段 > 上对齐 `. . .` > 下对齐 `vvv` > 普通文本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellNotation {
    /// 去掉孤立连字符后剩余的词，全部不对齐
    NullAlign(Vec<String>),
    /// 按出现顺序排列的普通 / 增译 / 规范化片段
    Bracketed(Vec<Segment>),
    /// 把上一个单元格的源词追加对齐到本行目标词
    UpAlign,
    /// 把本行目标词挂起，交给后续单元格的第一个源词
    DownAlign,
    Plain(Vec<String>),
}

impl CellNotation {
    pub fn classify(cell: &str) -> AlignResult<Self> {
        if NULL_ALIGN_PATTERN.is_match(cell) {
            let stripped = NULL_ALIGN_PATTERN.replace_all(cell, "");
            return Ok(CellNotation::NullAlign(split_words(&stripped)));
        }
        if cell.contains(is_bracket) {
            return split_spans(cell).map(CellNotation::Bracketed);
        }
        if cell.contains(UP_ALIGN_MARKER) {
            return Ok(CellNotation::UpAlign);
        }
        if cell.contains(DOWN_ALIGN_MARKER) {
            return Ok(CellNotation::DownAlign);
        }
        Ok(CellNotation::Plain(split_words(cell)))
    }
}

/// 把一个英文单元格拆分并写入经节累加器
pub fn split_cell(acc: &mut VerseAccumulator, cell: &str, target: Option<u32>) -> AlignResult<()> {
    let notation = CellNotation::classify(cell)?;
    acc.apply(&notation, target);
    Ok(())
}

fn is_bracket(c: char) -> bool {
    matches!(c, '[' | ']' | '{' | '}')
}

fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// 交替取出括号外文本与括号内文本；括号不配对或嵌套时报错
fn split_spans(cell: &str) -> AlignResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut push = |text: &str, kind: SpanKind| -> AlignResult<()> {
        if text.contains(is_bracket) {
            return Err(AlignError::NotationSplit(cell.to_string()));
        }
        if !text.trim().is_empty() {
            segments.push(Segment { text: text.trim().to_string(), kind });
        }
        Ok(())
    };

    let mut last = 0usize;
    for m in SPAN_PATTERN.find_iter(cell) {
        push(&cell[last..m.start()], SpanKind::Plain)?;
        let span = m.as_str();
        let kind = if span.starts_with('[') { SpanKind::Added } else { SpanKind::Normalized };
        // both delimiters are single-byte ASCII
        push(&span[1..span.len() - 1], kind)?;
        last = m.end();
    }
    push(&cell[last..], SpanKind::Plain)?;
    Ok(segments)
}
