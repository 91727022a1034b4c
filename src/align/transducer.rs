use serde::{Deserialize, Serialize};

use super::notation::CellNotation;
use super::verse::{AlignmentTriple, VerseAccumulator, VerseCollection};
use crate::error::AlignResult;
use crate::index::TargetStartIndex;
use crate::io::{Row, SortSentinels};
use crate::util::{parse_reference, VerseKey};

/// 运行统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignStats {
    pub rows: usize,
    pub verses: usize,
    /// rows dropped because of a row-scoped error
    pub skipped_rows: usize,
    /// rows seen before the first verse reference
    pub orphan_rows: usize,
}

impl AlignStats {
    pub fn merge(&mut self, other: &AlignStats) {
        self.rows += other.rows;
        self.verses += other.verses;
        self.skipped_rows += other.skipped_rows;
        self.orphan_rows += other.orphan_rows;
    }
}

/// 行转换状态机
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VerseState {
    #[default]
    NoActiveVerse,
    InVerse { key: VerseKey, acc: VerseAccumulator },
}

impl VerseState {
    pub fn current_key(&self) -> Option<&VerseKey> {
        match self {
            VerseState::NoActiveVerse => None,
            VerseState::InVerse { key, .. } => Some(key),
        }
    }

    /// 处理行上的经节引用：键变化时切换到新经节，并返回上一个经节的三元组。
    /// 解析失败时状态不变。
    pub fn announce(&mut self, reference: &str) -> AlignResult<Option<(VerseKey, AlignmentTriple)>> {
        let key = parse_reference(reference)?;
        if self.current_key() == Some(&key) {
            return Ok(None);
        }
        let fresh = VerseState::InVerse { key, acc: VerseAccumulator::default() };
        Ok(std::mem::replace(self, fresh).finish())
    }

    /// 把一行的目标词与英文单元格并入当前经节。
    ///
    /// 目标词先于英文单元格记录，与起始索引保持一致：记号错误只丢弃本行英文，
    /// 缺少起始索引时整行不变。没有活动经节时返回 `Ok(false)`。
    pub fn absorb(&mut self, row: &Row, starts: &TargetStartIndex, sentinels: &SortSentinels) -> AlignResult<bool> {
        let VerseState::InVerse { key, acc } = self else {
            return Ok(false);
        };

        let sort = row.sort_index(sentinels);
        let target = match (&row.target_text, sort) {
            (Some(word), Some(s)) => Some((s, word, starts.relative_position(key, s)?)),
            (Some(word), None) => {
                log::debug!("row {}: target word '{}' in {} has no sort index", row.number, word, key);
                None
            }
            (None, _) => None,
        };
        if let Some((s, word, _)) = target {
            acc.record_target(s, word);
        }

        let notation = row.english.as_deref().map(CellNotation::classify).transpose()?;
        if let Some(n) = notation {
            acc.apply(&n, target.map(|(_, _, pos)| pos));
        }
        Ok(true)
    }

    /// 结束当前经节（若有）
    pub fn finish(self) -> Option<(VerseKey, AlignmentTriple)> {
        match self {
            VerseState::NoActiveVerse => None,
            VerseState::InVerse { key, acc } => Some((key, acc.finish())),
        }
    }
}

/// 顺序驱动状态机，逐行捕获错误并汇总输出
pub struct Transducer<'a> {
    starts: &'a TargetStartIndex,
    sentinels: SortSentinels,
    state: VerseState,
    verses: VerseCollection,
    stats: AlignStats,
}

impl<'a> Transducer<'a> {
    pub fn new(starts: &'a TargetStartIndex, sentinels: SortSentinels) -> Self {
        Self {
            starts,
            sentinels,
            state: VerseState::NoActiveVerse,
            verses: VerseCollection::new(),
            stats: AlignStats::default(),
        }
    }

    pub fn feed(&mut self, row: &Row) {
        self.stats.rows += 1;
        match self.step(row) {
            Ok(true) => {}
            Ok(false) => {
                log::debug!("row {}: no verse reference seen yet, dropped", row.number);
                self.stats.orphan_rows += 1;
            }
            Err(e) => {
                let verse = self.state.current_key().map(ToString::to_string).unwrap_or_default();
                log::warn!(
                    "skipping row {} (verse '{}', cell {:?}): {}",
                    row.number,
                    verse,
                    row.english.as_deref().unwrap_or(""),
                    e
                );
                self.stats.skipped_rows += 1;
            }
        }
    }

    fn step(&mut self, row: &Row) -> AlignResult<bool> {
        if let Some(r) = &row.verse_ref {
            if let Some((key, triple)) = self.state.announce(r)? {
                self.verses.insert(key, triple);
            }
        }
        self.state.absorb(row, self.starts, &self.sentinels)
    }

    /// Flushes the verse still open after the last row.
    pub fn finish(mut self) -> (VerseCollection, AlignStats) {
        if let Some((key, triple)) = self.state.finish() {
            self.verses.insert(key, triple);
        }
        self.stats.verses = self.verses.len();
        (self.verses, self.stats)
    }
}

/// 顺序转换全部行
pub fn transduce(rows: &[Row], starts: &TargetStartIndex, sentinels: SortSentinels) -> (VerseCollection, AlignStats) {
    let mut t = Transducer::new(starts, sentinels);
    for row in rows {
        t.feed(row);
    }
    t.finish()
}
