use rayon::prelude::*;
use std::ops::Range;

use super::transducer::{AlignStats, Transducer};
use super::verse::VerseCollection;
use crate::index::TargetStartIndex;
use crate::io::{Row, SortSentinels};
use crate::util::{parse_reference, VerseKey};

/// 按经节切分行区间。
///
/// 切分规则与转换器完全一致：仅当引用可解析且与当前经节不同时开启新区间。
/// 第一个区间可能是首个经节之前的孤立行。
pub fn partition_by_verse(rows: &[Row]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut current: Option<VerseKey> = None;
    let mut start = 0usize;

    for (i, row) in rows.iter().enumerate() {
        let Some(r) = &row.verse_ref else { continue };
        let Ok(key) = parse_reference(r) else { continue };
        if current.as_ref() == Some(&key) {
            continue;
        }
        if i > start {
            ranges.push(start..i);
        }
        start = i;
        current = Some(key);
    }
    if rows.len() > start {
        ranges.push(start..rows.len());
    }
    ranges
}

/// 各经节区间独立转换后按原顺序合并，结果与顺序转换一致
pub fn transduce_parallel(
    rows: &[Row],
    starts: &TargetStartIndex,
    sentinels: SortSentinels,
) -> (VerseCollection, AlignStats) {
    let ranges = partition_by_verse(rows);
    log::debug!("partitioned {} rows into {} verse chunks", rows.len(), ranges.len());

    let parts: Vec<(VerseCollection, AlignStats)> = ranges
        .into_par_iter()
        .map(|range| {
            let mut t = Transducer::new(starts, sentinels);
            for row in &rows[range] {
                t.feed(row);
            }
            t.finish()
        })
        .collect();

    let mut verses = VerseCollection::new();
    let mut stats = AlignStats::default();
    for (v, s) in parts {
        verses.append(v);
        stats.merge(&s);
    }
    stats.verses = verses.len();
    (verses, stats)
}
