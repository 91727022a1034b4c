use std::collections::HashMap;

use crate::error::{AlignError, AlignResult};
use crate::io::{Row, SortSentinels};
use crate::util::{parse_reference, VerseKey};

/// 每个经节的最小源语言排序值。
///
/// 表格按英文出现顺序排列，而 Heb/Grk Sort 是原文顺序，所以同一经节的行
/// 并不保证按排序值递增；需要先整表扫描一遍取最小值，之后只读。
#[derive(Debug, Default, Clone)]
pub struct TargetStartIndex {
    starts: HashMap<VerseKey, u32>,
}

impl TargetStartIndex {
    /// 单遍扫描全部行，构建起始索引。
    ///
    /// 只统计转换阶段会记录目标词的行：引用无法解析的行整行跳过，没有目标词的行不参与。
    pub fn build(rows: &[Row], sentinels: &SortSentinels) -> Self {
        let mut starts: HashMap<VerseKey, u32> = HashMap::new();
        let mut current: Option<VerseKey> = None;

        for row in rows {
            if let Some(r) = &row.verse_ref {
                match parse_reference(r) {
                    Ok(key) => current = Some(key),
                    Err(e) => {
                        // reported once by the transducer pass
                        log::debug!("start index: row {}: {}", row.number, e);
                        continue;
                    }
                }
            }
            if row.target_text.is_none() {
                continue;
            }
            let (Some(key), Some(sort)) = (&current, row.sort_index(sentinels)) else {
                continue;
            };
            starts
                .entry(key.clone())
                .and_modify(|m| *m = (*m).min(sort))
                .or_insert(sort);
        }

        Self { starts }
    }

    pub fn get(&self, key: &VerseKey) -> Option<u32> {
        self.starts.get(key).copied()
    }

    /// 全局排序值 -> 经节内 1-based 目标词位置
    pub fn relative_position(&self, key: &VerseKey, sort: u32) -> AlignResult<u32> {
        let start = self
            .get(key)
            .ok_or_else(|| AlignError::MissingTargetStartIndex(key.to_string()))?;
        Ok(sort.saturating_sub(start) + 1)
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::row::fixtures::{grk, heb};

    fn key(s: &str) -> VerseKey {
        parse_reference(s).unwrap()
    }

    #[test]
    fn minimum_taken_across_out_of_order_rows() {
        let rows = vec![
            grk(Some("John 3:16"), Some("ἠγάπησεν"), 104, Some("loved")),
            grk(None, Some("Οὕτως"), 101, Some("For")),
            grk(None, Some("θεὸς"), 103, Some("God")),
            grk(Some("John 3:17"), Some("οὐ"), 120, Some("not")),
        ];
        let idx = TargetStartIndex::build(&rows, &SortSentinels::default());
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.get(&key("John 3:16")), Some(101));
        assert_eq!(idx.get(&key("John 3:17")), Some(120));
        assert_eq!(idx.relative_position(&key("John 3:16"), 104), Ok(4));
    }

    #[test]
    fn sentinel_rows_are_ignored() {
        let rows = vec![
            heb(Some("Genesis 1:1"), Some("בְּרֵאשִׁית"), 5, Some("In")),
            heb(None, None, 999_999, Some("the")),
        ];
        let idx = TargetStartIndex::build(&rows, &SortSentinels::default());
        assert_eq!(idx.get(&key("Genesis 1:1")), Some(5));
    }

    #[test]
    fn orphan_and_bad_reference_rows_do_not_open_verses() {
        let rows = vec![
            grk(None, Some("x"), 1, None),
            grk(Some("John 1:1"), Some("Ἐν"), 10, Some("In")),
            grk(Some("Nowhere 1:1"), Some("ἀρχῇ"), 9, Some("beginning")),
        ];
        let idx = TargetStartIndex::build(&rows, &SortSentinels::default());
        assert_eq!(idx.len(), 1);
        // the unresolvable reference row is skipped, as in the transducer
        assert_eq!(idx.get(&key("John 1:1")), Some(10));
    }

    #[test]
    fn rows_without_target_word_do_not_lower_start() {
        let rows = vec![
            grk(Some("John 1:1"), Some("Ἐν"), 10, Some("In")),
            grk(None, None, 4, Some("[the]")),
        ];
        let idx = TargetStartIndex::build(&rows, &SortSentinels::default());
        assert_eq!(idx.get(&key("John 1:1")), Some(10));
    }

    #[test]
    fn unknown_verse_is_missing_start() {
        let idx = TargetStartIndex::default();
        assert!(idx.is_empty());
        assert_eq!(
            idx.relative_position(&key("Jude 1:1"), 3),
            Err(AlignError::MissingTargetStartIndex("JUD 1:1".to_string()))
        );
    }
}
