use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::notation::CellNotation;
use crate::util::VerseKey;

/// 一个经节的输出三元组；`alignment` 为 Pharaoh 格式 `S-T`，按生成顺序排列
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentTriple {
    pub source: String,
    pub target: String,
    pub alignment: String,
}

/// 单个经节的可变累积状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerseAccumulator {
    pub source_words: Vec<String>,
    /// raw sort index -> target word
    pub target_words: BTreeMap<u32, String>,
    /// (1-based source position, 1-based target position)
    pub pairs: Vec<(u32, u32)>,
    pub source_count: u32,
    /// 上一个单元格产出的可对齐源词位置，供 `. . .` 回溯
    pub pending_source: Vec<u32>,
    /// `vvv` 挂起的目标位置，由下一个可对齐源词吸收
    pub pending_target: Vec<u32>,
}

impl VerseAccumulator {
    pub fn record_target(&mut self, sort: u32, word: &str) {
        self.target_words.insert(sort, word.to_string());
    }

    /// 待定源词只记录可对齐的位置：`[...]`/`{...}` 内的词和 `-` 单元格留下的词不会被后续 `. . .` 连接。
    pub fn apply(&mut self, notation: &CellNotation, target: Option<u32>) {
        match notation {
            CellNotation::NullAlign(words) => {
                let mut emitted = Vec::new();
                for w in words {
                    self.emit(w, None, false, &mut emitted);
                }
                self.pending_source = emitted;
            }
            CellNotation::Bracketed(segments) => {
                let mut emitted = Vec::new();
                for seg in segments {
                    for w in seg.text.split_whitespace() {
                        self.emit(w, target, seg.kind.is_aligned(), &mut emitted);
                    }
                }
                self.pending_source = emitted;
            }
            CellNotation::UpAlign => {
                if let Some(t) = target {
                    self.pairs.extend(self.pending_source.iter().map(|&s| (s, t)));
                }
            }
            CellNotation::DownAlign => {
                if let Some(t) = target {
                    self.pending_target.push(t);
                }
            }
            CellNotation::Plain(words) => {
                let mut emitted = Vec::new();
                for w in words {
                    self.emit(w, target, true, &mut emitted);
                }
                self.pending_source = emitted;
            }
        }
    }

    /// 追加一个源词。可对齐时先与本行目标配对，再吸收全部挂起目标（仅第一个词能吸收到）。
    fn emit(&mut self, word: &str, target: Option<u32>, aligned: bool, emitted: &mut Vec<u32>) {
        self.source_count += 1;
        let s = self.source_count;
        self.source_words.push(word.to_string());
        if !aligned {
            return;
        }
        if let Some(t) = target {
            self.pairs.push((s, t));
        }
        self.pairs.extend(self.pending_target.drain(..).map(|t| (s, t)));
        emitted.push(s);
    }

    pub fn finish(self) -> AlignmentTriple {
        let alignment: Vec<String> = self.pairs.iter().map(|(s, t)| format!("{}-{}", s, t)).collect();
        AlignmentTriple {
            source: self.source_words.join(" "),
            target: self.target_words.into_values().collect::<Vec<_>>().join(" "),
            alignment: alignment.join(" "),
        }
    }
}

/// 按首次出现顺序保存的经节集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(VerseKey, AlignmentTriple)>", into = "Vec<(VerseKey, AlignmentTriple)>")]
pub struct VerseCollection {
    entries: Vec<(VerseKey, AlignmentTriple)>,
    positions: HashMap<VerseKey, usize>,
}

impl VerseCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A key flushed twice keeps its first position and takes the latest triple.
    pub fn insert(&mut self, key: VerseKey, triple: AlignmentTriple) {
        if let Some(&i) = self.positions.get(&key) {
            log::debug!("verse {} flushed again; replacing earlier triple", key);
            self.entries[i].1 = triple;
            return;
        }
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push((key, triple));
    }

    pub fn append(&mut self, other: VerseCollection) {
        for (k, t) in other.entries {
            self.insert(k, t);
        }
    }

    pub fn get(&self, key: &VerseKey) -> Option<&AlignmentTriple> {
        self.positions.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VerseKey, &AlignmentTriple)> {
        self.entries.iter().map(|(k, t)| (k, t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<(VerseKey, AlignmentTriple)>> for VerseCollection {
    fn from(entries: Vec<(VerseKey, AlignmentTriple)>) -> Self {
        let mut c = Self::new();
        for (k, t) in entries {
            c.insert(k, t);
        }
        c
    }
}

impl From<VerseCollection> for Vec<(VerseKey, AlignmentTriple)> {
    fn from(c: VerseCollection) -> Self {
        c.entries
    }
}
