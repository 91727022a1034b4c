use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AlignError, AlignResult};
use crate::util::books;

// optional leading digit, book name words, then chapter:verse
static REF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d? ?[\w ]+) (\d+):(\d+)").unwrap());

/// 经节键 `(book, chapter, verse)`，规范字符串形式为 `"BOOK C:V"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VerseKey {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

/// 解析形如 `"1 John 3:16"` 的引用为规范经节键
pub fn parse_reference(text: &str) -> AlignResult<VerseKey> {
    let text = text.trim();
    let caps = REF_PATTERN
        .captures(text)
        .ok_or_else(|| AlignError::ReferenceParse(text.to_string()))?;

    let book_name = caps[1].trim();
    let book = books::book_code(book_name).ok_or_else(|| AlignError::UnknownBook {
        book: book_name.to_string(),
        reference: text.to_string(),
    })?;
    let chapter = caps[2]
        .parse()
        .map_err(|_| AlignError::ReferenceParse(text.to_string()))?;
    let verse = caps[3]
        .parse()
        .map_err(|_| AlignError::ReferenceParse(text.to_string()))?;

    Ok(VerseKey { book: book.to_string(), chapter, verse })
}
