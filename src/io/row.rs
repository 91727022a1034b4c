use serde::{Deserialize, Serialize};

/// 源语言
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Language {
    Hebrew,
    Aramaic,
    Greek,
    Other(String),
}

impl Language {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "Hebrew" => Language::Hebrew,
            "Aramaic" => Language::Aramaic,
            "Greek" => Language::Greek,
            other => Language::Other(other.to_string()),
        }
    }
}

/// 两种排序列的“不适用”哨兵值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSentinels {
    pub hebrew: u32,
    pub greek: u32,
}

impl Default for SortSentinels {
    fn default() -> Self {
        Self { hebrew: 999_999, greek: 0 }
    }
}

/// 数据集中的一行：一个源语言词及其英文渲染单元格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based data row number, for diagnostics only
    pub number: usize,
    pub verse_ref: Option<String>,
    pub language: Language,
    pub target_text: Option<String>,
    pub heb_sort: Option<u32>,
    pub grk_sort: Option<u32>,
    pub english: Option<String>,
}

impl Row {
    /// 按语言选取适用的排序值，跳过哨兵
    pub fn sort_index(&self, sentinels: &SortSentinels) -> Option<u32> {
        let heb = self.heb_sort.filter(|&v| v != sentinels.hebrew);
        let grk = self.grk_sort.filter(|&v| v != sentinels.greek);
        match self.language {
            Language::Greek => grk.or(heb),
            Language::Hebrew | Language::Aramaic => heb.or(grk),
            Language::Other(_) => grk.or(heb),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Greek row with an explicit sort index.
    pub fn grk(verse_ref: Option<&str>, target: Option<&str>, sort: u32, english: Option<&str>) -> Row {
        Row {
            number: 0,
            verse_ref: verse_ref.map(str::to_string),
            language: Language::Greek,
            target_text: target.map(str::to_string),
            heb_sort: Some(999_999),
            grk_sort: Some(sort),
            english: english.map(str::to_string),
        }
    }

    pub fn heb(verse_ref: Option<&str>, target: Option<&str>, sort: u32, english: Option<&str>) -> Row {
        Row {
            number: 0,
            verse_ref: verse_ref.map(str::to_string),
            language: Language::Hebrew,
            target_text: target.map(str::to_string),
            heb_sort: Some(sort),
            grk_sort: Some(0),
            english: english.map(str::to_string),
        }
    }

    /// Renumbers rows 1..=n in order.
    pub fn numbered(mut rows: Vec<Row>) -> Vec<Row> {
        for (i, r) in rows.iter_mut().enumerate() {
            r.number = i + 1;
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn sort_index_skips_sentinels() {
        let s = SortSentinels::default();
        assert_eq!(grk(None, None, 42, None).sort_index(&s), Some(42));
        assert_eq!(heb(None, None, 7, None).sort_index(&s), Some(7));

        let mut both_na = heb(None, None, 999_999, None);
        both_na.grk_sort = Some(0);
        assert_eq!(both_na.sort_index(&s), None);
    }

    #[test]
    fn sort_index_falls_back_to_other_family() {
        let s = SortSentinels::default();
        let mut r = grk(None, None, 0, None);
        r.heb_sort = Some(13);
        assert_eq!(r.sort_index(&s), Some(13));

        let mut r = heb(None, None, 0, None);
        r.heb_sort = None;
        r.grk_sort = Some(5);
        assert_eq!(r.sort_index(&s), Some(5));
    }

    #[test]
    fn language_parse() {
        assert_eq!(Language::parse("Greek"), Language::Greek);
        assert_eq!(Language::parse(" Aramaic "), Language::Aramaic);
        assert_eq!(Language::parse("Latin"), Language::Other("Latin".to_string()));
    }
}
