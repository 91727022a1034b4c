use anyhow::{anyhow, bail, Result};
use csv_core::ReadRecordResult;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::str::FromStr;

use super::row::{Language, Row};

/// 字段分隔符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delimiter {
    Tab,
    Comma,
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "tab" | "\t" | "tsv" => Ok(Delimiter::Tab),
            "comma" | "," | "csv" => Ok(Delimiter::Comma),
            other => Err(format!("unknown delimiter '{}', expected 'tab' or 'comma'", other)),
        }
    }
}

/// 输入表格的列名与格式配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub verse: String,
    pub language: String,
    pub target: String,
    pub heb_sort: String,
    pub grk_sort: String,
    pub english: String,
    pub delimiter: Delimiter,
    /// lines before the header row
    pub skip_lines: usize,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            verse: "Verse".to_string(),
            language: "Language".to_string(),
            target: "WLC / Nestle Base {TR} ⧼RP⧽ (WH) 〈NE〉 [NA] ‹SBL› [[ECM]]".to_string(),
            heb_sort: "Heb Sort".to_string(),
            grk_sort: "Grk Sort".to_string(),
            english: "BSB Version".to_string(),
            delimiter: Delimiter::Tab,
            skip_lines: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    verse: usize,
    language: usize,
    target: usize,
    heb_sort: usize,
    grk_sort: usize,
    english: usize,
}

/// 流式读取分隔符表格，逐条记录产出 [`Row`]
///
/// 记录边界交给 `csv_core` 决定：逗号模式下带引号的字段可以跨行。
pub struct TableReader<R: BufRead> {
    reader: R,
    csv: csv_core::Reader,
    out: Vec<u8>,
    ends: Vec<usize>,
    fields: Vec<String>,
    cols: ColumnIndices,
    record_no: usize,
    row_no: usize,
    done: bool,
}

impl<R: BufRead> TableReader<R> {
    /// Skips the preamble, reads the header record and resolves every configured column.
    pub fn new(mut reader: R, spec: &ColumnSpec) -> Result<Self> {
        // preamble is free text, not part of the table
        let mut line = String::new();
        for _ in 0..spec.skip_lines {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                bail!("table ended inside the {}-line preamble", spec.skip_lines);
            }
        }

        let mut this = Self {
            reader,
            csv: csv_reader(spec.delimiter),
            out: vec![0; 4096],
            ends: vec![0; 16],
            fields: Vec::new(),
            cols: ColumnIndices { verse: 0, language: 0, target: 0, heb_sort: 0, grk_sort: 0, english: 0 },
            record_no: 0,
            row_no: 0,
            done: false,
        };

        if !this.read_record()? {
            bail!("table has no header row");
        }
        let header: Vec<String> = this
            .fields
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let find = |name: &str| -> Result<usize> {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| anyhow!("column '{}' not found in table header", name))
        };
        this.cols = ColumnIndices {
            verse: find(&spec.verse)?,
            language: find(&spec.language)?,
            target: find(&spec.target)?,
            heb_sort: find(&spec.heb_sort)?,
            grk_sort: find(&spec.grk_sort)?,
            english: find(&spec.english)?,
        };
        Ok(this)
    }

    /// 读取下一条记录到 `self.fields`；输入结束返回 `false`
    fn read_record(&mut self) -> Result<bool> {
        let (mut outlen, mut endlen) = (0, 0);
        loop {
            let input = self.reader.fill_buf()?;
            let (res, nin, nout, nend) =
                self.csv
                    .read_record(input, &mut self.out[outlen..], &mut self.ends[endlen..]);
            self.reader.consume(nin);
            outlen += nout;
            endlen += nend;

            match res {
                ReadRecordResult::InputEmpty => {}
                ReadRecordResult::OutputFull => {
                    let n = self.out.len() * 2;
                    self.out.resize(n, 0);
                }
                ReadRecordResult::OutputEndsFull => {
                    let n = self.ends.len() * 2;
                    self.ends.resize(n, 0);
                }
                ReadRecordResult::Record => {
                    self.record_no += 1;
                    self.fields.clear();
                    let mut start = 0;
                    for &end in &self.ends[..endlen] {
                        let field = std::str::from_utf8(&self.out[start..end]).map_err(|e| {
                            anyhow!("record {}: invalid UTF-8: {}", self.record_no, e)
                        })?;
                        self.fields.push(field.to_string());
                        start = end;
                    }
                    return Ok(true);
                }
                ReadRecordResult::End => return Ok(false),
            }
        }
    }

    pub fn next_row(&mut self) -> Result<Option<Row>> {
        if self.done {
            return Ok(None);
        }
        loop {
            if !self.read_record()? {
                self.done = true;
                return Ok(None);
            }
            if self.fields.iter().any(|f| !f.trim().is_empty()) {
                break;
            }
        }

        let fields = &self.fields;
        let cell = |i: usize| -> Option<String> {
            fields
                .get(i)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let number = self.row_no + 1;
        let row = Row {
            number,
            verse_ref: cell(self.cols.verse),
            language: Language::parse(cell(self.cols.language).as_deref().unwrap_or("")),
            target_text: cell(self.cols.target),
            heb_sort: cell(self.cols.heb_sort).as_deref().and_then(parse_sort),
            grk_sort: cell(self.cols.grk_sort).as_deref().and_then(parse_sort),
            english: cell(self.cols.english),
        };
        self.row_no = number;
        Ok(Some(row))
    }

    /// Drains the reader.
    pub fn read_all(&mut self) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row()? {
            rows.push(row);
        }
        Ok(rows)
    }
}

/// 打开文件并读取全部行
pub fn read_table(path: &str, spec: &ColumnSpec) -> Result<Vec<Row>> {
    let fh = std::fs::File::open(path)
        .map_err(|e| anyhow!("cannot open table '{}': {}", path, e))?;
    let mut reader = TableReader::new(std::io::BufReader::new(fh), spec)
        .map_err(|e| anyhow!("'{}': {}", path, e))?;
    reader.read_all()
}

/// 排序列可能被导出成 "12" 或 "12.0"；无法解析时视为缺失
fn parse_sort(s: &str) -> Option<u32> {
    if let Ok(v) = s.parse::<u32>() {
        return Some(v);
    }
    let f: f64 = s.parse().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
        Some(f as u32)
    } else {
        None
    }
}

fn csv_reader(delimiter: Delimiter) -> csv_core::Reader {
    let mut builder = csv_core::ReaderBuilder::new();
    match delimiter {
        // BSB 的 TSV 导出里引号是正文的一部分
        Delimiter::Tab => builder.delimiter(b'\t').quoting(false),
        Delimiter::Comma => builder.delimiter(b','),
    };
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn small_spec(delimiter: Delimiter) -> ColumnSpec {
        ColumnSpec {
            target: "Target".to_string(),
            delimiter,
            ..ColumnSpec::default()
        }
    }

    #[test]
    fn parse_simple_tsv() {
        let data = "Verse\tLanguage\tTarget\tHeb Sort\tGrk Sort\tBSB Version\n\
                    John 3:16\tGreek\tΟὕτως\t999999\t1\tFor\n\
                    \tGreek\tγὰρ\t999999.0\t2\t - \n";
        let mut r = TableReader::new(Cursor::new(data), &small_spec(Delimiter::Tab)).unwrap();

        let r1 = r.next_row().unwrap().unwrap();
        assert_eq!(r1.number, 1);
        assert_eq!(r1.verse_ref.as_deref(), Some("John 3:16"));
        assert_eq!(r1.language, Language::Greek);
        assert_eq!(r1.target_text.as_deref(), Some("Οὕτως"));
        assert_eq!(r1.heb_sort, Some(999_999));
        assert_eq!(r1.grk_sort, Some(1));
        assert_eq!(r1.english.as_deref(), Some("For"));

        let r2 = r.next_row().unwrap().unwrap();
        assert_eq!(r2.number, 2);
        assert_eq!(r2.verse_ref, None);
        assert_eq!(r2.heb_sort, Some(999_999));
        assert_eq!(r2.english.as_deref(), Some("-"));

        assert!(r.next_row().unwrap().is_none());
        assert!(r.next_row().unwrap().is_none());
    }

    #[test]
    fn parse_csv_with_quotes_preamble_and_crlf() {
        let data = "exported sheet\r\n\
                    Verse,Language,Target,Heb Sort,Grk Sort,BSB Version\r\n\
                    \r\n\
                    \"Genesis 1:1\",Hebrew,בְּרֵאשִׁ֖ית,1,0,\"In [the] beginning, \"\"God\"\"\"\r\n";
        let spec = ColumnSpec { skip_lines: 1, ..small_spec(Delimiter::Comma) };
        let mut r = TableReader::new(Cursor::new(data), &spec).unwrap();
        let rows = r.read_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].verse_ref.as_deref(), Some("Genesis 1:1"));
        assert_eq!(rows[0].language, Language::Hebrew);
        assert_eq!(rows[0].grk_sort, Some(0));
        assert_eq!(rows[0].english.as_deref(), Some("In [the] beginning, \"God\""));
    }

    #[test]
    fn missing_column_is_error() {
        let data = "Verse\tLanguage\tHeb Sort\n";
        let err = TableReader::new(Cursor::new(data), &small_spec(Delimiter::Tab))
            .err()
            .expect("missing column");
        assert!(err.to_string().contains("Target"));
    }

    #[test]
    fn quoted_field_may_span_lines() {
        let data = "Verse,Language,Target,Heb Sort,Grk Sort,BSB Version\n\
                    John 1:1,Greek,Ἐν,0,1,\"In the\nbeginning\"\n\
                    ,Greek,ἦν,0,2,was\n";
        let mut r = TableReader::new(Cursor::new(data), &small_spec(Delimiter::Comma)).unwrap();
        let rows = r.read_all().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].english.as_deref(), Some("In the\nbeginning"));
        assert_eq!(rows[1].number, 2);
        assert_eq!(rows[1].target_text.as_deref(), Some("ἦν"));
        assert_eq!(rows[1].english.as_deref(), Some("was"));
    }

    #[test]
    fn tab_mode_keeps_quotes_literal() {
        let data = "Verse\tLanguage\tTarget\tHeb Sort\tGrk Sort\tBSB Version\n\
                    John 1:1\tGreek\t\"Ἐν\t0\t1\t\"In\n";
        let mut r = TableReader::new(Cursor::new(data), &small_spec(Delimiter::Tab)).unwrap();
        let row = r.next_row().unwrap().unwrap();
        assert_eq!(row.target_text.as_deref(), Some("\"Ἐν"));
        assert_eq!(row.english.as_deref(), Some("\"In"));
        assert!(r.next_row().unwrap().is_none());
    }

    #[test]
    fn last_record_without_newline_and_bom_header() {
        let data = "\u{feff}Verse,Language,Target,Heb Sort,Grk Sort,BSB Version\n\
                    Jude 1:1,Greek,Ἰούδας,0,1,Jude";
        let mut r = TableReader::new(Cursor::new(data), &small_spec(Delimiter::Comma)).unwrap();
        let rows = r.read_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].english.as_deref(), Some("Jude"));
    }

    #[test]
    fn parse_sort_variants() {
        assert_eq!(parse_sort("12"), Some(12));
        assert_eq!(parse_sort("12.0"), Some(12));
        assert_eq!(parse_sort("12.5"), None);
        assert_eq!(parse_sort("nan"), None);
        assert_eq!(parse_sort("-3"), None);
    }

    #[test]
    fn delimiter_from_str() {
        assert_eq!("tab".parse::<Delimiter>(), Ok(Delimiter::Tab));
        assert_eq!(",".parse::<Delimiter>(), Ok(Delimiter::Comma));
        assert!("pipe".parse::<Delimiter>().is_err());
    }
}
