//! # bsb-align
//!
//! 将 Berean 逐词对照表（每行一个希伯来文 / 希腊文词，附带经节引用、排序值与英文渲染单元格）
//! 转换为英文译文与原文之间的词级对齐，输出 Pharaoh 格式（每节一行 `S-T` 对）。
//!
//! 处理分两遍：
//!
//! - **起始索引**：整表扫描，求每个经节的最小原文排序值
//! - **行转换**：按表格顺序逐行处理，解析英文单元格中的对齐记号并累积到当前经节，
//!   遇到下一个经节引用时输出上一节的三元组
//!
//! ## 快速示例
//!
//! ```rust
//! use bsb_align::align::{self, AlignOpt};
//! use bsb_align::io::{Language, Row};
//!
//! let row = |r: Option<&str>, t: &str, sort: u32, en: &str| Row {
//!     number: 0,
//!     verse_ref: r.map(str::to_string),
//!     language: Language::Greek,
//!     target_text: Some(t.to_string()),
//!     heb_sort: None,
//!     grk_sort: Some(sort),
//!     english: Some(en.to_string()),
//! };
//! let rows = vec![
//!     row(Some("John 11:35"), "ἐδάκρυσεν", 2, "wept"),
//!     row(None, "Ἰησοῦς", 1, "Jesus"),
//! ];
//!
//! let (verses, _stats) = align::align_rows_with_opt(&rows, &AlignOpt::default()).unwrap();
//! let (key, triple) = verses.iter().next().unwrap();
//! assert_eq!(key.to_string(), "JHN 11:35");
//! assert_eq!(triple.source, "wept Jesus");
//! assert_eq!(triple.target, "Ἰησοῦς ἐδάκρυσεν");
//! assert_eq!(triple.alignment, "1-2 2-1");
//! ```
//!
//! ## 英文单元格记号
//!
//! | 记号 | 含义 |
//! |------|------|
//! | `-` | 本行英文不对齐 |
//! | `[...]` | 增译文本，输出但不对齐 |
//! | `{...}` | 规范化文本，输出但不对齐 |
//! | `. . .` | 上一个单元格的词同时对齐到本行原文词 |
//! | `vvv` | 本行原文词对齐到后续第一个英文词 |
//!
//! ## 模块说明
//!
//! - [`io`] — 行模型、表格读取、四个输出文件
//! - [`util`] — 书卷名表、经节引用解析
//! - [`index`] — 经节起始索引、bincode 结果包
//! - [`align`] — 记号拆分、经节累加器、行转换状态机、按经节并行
//! - [`error`] — 行级错误类型

pub mod error;
pub mod io;
pub mod index;
pub mod util;
pub mod align;
