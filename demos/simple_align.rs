//! 演示如何在 library 模式下使用 bsb-align 生成 Pharaoh 对齐。
//!
//! 运行方式：
//! ```bash
//! cargo run --example simple_align
//! ```

use bsb_align::align::{self, AlignOpt, CellNotation, VerseAccumulator};
use bsb_align::index::TargetStartIndex;
use bsb_align::io::{Language, Row, SortSentinels};

fn grk(verse_ref: Option<&str>, target: &str, sort: u32, english: &str) -> Row {
    Row {
        number: 0,
        verse_ref: verse_ref.map(str::to_string),
        language: Language::Greek,
        target_text: Some(target.to_string()),
        heb_sort: Some(999_999),
        grk_sort: Some(sort),
        english: Some(english.to_string()),
    }
}

fn main() {
    // 1. 构造 John 3:16 开头几行（表格按英文顺序，原文排序值乱序）
    let rows = vec![
        grk(Some("John 3:16"), "Οὕτως", 1, "For"),
        grk(None, "θεὸς", 4, "God"),
        grk(None, "ἠγάπησεν", 2, "so loved"),
        grk(None, "γὰρ", 3, ". . ."),
        grk(None, "ὁ", 5, "-"),
        grk(None, "τὸν", 6, "the [whole]"),
        grk(None, "κόσμον", 7, "world"),
        grk(Some("John 3:17"), "οὐ", 20, "vvv"),
        grk(None, "ἀπέστειλεν", 21, "did not send"),
    ];

    // 2. 单元格分类
    println!("单元格记号:");
    for r in &rows {
        let cell = r.english.as_deref().unwrap_or("");
        println!("  {:<14} -> {:?}", format!("{:?}", cell), CellNotation::classify(cell));
    }

    // 3. 起始索引
    let sentinels = SortSentinels::default();
    let starts = TargetStartIndex::build(&rows, &sentinels);
    println!("\n起始索引覆盖 {} 个经节", starts.len());

    // 4. 单独使用累加器
    let mut acc = VerseAccumulator::default();
    for (cell, target) in [("vvv", Some(1)), ("he gave", Some(2))] {
        if let Err(e) = align::split_cell(&mut acc, cell, target) {
            println!("split failed: {}", e);
        }
    }
    println!("累加器对齐: {:?}", acc.pairs);

    // 5. 完整对齐
    match align::align_rows_with_opt(&rows, &AlignOpt::default()) {
        Ok((verses, stats)) => {
            for (key, t) in verses.iter() {
                println!("\n{}", key);
                println!("  source:    {}", t.source);
                println!("  target:    {}", t.target);
                println!("  alignment: {}", t.alignment);
            }
            println!("\n{:?}", stats);
        }
        Err(e) => println!("alignment failed: {}", e),
    }

    println!("\n完成！");
}
