use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bsb_align::align::{self, AlignOpt, CellNotation};
use bsb_align::index::TargetStartIndex;
use bsb_align::io::{Language, Row, SortSentinels};

const CELLS: [&str; 6] = ["and God said", "-", "[the] word {of}", ". . .", "vvv", "let there be light"];

/// Synthetic table: `verses` verses of 12 rows, sort order reversed inside every verse.
fn make_rows(verses: usize) -> Vec<Row> {
    let mut rows = Vec::with_capacity(verses * 12);
    for v in 0..verses {
        let chapter = v / 30 + 1;
        let verse = v % 30 + 1;
        for w in 0..12u32 {
            rows.push(Row {
                number: rows.len() + 1,
                verse_ref: (w == 0).then(|| format!("Genesis {}:{}", chapter, verse)),
                language: Language::Hebrew,
                target_text: Some(format!("w{}", w)),
                heb_sort: Some((v as u32) * 100 + (12 - w)),
                grk_sort: Some(0),
                english: Some(CELLS[w as usize % CELLS.len()].to_string()),
            });
        }
    }
    rows
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify_cells", |b| {
        b.iter(|| {
            for cell in CELLS {
                black_box(CellNotation::classify(black_box(cell)).ok());
            }
        })
    });
}

fn bench_start_index(c: &mut Criterion) {
    let rows = make_rows(1_000);
    let sentinels = SortSentinels::default();
    c.bench_function("target_start_index_12k_rows", |b| {
        b.iter(|| black_box(TargetStartIndex::build(black_box(&rows), &sentinels)))
    });
}

fn bench_align_rows(c: &mut Criterion) {
    let rows = make_rows(1_000);
    let seq = AlignOpt::default();
    let par = AlignOpt { threads: 4, ..AlignOpt::default() };

    c.bench_function("align_rows_12k_sequential", |b| {
        b.iter(|| black_box(align::align_rows_with_opt(black_box(&rows), &seq).ok()))
    });
    c.bench_function("align_rows_12k_4_threads", |b| {
        b.iter(|| black_box(align::align_rows_with_opt(black_box(&rows), &par).ok()))
    });
}

criterion_group!(benches, bench_classify, bench_start_index, bench_align_rows);
criterion_main!(benches);
