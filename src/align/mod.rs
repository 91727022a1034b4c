use anyhow::{anyhow, Result};
use std::path::Path;

use crate::index::bundle::{AlignmentBundle, BundleMeta};
use crate::index::TargetStartIndex;
use crate::io::{self, ColumnSpec, Row, SortSentinels};

pub mod notation;
pub mod parallel;
pub mod transducer;
pub mod verse;

pub use notation::{split_cell, CellNotation, Segment, SpanKind};
pub use parallel::{partition_by_verse, transduce_parallel};
pub use transducer::{transduce, AlignStats, Transducer, VerseState};
pub use verse::{AlignmentTriple, VerseAccumulator, VerseCollection};

/// 对齐运行参数
#[derive(Debug, Clone, Copy)]
pub struct AlignOpt {
    pub sentinels: SortSentinels,
    /// 1 = sequential; more uses verse-partitioned rayon workers
    pub threads: usize,
}

impl Default for AlignOpt {
    fn default() -> Self {
        Self { sentinels: SortSentinels::default(), threads: 1 }
    }
}

/// 两遍处理：先建起始索引，再逐行转换
pub fn align_rows_with_opt(rows: &[Row], opt: &AlignOpt) -> Result<(VerseCollection, AlignStats)> {
    if rows.is_empty() {
        log::warn!("input has no rows");
        return Ok((VerseCollection::new(), AlignStats::default()));
    }

    let starts = TargetStartIndex::build(rows, &opt.sentinels);
    if starts.is_empty() {
        log::warn!("no verse carries a usable sort index; nothing to align");
        let stats = AlignStats { rows: rows.len(), ..AlignStats::default() };
        return Ok((VerseCollection::new(), stats));
    }
    log::debug!("target start index covers {} verses", starts.len());

    if opt.threads <= 1 {
        return Ok(transducer::transduce(rows, &starts, opt.sentinels));
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads)
        .build()
        .map_err(|e| anyhow!("cannot build thread pool with {} threads: {}", opt.threads, e))?;
    Ok(pool.install(|| parallel::transduce_parallel(rows, &starts, opt.sentinels)))
}

/// 读取表格、对齐、写出四个文本文件，可选保存 bincode 包
pub fn align_table_with_opt(
    table_path: &str,
    columns: &ColumnSpec,
    out_dir: &Path,
    bundle_path: Option<&str>,
    opt: AlignOpt,
) -> Result<AlignStats> {
    let rows = io::read_table(table_path, columns)?;
    log::info!("read {} rows from {}", rows.len(), table_path);

    let (verses, stats) = align_rows_with_opt(&rows, &opt)?;
    io::output::write_outputs(&verses, out_dir)?;

    if let Some(p) = bundle_path {
        let bundle = AlignmentBundle {
            meta: BundleMeta {
                source_file: Some(table_path.to_string()),
                build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
                build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
                columns: Some(columns.clone()),
                sentinels: opt.sentinels,
                stats,
            },
            verses,
        };
        bundle
            .save_to_file(p)
            .map_err(|e| anyhow!("cannot write bundle to '{}': {}", p, e))?;
        log::info!("alignment bundle saved: {}", p);
    }
    Ok(stats)
}
