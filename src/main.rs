use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use bsb_align::align::{self, AlignOpt};
use bsb_align::index::bundle::AlignmentBundle;
use bsb_align::io::{self, ColumnSpec, Delimiter, SortSentinels};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "bsb-align", author, version, about = "Word alignment from Berean interlinear tables in Pharaoh format", arg_required_else_help = true)]
struct Cli {
    /// 1=error, 2=warning, 3=info, 4=debug, 5+=trace
    #[arg(short = 'v', long = "verbosity", default_value_t = 3, global = true)]
    verbosity: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Align an interlinear table and write vref / source / target / alignment files
    Align {
        /// Interlinear table exported as TSV or CSV
        table: String,
        /// Output directory
        #[arg(short, long, default_value = "output")]
        out: PathBuf,
        /// Also save a binary bundle of the result
        #[arg(short, long)]
        bundle: Option<String>,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
        /// tab or comma
        #[arg(long, default_value = "tab")]
        delimiter: Delimiter,
        /// Lines before the header row
        #[arg(long = "skip-lines", default_value_t = 0)]
        skip_lines: usize,
        #[arg(long = "verse-col", default_value = "Verse")]
        verse_col: String,
        #[arg(long = "language-col", default_value = "Language")]
        language_col: String,
        #[arg(long = "target-col", default_value = "WLC / Nestle Base {TR} ⧼RP⧽ (WH) 〈NE〉 [NA] ‹SBL› [[ECM]]")]
        target_col: String,
        #[arg(long = "heb-sort-col", default_value = "Heb Sort")]
        heb_sort_col: String,
        #[arg(long = "grk-sort-col", default_value = "Grk Sort")]
        grk_sort_col: String,
        #[arg(long = "english-col", default_value = "BSB Version")]
        english_col: String,
        /// Hebrew sort value meaning "not applicable"
        #[arg(long = "heb-sentinel", default_value_t = 999_999)]
        heb_sentinel: u32,
        /// Greek sort value meaning "not applicable"
        #[arg(long = "grk-sentinel", default_value_t = 0)]
        grk_sentinel: u32,
    },
    /// Re-emit the four text files from a saved bundle
    Export {
        bundle: String,
        #[arg(short, long, default_value = "output")]
        out: PathBuf,
    },
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbosity);

    match cli.command {
        Commands::Align {
            table,
            out,
            bundle,
            threads,
            delimiter,
            skip_lines,
            verse_col,
            language_col,
            target_col,
            heb_sort_col,
            grk_sort_col,
            english_col,
            heb_sentinel,
            grk_sentinel,
        } => {
            let columns = ColumnSpec {
                verse: verse_col,
                language: language_col,
                target: target_col,
                heb_sort: heb_sort_col,
                grk_sort: grk_sort_col,
                english: english_col,
                delimiter,
                skip_lines,
            };
            let opt = AlignOpt {
                sentinels: SortSentinels { hebrew: heb_sentinel, greek: grk_sentinel },
                threads,
            };
            run_align(&table, &columns, &out, bundle.as_deref(), opt)
        }
        Commands::Export { bundle, out } => run_export(&bundle, &out),
    }
}

fn run_align(
    table: &str,
    columns: &ColumnSpec,
    out: &Path,
    bundle: Option<&str>,
    opt: AlignOpt,
) -> Result<()> {
    let stats = align::align_table_with_opt(table, columns, out, bundle, opt)?;
    log::info!(
        "rows: {}, verses: {}, skipped rows: {}, orphan rows: {}",
        stats.rows,
        stats.verses,
        stats.skipped_rows,
        stats.orphan_rows
    );
    Ok(())
}

fn run_export(bundle_path: &str, out: &Path) -> Result<()> {
    let bundle = AlignmentBundle::load_from_file(bundle_path)
        .map_err(|e| anyhow!("cannot load bundle '{}': {}", bundle_path, e))?;
    if let Some(ts) = &bundle.meta.build_timestamp {
        log::info!("bundle built {} from {}", ts, bundle.meta.source_file.as_deref().unwrap_or("?"));
    }
    io::output::write_outputs(&bundle.verses, out)
}
