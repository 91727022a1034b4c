use anyhow::{anyhow, Result};
use std::io::Write;
use std::path::Path;

use crate::align::VerseCollection;

pub const VREF_FILE: &str = "vref.txt";
pub const SOURCE_FILE: &str = "bsb_text.txt";
pub const TARGET_FILE: &str = "heb_grk_text.txt";
pub const ALIGNMENT_FILE: &str = "bsb_to_heb_or_grk_alignment.txt";

/// Writes lines joined by '\n' with no trailing newline.
pub fn write_lines<W: Write, S: AsRef<str>>(out: &mut W, lines: impl IntoIterator<Item = S>) -> Result<()> {
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            out.write_all(b"\n")?;
        }
        out.write_all(line.as_ref().as_bytes())?;
    }
    Ok(())
}

fn write_file<S: AsRef<str>>(dir: &Path, name: &str, lines: impl IntoIterator<Item = S>) -> Result<()> {
    let path = dir.join(name);
    let fh = std::fs::File::create(&path)
        .map_err(|e| anyhow!("cannot create '{}': {}", path.display(), e))?;
    let mut out = std::io::BufWriter::new(fh);
    write_lines(&mut out, lines)?;
    out.flush()?;
    Ok(())
}

/// 将经节集合写成四个逐行对应的文本文件
pub fn write_outputs(collection: &VerseCollection, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| anyhow!("cannot create output directory '{}': {}", dir.display(), e))?;

    write_file(dir, VREF_FILE, collection.iter().map(|(k, _)| k.to_string()))?;
    write_file(dir, SOURCE_FILE, collection.iter().map(|(_, t)| t.source.as_str()))?;
    write_file(dir, TARGET_FILE, collection.iter().map(|(_, t)| t.target.as_str()))?;
    write_file(dir, ALIGNMENT_FILE, collection.iter().map(|(_, t)| t.alignment.as_str()))?;

    log::info!("wrote {} verses to {}", collection.len(), dir.display());
    Ok(())
}
