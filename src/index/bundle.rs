use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::align::{AlignStats, VerseCollection};
use crate::io::{ColumnSpec, SortSentinels};

/// 构建元信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleMeta {
    pub source_file: Option<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
    pub columns: Option<ColumnSpec>,
    pub sentinels: SortSentinels,
    pub stats: AlignStats,
}

/// 对齐结果的二进制快照，供 `export` 重新生成文本文件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentBundle {
    pub meta: BundleMeta,
    pub verses: VerseCollection,
}

impl AlignmentBundle {
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let f = std::fs::File::create(path)?;
        let mut w = std::io::BufWriter::new(f);
        bincode::serialize_into(&mut w, self)?;
        Ok(())
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let f = std::fs::File::open(path)?;
        let bundle: Self = bincode::deserialize_from(std::io::BufReader::new(f))?;
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::AlignmentTriple;
    use crate::util::parse_reference;

    #[test]
    fn bundle_survives_disk() {
        let mut verses = VerseCollection::new();
        verses.insert(
            parse_reference("Ruth 1:1").unwrap(),
            AlignmentTriple {
                source: "In the days".to_string(),
                target: "וַיְהִי בִּימֵי".to_string(),
                alignment: "1-1 2-2 3-2".to_string(),
            },
        );
        verses.insert(parse_reference("Ruth 1:2").unwrap(), AlignmentTriple::default());
        let bundle = AlignmentBundle {
            meta: BundleMeta {
                source_file: Some("bsb.tsv".to_string()),
                columns: Some(ColumnSpec::default()),
                ..BundleMeta::default()
            },
            verses,
        };

        let path = std::env::temp_dir().join(format!("bsb-align-bundle-{}.bin", std::process::id()));
        let path = path.to_str().unwrap();
        bundle.save_to_file(path).unwrap();
        let loaded = AlignmentBundle::load_from_file(path).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(loaded, bundle);
        let ruth2 = parse_reference("Ruth 1:2").unwrap();
        assert_eq!(loaded.verses.get(&ruth2), Some(&AlignmentTriple::default()));
    }
}
