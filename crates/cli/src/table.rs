use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

/// On-disk table encodings, chosen by output extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Csv,
    Parquet,
}

impl Format {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => Format::Parquet,
            _ => Format::Csv,
        }
    }
}

/// Write `df` to `out`, creating parent directories as needed.
pub fn write(df: &mut DataFrame, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    match Format::for_path(out) {
        Format::Csv => CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .with_context(|| format!("writing csv {}", out.display()))?,
        Format::Parquet => {
            ParquetWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("writing parquet {}", out.display()))?;
        }
    }
    tracing::debug!(rows = df.height(), cols = df.width(), out = %out.display(), "table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use tempfile::tempdir;

    #[test]
    fn format_follows_extension() {
        assert_eq!(Format::for_path(Path::new("a/b.parquet")), Format::Parquet);
        assert_eq!(Format::for_path(Path::new("a/b.PARQUET")), Format::Parquet);
        assert_eq!(Format::for_path(Path::new("a/b.csv")), Format::Csv);
        assert_eq!(Format::for_path(Path::new("a/b")), Format::Csv);
    }

    #[test]
    fn csv_has_header_and_rows() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested/profile.csv");
        let mut df = df!("cut_length" => [1u32, 2, 3], "entropy" => [0.5, 1.0, 0.5]).unwrap();
        write(&mut df, &out).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("cut_length,entropy"));
        assert_eq!(lines.count(), 3);
    }

    #[test]
    fn parquet_file_is_written() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("lengths.parquet");
        let mut df = df!("length" => [1u32, 2], "geodesics" => [4u64, 0]).unwrap();
        write(&mut df, &out).unwrap();
        let bytes = fs::read(&out).unwrap();
        assert_eq!(&bytes[..4], b"PAR1");
    }
}
