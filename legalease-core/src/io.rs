//! `read_csv`: the single point where the analyzer touches the filesystem.
//! Reads a dataset's sibling `policy.txt`/`meta.txt`; `data.csv` itself is
//! never opened.

use std::fs;
use std::io::{Error, ErrorKind};
use std::path::Path;

use legalease_error::LegaleaseResult;
use legalease_parse::{parse_policy, ColumnSet};

use crate::dataframe::DataFrame;

/// Reads `<dirname>/policy.txt` and `<dirname>/meta.txt` next to `csv_path`
/// and returns the resulting abstract `DataFrame`. `data.csv` itself is never
/// opened: the analyzer never interprets actual data values, only the
/// policy and schema declared alongside it.
pub fn read_csv(csv_path: impl AsRef<Path>) -> LegaleaseResult<DataFrame> {
    let csv_path = csv_path.as_ref();
    let dir = csv_path.parent().unwrap_or_else(|| Path::new("."));

    let policy_path = dir.join("policy.txt");
    let policy_src = fs::read_to_string(&policy_path)?;
    let policy = parse_policy(policy_src.trim())?;
    tracing::debug!("policy of input data {}:\n{policy}", csv_path.display());

    let meta_path = dir.join("meta.txt");
    let meta_src = fs::read_to_string(&meta_path)?;
    let mut lines = meta_src.lines();

    let schema_line = lines.next().ok_or_else(|| {
        Error::new(ErrorKind::InvalidData, format!("{} is empty, expected a schema line", meta_path.display()))
    })?;
    let schema: Vec<String> = schema_line
        .split(',')
        .map(|s| s.trim().trim_matches('"').to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if schema.is_empty() {
        return Err(Error::new(ErrorKind::InvalidData, format!("{} declares an empty schema", meta_path.display())).into());
    }

    let rows_line = lines.next().ok_or_else(|| {
        Error::new(ErrorKind::InvalidData, format!("{} is missing a row-count line", meta_path.display()))
    })?;
    let rows: usize = rows_line.trim().parse().map_err(|_| {
        Error::new(ErrorKind::InvalidData, format!("invalid row count '{}' in {}", rows_line.trim(), meta_path.display()))
    })?;

    let shape = (schema.len(), rows);
    Ok(DataFrame::new(ColumnSet::new(schema), policy, shape))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use uuid::Uuid;

    use super::*;

    struct Scratch(std::path::PathBuf);

    impl Scratch {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("legalease-io-test-{}", Uuid::new_v4()));
            fs::create_dir_all(&dir).unwrap();
            Scratch(dir)
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn reads_policy_and_schema_from_sibling_files() {
        let dir = Scratch::new();
        fs::write(dir.0.join("policy.txt"), "ALLOW FILTER age >= 18").unwrap();
        fs::write(dir.0.join("meta.txt"), "age,\"gender\",race\n120\n").unwrap();
        fs::write(dir.0.join("data.csv"), "age,gender,race\n40,M,white\n").unwrap();

        let df = read_csv(dir.0.join("data.csv")).unwrap();
        assert_eq!(df.shape, (3, 120));
        assert!(df.schema.contains("age"));
        assert!(df.schema.contains("gender"));
        assert!(!df.policy.is_sat());
    }

    #[test]
    fn missing_policy_file_is_an_io_error() {
        let dir = Scratch::new();
        fs::write(dir.0.join("meta.txt"), "age\n10\n").unwrap();
        assert!(read_csv(dir.0.join("data.csv")).is_err());
    }

    #[test]
    fn malformed_row_count_is_an_io_error() {
        let dir = Scratch::new();
        fs::write(dir.0.join("policy.txt"), "ALLOW ROLE ANALYST").unwrap();
        fs::write(dir.0.join("meta.txt"), "age,gender\nnot-a-number\n").unwrap();
        assert!(read_csv(dir.0.join("data.csv")).is_err());
    }
}
