use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use serde::Serialize;

/// Writes `value` as pretty JSON followed by a newline, to `path` or to
/// stdout when no path is given.
pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))
        }
        None => write_json(io::stdout().lock(), value).context("Failed to write JSON to stdout"),
    }
}

fn write_json<W, T>(mut writer: W, value: &T) -> io::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    #[test]
    fn test_write_json_ends_with_newline() {
        let mut buf = vec![];
        write_json(&mut buf, &serde_json::json!({ "score": 42 })).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\n  \"score\": 42\n}\n");
    }

    #[test]
    fn test_save_json_to_file() {
        let path = env::temp_dir().join(format!("blockfall-output-{}.json", process::id()));
        save_json(&[1, 2], Some(&path)).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(text, "[\n  1,\n  2\n]\n");
    }

    #[test]
    fn test_create_error_names_path() {
        let path = env::temp_dir().join("blockfall-missing-dir").join("out.json");
        let err = save_json(&0, Some(&path)).unwrap_err();
        assert!(err.to_string().contains(&path.display().to_string()));
    }
}
