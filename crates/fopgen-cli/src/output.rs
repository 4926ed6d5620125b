//! Writing generated text to its destination

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::CliError;

/// Write `content` to `path` through a temporary file and a rename
///
/// Readers never observe a partially written destination.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), CliError> {
    let output_error = |source| CliError::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(output_error)?;
    }

    let temp_path = temp_path_for(path);
    let written = write_file(&temp_path, content).and_then(|()| std::fs::rename(&temp_path, path));
    if let Err(source) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(output_error(source));
    }
    Ok(())
}

/// Write `content` to standard output in one piece
pub fn write_stdout(content: &[u8]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(content).map_err(CliError::Stdout)?;
    handle.flush().map_err(CliError::Stdout)
}

fn write_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::with_capacity(64 * 1024, file);
    writer.write_all(content)?;
    writer.flush()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use crate::output::*;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path_keeps_extension() {
        assert_eq!(
            temp_path_for(Path::new("src/fdl.c")),
            PathBuf::from("src/fdl.c.tmp")
        );
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("gen").join("fdl.c");

        assert!(write_atomic(&path, b"first\n").is_ok());
        assert!(write_atomic(&path, b"second\n").is_ok());

        assert_eq!(std::fs::read(&path).unwrap_or_default(), b"second\n");
        assert!(!temp_path_for(&path).exists());
    }
}
