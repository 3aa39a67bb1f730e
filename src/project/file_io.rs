//! Encoding-aware file I/O.
//!
//! Legacy trees are ISO-8859-1. Latin-1 maps byte-for-byte onto the first
//! 256 Unicode code points, so decoding is a direct widening and encoding a
//! direct narrowing; characters outside Latin-1 degrade to `?` on write.

use std::fs;
use std::path::Path;

use super::error::{MigrationError, MigrationResult};

/// Read a file, decoding ISO-8859-1 into a UTF-8 string.
pub fn read_latin1(path: &Path) -> MigrationResult<String> {
    let bytes = fs::read(path).map_err(|source| MigrationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(bytes.iter().map(|&b| b as char).collect())
}

/// Write a string back as ISO-8859-1.
pub fn write_latin1(path: &Path, contents: &str) -> MigrationResult<()> {
    let bytes: Vec<u8> = contents
        .chars()
        .map(|c| if (c as u32) < 0x100 { c as u8 } else { b'?' })
        .collect();
    fs::write(path, bytes).map_err(|source| MigrationError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Acentuação.php");
        // 0xE7 0xE3 = "çã" in ISO-8859-1
        std::fs::write(&path, [b'<', b'?', b'p', b'h', b'p', b' ', 0xE7, 0xE3]).unwrap();

        let decoded = read_latin1(&path).unwrap();
        assert!(decoded.ends_with("çã"));

        write_latin1(&path, &decoded).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[6..], &[0xE7, 0xE3]);
    }

    #[test]
    fn test_non_latin1_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.php");
        write_latin1(&path, "snowman ☃").unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(*bytes.last().unwrap(), b'?');
    }
}
