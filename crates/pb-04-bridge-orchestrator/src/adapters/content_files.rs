//! Pre-encoded content on local disk.
//!
//! A content file is named `<hex content key>.portalcontent` and holds the
//! raw content value bytes.

use std::fs;
use std::path::{Path, PathBuf};

use pb_02_content_codec::ContentKey;
use pb_03_content_propagation::ContentItem;
use shared_types::decode_hex;

use crate::domain::BridgeError;

pub const CONTENT_FILE_EXTENSION: &str = "portalcontent";

/// File name under which `key` is stored.
pub fn content_file_name(key: &ContentKey) -> String {
    format!("{}.{}", hex::encode(key.to_bytes()), CONTENT_FILE_EXTENSION)
}

fn invalid(path: &Path, reason: impl Into<String>) -> BridgeError {
    BridgeError::InvalidContentFile {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn has_content_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(CONTENT_FILE_EXTENSION)
}

/// Expand `paths` into content files.
///
/// Files are taken as given and must carry the content extension.
/// Directories contribute their own content files, sorted by name; other
/// entries in a directory are ignored.
pub fn discover_content_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, BridgeError> {
    let mut files = Vec::new();
    for path in paths {
        if !path.exists() {
            return Err(invalid(path, "does not exist"));
        }
        if path.is_dir() {
            let entries = fs::read_dir(path).map_err(|e| invalid(path, e.to_string()))?;
            let mut found = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| invalid(path, e.to_string()))?;
                let candidate = entry.path();
                if candidate.is_file() && has_content_extension(&candidate) {
                    found.push(candidate);
                }
            }
            found.sort();
            files.extend(found);
        } else if path.is_file() {
            if !has_content_extension(path) {
                return Err(invalid(
                    path,
                    format!("content files must end in .{CONTENT_FILE_EXTENSION}"),
                ));
            }
            files.push(path.clone());
        } else {
            return Err(invalid(path, "not a regular file"));
        }
    }
    Ok(files)
}

/// Content key encoded in the file stem.
pub fn parse_content_key(path: &Path) -> Result<ContentKey, BridgeError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| invalid(path, "file name is not valid UTF-8"))?;
    let bytes = decode_hex(stem)
        .map_err(|e| invalid(path, format!("file names must be hex-encoded content keys: {e}")))?;
    ContentKey::from_bytes(&bytes).map_err(|e| invalid(path, e.to_string()))
}

/// Validate every path first, then read each value.
pub fn load_content_files(paths: &[PathBuf]) -> Result<Vec<ContentItem>, BridgeError> {
    let files = discover_content_files(paths)?;
    let keys = files
        .iter()
        .map(|file| parse_content_key(file))
        .collect::<Result<Vec<_>, _>>()?;

    files
        .iter()
        .zip(keys)
        .map(|(file, key)| {
            let value = fs::read(file).map_err(|e| invalid(file, e.to_string()))?;
            Ok(ContentItem::new(key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_02_content_codec::ContentType;
    use shared_types::Hash;

    fn write(dir: &Path, name: &str, value: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, value).unwrap();
        path
    }

    #[test]
    fn test_file_name_round_trips_key() {
        let key = ContentKey::new(ContentType::BlockBody, Hash::repeat_byte(0x11));
        let name = content_file_name(&key);
        assert!(name.starts_with("01"));
        assert_eq!(parse_content_key(Path::new(&name)).unwrap(), key);
    }

    #[test]
    fn test_prefixed_stem_accepted() {
        let name = format!("0x00{}.portalcontent", "22".repeat(32));
        let key = parse_content_key(Path::new(&name)).unwrap();
        assert_eq!(key.content_type, ContentType::BlockHeader);
        assert_eq!(key.block_hash, Hash::repeat_byte(0x22));
    }

    #[test]
    fn test_directory_contributes_sorted_content_files() {
        let dir = tempfile::tempdir().unwrap();
        let b = ContentKey::new(ContentType::Receipts, Hash::repeat_byte(2));
        let a = ContentKey::new(ContentType::BlockHeader, Hash::repeat_byte(1));
        write(dir.path(), &content_file_name(&b), b"receipts");
        write(dir.path(), &content_file_name(&a), b"header");
        write(dir.path(), "notes.txt", b"ignored");

        let items = load_content_files(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].key, a);
        assert_eq!(items[0].value, b"header");
        assert_eq!(items[1].key, b);
    }

    #[test]
    fn test_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.portalcontent");
        let err = discover_content_files(&[missing]).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_rejects_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), &format!("00{}.bin", "33".repeat(32)), b"x");
        let err = discover_content_files(&[path]).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidContentFile { .. }));
    }

    #[test]
    fn test_rejects_non_hex_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "header.portalcontent", b"x");
        let err = load_content_files(&[path]).unwrap_err();
        assert!(err.to_string().contains("hex-encoded"));
    }

    #[test]
    fn test_rejects_bad_key_before_reading_any_value() {
        let dir = tempfile::tempdir().unwrap();
        let good = ContentKey::new(ContentType::BlockHeader, Hash::repeat_byte(4));
        let good_path = write(dir.path(), &content_file_name(&good), b"v");
        let bad_path = write(dir.path(), "0503.portalcontent", b"v");
        let err = load_content_files(&[good_path, bad_path]).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidContentFile { .. }));
    }
}
