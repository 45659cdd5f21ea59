//! Side channel for receipt encodings that failed root verification.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use shared_types::Hash;
use tracing::warn;

/// Writes one file per rejected receipt set, one hex line per receipt.
#[derive(Debug, Clone)]
pub struct BadReceiptArchive {
    dir: PathBuf,
}

impl BadReceiptArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `badreceipts.<receipts root hex>.<block number>.txt`
    pub fn file_name(receipts_root: &Hash, block_number: u64) -> String {
        format!(
            "badreceipts.{}.{}.txt",
            hex::encode(receipts_root.as_bytes()),
            block_number
        )
    }

    /// Write `receipts` and return the file path.
    pub fn preserve<T: AsRef<[u8]>>(
        &self,
        receipts_root: &Hash,
        block_number: u64,
        receipts: &[T],
    ) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(Self::file_name(receipts_root, block_number));

        let mut file = io::BufWriter::new(fs::File::create(&path)?);
        for receipt in receipts {
            writeln!(file, "{}", hex::encode(receipt.as_ref()))?;
        }
        file.flush()?;

        warn!(block_number, path = %path.display(), count = receipts.len(), "Preserved invalid receipts");
        Ok(path)
    }
}
