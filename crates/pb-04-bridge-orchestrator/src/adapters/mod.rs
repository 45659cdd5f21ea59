pub mod bad_receipts;
pub mod content_files;
pub mod web3_source;

pub use bad_receipts::BadReceiptArchive;
pub use content_files::{content_file_name, discover_content_files, load_content_files, CONTENT_FILE_EXTENSION};
pub use web3_source::Web3ChainSource;
