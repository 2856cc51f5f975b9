pub mod chain_directory;
pub mod client;
pub mod error;
pub mod fetcher;
pub mod normalizer;
pub mod source;
pub mod types;

pub use chain_directory::{ChainDirectory, UNKNOWN_CHAIN};
pub use client::{validate_wallet_address, LifiClient};
pub use error::LifiError;
pub use fetcher::{FetchInterruption, FetchedTransfers, TransferFetcher, DEFAULT_PAGE_DELAY};
pub use normalizer::RecordNormalizer;
pub use source::{ChainListSource, TransferPageSource};
pub use types::*;
