pub mod types;
pub mod fingerprint;
pub mod fetcher;

pub use fetcher::{HttpStockSource, StockSource};
pub use fingerprint::Fingerprint;
pub use types::StockSnapshot;
