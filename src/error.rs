use derive_more::{Display, Error, From};

#[derive(Debug, Display, Error, From)]
pub enum StoreError {
    Io(std::io::Error),
    Encoding(serde_json::Error),
}

#[derive(Debug, Display, Error, From)]
pub enum FilterError {
    #[display("host filter chain unavailable")]
    ChainUnavailable,
    #[display("host rejected filter: {reason}")]
    Rejected { reason: String },
}
