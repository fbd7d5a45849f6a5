use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no fee strategy registered under '{0}'")]
    UnknownFeeStrategy(String),
    #[error("fee strategy '{name}' could not be constructed")]
    FeeStrategyInit {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
