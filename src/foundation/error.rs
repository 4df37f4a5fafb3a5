use std::path::PathBuf;

pub type InsigniaResult<T> = Result<T, InsigniaError>;

#[derive(thiserror::Error, Debug)]
pub enum InsigniaError {
    #[error("invalid output target: {0}")]
    InvalidExtension(String),

    #[error("empty text: {0}")]
    EmptyText(String),

    #[error("text too long: {0}")]
    TextTooLong(String),

    #[error("asset load error: {0}")]
    AssetLoad(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("encode/write error for '{path}': {message}")]
    EncodeWrite { path: PathBuf, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InsigniaError {
    pub fn invalid_extension(msg: impl Into<String>) -> Self {
        Self::InvalidExtension(msg.into())
    }

    pub fn empty_text(msg: impl Into<String>) -> Self {
        Self::EmptyText(msg.into())
    }

    pub fn text_too_long(msg: impl Into<String>) -> Self {
        Self::TextTooLong(msg.into())
    }

    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn encode_write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::EncodeWrite {
            path: path.into(),
            message: message.into(),
        }
    }
}
