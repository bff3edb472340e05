use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasPackerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("rect does not fit within max page size {max_width}x{max_height}: {name} {width}x{height}")]
    RectTooLarge {
        name: String,
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },
    #[error("nothing to pack")]
    Empty,
}

pub type Result<T> = std::result::Result<T, AtlasPackerError>;
