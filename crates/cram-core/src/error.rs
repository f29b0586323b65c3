use thiserror::Error;

#[derive(Debug, Error)]
pub enum CramError {
    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("nothing to pack: no images have been added")]
    Empty,

    #[error(
        "not enough room: atlas would need to exceed max dimension {max_dimension} \
         (last attempt {attempted_width}x{attempted_height})"
    )]
    NotEnoughRoom {
        attempted_width: u32,
        attempted_height: u32,
        max_dimension: u32,
    },

    #[error(
        "invalid blit: source rect {src_w}x{src_h} does not match destination rect {dst_w}x{dst_h}"
    )]
    InvalidBlit {
        src_w: u32,
        src_h: u32,
        dst_w: u32,
        dst_h: u32,
    },
}

pub type Result<T> = std::result::Result<T, CramError>;
