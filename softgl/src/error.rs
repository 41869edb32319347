use std::io;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("draw range {first}..{end} exceeds the {len} vertices in the buffer")]
    VertexRange { first: usize, end: usize, len: usize },
    #[error("element count {count} exceeds the {len} indices in the buffer")]
    ElementRange { count: usize, len: usize },
    #[error("index {index} out of range for {len} vertices")]
    IndexOutOfRange { index: u32, len: usize },
    #[error("vertex array has no element buffer")]
    NoElementBuffer,
    #[error("framebuffer is empty ({width}x{height})")]
    EmptyFramebuffer { width: u32, height: u32 },
    #[error("I/O: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
