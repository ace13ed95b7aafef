use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which side of the comparison a stream belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamRole {
    Reference,
    Transformed,
}

impl fmt::Display for StreamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamRole::Reference => f.write_str("reference"),
            StreamRole::Transformed => f.write_str("transformed"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("corrupt stream {stream}: packet {packet_index} has no usable position ({position})")]
    CorruptStream {
        stream: String,
        packet_index: usize,
        position: i64,
    },
    #[error(
        "stream length mismatch at frame {index}: {exhausted} stream ended while the {} stream still has frames",
        .exhausted.other()
    )]
    StreamLengthMismatch { index: usize, exhausted: StreamRole },
    #[error("unsupported input {path}: {reason}")]
    UnsupportedInput { path: PathBuf, reason: String },
    #[error("decode failed in {stream}: {reason}")]
    Decode { stream: String, reason: String },
    #[error("cannot compare frames of different size: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("failed to write comparison record: {0}")]
    Output(#[source] std::io::Error),
}

impl StreamRole {
    pub fn other(self) -> StreamRole {
        match self {
            StreamRole::Reference => StreamRole::Transformed,
            StreamRole::Transformed => StreamRole::Reference,
        }
    }
}
