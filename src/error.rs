use snafu::prelude::*;

// The AsciiCompliance variant deliberately carries the full decrypted buffer.
// That leak is the side channel the key-recovery attack consumes, so it is
// part of the oracle's contract rather than incidental debug data.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("invalid PKCS#7 padding"))]
    InvalidPadding,

    #[snafu(display("block primitive requires exactly {expected} bytes, got {actual}"))]
    PrimitiveLength { expected: usize, actual: usize },

    #[snafu(display("decrypted plaintext is not printable ASCII"))]
    AsciiCompliance { plaintext: Vec<u8> },

    #[snafu(display("no candidate byte matched the oracle's response"))]
    NoCandidate,

    #[snafu(display("{count} candidate bytes matched the oracle's response"))]
    AmbiguousCandidate { count: usize },

    #[snafu(display("oracle behaved unexpectedly: {message}"))]
    UnexpectedOracle { message: String },

    #[snafu(display("malformed attack input: {message}"))]
    InvalidArgument { message: String },

    #[snafu(display("block cipher backend failed"))]
    Backend { source: openssl::error::ErrorStack },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
