use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Signature database input comes from firmware variables and can be corrupted or outright
/// hostile, so most variants describe the ways a buffer can lie about itself. Every structural
/// violation is recoverable; the library never aborts the process on bad input.
///
/// # Error Categories
///
/// ## Caller Errors
/// - [`Error::BufferTooSmall`] - Input cannot hold even one list and one entry
/// - [`Error::NoCurrentList`] - Accessor used before a list was produced
/// - [`Error::Empty`] - Empty input provided
///
/// ## Structural Errors
/// - [`Error::Malformed`] - Size fields that contradict the buffer contents
/// - [`Error::OutOfBounds`] - A read would have crossed the buffer end
///
/// ## I/O Errors
/// - [`Error::FileError`] - Filesystem I/O errors
///
/// # Examples
///
/// ```rust
/// use sigscope::{Error, SignatureDatabase};
///
/// match SignatureDatabase::from_mem(vec![0_u8; 8]) {
///     Ok(_) => println!("Loaded database"),
///     Err(Error::BufferTooSmall { actual, required }) => {
///         eprintln!("Need at least {} bytes, got {}", required, actual);
///     }
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed database: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input buffer cannot represent a signature database.
    ///
    /// The format needs at least one fixed list header plus one minimal entry
    /// (an owner GUID with an empty payload) to describe anything at all;
    /// construction of an iterator over a smaller buffer is refused up front.
    #[error("Buffer of {actual} bytes is below the {required} byte minimum for a signature database")]
    BufferTooSmall {
        /// Length of the buffer that was provided
        actual: usize,
        /// Smallest length the format can represent
        required: usize,
    },

    /// A list accessor was called before any list was produced.
    ///
    /// The size and type accessors on the list iterator describe the list most
    /// recently yielded; until the first successful advance there is nothing
    /// to describe.
    #[error("No signature list has been produced yet")]
    NoCurrentList,

    /// The buffer is damaged and could not be decoded.
    ///
    /// This error indicates that a size field in a signature list header
    /// contradicts the data that is actually present. The error includes the
    /// source location where the malformation was detected for debugging
    /// purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while decoding the buffer.
    ///
    /// This is a safety check to prevent buffer overruns when size fields
    /// claim more data than the buffer holds.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while opening or mapping a
    /// database file from disk.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),
}
