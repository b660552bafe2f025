use std::fmt;
use std::io;

/// An error that can occur when building, writing, reading, or decoding a
/// save tree
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Create an error carrying a custom message.
    ///
    /// Intended for host code: [`Loadable`](crate::Loadable) and
    /// [`SpecialType`](crate::SpecialType) implementations that need to
    /// surface their own failures through the engine.
    pub fn message<T: fmt::Display>(msg: T) -> Error {
        Error::new(ErrorKind::Message(msg.to_string()))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Returns the 1-based line in the input where the error occurred (if
    /// available)
    pub fn line(&self) -> Option<usize> {
        self.0.line()
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// An underlying I/O failure, propagated unchanged
    Io(io::Error),

    /// Unexpected end of input while reading a tree
    Eof { line: usize },

    /// A child count line did not hold a non-negative decimal number
    InvalidChildCount { line: usize, value: String },

    /// A tag, directive, or leaf would have spanned more than one physical
    /// line
    UnescapedNewline { text: String },

    /// The tree exceeded the recursion depth limit (cyclic or hostile input)
    DepthLimit,

    /// A node was tagged with a type that is neither built in nor registered
    UnknownType { tag: String },

    /// Functions and methods cannot be saved or restored
    Callable { name: String },

    /// A primitive payload could not be parsed as its tagged type
    InvalidScalar { tag: String, value: String },

    /// A node's children did not have the shape its tag requires
    InvalidShape { tag: String, reason: &'static str },

    /// An escape sequence in a string or bytes payload was malformed
    InvalidEscape { value: String },

    /// A record child carried no directive to apply it with
    MissingDirective { tag: String },

    /// A failure reported by host-supplied code
    Message(String),
}

impl ErrorKind {
    pub fn line(&self) -> Option<usize> {
        match *self {
            ErrorKind::Eof { line } => Some(line),
            ErrorKind::InvalidChildCount { line, .. } => Some(line),
            _ => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::Io(ref err) => err.fmt(f),
            ErrorKind::Eof { line } => {
                write!(f, "unexpected end of file (line: {})", line)
            }
            ErrorKind::InvalidChildCount { line, ref value } => {
                write!(f, "invalid child count `{}` (line: {})", value, line)
            }
            ErrorKind::UnescapedNewline { ref text } => {
                write!(f, "line would embed an unescaped line break: {:?}", text)
            }
            ErrorKind::DepthLimit => write!(f, "tree exceeded the recursion depth limit"),
            ErrorKind::UnknownType { ref tag } => {
                write!(f, "attempt to construct unrecognized type: {}", tag)
            }
            ErrorKind::Callable { ref name } => write!(
                f,
                "functions and methods cannot be saved or restored: {}",
                name
            ),
            ErrorKind::InvalidScalar { ref tag, ref value } => {
                write!(f, "payload is not a valid {}: {}", tag, value)
            }
            ErrorKind::InvalidShape { ref tag, reason } => {
                write!(f, "malformed `{}` node: {}", tag, reason)
            }
            ErrorKind::InvalidEscape { ref value } => {
                write!(f, "malformed escape sequence: {}", value)
            }
            ErrorKind::MissingDirective { ref tag } => {
                write!(f, "record child `{}` carries no directive", tag)
            }
            ErrorKind::Message(ref msg) => write!(f, "{}", msg),
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::new(ErrorKind::Io(error))
    }
}
