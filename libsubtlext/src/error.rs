use std::error::Error as StdError;
use std::fmt;

/// `SubtlextResult<T>` provides a simplified result type with a common error type
pub type SubtlextResult<T> = std::result::Result<T, ErrorWrapper>;

/// SubtlextError defines all the internal errors that `libsubtlext` might return
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SubtlextError {
    InteractiveSelectionFailed,
    InvalidArgument(String),
    NotFound(String),
    NotRunning,
    StaleHandle(&'static str),
    TagNotFound(String),
    Unsaved(&'static str),
    WindowGone(u32),
}
impl std::error::Error for SubtlextError {}
impl fmt::Display for SubtlextError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SubtlextError::InteractiveSelectionFailed => write!(f, "no window was selected"),
            SubtlextError::InvalidArgument(ref err) => write!(f, "invalid argument was given: {}", err),
            SubtlextError::NotFound(ref err) => write!(f, "{} was not found", err),
            SubtlextError::NotRunning => write!(f, "subtle is not running"),
            SubtlextError::StaleHandle(ref kind) => write!(f, "{} is frozen and can't be changed", kind),
            SubtlextError::TagNotFound(ref err) => write!(f, "tag {} was not found", err),
            SubtlextError::Unsaved(ref kind) => write!(f, "{} has not been saved yet", kind),
            SubtlextError::WindowGone(win) => write!(f, "window {:#x} no longer exists", win),
        }
    }
}

/// ErrorWrapper provides wrapper around all the underlying library dependencys that `libsubtlext` uses
/// such that we can easily surface all errors from `libsubtlext` in a single easy way.
#[derive(Debug)]
pub enum ErrorWrapper {
    Subtlext(SubtlextError),

    // std::str::Utf8Error
    Utf8(std::str::Utf8Error),

    // regex::Error
    Regex(regex::Error),

    // x11rb errors
    Connect(x11rb::errors::ConnectError),
    Connection(x11rb::errors::ConnectionError),
    Reply(x11rb::errors::ReplyError),
    ReplyOrId(x11rb::errors::ReplyOrIdError),
}
impl ErrorWrapper {
    /// Implemented directly on the `Error` type to reduce casting required
    pub fn is<T: StdError + 'static>(&self) -> bool {
        self.as_ref().is::<T>()
    }

    /// Implemented directly on the `Error` type to reduce casting required
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.as_ref().downcast_ref::<T>()
    }

    /// Implemented directly on the `Error` type to reduce casting required
    pub fn downcast_mut<T: StdError + 'static>(&mut self) -> Option<&mut T> {
        self.as_mut().downcast_mut::<T>()
    }

    /// Implemented directly on the `Error` type to reduce casting required
    /// which allows for using as_ref to get the correct pass through.
    pub fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.as_ref().source()
    }

    /// Get the domain error if this is one
    pub fn subtlext(&self) -> Option<&SubtlextError> {
        match *self {
            ErrorWrapper::Subtlext(ref err) => Some(err),
            _ => None,
        }
    }

    /// Check if the error means the window was destroyed while it was being read
    pub fn is_window_gone(&self) -> bool {
        matches!(self.subtlext(), Some(SubtlextError::WindowGone(_)))
    }
}
impl StdError for ErrorWrapper {}

impl fmt::Display for ErrorWrapper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorWrapper::Subtlext(ref err) => write!(f, "{}", err),
            ErrorWrapper::Utf8(ref err) => write!(f, "{}", err),
            ErrorWrapper::Regex(ref err) => write!(f, "{}", err),
            ErrorWrapper::Connect(ref err) => write!(f, "{}", err),
            ErrorWrapper::Connection(ref err) => write!(f, "{}", err),
            ErrorWrapper::Reply(ref err) => write!(f, "{}", err),
            ErrorWrapper::ReplyOrId(ref err) => write!(f, "{}", err),
        }
    }
}

impl AsRef<dyn StdError> for ErrorWrapper {
    fn as_ref(&self) -> &(dyn StdError + 'static) {
        match *self {
            ErrorWrapper::Subtlext(ref err) => err,
            ErrorWrapper::Utf8(ref err) => err,
            ErrorWrapper::Regex(ref err) => err,
            ErrorWrapper::Connect(ref err) => err,
            ErrorWrapper::Connection(ref err) => err,
            ErrorWrapper::Reply(ref err) => err,
            ErrorWrapper::ReplyOrId(ref err) => err,
        }
    }
}

impl AsMut<dyn StdError> for ErrorWrapper {
    fn as_mut(&mut self) -> &mut (dyn StdError + 'static) {
        match *self {
            ErrorWrapper::Subtlext(ref mut err) => err,
            ErrorWrapper::Utf8(ref mut err) => err,
            ErrorWrapper::Regex(ref mut err) => err,
            ErrorWrapper::Connect(ref mut err) => err,
            ErrorWrapper::Connection(ref mut err) => err,
            ErrorWrapper::Reply(ref mut err) => err,
            ErrorWrapper::ReplyOrId(ref mut err) => err,
        }
    }
}

impl From<SubtlextError> for ErrorWrapper {
    fn from(err: SubtlextError) -> ErrorWrapper {
        ErrorWrapper::Subtlext(err)
    }
}

impl From<std::str::Utf8Error> for ErrorWrapper {
    fn from(err: std::str::Utf8Error) -> ErrorWrapper {
        ErrorWrapper::Utf8(err)
    }
}

impl From<regex::Error> for ErrorWrapper {
    fn from(err: regex::Error) -> ErrorWrapper {
        ErrorWrapper::Regex(err)
    }
}

// x11rb errors
//--------------------------------------------------------------------------------------------------
impl From<x11rb::errors::ConnectError> for ErrorWrapper {
    fn from(err: x11rb::errors::ConnectError) -> ErrorWrapper {
        ErrorWrapper::Connect(err)
    }
}

impl From<x11rb::errors::ConnectionError> for ErrorWrapper {
    fn from(err: x11rb::errors::ConnectionError) -> ErrorWrapper {
        ErrorWrapper::Connection(err)
    }
}

impl From<x11rb::errors::ReplyError> for ErrorWrapper {
    fn from(err: x11rb::errors::ReplyError) -> ErrorWrapper {
        ErrorWrapper::Reply(err)
    }
}

impl From<x11rb::errors::ReplyOrIdError> for ErrorWrapper {
    fn from(err: x11rb::errors::ReplyOrIdError) -> ErrorWrapper {
        ErrorWrapper::ReplyOrId(err)
    }
}
