//! Defines error and its location
use std::fmt;
use std::path::PathBuf;

use crate::budget::BudgetBreach;
use crate::location::Location;
use crate::snippet;

/// Error returned by every parsing and binding entry point.
///
/// Errors are plain values: nothing is retried internally and no failure poisons
/// the process, so each call can be retried or skipped independently.
#[derive(Debug)]
pub enum Error {
    /// Empty or structurally invalid document.
    MalformedDocument {
        msg: String,
        location: Location,
    },
    /// A source key has no accepted field (neither a field name nor an alias).
    UnknownKey {
        type_name: &'static str,
        key: String,
        location: Location,
    },
    /// Number of distinct supplied parameters is outside `[mandatory, total]`.
    ArityMismatch {
        type_name: &'static str,
        supplied: usize,
        mandatory: usize,
        total: usize,
        location: Location,
    },
    /// The parameter count is in range, but optional keys stood in for a mandatory one.
    MissingField {
        type_name: &'static str,
        field: &'static str,
        location: Location,
    },
    /// A batch element after the first successful one has a different shape.
    ///
    /// Replaces the [`Error::ArityMismatch`], [`Error::UnknownKey`] or
    /// [`Error::MissingField`] that the element raised; the original is kept as `cause`.
    InconsistentElementShape {
        /// 0-based position of the failing element in the batch.
        index: usize,
        /// File the element was read from, for folder batches.
        path: Option<PathBuf>,
        cause: Box<Error>,
    },
    /// The type has no usable constructor description.
    UnsupportedType {
        type_name: &'static str,
        reason: String,
    },
    /// Scalar text could not be converted into the declared type.
    ConversionFailure {
        value: String,
        target: &'static str,
        reason: String,
        location: Location,
    },
    /// Free-form error with optional source location. Raised by constructors
    /// through [`Error::custom`].
    Message {
        msg: String,
        location: Location,
    },
    /// A document budget limit was exceeded.
    Budget {
        breach: BudgetBreach,
        location: Location,
    },
    /// Unexpected I/O error while reading a source or enumerating a folder.
    IOError {
        cause: std::io::Error,
    },
    /// Wrap an error with a rendered source snippet.
    WithSnippet {
        /// Pre-rendered snippet output. The full input text is not retained.
        text: String,
        error: Box<Error>,
    },
}

impl Error {
    /// Construct a free-form error, typically from inside a record constructor.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::msg(msg.to_string())
    }

    pub(crate) fn msg<S: Into<String>>(s: S) -> Self {
        Error::Message {
            msg: s.into(),
            location: Location::UNKNOWN,
        }
    }

    pub(crate) fn malformed<S: Into<String>>(msg: S, location: Location) -> Self {
        Error::MalformedDocument {
            msg: msg.into(),
            location,
        }
    }

    pub(crate) fn conversion<S: Into<String>>(
        value: &str,
        target: &'static str,
        reason: S,
        location: Location,
    ) -> Self {
        Error::ConversionFailure {
            value: value.to_owned(),
            target,
            reason: reason.into(),
            location,
        }
    }

    /// Returns the wrapped error if this is [`Error::WithSnippet`], otherwise `self`.
    pub fn without_snippet(&self) -> &Error {
        match self {
            Error::WithSnippet { error, .. } => error.without_snippet(),
            other => other,
        }
    }

    /// Consuming variant of [`Error::without_snippet`].
    pub fn into_inner(self) -> Error {
        match self {
            Error::WithSnippet { error, .. } => error.into_inner(),
            other => other,
        }
    }

    /// True for the errors that describe a document whose keys do not fit the
    /// target type. These are the errors a batch remaps into
    /// [`Error::InconsistentElementShape`].
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self.without_snippet(),
            Error::ArityMismatch { .. } | Error::UnknownKey { .. } | Error::MissingField { .. }
        )
    }

    /// If the error has a known location, return it.
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::MalformedDocument { location, .. }
            | Error::UnknownKey { location, .. }
            | Error::ArityMismatch { location, .. }
            | Error::MissingField { location, .. }
            | Error::ConversionFailure { location, .. }
            | Error::Message { location, .. }
            | Error::Budget { location, .. } => Some(*location).filter(Location::is_known),
            Error::InconsistentElementShape { cause, .. } => cause.location(),
            Error::WithSnippet { error, .. } => error.location(),
            Error::UnsupportedType { .. } | Error::IOError { .. } => None,
        }
    }

    /// Attach a location to errors that do not have one yet.
    pub(crate) fn or_location(mut self, set_location: Location) -> Self {
        match &mut self {
            Error::MalformedDocument { location, .. }
            | Error::UnknownKey { location, .. }
            | Error::ArityMismatch { location, .. }
            | Error::MissingField { location, .. }
            | Error::ConversionFailure { location, .. }
            | Error::Message { location, .. }
            | Error::Budget { location, .. } => {
                if !location.is_known() {
                    *location = set_location;
                }
            }
            Error::InconsistentElementShape { .. }
            | Error::UnsupportedType { .. }
            | Error::IOError { .. }
            | Error::WithSnippet { .. } => {}
        }
        self
    }

    /// Render a snippet of `text` around this error's location and wrap the error with it.
    ///
    /// Errors without a location are returned unchanged.
    pub fn with_snippet(self, text: &str, path: &str) -> Self {
        if matches!(self, Error::WithSnippet { .. }) {
            return self;
        }
        let Some(location) = self.location() else {
            return self;
        };
        match snippet::render(text, path, location, &self.describe()) {
            Some(text) => Error::WithSnippet {
                text,
                error: Box::new(self),
            },
            None => self,
        }
    }

    /// The message of this error without location suffix.
    fn describe(&self) -> String {
        match self {
            Error::MalformedDocument { msg, .. } => format!("malformed document: {msg}"),
            Error::UnknownKey { type_name, key, .. } => {
                format!("unknown key `{key}` for {type_name}")
            }
            Error::ArityMismatch {
                type_name,
                supplied,
                mandatory,
                total,
                ..
            } => format!(
                "{type_name} takes between {mandatory} and {total} parameters, {supplied} supplied"
            ),
            Error::MissingField {
                type_name, field, ..
            } => format!("missing mandatory field `{field}` for {type_name}"),
            Error::InconsistentElementShape { index, path, cause } => match path {
                Some(path) => format!(
                    "element {index} ({}) does not have the shape of the preceding elements: {cause}",
                    path.display()
                ),
                None => format!(
                    "element {index} does not have the shape of the preceding elements: {cause}"
                ),
            },
            Error::UnsupportedType { type_name, reason } => {
                format!("unsupported type {type_name}: {reason}")
            }
            Error::ConversionFailure {
                value,
                target,
                reason,
                ..
            } => format!("cannot convert `{value}` into {target}: {reason}"),
            Error::Message { msg, .. } => msg.clone(),
            Error::Budget { breach, .. } => format!("document budget breached: {breach:?}"),
            Error::IOError { cause } => format!("IO error: {cause}"),
            Error::WithSnippet { error, .. } => error.describe(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WithSnippet { text, .. } => write!(f, "{text}"),
            Error::InconsistentElementShape { .. }
            | Error::UnsupportedType { .. }
            | Error::IOError { .. } => write!(f, "{}", self.describe()),
            _ => {
                let location = self.location().unwrap_or(Location::UNKNOWN);
                fmt_with_location(f, &self.describe(), &location)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IOError { cause } => Some(cause),
            Error::InconsistentElementShape { cause, .. } => Some(cause.as_ref()),
            Error::WithSnippet { error, .. } => Some(error.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(cause: std::io::Error) -> Self {
        Error::IOError { cause }
    }
}

/// Print a message optionally suffixed with "at line X, column Y".
fn fmt_with_location(f: &mut fmt::Formatter<'_>, msg: &str, location: &Location) -> fmt::Result {
    if location.is_known() {
        write!(f, "{msg} at {location}")
    } else {
        write!(f, "{msg}")
    }
}

/// Convert a budget breach into a user-facing error.
pub(crate) fn budget_error(breach: BudgetBreach, location: Location) -> Error {
    Error::Budget { breach, location }
}
