//! Wraps an arbitrary error with the source-code location where it was
//! captured, so error variants that wrap a third-party error (serde_json,
//! figment, ...) keep a breadcrumb back to the call site without having to
//! hand-write a `#[track_caller]` shim for each one.
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// A type-erased error together with the location it was captured at.
#[derive(Clone, Debug)]
pub struct Located<'a> {
    location: &'a Location<'a>,
    source: Arc<dyn std::error::Error + Send + Sync>,
}

impl<'a> Located<'a> {
    #[track_caller]
    #[must_use]
    pub fn new(source: Arc<dyn std::error::Error + Send + Sync>) -> Self {
        Self {
            location: Location::caller(),
            source,
        }
    }

    #[must_use]
    pub fn location(&self) -> &'a Location<'a> {
        self.location
    }

    #[must_use]
    pub fn source(&self) -> &(dyn std::error::Error + Send + Sync) {
        self.source.as_ref()
    }
}

impl fmt::Display for Located<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.source, self.location)
    }
}

impl std::error::Error for Located<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Helper trait to box an error and attach the current call-site location in
/// one step: `some_result.map_err(LocatedError::located)?`.
pub trait LocatedError<'a> {
    fn located(self) -> Located<'a>;
}

impl<'a, E> LocatedError<'a> for E
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[track_caller]
    fn located(self) -> Located<'a> {
        Located::new(Arc::new(self))
    }
}

/// Convenience for building an owned message-only located error, used at
/// boundaries where there is no underlying `std::error::Error` to wrap.
#[derive(Debug)]
pub struct Message(Cow<'static, str>);

impl Message {
    #[must_use]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Message {}
