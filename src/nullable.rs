//! Tri-state value: unspecified, explicitly null, or present.

use crate::error::AccessError;

/// A value that distinguishes "not sent" from "sent as null".
///
/// As an attribute, `Unspecified` is omitted from the output and `Null` is
/// written as `null` regardless of `omitempty`. As a relation, `Unspecified`
/// omits the relationship and `Null` writes `{"data": null}`.
///
/// ```
/// use jsonapi_codec::{AccessError, Nullable};
///
/// let mut name: Nullable<String> = Nullable::unspecified();
/// assert_eq!(name.get(), Err(AccessError::Unspecified));
///
/// name.set_null();
/// assert!(name.is_null());
///
/// name.set("Ann".to_string());
/// assert_eq!(name.get().map(String::as_str), Ok("Ann"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Nullable<T> {
    #[default]
    Unspecified,
    Null,
    Present(T),
}

impl<T> Nullable<T> {
    /// Wrap a present value.
    pub fn new(value: T) -> Self {
        Nullable::Present(value)
    }

    pub fn null() -> Self {
        Nullable::Null
    }

    pub fn unspecified() -> Self {
        Nullable::Unspecified
    }

    /// Borrow the value, or say why there is none.
    pub fn get(&self) -> Result<&T, AccessError> {
        match self {
            Nullable::Present(value) => Ok(value),
            Nullable::Null => Err(AccessError::Null),
            Nullable::Unspecified => Err(AccessError::Unspecified),
        }
    }

    pub fn set(&mut self, value: T) {
        *self = Nullable::Present(value);
    }

    pub fn set_null(&mut self) {
        *self = Nullable::Null;
    }

    pub fn set_unspecified(&mut self) {
        *self = Nullable::Unspecified;
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Nullable::Null)
    }

    /// True for both `Null` and `Present`.
    pub fn is_specified(&self) -> bool {
        !matches!(self, Nullable::Unspecified)
    }

    pub fn as_ref(&self) -> Nullable<&T> {
        match self {
            Nullable::Unspecified => Nullable::Unspecified,
            Nullable::Null => Nullable::Null,
            Nullable::Present(value) => Nullable::Present(value),
        }
    }

    /// Convert to an `Option`, folding `Null` and `Unspecified` into `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Nullable::Present(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    /// `None` becomes an explicit null.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Nullable::Present(value),
            None => Nullable::Null,
        }
    }
}
