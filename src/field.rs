//! The [`Field`] trait: how the visitors read and write one model field.
//!
//! The marshal visitor inspects a field through its [`View`]; the unmarshal
//! visitor feeds it an [`Input`] taken from the resource object. Every
//! supported field type implements both directions here.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::coerce;
use crate::document::{Links, Node};
use crate::error::Error;
use crate::model::{Model, Resource};
use crate::nullable::Nullable;
use crate::types::TimeFormat;
use crate::unmarshal::Unmarshaler;

/// Read-only view of a field value.
pub enum View<'a> {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(&'a str),
    Time(&'a DateTime<Utc>),
    Json(&'a Value),
    Links(&'a Links),
    Optional(Option<&'a dyn Field>),
    Nullable(Nullable<&'a dyn Field>),
    List(Vec<&'a dyn Field>),
    Model(&'a dyn Resource),
}

/// An attribute member handed to a field.
#[derive(Debug, Clone, Copy)]
pub struct Attribute<'d> {
    pub name: &'d str,
    pub value: &'d Value,
    pub format: TimeFormat,
}

/// How a relation's targets are matched to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    /// The field holds the target model directly.
    Plain,
    /// The field holds a variant set; targets are matched by type name.
    Polymorphic,
}

/// Data from a resource object destined for one field.
#[derive(Debug, Clone, Copy)]
pub enum Input<'d> {
    Id(&'d str),
    ClientId(&'d str),
    Attribute(Attribute<'d>),
    /// The attribute or relationship member is missing.
    Absent,
    ToOne(Option<&'d Node>, Linkage),
    ToMany(&'d [Node], Linkage),
    Links(&'d Links),
}

/// A value that can live in a configured model field.
pub trait Field {
    fn view(&self) -> View<'_>;

    /// True for the zero value of the type (used by `omitempty`).
    fn is_zero(&self) -> bool;

    fn decode<'d>(&mut self, input: Input<'d>, cx: &mut Unmarshaler<'d>) -> Result<(), Error>;
}

fn refuse(input: &Input<'_>, field: &str) -> Error {
    match input {
        Input::Id(_) => Error::BadPrimaryId,
        Input::ToOne(..) | Input::ToMany(..) => {
            Error::unexpected_type(format!("relationship data cannot be stored in a `{field}` field"))
        }
        Input::Links(_) => Error::unexpected_type(format!("links cannot be stored in a `{field}` field")),
        Input::ClientId(_) => {
            Error::unexpected_type(format!("client id cannot be stored in a `{field}` field"))
        }
        Input::Attribute(_) | Input::Absent => {
            Error::unexpected_type(format!("unsupported input for a `{field}` field"))
        }
    }
}

/// Store a decoded scalar, leaving the field untouched for null.
fn store<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

macro_rules! integer_field {
    ($variant:ident, $wide:ty, $($ty:ty),+) => {$(
        impl Field for $ty {
            fn view(&self) -> View<'_> {
                View::$variant(*self as $wide)
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }

            fn decode<'d>(&mut self, input: Input<'d>, _cx: &mut Unmarshaler<'d>) -> Result<(), Error> {
                match input {
                    Input::Id(id) => {
                        *self = id.parse().map_err(|_| Error::BadPrimaryId)?;
                    }
                    Input::Attribute(attr) => store(self, coerce::integer(&attr, stringify!($ty))?),
                    Input::Absent => {}
                    other => return Err(refuse(&other, stringify!($ty))),
                }
                Ok(())
            }
        }
    )+};
}

integer_field!(Int, i64, i8, i16, i32, i64, isize);
integer_field!(Uint, u64, u8, u16, u32, u64, usize);

macro_rules! float_field {
    ($($ty:ty),+) => {$(
        impl Field for $ty {
            fn view(&self) -> View<'_> {
                View::Float(*self as f64)
            }

            fn is_zero(&self) -> bool {
                *self == 0.0
            }

            fn decode<'d>(&mut self, input: Input<'d>, _cx: &mut Unmarshaler<'d>) -> Result<(), Error> {
                match input {
                    Input::Attribute(attr) => {
                        store(self, coerce::float(&attr, stringify!($ty))?.map(|v| v as $ty))
                    }
                    Input::Absent => {}
                    other => return Err(refuse(&other, stringify!($ty))),
                }
                Ok(())
            }
        }
    )+};
}

float_field!(f32, f64);

impl Field for bool {
    fn view(&self) -> View<'_> {
        View::Bool(*self)
    }

    fn is_zero(&self) -> bool {
        !*self
    }

    fn decode<'d>(&mut self, input: Input<'d>, _cx: &mut Unmarshaler<'d>) -> Result<(), Error> {
        match input {
            Input::Attribute(attr) => store(self, coerce::boolean(&attr)?),
            Input::Absent => {}
            other => return Err(refuse(&other, "bool")),
        }
        Ok(())
    }
}

impl Field for String {
    fn view(&self) -> View<'_> {
        View::Str(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn decode<'d>(&mut self, input: Input<'d>, _cx: &mut Unmarshaler<'d>) -> Result<(), Error> {
        match input {
            Input::Id(text) | Input::ClientId(text) => *self = text.to_string(),
            Input::Attribute(attr) => store(self, coerce::string(&attr)?),
            Input::Absent => {}
            other => return Err(refuse(&other, "String")),
        }
        Ok(())
    }
}

/// The Unix epoch doubles as the unset time: a field holding it is skipped
/// on marshal, so an epoch that carries meaning must live in an
/// `Option<DateTime<Utc>>`.
impl Field for DateTime<Utc> {
    fn view(&self) -> View<'_> {
        View::Time(self)
    }

    fn is_zero(&self) -> bool {
        coerce::is_zero_time(self)
    }

    fn decode<'d>(&mut self, input: Input<'d>, _cx: &mut Unmarshaler<'d>) -> Result<(), Error> {
        match input {
            Input::Attribute(attr) => store(self, coerce::time(&attr)?),
            Input::Absent => {}
            other => return Err(refuse(&other, "DateTime<Utc>")),
        }
        Ok(())
    }
}

/// Free-form attribute, copied as is.
impl Field for Value {
    fn view(&self) -> View<'_> {
        View::Json(self)
    }

    fn is_zero(&self) -> bool {
        self.is_null()
    }

    fn decode<'d>(&mut self, input: Input<'d>, _cx: &mut Unmarshaler<'d>) -> Result<(), Error> {
        match input {
            Input::Attribute(attr) => *self = attr.value.clone(),
            Input::Absent => {}
            other => return Err(refuse(&other, "Value")),
        }
        Ok(())
    }
}

impl Field for Links {
    fn view(&self) -> View<'_> {
        View::Links(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn decode<'d>(&mut self, input: Input<'d>, _cx: &mut Unmarshaler<'d>) -> Result<(), Error> {
        match input {
            Input::Links(links) => *self = links.clone(),
            Input::Absent => {}
            other => return Err(refuse(&other, "Links")),
        }
        Ok(())
    }
}

/// A related model, or a model nested inside an attribute.
impl<M: Model> Field for Box<M> {
    fn view(&self) -> View<'_> {
        View::Model(&**self)
    }

    fn is_zero(&self) -> bool {
        Resource::is_empty(&**self)
    }

    fn decode<'d>(&mut self, input: Input<'d>, cx: &mut Unmarshaler<'d>) -> Result<(), Error> {
        match input {
            Input::Attribute(attr) => match attr.value {
                Value::Null => Ok(()),
                Value::Object(members) => cx.decode_attributes(members, &mut **self),
                _ => Err(coerce::mismatch(&attr, "object")),
            },
            Input::ToOne(Some(node), Linkage::Plain) => cx.decode_related(node, &mut **self),
            Input::ToOne(Some(node), Linkage::Polymorphic) => cx.decode_variant(node, &mut **self),
            Input::ToOne(None, _) | Input::Absent => Ok(()),
            Input::ToMany(..) => Err(Error::unexpected_type(format!(
                "to-many relationship data for the to-one relation `{}`",
                std::any::type_name::<M>()
            ))),
            other => Err(refuse(&other, std::any::type_name::<M>())),
        }
    }
}

impl<T: Field + Default> Field for Option<T> {
    fn view(&self) -> View<'_> {
        View::Optional(self.as_ref().map(|value| value as &dyn Field))
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn decode<'d>(&mut self, input: Input<'d>, cx: &mut Unmarshaler<'d>) -> Result<(), Error> {
        match input {
            Input::Absent => Ok(()),
            Input::Attribute(attr) if attr.value.is_null() => {
                *self = None;
                Ok(())
            }
            Input::ToOne(None, _) => {
                *self = None;
                Ok(())
            }
            input => {
                let mut value = self.take().unwrap_or_default();
                let result = value.decode(input, cx);
                *self = Some(value);
                result
            }
        }
    }
}

impl<T: Field + Default> Field for Vec<T> {
    fn view(&self) -> View<'_> {
        View::List(self.iter().map(|value| value as &dyn Field).collect())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn decode<'d>(&mut self, input: Input<'d>, cx: &mut Unmarshaler<'d>) -> Result<(), Error> {
        match input {
            Input::Attribute(attr) => match attr.value {
                Value::Null => Ok(()),
                Value::Array(values) => {
                    let mut items = Vec::with_capacity(values.len());
                    for value in values {
                        let mut item = T::default();
                        item.decode(Input::Attribute(Attribute { value, ..attr }), cx)?;
                        items.push(item);
                    }
                    *self = items;
                    Ok(())
                }
                _ => Err(coerce::mismatch(&attr, "array")),
            },
            Input::ToMany(nodes, linkage) => {
                let mut items = Vec::with_capacity(nodes.len());
                for node in nodes {
                    let mut item = T::default();
                    item.decode(Input::ToOne(Some(node), linkage), cx)?;
                    items.push(item);
                }
                *self = items;
                Ok(())
            }
            Input::ToOne(..) => Err(Error::unexpected_type(
                "to-one relationship data for a to-many relation",
            )),
            Input::Absent => Ok(()),
            other => Err(refuse(&other, "Vec")),
        }
    }
}

impl<T: Field + Default> Field for Nullable<T> {
    fn view(&self) -> View<'_> {
        View::Nullable(match self {
            Nullable::Unspecified => Nullable::Unspecified,
            Nullable::Null => Nullable::Null,
            Nullable::Present(value) => Nullable::Present(value as &dyn Field),
        })
    }

    fn is_zero(&self) -> bool {
        !self.is_specified()
    }

    fn decode<'d>(&mut self, input: Input<'d>, cx: &mut Unmarshaler<'d>) -> Result<(), Error> {
        match input {
            Input::Absent => self.set_unspecified(),
            Input::Attribute(attr) if attr.value.is_null() => self.set_null(),
            Input::ToOne(None, _) => self.set_null(),
            input => {
                let mut value = match std::mem::take(self) {
                    Nullable::Present(value) => value,
                    _ => T::default(),
                };
                let result = value.decode(input, cx);
                self.set(value);
                return result;
            }
        }
        Ok(())
    }
}
