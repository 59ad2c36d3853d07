//! JSON:API codec
//!
//! Converts annotated domain models to and from JSON:API documents.
//!
//! Models opt in by implementing [`Model`] and registering each
//! document-visible field with a configuration string. Marshaling produces a
//! [`Document`] whose related resources are either side-loaded into
//! `included` (the default) or embedded in place; unmarshaling fills models
//! back from a document, resolving relationships against `included`.
//!
//! # Example
//!
//! ```
//! use jsonapi_codec::{marshal_one, unmarshal_one, Fields, Model};
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct Post {
//!     id: u64,
//!     title: String,
//! }
//!
//! #[derive(Default)]
//! struct Blog {
//!     id: u64,
//!     title: String,
//!     posts: Vec<Box<Post>>,
//! }
//!
//! impl Model for Post {
//!     fn describe(fields: &mut Fields<Self>) {
//!         fields
//!             .field("primary,posts", |p| &p.id, |p| &mut p.id)
//!             .field("attr,title", |p| &p.title, |p| &mut p.title);
//!     }
//! }
//!
//! impl Model for Blog {
//!     fn describe(fields: &mut Fields<Self>) {
//!         fields
//!             .field("primary,blogs", |b| &b.id, |b| &mut b.id)
//!             .field("attr,title", |b| &b.title, |b| &mut b.title)
//!             .field("relation,posts", |b| &b.posts, |b| &mut b.posts);
//!     }
//! }
//!
//! let blog = Blog {
//!     id: 5,
//!     title: "Title 1".into(),
//!     posts: vec![Box::new(Post { id: 1, title: "Foo".into() })],
//! };
//!
//! let document = marshal_one(&blog).unwrap();
//! assert_eq!(
//!     document.to_value().unwrap(),
//!     json!({
//!         "data": {
//!             "type": "blogs",
//!             "id": "5",
//!             "attributes": {"title": "Title 1"},
//!             "relationships": {"posts": {"data": [{"type": "posts", "id": "1"}]}}
//!         },
//!         "included": [{"type": "posts", "id": "1", "attributes": {"title": "Foo"}}]
//!     })
//! );
//!
//! let decoded: Blog = unmarshal_one(&document).unwrap();
//! assert_eq!(decoded.posts[0].title, "Foo");
//! ```
//!
//! # Field Configuration
//!
//! | Configuration | Field role |
//! |---------------|------------|
//! | `primary,<type>` | Resource id (string or integer); sets the resource type |
//! | `client-id` | Client-generated id |
//! | `attr,<name>[,omitempty][,iso8601][,rfc3339]` | Attribute |
//! | `relation,<name>[,omitempty]` | To-one or to-many relationship |
//! | `polyrelation,<name>[,omitempty]` | Relationship to a variant set |
//! | `links` | The resource's own links |
//!
//! Unset optional values follow [`Nullable`] for attributes and relations
//! that must tell "not sent" from "sent as null".
//!
//! A plain `DateTime<Utc>` attribute treats the Unix epoch as unset and never
//! writes it, with or without `omitempty`. Use `Option<DateTime<Utc>>` when
//! `1970-01-01T00:00:00Z` is a meaningful value.

mod coerce;
mod document;
mod error;
mod field;
mod included;
mod loader;
mod marshal;
mod model;
mod nullable;
mod plan;
mod poly;
mod types;
mod unmarshal;
mod validator;

pub use document::{
    Data, Document, Link, Links, Meta, Node, Relationship, RelationshipData, KEY_FIRST_PAGE,
    KEY_LAST_PAGE, KEY_NEXT_PAGE, KEY_PREVIOUS_PAGE, KEY_RELATED_LINK, KEY_SELF_LINK,
};
pub use error::{AccessError, Error, Issue, ValidateError};
pub use field::{Attribute, Field, Input, Linkage, View};
pub use loader::{load_document, load_document_str, load_json};
pub use marshal::{
    marshal_many, marshal_many_embedded, marshal_many_with, marshal_one, marshal_one_embedded,
    marshal_one_with, Marshaler,
};
pub use model::{Model, Resource};
pub use nullable::Nullable;
pub use plan::{resolve, Directive, Entry, Fields, Plan};
pub use poly::{match_variant, select_variant};
pub use types::{
    json_type_name, MarshalOptions, Mode, TimeFormat, UnmarshalOptions, ISO8601_FORMAT,
    MEDIA_TYPE,
};
pub use unmarshal::{
    from_str, unmarshal_many, unmarshal_many_with, unmarshal_one, unmarshal_one_with, Unmarshaler,
};
pub use validator::{document_issues, validate_document};
