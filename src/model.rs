//! The [`Model`] trait and its object-safe counterpart [`Resource`].

use serde_json::{Map, Value};

use crate::document::{Links, Meta, Node};
use crate::error::Error;
use crate::marshal::{self, Marshaler};
use crate::plan::{plan, Fields};
use crate::poly;

/// A type that can be converted to and from resource objects.
///
/// `describe` registers every configured field; the optional capabilities
/// supply links and meta for the resource and for each of its relations.
///
/// ```
/// use jsonapi_codec::{Fields, Model};
///
/// #[derive(Default)]
/// struct Comment {
///     id: u64,
///     body: String,
/// }
///
/// impl Model for Comment {
///     fn describe(fields: &mut Fields<Self>) {
///         fields
///             .field("primary,comments", |c| &c.id, |c| &mut c.id)
///             .field("attr,body", |c| &c.body, |c| &mut c.body);
///     }
/// }
/// ```
pub trait Model: Default + 'static {
    fn describe(fields: &mut Fields<Self>);

    /// Links of the resource object.
    fn links(&self) -> Option<Links> {
        None
    }

    /// Meta of the resource object.
    fn meta(&self) -> Option<Meta> {
        None
    }

    /// Links of the named relationship.
    fn relationship_links(&self, _relation: &str) -> Option<Links> {
        None
    }

    /// Meta of the named relationship.
    fn relationship_meta(&self, _relation: &str) -> Option<Meta> {
        None
    }
}

/// Type-erased model, as seen by the marshal visitor.
///
/// Implemented for every [`Model`]; lists of mixed models can be marshaled
/// through `&dyn Resource`.
pub trait Resource {
    /// Resource type name, if the model has a primary id.
    fn resource_type(&self) -> Option<&'static str>;

    /// Marshal into a resource object.
    fn to_node(&self, marshaler: &mut Marshaler) -> Result<Node, Error>;

    /// Attribute members only, for models nested inside an attribute.
    fn to_attributes(&self) -> Result<Map<String, Value>, Error>;

    /// True when every configured field holds its zero value.
    fn is_empty(&self) -> bool;

    /// The populated slot of a variant set.
    fn selected_variant(&self) -> Result<Option<&dyn Resource>, Error>;
}

impl<M: Model> Resource for M {
    fn resource_type(&self) -> Option<&'static str> {
        plan::<M>().type_name()
    }

    fn to_node(&self, marshaler: &mut Marshaler) -> Result<Node, Error> {
        marshaler.visit_model(self)
    }

    fn to_attributes(&self) -> Result<Map<String, Value>, Error> {
        marshal::attribute_object(self)
    }

    fn is_empty(&self) -> bool {
        let plan = plan::<M>();
        plan.entries()
            .iter()
            .filter(|entry| entry.directive().is_some())
            .all(|entry| entry.get(self).is_zero())
            && plan.variants().iter().all(|slot| slot.get(self).is_none())
    }

    fn selected_variant(&self) -> Result<Option<&dyn Resource>, Error> {
        if !plan::<M>().is_variant_set() {
            return Err(Error::unexpected_type(format!(
                "`{}` is used as a polymorphic relation but declares no variants",
                std::any::type_name::<M>()
            )));
        }
        Ok(poly::select_variant(self))
    }
}
