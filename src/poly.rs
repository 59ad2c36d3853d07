//! Polymorphic relations: picking a slot of a variant set.
//!
//! A variant set is a model that registers [`Fields::variant`] slots, each
//! an `Option<Box<V>>` for a model `V` with its own resource type name. At
//! most one slot is expected to be populated.
//!
//! [`Fields::variant`]: crate::Fields::variant

use crate::model::{Model, Resource};
use crate::plan::plan;

/// The slot to marshal: the first populated one whose model has a type name.
pub fn select_variant<M: Model>(set: &M) -> Option<&dyn Resource> {
    plan::<M>()
        .variants()
        .iter()
        .filter(|slot| slot.type_name().is_some())
        .find_map(|slot| slot.get(set))
}

/// Index of the slot whose model has the given type name.
pub fn match_variant<M: Model>(type_name: &str) -> Option<usize> {
    plan::<M>()
        .variants()
        .iter()
        .position(|slot| slot.type_name() == Some(type_name))
}

/// Type names of the slots, in declaration order.
pub(crate) fn variant_types<M: Model>() -> Vec<Option<&'static str>> {
    plan::<M>()
        .variants()
        .iter()
        .map(|slot| slot.type_name())
        .collect()
}
