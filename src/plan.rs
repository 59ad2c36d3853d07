//! Field plans: the per-model list of configured fields and their roles.
//!
//! A model declares its fields once through [`Model::describe`]. The
//! resulting [`Plan`] is parsed on first use, then cached for the lifetime of
//! the process and shared by every thread.
//!
//! ## Configuration strings
//!
//! Each field carries a comma-separated configuration:
//!
//! | Role | Form |
//! |------|------|
//! | primary id | `primary,<type-name>` |
//! | client id | `client-id` |
//! | attribute | `attr,<name>[,omitempty][,iso8601][,rfc3339]` |
//! | relation | `relation,<name>[,omitempty]` |
//! | polymorphic relation | `polyrelation,<name>[,omitempty]` |
//! | links | `links` |
//!
//! Unknown modifiers are ignored. `iso8601` wins over `rfc3339` when both
//! are given. A malformed configuration is kept in the plan and reported as
//! [`Error::BadFieldConfiguration`] when a visitor reaches that field.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::document::Node;
use crate::error::Error;
use crate::field::Field;
use crate::model::{Model, Resource};
use crate::types::{
    TimeFormat, MODIFIER_ISO8601, MODIFIER_OMIT_EMPTY, MODIFIER_RFC3339, ROLE_ATTRIBUTE,
    ROLE_CLIENT_ID, ROLE_LINKS, ROLE_POLY_RELATION, ROLE_PRIMARY, ROLE_RELATION,
};
use crate::unmarshal::Unmarshaler;

/// Parsed field configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Resource id; the argument is the resource type name.
    Primary { type_name: String },
    /// Client-generated id.
    ClientId,
    Attribute {
        name: String,
        omit_empty: bool,
        time_format: TimeFormat,
    },
    /// Relation to one or many resources. A polymorphic relation targets a
    /// variant set instead of a single model type.
    Relation {
        name: String,
        omit_empty: bool,
        polymorphic: bool,
    },
    /// Links of the resource itself.
    Links,
}

impl Directive {
    /// Parse a configuration string.
    ///
    /// Returns `Ok(None)` for an empty string (an unconfigured field).
    pub fn parse(tag: &str) -> Result<Option<Self>, Error> {
        if tag.is_empty() {
            return Ok(None);
        }
        let bad = || Error::BadFieldConfiguration {
            tag: tag.to_string(),
        };

        let mut tokens = tag.split(',');
        let role = tokens.next().unwrap_or_default();
        let args: Vec<&str> = tokens.collect();

        let directive = match role {
            ROLE_PRIMARY => match args.as_slice() {
                [type_name] if !type_name.is_empty() => Directive::Primary {
                    type_name: type_name.to_string(),
                },
                _ => return Err(bad()),
            },
            ROLE_CLIENT_ID => {
                if !args.is_empty() {
                    return Err(bad());
                }
                Directive::ClientId
            }
            ROLE_ATTRIBUTE => {
                let (name, modifiers) = named(&args).ok_or_else(bad)?;
                let time_format = if modifiers.contains(&MODIFIER_ISO8601) {
                    TimeFormat::Iso8601
                } else if modifiers.contains(&MODIFIER_RFC3339) {
                    TimeFormat::Rfc3339
                } else {
                    TimeFormat::Epoch
                };
                Directive::Attribute {
                    name: name.to_string(),
                    omit_empty: modifiers.contains(&MODIFIER_OMIT_EMPTY),
                    time_format,
                }
            }
            ROLE_RELATION | ROLE_POLY_RELATION => {
                let (name, modifiers) = named(&args).ok_or_else(bad)?;
                Directive::Relation {
                    name: name.to_string(),
                    omit_empty: modifiers.contains(&MODIFIER_OMIT_EMPTY),
                    polymorphic: role == ROLE_POLY_RELATION,
                }
            }
            ROLE_LINKS => Directive::Links,
            _ => return Err(bad()),
        };
        Ok(Some(directive))
    }

    /// Member name for attributes and relations.
    pub fn name(&self) -> Option<&str> {
        match self {
            Directive::Attribute { name, .. } | Directive::Relation { name, .. } => Some(name),
            _ => None,
        }
    }
}

fn named<'a, 'b>(args: &'b [&'a str]) -> Option<(&'a str, &'b [&'a str])> {
    let (name, modifiers) = args.split_first()?;
    if name.is_empty() {
        return None;
    }
    Some((*name, modifiers))
}

/// Erased access to one field of a model.
pub(crate) trait Accessor<M>: Send + Sync {
    fn get<'a>(&self, model: &'a M) -> &'a dyn Field;
    fn get_mut<'a>(&self, model: &'a mut M) -> &'a mut dyn Field;
}

struct FieldAccess<G, S, F> {
    get: G,
    get_mut: S,
    _field: PhantomData<fn() -> F>,
}

impl<M, F, G, S> Accessor<M> for FieldAccess<G, S, F>
where
    F: Field + 'static,
    G: Fn(&M) -> &F + Send + Sync,
    S: Fn(&mut M) -> &mut F + Send + Sync,
{
    fn get<'a>(&self, model: &'a M) -> &'a dyn Field {
        (self.get)(model)
    }

    fn get_mut<'a>(&self, model: &'a mut M) -> &'a mut dyn Field {
        (self.get_mut)(model)
    }
}

/// Erased access to one slot of a variant set.
pub(crate) trait VariantSlot<M>: Send + Sync {
    /// Type name of the slot's model, if it has a primary id.
    fn type_name(&self) -> Option<&'static str>;
    fn get<'a>(&self, set: &'a M) -> Option<&'a dyn Resource>;
    /// Decode `node` into a fresh value and store it in the slot.
    fn decode<'d>(
        &self,
        set: &mut M,
        node: &'d Node,
        cx: &mut Unmarshaler<'d>,
    ) -> Result<(), Error>;
}

struct SlotAccess<G, S, V> {
    get: G,
    get_mut: S,
    _variant: PhantomData<fn() -> V>,
}

impl<M, V, G, S> VariantSlot<M> for SlotAccess<G, S, V>
where
    V: Model,
    G: Fn(&M) -> &Option<Box<V>> + Send + Sync,
    S: Fn(&mut M) -> &mut Option<Box<V>> + Send + Sync,
{
    fn type_name(&self) -> Option<&'static str> {
        plan::<V>().type_name()
    }

    fn get<'a>(&self, set: &'a M) -> Option<&'a dyn Resource> {
        (self.get)(set).as_deref().map(|value| value as &dyn Resource)
    }

    fn decode<'d>(
        &self,
        set: &mut M,
        node: &'d Node,
        cx: &mut Unmarshaler<'d>,
    ) -> Result<(), Error> {
        let mut value = V::default();
        cx.decode_related(node, &mut value)?;
        *(self.get_mut)(set) = Some(Box::new(value));
        Ok(())
    }
}

/// One configured field.
pub struct Entry<M> {
    tag: String,
    directive: Option<Directive>,
    shadowed: bool,
    access: Box<dyn Accessor<M>>,
}

impl<M> Entry<M> {
    /// The raw configuration string.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The parsed configuration, or `None` if it is malformed.
    pub fn directive(&self) -> Option<&Directive> {
        self.directive.as_ref()
    }

    /// Parsed configuration, or the error to raise for it.
    pub(crate) fn require(&self) -> Result<&Directive, Error> {
        self.directive
            .as_ref()
            .ok_or_else(|| Error::BadFieldConfiguration {
                tag: self.tag.clone(),
            })
    }

    /// A plain relation sharing its name with a polymorphic relation.
    /// It is only decoded when the polymorphic relation found no variant.
    pub(crate) fn is_shadowed(&self) -> bool {
        self.shadowed
    }

    pub(crate) fn get<'a>(&self, model: &'a M) -> &'a dyn Field {
        self.access.get(model)
    }

    pub(crate) fn get_mut<'a>(&self, model: &'a mut M) -> &'a mut dyn Field {
        self.access.get_mut(model)
    }
}

/// Builder handed to [`Model::describe`].
pub struct Fields<M> {
    entries: Vec<Entry<M>>,
    variants: Vec<Box<dyn VariantSlot<M>>>,
}

impl<M: Model> Fields<M> {
    fn new() -> Self {
        Fields {
            entries: Vec::new(),
            variants: Vec::new(),
        }
    }

    /// Register a configured field. An empty configuration skips the field.
    pub fn field<F, G, S>(&mut self, tag: &str, get: G, get_mut: S) -> &mut Self
    where
        F: Field + 'static,
        G: Fn(&M) -> &F + Send + Sync + 'static,
        S: Fn(&mut M) -> &mut F + Send + Sync + 'static,
    {
        let directive = match Directive::parse(tag) {
            Ok(None) => return self,
            Ok(Some(directive)) => Some(directive),
            Err(_) => None,
        };
        self.entries.push(Entry {
            tag: tag.to_string(),
            directive,
            shadowed: false,
            access: Box::new(FieldAccess {
                get,
                get_mut,
                _field: PhantomData,
            }),
        });
        self
    }

    /// Register a slot of a variant set. The slot's type name comes from the
    /// primary id of `V`.
    pub fn variant<V, G, S>(&mut self, get: G, get_mut: S) -> &mut Self
    where
        V: Model,
        G: Fn(&M) -> &Option<Box<V>> + Send + Sync + 'static,
        S: Fn(&mut M) -> &mut Option<Box<V>> + Send + Sync + 'static,
    {
        self.variants.push(Box::new(SlotAccess {
            get,
            get_mut,
            _variant: PhantomData,
        }));
        self
    }
}

/// The ordered field plan of one model type.
pub struct Plan<M> {
    type_name: Option<String>,
    entries: Vec<Entry<M>>,
    variants: Vec<Box<dyn VariantSlot<M>>>,
}

impl<M: Model> Plan<M> {
    fn build() -> Self {
        let mut fields = Fields::new();
        M::describe(&mut fields);
        let Fields {
            mut entries,
            variants,
        } = fields;

        let type_name = entries.iter().find_map(|entry| match &entry.directive {
            Some(Directive::Primary { type_name }) => Some(type_name.clone()),
            _ => None,
        });

        let polymorphic: HashSet<String> = entries
            .iter()
            .filter_map(|entry| match &entry.directive {
                Some(Directive::Relation {
                    name,
                    polymorphic: true,
                    ..
                }) => Some(name.clone()),
                _ => None,
            })
            .collect();
        for entry in &mut entries {
            if let Some(Directive::Relation {
                name,
                polymorphic: false,
                ..
            }) = &entry.directive
            {
                entry.shadowed = polymorphic.contains(name);
            }
        }

        Plan {
            type_name,
            entries,
            variants,
        }
    }

    /// Resource type name, for models that can stand as a resource object.
    ///
    /// Malformed configurations are reported first. A model without a
    /// primary field, such as a variant set or a model meant for nested
    /// attributes, fails with [`Error::UnexpectedType`].
    pub(crate) fn resource_type(&self) -> Result<&str, Error> {
        for entry in &self.entries {
            entry.require()?;
        }
        match self.type_name() {
            Some(type_name) => Ok(type_name),
            None if self.is_variant_set() => Err(Error::unexpected_type(format!(
                "variant set `{}` can only be the target of a polymorphic relation",
                std::any::type_name::<M>()
            ))),
            None => Err(Error::unexpected_type(format!(
                "`{}` has no primary field and cannot be a resource",
                std::any::type_name::<M>()
            ))),
        }
    }
}

impl<M> Plan<M> {
    /// Resource type name from the primary id, if the model has one.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Configured fields in declaration order.
    pub fn entries(&self) -> &[Entry<M>] {
        &self.entries
    }

    /// True when the model is a variant set.
    pub fn is_variant_set(&self) -> bool {
        !self.variants.is_empty()
    }

    pub(crate) fn variants(&self) -> &[Box<dyn VariantSlot<M>>] {
        &self.variants
    }
}

type PlanMap = HashMap<TypeId, &'static (dyn Any + Send + Sync)>;

fn cache() -> &'static RwLock<PlanMap> {
    static PLANS: OnceLock<RwLock<PlanMap>> = OnceLock::new();
    PLANS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Cached plan for `M`, computing it on first use.
///
/// Plans are built outside the lock; when two threads race, the first one
/// published wins and the other copy is dropped.
pub(crate) fn plan<M: Model>() -> &'static Plan<M> {
    let id = TypeId::of::<M>();
    let cached = cache()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .copied();
    let erased = match cached {
        Some(erased) => erased,
        None => {
            let built = Plan::<M>::build();
            tracing::debug!(
                model = std::any::type_name::<M>(),
                fields = built.entries.len(),
                variants = built.variants.len(),
                "computed field plan"
            );
            let mut plans = cache().write().unwrap_or_else(PoisonError::into_inner);
            *plans
                .entry(id)
                .or_insert_with(|| -> &'static (dyn Any + Send + Sync) {
                    Box::leak(Box::new(built))
                })
        }
    };
    match erased.downcast_ref::<Plan<M>>() {
        Some(plan) => plan,
        None => unreachable!("plan cache keyed by TypeId holds a foreign plan"),
    }
}

/// Resolve the field plan of `M`.
///
/// Fails with [`Error::BadFieldConfiguration`] for the first malformed
/// configuration, so misconfigured models can be caught up front.
pub fn resolve<M: Model>() -> Result<&'static Plan<M>, Error> {
    let plan = plan::<M>();
    for entry in plan.entries() {
        entry.require()?;
    }
    Ok(plan)
}
