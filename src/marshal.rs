//! Marshal visitor: models to documents.

use serde_json::{Map, Value};

use crate::coerce::{is_zero_time, render_float, render_time};
use crate::document::{Document, Node, Relationship, RelationshipData};
use crate::error::Error;
use crate::field::{Field, View};
use crate::included::IncludedSet;
use crate::model::{Model, Resource};
use crate::nullable::Nullable;
use crate::plan::{plan, Directive};
use crate::types::{MarshalOptions, Mode, TimeFormat};

/// Walks models and builds resource objects.
///
/// In side-load mode the marshaler collects related resources for the
/// document's `included` list; [`Marshaler::finish`] hands them over.
#[derive(Debug, Default)]
pub struct Marshaler {
    mode: Mode,
    included: IncludedSet,
}

enum Targets<'a> {
    One(Option<&'a dyn Resource>),
    Many(Vec<&'a dyn Resource>),
}

impl Marshaler {
    pub fn new(options: &MarshalOptions) -> Self {
        Marshaler {
            mode: options.mode,
            included: IncludedSet::new(),
        }
    }

    /// Marshal one resource.
    pub fn visit<R: Resource + ?Sized>(&mut self, resource: &R) -> Result<Node, Error> {
        resource.to_node(self)
    }

    /// Included resources collected so far, in first-insertion order.
    pub fn finish(self) -> Vec<Node> {
        self.included.into_vec()
    }

    pub(crate) fn visit_model<M: Model>(&mut self, model: &M) -> Result<Node, Error> {
        let plan = plan::<M>();
        plan.resource_type()?;
        let mut node = Node::default();

        for entry in plan.entries() {
            let field = entry.get(model);
            match entry.require()? {
                Directive::Primary { type_name } => {
                    node.kind = type_name.clone();
                    node.id = primary_id(field)?;
                }
                Directive::ClientId => node.client_id = client_id(field)?,
                Directive::Attribute {
                    name,
                    omit_empty,
                    time_format,
                } => {
                    if let Some(value) = attribute_value(field, *omit_empty, *time_format)? {
                        node.attributes.insert(name.clone(), value);
                    }
                }
                Directive::Relation {
                    name,
                    omit_empty,
                    polymorphic,
                } => {
                    if let Some(relationship) =
                        self.relationship(model, name, field, *omit_empty, *polymorphic)?
                    {
                        node.relationships.insert(name.clone(), relationship);
                    }
                }
                Directive::Links => {}
            }
        }

        if let Some(links) = model.links() {
            links.validate()?;
            node.links = Some(links);
        }
        node.meta = model.meta();
        Ok(node)
    }

    fn relationship<M: Model>(
        &mut self,
        owner: &M,
        name: &str,
        field: &dyn Field,
        omit_empty: bool,
        polymorphic: bool,
    ) -> Result<Option<Relationship>, Error> {
        let targets = match field.view() {
            View::List(items) => {
                if omit_empty && items.is_empty() {
                    return Ok(None);
                }
                let mut targets = Vec::with_capacity(items.len());
                for item in items {
                    let target = target_of(item.view())?.ok_or(Error::UnexpectedNil)?;
                    let target = if polymorphic {
                        target.selected_variant()?.ok_or(Error::UnexpectedNil)?
                    } else {
                        target
                    };
                    targets.push(target);
                }
                Targets::Many(targets)
            }
            View::Nullable(Nullable::Unspecified) => return Ok(None),
            View::Nullable(Nullable::Null) => Targets::One(None),
            view => {
                let target = match target_of(view)? {
                    Some(target) if polymorphic => target.selected_variant()?,
                    target => target,
                };
                if target.is_none() && omit_empty {
                    return Ok(None);
                }
                Targets::One(target)
            }
        };

        let data = match targets {
            Targets::One(None) => RelationshipData::One(None),
            Targets::One(Some(target)) => {
                let node = self.related(target)?;
                RelationshipData::One(Some(Box::new(node)))
            }
            Targets::Many(targets) => RelationshipData::Many(
                targets
                    .into_iter()
                    .map(|target| self.related(target))
                    .collect::<Result<_, _>>()?,
            ),
        };

        let links = owner.relationship_links(name);
        if let Some(links) = &links {
            links.validate()?;
        }
        Ok(Some(Relationship {
            data,
            links,
            meta: owner.relationship_meta(name),
        }))
    }

    /// Marshal a related resource and place it according to the mode.
    fn related(&mut self, target: &dyn Resource) -> Result<Node, Error> {
        let node = target.to_node(self)?;
        match self.mode {
            Mode::Embed => Ok(node),
            Mode::Sideload => {
                let shallow = node.shallow();
                self.included.insert(node);
                Ok(shallow)
            }
        }
    }
}

/// The related resource a relation field points at, if any.
fn target_of(view: View<'_>) -> Result<Option<&dyn Resource>, Error> {
    match view {
        View::Model(resource) => Ok(Some(resource)),
        View::Optional(None) | View::Nullable(Nullable::Null | Nullable::Unspecified) => Ok(None),
        View::Optional(Some(inner)) | View::Nullable(Nullable::Present(inner)) => {
            target_of(inner.view())
        }
        _ => Err(Error::unexpected_type(
            "relation field must hold a model, an optional model or a list of models",
        )),
    }
}

fn primary_id(field: &dyn Field) -> Result<String, Error> {
    match field.view() {
        View::Str(id) => Ok(id.to_string()),
        View::Int(0) | View::Uint(0) => Ok(String::new()),
        View::Int(id) => Ok(id.to_string()),
        View::Uint(id) => Ok(id.to_string()),
        View::Optional(None) => Ok(String::new()),
        View::Optional(Some(inner)) => primary_id(inner),
        _ => Err(Error::BadPrimaryId),
    }
}

fn client_id(field: &dyn Field) -> Result<String, Error> {
    match field.view() {
        View::Str(id) => Ok(id.to_string()),
        View::Optional(None) => Ok(String::new()),
        View::Optional(Some(inner)) => client_id(inner),
        _ => Err(Error::unexpected_type("client id must be a string")),
    }
}

/// Attribute member for a field, or `None` when it is omitted.
fn attribute_value(
    field: &dyn Field,
    omit_empty: bool,
    format: TimeFormat,
) -> Result<Option<Value>, Error> {
    match field.view() {
        View::Time(time) if is_zero_time(time) => Ok(None),
        View::Optional(None) => Ok((!omit_empty).then_some(Value::Null)),
        View::Optional(Some(inner)) => match inner.view() {
            View::Time(time) if omit_empty && is_zero_time(time) => Ok(None),
            _ => render(inner, format).map(Some),
        },
        View::Nullable(Nullable::Unspecified) => Ok(None),
        View::Nullable(Nullable::Null) => Ok(Some(Value::Null)),
        View::Nullable(Nullable::Present(inner)) => render(inner, format).map(Some),
        _ if omit_empty && field.is_zero() => Ok(None),
        _ => render(field, format).map(Some),
    }
}

fn render(field: &dyn Field, format: TimeFormat) -> Result<Value, Error> {
    let value = match field.view() {
        View::Bool(value) => Value::Bool(value),
        View::Int(value) => Value::from(value),
        View::Uint(value) => Value::from(value),
        View::Float(value) => render_float(value),
        View::Str(value) => Value::String(value.to_string()),
        View::Time(time) => render_time(time, format),
        View::Json(value) => value.clone(),
        View::Links(links) => Value::Object(links.as_map().clone()),
        View::Optional(None) | View::Nullable(Nullable::Null | Nullable::Unspecified) => {
            Value::Null
        }
        View::Optional(Some(inner)) | View::Nullable(Nullable::Present(inner)) => {
            render(inner, format)?
        }
        View::List(items) => Value::Array(
            items
                .into_iter()
                .map(|item| render(item, format))
                .collect::<Result<_, _>>()?,
        ),
        View::Model(resource) => Value::Object(resource.to_attributes()?),
    };
    Ok(value)
}

/// Attribute members of a model nested inside an attribute. Only attribute
/// fields take part; their own modifiers apply.
pub(crate) fn attribute_object<M: Model>(model: &M) -> Result<Map<String, Value>, Error> {
    let mut members = Map::new();
    for entry in plan::<M>().entries() {
        if let Directive::Attribute {
            name,
            omit_empty,
            time_format,
        } = entry.require()?
        {
            if let Some(value) = attribute_value(entry.get(model), *omit_empty, *time_format)? {
                members.insert(name.clone(), value);
            }
        }
    }
    Ok(members)
}

/// Marshal a single resource with side-loading.
pub fn marshal_one<R: Resource + ?Sized>(resource: &R) -> Result<Document, Error> {
    marshal_one_with(resource, &MarshalOptions::new())
}

/// Marshal a single resource with related resources inlined.
pub fn marshal_one_embedded<R: Resource + ?Sized>(resource: &R) -> Result<Document, Error> {
    marshal_one_with(resource, &MarshalOptions::embedded())
}

pub fn marshal_one_with<R: Resource + ?Sized>(
    resource: &R,
    options: &MarshalOptions,
) -> Result<Document, Error> {
    let mut marshaler = Marshaler::new(options);
    let node = marshaler.visit(resource)?;
    let mut document = Document::one(Some(node));
    document.included = marshaler.finish();
    Ok(document)
}

/// Marshal a list of resources with side-loading. `None` entries become
/// `null` in the output list.
pub fn marshal_many<'a, R, I>(resources: I) -> Result<Document, Error>
where
    R: Resource + ?Sized + 'a,
    I: IntoIterator<Item = Option<&'a R>>,
{
    marshal_many_with(resources, &MarshalOptions::new())
}

/// Marshal a list of resources with related resources inlined.
pub fn marshal_many_embedded<'a, R, I>(resources: I) -> Result<Document, Error>
where
    R: Resource + ?Sized + 'a,
    I: IntoIterator<Item = Option<&'a R>>,
{
    marshal_many_with(resources, &MarshalOptions::embedded())
}

pub fn marshal_many_with<'a, R, I>(resources: I, options: &MarshalOptions) -> Result<Document, Error>
where
    R: Resource + ?Sized + 'a,
    I: IntoIterator<Item = Option<&'a R>>,
{
    let mut marshaler = Marshaler::new(options);
    let mut nodes = Vec::new();
    for resource in resources {
        nodes.push(match resource {
            Some(resource) => Some(marshaler.visit(resource)?),
            None => None,
        });
    }
    tracing::debug!(
        resources = nodes.len(),
        included = marshaler.included.len(),
        "marshaled resource list"
    );
    let mut document = Document::many(nodes);
    document.included = marshaler.finish();
    Ok(document)
}
