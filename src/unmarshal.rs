//! Unmarshal visitor: documents to models.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::document::{Data, Document, Node, RelationshipData};
use crate::error::Error;
use crate::field::{Attribute, Input, Linkage};
use crate::model::Model;
use crate::plan::{plan, Directive, Entry, Plan};
use crate::poly;
use crate::types::UnmarshalOptions;

type Key<'d> = (&'d str, &'d str);

/// Walks resource objects of one document and fills models.
///
/// Related resources are looked up in the document's `included` list (and
/// among the primary resources) by `(type, id)`; a relationship that cannot
/// be resolved is decoded from the identifier alone. A resource referenced
/// while it is already being decoded further up yields only its id.
pub struct Unmarshaler<'d> {
    options: UnmarshalOptions,
    resources: HashMap<Key<'d>, &'d Node>,
    in_progress: Vec<Key<'d>>,
    variant_matches: usize,
}

impl<'d> Unmarshaler<'d> {
    pub fn new(document: &'d Document, options: &UnmarshalOptions) -> Self {
        let mut resources = HashMap::new();
        for node in document.included.iter().chain(document.primary()) {
            if let Some(key) = node.key() {
                resources.entry(key).or_insert(node);
            }
        }
        Unmarshaler {
            options: options.clone(),
            resources,
            in_progress: Vec::new(),
            variant_matches: 0,
        }
    }

    /// Decode a resource object into `model`.
    pub fn decode_node<M: Model>(&mut self, node: &'d Node, model: &mut M) -> Result<(), Error> {
        if node.kind.is_empty() {
            return Err(Error::MissingType);
        }
        let plan = plan::<M>();
        let expected = plan.resource_type()?;
        if self.options.strict_types && expected != node.kind {
            return Err(Error::TypeMismatch {
                expected: expected.to_string(),
                found: node.kind.clone(),
            });
        }

        let key = node.key();
        if let Some(key) = key {
            self.in_progress.push(key);
        }
        let result = self.decode_fields(plan, node, model);
        if key.is_some() {
            self.in_progress.pop();
        }
        result
    }

    fn decode_fields<M: Model>(
        &mut self,
        plan: &'static Plan<M>,
        node: &'d Node,
        model: &mut M,
    ) -> Result<(), Error> {
        let mut matched: HashSet<&str> = HashSet::new();
        let mut deferred: Vec<&Entry<M>> = Vec::new();

        for entry in plan.entries() {
            if entry.is_shadowed() {
                deferred.push(entry);
                continue;
            }
            let input = match entry.require()? {
                Directive::Primary { .. } if node.id.is_empty() => continue,
                Directive::Primary { .. } => Input::Id(&node.id),
                Directive::ClientId if node.client_id.is_empty() => continue,
                Directive::ClientId => Input::ClientId(&node.client_id),
                Directive::Attribute {
                    name, time_format, ..
                } => match node.attributes.get(name.as_str()) {
                    Some(value) => Input::Attribute(Attribute {
                        name,
                        value,
                        format: *time_format,
                    }),
                    None => Input::Absent,
                },
                Directive::Relation {
                    name, polymorphic, ..
                } => {
                    let linkage = if *polymorphic {
                        Linkage::Polymorphic
                    } else {
                        Linkage::Plain
                    };
                    match node.relationships.get(name.as_str()) {
                        Some(relationship) if linkage == Linkage::Polymorphic => {
                            let before = self.variant_matches;
                            entry
                                .get_mut(model)
                                .decode(linkage_input(&relationship.data, linkage), self)?;
                            if self.variant_matches > before {
                                matched.insert(name);
                            }
                            continue;
                        }
                        Some(relationship) => linkage_input(&relationship.data, linkage),
                        None => Input::Absent,
                    }
                }
                Directive::Links => match &node.links {
                    Some(links) => Input::Links(links),
                    None => continue,
                },
            };
            entry.get_mut(model).decode(input, self)?;
        }

        for entry in deferred {
            let Some(name) = entry.directive().and_then(Directive::name) else {
                continue;
            };
            if matched.contains(name) {
                continue;
            }
            if let Some(relationship) = node.relationships.get(name) {
                entry
                    .get_mut(model)
                    .decode(linkage_input(&relationship.data, Linkage::Plain), self)?;
            }
        }
        Ok(())
    }

    /// Decode a relationship target, preferring the full resource when the
    /// document carries one.
    pub(crate) fn decode_related<M: Model>(
        &mut self,
        node: &'d Node,
        model: &mut M,
    ) -> Result<(), Error> {
        let target = match node.key() {
            Some(key) if self.in_progress.contains(&key) => {
                tracing::trace!(kind = key.0, id = key.1, "cyclic reference, decoding id only");
                return self.decode_identifier(node, model);
            }
            Some(key) => match self.resources.get(&key) {
                Some(full) => *full,
                None => {
                    if node.is_identifier() {
                        tracing::trace!(kind = key.0, id = key.1, "unresolved reference, decoding id only");
                    }
                    node
                }
            },
            None => node,
        };
        self.decode_node(target, model)
    }

    fn decode_identifier<M: Model>(&mut self, node: &'d Node, model: &mut M) -> Result<(), Error> {
        for entry in plan::<M>().entries() {
            if let Directive::Primary { .. } = entry.require()? {
                entry.get_mut(model).decode(Input::Id(&node.id), self)?;
            }
        }
        Ok(())
    }

    /// Decode a polymorphic relationship target into the matching slot of
    /// the variant set `M`. No match leaves the set empty.
    pub(crate) fn decode_variant<M: Model>(
        &mut self,
        node: &'d Node,
        set: &mut M,
    ) -> Result<(), Error> {
        let plan = plan::<M>();
        if !plan.is_variant_set() {
            return Err(Error::unexpected_type(format!(
                "`{}` is used as a polymorphic relation but declares no variants",
                std::any::type_name::<M>()
            )));
        }
        if node.kind.is_empty() {
            return Err(Error::MissingType);
        }
        match poly::match_variant::<M>(&node.kind) {
            Some(index) => {
                plan.variants()[index].decode(set, node, self)?;
                self.variant_matches += 1;
            }
            None => tracing::trace!(
                kind = %node.kind,
                variants = ?poly::variant_types::<M>(),
                "no variant matches relationship type"
            ),
        }
        Ok(())
    }

    /// Decode the attribute fields of a model nested inside an attribute.
    pub(crate) fn decode_attributes<M: Model>(
        &mut self,
        members: &'d Map<String, Value>,
        model: &mut M,
    ) -> Result<(), Error> {
        for entry in plan::<M>().entries() {
            if let Directive::Attribute {
                name, time_format, ..
            } = entry.require()?
            {
                let input = match members.get(name.as_str()) {
                    Some(value) => Input::Attribute(Attribute {
                        name,
                        value,
                        format: *time_format,
                    }),
                    None => Input::Absent,
                };
                entry.get_mut(model).decode(input, self)?;
            }
        }
        Ok(())
    }
}

fn linkage_input(data: &RelationshipData, linkage: Linkage) -> Input<'_> {
    match data {
        RelationshipData::One(node) => Input::ToOne(node.as_deref(), linkage),
        RelationshipData::Many(nodes) => Input::ToMany(nodes, linkage),
    }
}

/// Decode the single primary resource of a document.
pub fn unmarshal_one<M: Model>(document: &Document) -> Result<M, Error> {
    unmarshal_one_with(document, &UnmarshalOptions::new())
}

pub fn unmarshal_one_with<M: Model>(
    document: &Document,
    options: &UnmarshalOptions,
) -> Result<M, Error> {
    let node = match &document.data {
        Data::One(Some(node)) => node,
        Data::One(None) => return Err(Error::MissingData),
        Data::Many(_) => {
            return Err(Error::unexpected_type(
                "expected a single resource, found a list",
            ))
        }
    };
    let mut model = M::default();
    Unmarshaler::new(document, options).decode_node(node, &mut model)?;
    Ok(model)
}

/// Decode every primary resource of a list document.
pub fn unmarshal_many<M: Model>(document: &Document) -> Result<Vec<M>, Error> {
    unmarshal_many_with(document, &UnmarshalOptions::new())
}

pub fn unmarshal_many_with<M: Model>(
    document: &Document,
    options: &UnmarshalOptions,
) -> Result<Vec<M>, Error> {
    let Data::Many(nodes) = &document.data else {
        return Err(Error::unexpected_type(
            "expected a list of resources, found a single resource",
        ));
    };
    let mut unmarshaler = Unmarshaler::new(document, options);
    let mut models = Vec::with_capacity(nodes.len());
    for node in nodes {
        let node = node.as_ref().ok_or(Error::UnexpectedNil)?;
        let mut model = M::default();
        unmarshaler.decode_node(node, &mut model)?;
        models.push(model);
    }
    tracing::debug!(resources = models.len(), "unmarshaled resource list");
    Ok(models)
}

/// Parse JSON text and decode its single primary resource.
pub fn from_str<M: Model>(text: &str) -> Result<M, Error> {
    unmarshal_one(&Document::parse(text)?)
}
