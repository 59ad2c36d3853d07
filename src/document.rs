//! Wire-level document model.
//!
//! These types mirror the JSON shape one to one and are (de)serialized with
//! serde. The visitors in [`crate::marshal`] and [`crate::unmarshal`] only ever
//! talk to models through these nodes.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::included::IncludedSet;

/// Free-form metadata object.
pub type Meta = Map<String, Value>;

/// Well-known link names.
pub const KEY_SELF_LINK: &str = "self";
pub const KEY_RELATED_LINK: &str = "related";
pub const KEY_FIRST_PAGE: &str = "first";
pub const KEY_PREVIOUS_PAGE: &str = "prev";
pub const KEY_NEXT_PAGE: &str = "next";
pub const KEY_LAST_PAGE: &str = "last";

/// Top-level document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub data: Data,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Primary data: a single resource (possibly null) or a list of resources.
///
/// Entries of a list may be null; this only happens when a caller marshals
/// a list with holes at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Data {
    Many(Vec<Option<Node>>),
    One(Option<Box<Node>>),
}

/// Resource object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "client-id", default, skip_serializing_if = "String::is_empty")]
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Relationship object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: RelationshipData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Linkage of a relationship: to-one (possibly null) or to-many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    Many(Vec<Node>),
    One(Option<Box<Node>>),
}

impl Default for RelationshipData {
    fn default() -> Self {
        RelationshipData::One(None)
    }
}

/// Links object: each member is either a URL string or `{href, meta}`.
///
/// Stored as raw JSON so that documents received from elsewhere round-trip
/// untouched; [`Links::validate`] enforces the member shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Links(Map<String, Value>);

/// Typed view of a single links member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Link<'a> {
    Href(&'a str),
    Object { href: &'a str, meta: Option<&'a Meta> },
}

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain URL member.
    pub fn href(mut self, name: impl Into<String>, href: impl Into<String>) -> Self {
        self.0.insert(name.into(), Value::String(href.into()));
        self
    }

    /// Add a link object member.
    pub fn link(mut self, name: impl Into<String>, href: impl Into<String>, meta: Option<Meta>) -> Self {
        let mut object = Map::new();
        object.insert("href".to_string(), Value::String(href.into()));
        if let Some(meta) = meta {
            object.insert("meta".to_string(), Value::Object(meta));
        }
        self.0.insert(name.into(), Value::Object(object));
        self
    }

    /// Insert a raw member without checking its shape.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    /// Typed lookup; `None` if absent or malformed.
    pub fn get(&self, name: &str) -> Option<Link<'_>> {
        match self.0.get(name)? {
            Value::String(href) => Some(Link::Href(href)),
            Value::Object(object) => {
                let href = object.get("href")?.as_str()?;
                let meta = match object.get("meta") {
                    None | Some(Value::Null) => None,
                    Some(Value::Object(meta)) => Some(meta),
                    Some(_) => return None,
                };
                Some(Link::Object { href, meta })
            }
            _ => None,
        }
    }

    /// Check that every member is a string or a `{href, meta}` object.
    pub fn validate(&self) -> Result<(), Error> {
        for name in self.0.keys() {
            if self.get(name).is_none() {
                return Err(Error::InvalidLink { name: name.clone() });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Links {
    fn from(map: Map<String, Value>) -> Self {
        Links(map)
    }
}

impl Link<'_> {
    pub fn href(&self) -> &str {
        match self {
            Link::Href(href) | Link::Object { href, .. } => href,
        }
    }
}

impl Node {
    /// Create a resource object with the given type and id.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Node {
            kind: kind.into(),
            id: id.into(),
            ..Node::default()
        }
    }

    /// The `(type, id)` identity, if an id is assigned.
    pub fn key(&self) -> Option<(&str, &str)> {
        if self.id.is_empty() {
            None
        } else {
            Some((self.kind.as_str(), self.id.as_str()))
        }
    }

    /// True when the node carries nothing beyond its identity.
    pub fn is_identifier(&self) -> bool {
        self.attributes.is_empty() && self.relationships.is_empty()
    }

    /// Reference used in side-loaded relationships: type and id, or type and
    /// attributes when no id is assigned yet (create-with-nested-object).
    pub fn shallow(&self) -> Node {
        let mut shallow = Node {
            kind: self.kind.clone(),
            ..Node::default()
        };
        if self.id.is_empty() {
            shallow.attributes = self.attributes.clone();
        } else {
            shallow.id = self.id.clone();
        }
        shallow
    }
}

impl Document {
    /// Single-resource document.
    pub fn one(node: Option<Node>) -> Self {
        Document {
            data: Data::One(node.map(Box::new)),
            included: Vec::new(),
            links: None,
            meta: None,
        }
    }

    /// Resource-list document.
    pub fn many(nodes: Vec<Option<Node>>) -> Self {
        Document {
            data: Data::Many(nodes),
            included: Vec::new(),
            links: None,
            meta: None,
        }
    }

    /// Attach top-level links.
    pub fn with_links(mut self, links: Links) -> Self {
        self.links = Some(links);
        self
    }

    /// Attach top-level meta.
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Parse a document from JSON text.
    pub fn parse(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a document from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Parse a document from a generic value tree.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<Value, Error> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Primary resources in order, skipping null entries.
    pub fn primary(&self) -> Vec<&Node> {
        match &self.data {
            Data::One(node) => node.as_deref().into_iter().collect(),
            Data::Many(nodes) => nodes.iter().flatten().collect(),
        }
    }

    /// Inline every included resource into the relationships referencing it
    /// and drop `included`.
    ///
    /// A reference back to a resource that is already being inlined on the
    /// current path stays an identifier.
    pub fn embed(mut self) -> Self {
        let included: HashMap<(String, String), Node> = self
            .included
            .drain(..)
            .filter_map(|node| {
                let key = node.key().map(|(k, i)| (k.to_string(), i.to_string()))?;
                Some((key, node))
            })
            .collect();

        let mut path = Vec::new();
        match &mut self.data {
            Data::One(Some(node)) => embed_node(node, &included, &mut path),
            Data::One(None) => {}
            Data::Many(nodes) => {
                for node in nodes.iter_mut().flatten() {
                    embed_node(node, &included, &mut path);
                }
            }
        }
        self
    }

    /// Hoist nested resources that have an id into `included`, leaving
    /// identifiers behind. Already-included resources win over nested copies.
    pub fn sideload(mut self) -> Self {
        let mut set = IncludedSet::new();
        let existing = std::mem::take(&mut self.included);
        let mut pending = Vec::with_capacity(existing.len());
        for mut node in existing {
            sideload_relationships(&mut node, &mut set);
            pending.push(node);
        }
        // Resources that were already included take precedence.
        let mut merged = IncludedSet::new();
        for node in pending {
            merged.insert(node);
        }
        for node in set.into_vec() {
            merged.insert(node);
        }

        match &mut self.data {
            Data::One(Some(node)) => sideload_relationships(node, &mut merged),
            Data::One(None) => {}
            Data::Many(nodes) => {
                for node in nodes.iter_mut().flatten() {
                    sideload_relationships(node, &mut merged);
                }
            }
        }
        self.included = merged.into_vec();
        self
    }
}

fn embed_node(
    node: &mut Node,
    included: &HashMap<(String, String), Node>,
    path: &mut Vec<(String, String)>,
) {
    let own = node.key().map(|(k, i)| (k.to_string(), i.to_string()));
    if let Some(key) = &own {
        path.push(key.clone());
    }
    for relationship in node.relationships.values_mut() {
        match &mut relationship.data {
            RelationshipData::One(Some(target)) => embed_target(target, included, path),
            RelationshipData::One(None) => {}
            RelationshipData::Many(targets) => {
                for target in targets {
                    embed_target(target, included, path);
                }
            }
        }
    }
    if own.is_some() {
        path.pop();
    }
}

fn embed_target(
    target: &mut Node,
    included: &HashMap<(String, String), Node>,
    path: &mut Vec<(String, String)>,
) {
    let Some((kind, id)) = target.key() else {
        embed_node(target, included, path);
        return;
    };
    let key = (kind.to_string(), id.to_string());
    if path.contains(&key) {
        tracing::trace!(kind = %key.0, id = %key.1, "cycle while embedding, keeping identifier");
        return;
    }
    if let Some(full) = included.get(&key) {
        if target.is_identifier() {
            *target = full.clone();
        }
    }
    embed_node(target, included, path);
}

fn sideload_relationships(node: &mut Node, set: &mut IncludedSet) {
    for relationship in node.relationships.values_mut() {
        match &mut relationship.data {
            RelationshipData::One(Some(target)) => sideload_target(target, set),
            RelationshipData::One(None) => {}
            RelationshipData::Many(targets) => {
                for target in targets {
                    sideload_target(target, set);
                }
            }
        }
    }
}

fn sideload_target(target: &mut Node, set: &mut IncludedSet) {
    if target.id.is_empty() || target.is_identifier() {
        return;
    }
    sideload_relationships(target, set);
    let identifier = Node::new(target.kind.clone(), target.id.clone());
    let full = std::mem::replace(target, identifier);
    set.insert(full);
}
