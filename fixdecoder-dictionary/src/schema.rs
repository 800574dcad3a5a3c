//! Hierarchical, display-oriented view of a dictionary.
//!
//! Every component reference, group and message is expanded recursively into
//! owned nodes, so a [`SchemaTree`] can be walked without going back to the
//! name maps. Field definitions are shared between nodes.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use tracing::{debug, trace};

use crate::{
    Error, ValidationError,
    xml::{Component, Field, FieldType, Group, Member, Message, RawDictionary},
};


pub const HEADER: &str = "Header";
pub const TRAILER: &str = "Trailer";

/// Shown instead of an absent service pack.
pub const NO_SERVICE_PACK: &str = "n/a";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumValue {
    pub value: String,
    pub description: String,
}

/// A field definition from the `<fields>` section.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldSpec {
    pub number: u32,
    pub name: String,
    pub data_type: Option<FieldType>,
    /// The type name as declared, aliases included.
    pub declared_type: Option<String>,
    /// Enumerated values in declaration order, first declaration of a code
    /// wins.
    pub values: Vec<EnumValue>,
}

impl FieldSpec {
    fn from_xml(field: &Field) -> FieldSpec {
        let mut values: Vec<EnumValue> = Vec::new();
        for value in field.all_values() {
            if values.iter().all(|known| known.value != value.value_enum) {
                values.push(EnumValue {
                    value: value.value_enum.clone(),
                    description: value.description.clone(),
                });
            }
        }
        FieldSpec {
            number: field.number,
            name: field.name.clone(),
            data_type: field.data_type(),
            declared_type: field.type_name.clone(),
            values,
        }
    }

    /// Returns the declared type name, empty if the field has none.
    pub fn type_name(&self) -> &str {
        self.declared_type.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldNode {
    pub field: Arc<FieldSpec>,
    pub required: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComponentNode {
    pub name: String,
    /// Whether the reference that produced this node is required. Always
    /// false for top-level component definitions.
    pub required: bool,
    pub members: Vec<SchemaNode>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupNode {
    pub name: String,
    pub required: bool,
    pub members: Vec<SchemaNode>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MessageNode {
    pub name: String,
    pub msg_type: String,
    pub msg_cat: String,
    pub members: Vec<SchemaNode>,
}

/// A resolved member of a component, group or message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SchemaNode {
    Field(FieldNode),
    Component(ComponentNode),
    Group(GroupNode),
}

/// Member accessors shared by every node that has members.
pub trait Members {
    fn members(&self) -> &[SchemaNode];

    fn fields(&self) -> impl Iterator<Item = &FieldNode> {
        self.members().iter().filter_map(|member| match member {
            SchemaNode::Field(field) => Some(field),
            _ => None,
        })
    }

    fn components(&self) -> impl Iterator<Item = &ComponentNode> {
        self.members().iter().filter_map(|member| match member {
            SchemaNode::Component(component) => Some(component),
            _ => None,
        })
    }

    fn groups(&self) -> impl Iterator<Item = &GroupNode> {
        self.members().iter().filter_map(|member| match member {
            SchemaNode::Group(group) => Some(group),
            _ => None,
        })
    }
}

impl Members for ComponentNode {
    fn members(&self) -> &[SchemaNode] {
        &self.members
    }
}

impl Members for GroupNode {
    fn members(&self) -> &[SchemaNode] {
        &self.members
    }
}

impl Members for MessageNode {
    fn members(&self) -> &[SchemaNode] {
        &self.members
    }
}

/// Fully expanded dictionary, keyed by name.
#[derive(Clone, Debug)]
pub struct SchemaTree {
    fields: BTreeMap<String, Arc<FieldSpec>>,
    fields_by_tag: BTreeMap<u32, Arc<FieldSpec>>,
    components: BTreeMap<String, ComponentNode>,
    messages: BTreeMap<String, MessageNode>,
    header: ComponentNode,
    trailer: ComponentNode,
    version: String,
    service_pack: String,
}

struct Builder<'a> {
    fields: &'a BTreeMap<String, Arc<FieldSpec>>,
    components: HashMap<&'a str, &'a Component>,
    branch: Vec<&'a str>,
}

impl<'a> Builder<'a> {
    fn enter(&mut self, name: &'a str) -> Result<(), ValidationError> {
        if self.branch.contains(&name) {
            let mut cycle = self.branch.join(" -> ");
            cycle.push_str(" -> ");
            cycle.push_str(name);
            return Err(ValidationError::CircularReference(cycle));
        }
        self.branch.push(name);
        Ok(())
    }

    fn members(&mut self, members: &'a [Member]) -> Result<Vec<SchemaNode>, Error> {
        let mut nodes = Vec::with_capacity(members.len());
        for member in members {
            match member {
                Member::Field(reference) => match self.fields.get(&reference.name) {
                    Some(field) => nodes.push(SchemaNode::Field(FieldNode {
                        field: Arc::clone(field),
                        required: reference.required,
                    })),
                    None => trace!(name = %reference.name, "dropping undeclared field"),
                },
                Member::Component(reference) => {
                    match self.components.get(reference.name.as_str()).copied() {
                        Some(component) => nodes.push(SchemaNode::Component(
                            self.component(component, reference.required)?,
                        )),
                        None => trace!(name = %reference.name, "dropping undeclared component"),
                    }
                }
                Member::Group(group) => nodes.push(SchemaNode::Group(self.group(group)?)),
            }
        }
        Ok(nodes)
    }

    fn component(
        &mut self,
        component: &'a Component,
        required: bool,
    ) -> Result<ComponentNode, Error> {
        self.enter(&component.name)?;
        let members = self.members(&component.members)?;
        self.branch.pop();
        Ok(ComponentNode {
            name: component.name.clone(),
            required,
            members,
        })
    }

    fn group(&mut self, group: &'a Group) -> Result<GroupNode, Error> {
        self.enter(&group.name)?;
        let members = self.members(&group.members)?;
        self.branch.pop();
        Ok(GroupNode {
            name: group.name.clone(),
            required: group.required,
            members,
        })
    }

    fn message(&mut self, message: &'a Message) -> Result<MessageNode, Error> {
        Ok(MessageNode {
            name: message.name.clone(),
            msg_type: message.msg_type.clone(),
            msg_cat: message.msg_cat.clone(),
            members: self.members(&message.members)?,
        })
    }

    fn envelope(&mut self, name: &str, members: &'a [Member]) -> Result<ComponentNode, Error> {
        Ok(ComponentNode {
            name: name.to_owned(),
            required: false,
            members: self.members(members)?,
        })
    }
}

impl SchemaTree {
    /// Parses dictionary XML and builds the tree.
    pub fn from_xml(xml: &str) -> Result<SchemaTree, Error> {
        SchemaTree::build(&RawDictionary::parse(xml)?)
    }

    /// Builds the tree from an already parsed dictionary.
    ///
    /// # Errors
    ///
    /// Fails with [`ValidationError::CircularReference`] if a component or
    /// group contains itself. References to undeclared names are dropped.
    pub fn build(raw: &RawDictionary) -> Result<SchemaTree, Error> {
        let fields: BTreeMap<String, Arc<FieldSpec>> = raw
            .fields
            .iter()
            .map(|field| (field.name.clone(), Arc::new(FieldSpec::from_xml(field))))
            .collect();
        let fields_by_tag = fields
            .values()
            .map(|field| (field.number, Arc::clone(field)))
            .collect();

        let mut builder = Builder {
            fields: &fields,
            components: raw
                .components
                .iter()
                .map(|component| (component.name.as_str(), component))
                .collect(),
            branch: Vec::new(),
        };

        let mut components = BTreeMap::new();
        for component in &raw.components {
            components.insert(component.name.clone(), builder.component(component, false)?);
        }

        let mut messages = BTreeMap::new();
        for message in &raw.messages {
            messages.insert(message.name.clone(), builder.message(message)?);
        }

        let header = builder.envelope(HEADER, &raw.header.members)?;
        let trailer = builder.envelope(TRAILER, &raw.trailer.members)?;

        let service_pack = match raw.servicepack.as_deref() {
            Some(sp) if !sp.is_empty() => sp.to_owned(),
            _ => NO_SERVICE_PACK.to_owned(),
        };

        debug!(
            fields = fields.len(),
            components = components.len(),
            messages = messages.len(),
            "schema tree built"
        );

        Ok(SchemaTree {
            fields,
            fields_by_tag,
            components,
            messages,
            header,
            trailer,
            version: format!("{}.{}", raw.major, raw.minor),
            service_pack,
        })
    }

    /// Protocol version as "major.minor".
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Service pack, or [`NO_SERVICE_PACK`] when the dictionary has none.
    pub fn service_pack(&self) -> &str {
        &self.service_pack
    }

    pub fn header(&self) -> &ComponentNode {
        &self.header
    }

    pub fn trailer(&self) -> &ComponentNode {
        &self.trailer
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name).map(Arc::as_ref)
    }

    pub fn field_by_tag(&self, tag: u32) -> Option<&FieldSpec> {
        self.fields_by_tag.get(&tag).map(Arc::as_ref)
    }

    /// Fields ordered by tag number.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields_by_tag.values().map(Arc::as_ref)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Looks up a component by name. The envelopes are available as
    /// [`HEADER`] and [`TRAILER`].
    pub fn component(&self, name: &str) -> Option<&ComponentNode> {
        match name {
            HEADER => Some(&self.header),
            TRAILER => Some(&self.trailer),
            _ => self.components.get(name),
        }
    }

    /// All components ordered by name, envelopes included.
    pub fn components(&self) -> impl Iterator<Item = &ComponentNode> {
        let mut all: Vec<&ComponentNode> = self
            .components
            .values()
            .filter(|component| component.name != HEADER && component.name != TRAILER)
            .chain([&self.header, &self.trailer])
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all.into_iter()
    }

    pub fn component_count(&self) -> usize {
        self.components().count()
    }

    pub fn message(&self, name: &str) -> Option<&MessageNode> {
        self.messages.get(name)
    }

    pub fn message_by_type(&self, msg_type: &str) -> Option<&MessageNode> {
        self.messages
            .values()
            .find(|message| message.msg_type == msg_type)
    }

    /// Messages ordered by name.
    pub fn messages(&self) -> impl Iterator<Item = &MessageNode> {
        self.messages.values()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}
