//! Flat, validation-oriented view of a dictionary.
//!
//! A [`FlatDictionary`] answers the questions a decoder asks while walking a
//! message one field at a time: what is this tag called, what type does it
//! have, what does this enum code mean, is this tag a group counter, and which
//! tags does a given message type require and in what order.

use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
};

use tracing::{debug, trace};

use crate::{
    Error, ValidationError,
    xml::{Component, FieldType, Group, Member, RawDictionary},
};


/// `MsgType(35)`, whose enum map is filled with the declared messages.
pub const MSG_TYPE_TAG: u32 = 35;

/// Repeating group definition, keyed by its counting tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupDef {
    /// The NumInGroup tag counting group instances
    pub count_tag: u32,
    /// Member tags in declaration order. Nested groups contribute their own
    /// counting tag.
    pub field_order: Vec<u32>,
}

/// Message definition with its body layout flattened to tag numbers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MessageDef {
    pub msg_type: String,
    pub name: String,
    /// Body tags in declaration order, components expanded in place. Each
    /// tag appears once; a group contributes only its counting tag.
    pub field_order: Vec<u32>,
    /// Required body tags in declaration order.
    pub required: Vec<u32>,
}

/// Non-hierarchical lookup tables built from one dictionary source.
///
/// Read-only once built (apart from [`merge`](FlatDictionary::merge), which
/// happens before the instance is shared).
#[derive(Clone, Debug, Default)]
pub struct FlatDictionary {
    tag_to_name: HashMap<u32, String>,
    name_to_tag: HashMap<String, u32>,
    enum_map: HashMap<u32, HashMap<String, String>>,
    field_types: HashMap<u32, FieldType>,
    type_names: HashMap<u32, String>,
    group_counts: HashSet<u32>,
    group_owners: HashMap<u32, u32>,
    group_defs: HashMap<u32, GroupDef>,
    messages: HashMap<String, MessageDef>,
}

#[derive(Default)]
struct Layout {
    order: Vec<u32>,
    seen: HashSet<u32>,
    required: Vec<u32>,
}

impl Layout {
    fn push(&mut self, tag: u32, required: bool) {
        if self.seen.insert(tag) {
            self.order.push(tag);
        }
        if required && !self.required.contains(&tag) {
            self.required.push(tag);
        }
    }
}

/// Pushes `name` onto the current expansion branch, failing if it is
/// already on it.
fn enter<'a>(branch: &mut Vec<&'a str>, name: &'a str) -> Result<(), ValidationError> {
    if branch.contains(&name) {
        let mut cycle = branch.join(" -> ");
        cycle.push_str(" -> ");
        cycle.push_str(name);
        return Err(ValidationError::CircularReference(cycle));
    }
    branch.push(name);
    Ok(())
}

impl FlatDictionary {
    /// Parses dictionary XML and builds the lookup tables.
    ///
    /// # Errors
    ///
    /// Malformed XML is reported as [`Error::XmlParse`], a component or group
    /// containing itself as [`ValidationError::CircularReference`]. Dangling
    /// references are skipped.
    pub fn load(xml: &str) -> Result<FlatDictionary, Error> {
        FlatDictionary::from_raw(&RawDictionary::parse(xml)?)
    }

    pub fn from_raw(raw: &RawDictionary) -> Result<FlatDictionary, Error> {
        let mut dictionary = FlatDictionary::default();

        for field in &raw.fields {
            dictionary
                .tag_to_name
                .insert(field.number, field.name.clone());
            dictionary
                .name_to_tag
                .entry(field.name.clone())
                .or_insert(field.number);
            if let Some(type_name) = &field.type_name {
                dictionary
                    .field_types
                    .insert(field.number, FieldType::from_name(type_name));
                dictionary.type_names.insert(field.number, type_name.clone());
            }
            for value in field.all_values() {
                dictionary
                    .enum_map
                    .entry(field.number)
                    .or_default()
                    .entry(value.value_enum.clone())
                    .or_insert_with(|| value.description.clone());
            }
        }

        let components: HashMap<&str, &Component> = raw
            .components
            .iter()
            .map(|component| (component.name.as_str(), component))
            .collect();

        let mut branch = Vec::new();
        for envelope in [&raw.header, &raw.trailer] {
            let mut layout = Layout::default();
            dictionary.flatten(
                &envelope.members,
                &components,
                false,
                &mut layout,
                &mut branch,
            )?;
        }

        for group in &raw.groups {
            dictionary.register_group(group, &components, &mut branch)?;
        }

        for message in &raw.messages {
            let mut layout = Layout::default();
            dictionary.flatten(
                &message.members,
                &components,
                true,
                &mut layout,
                &mut branch,
            )?;
            dictionary.messages.insert(
                message.msg_type.clone(),
                MessageDef {
                    msg_type: message.msg_type.clone(),
                    name: message.name.clone(),
                    field_order: layout.order,
                    required: layout.required,
                },
            );
            dictionary
                .enum_map
                .entry(MSG_TYPE_TAG)
                .or_default()
                .insert(message.msg_type.clone(), message.name.clone());
        }

        debug!(
            fields = dictionary.tag_to_name.len(),
            messages = dictionary.messages.len(),
            groups = dictionary.group_defs.len(),
            "flat dictionary built"
        );

        Ok(dictionary)
    }

    fn flatten<'a>(
        &mut self,
        members: &'a [Member],
        components: &HashMap<&'a str, &'a Component>,
        required: bool,
        layout: &mut Layout,
        branch: &mut Vec<&'a str>,
    ) -> Result<(), Error> {
        for member in members {
            match member {
                Member::Field(field) => match self.name_to_tag.get(&field.name) {
                    Some(&tag) => layout.push(tag, required && field.required),
                    None => trace!(name = %field.name, "skipping undeclared field"),
                },
                Member::Component(reference) => {
                    let Some(component) = components.get(reference.name.as_str()) else {
                        trace!(name = %reference.name, "skipping undeclared component");
                        continue;
                    };
                    enter(branch, &component.name)?;
                    self.flatten(
                        &component.members,
                        components,
                        required && reference.required,
                        layout,
                        branch,
                    )?;
                    branch.pop();
                }
                Member::Group(group) => {
                    if let Some(count_tag) = self.register_group(group, components, branch)? {
                        layout.push(count_tag, required && group.required);
                    }
                }
            }
        }
        Ok(())
    }

    /// Records a group definition and returns its counting tag. Groups seen
    /// more than once (e.g. through a shared component) merge their members.
    fn register_group<'a>(
        &mut self,
        group: &'a Group,
        components: &HashMap<&'a str, &'a Component>,
        branch: &mut Vec<&'a str>,
    ) -> Result<Option<u32>, Error> {
        let Some(&count_tag) = self.name_to_tag.get(&group.name) else {
            trace!(name = %group.name, "skipping group with undeclared counter");
            return Ok(None);
        };

        enter(branch, &group.name)?;
        let mut layout = Layout::default();
        self.flatten(&group.members, components, false, &mut layout, branch)?;
        branch.pop();

        self.group_counts.insert(count_tag);
        let def = self.group_defs.entry(count_tag).or_insert_with(|| GroupDef {
            count_tag,
            field_order: Vec::new(),
        });
        for tag in layout.order {
            if !def.field_order.contains(&tag) {
                def.field_order.push(tag);
            }
            self.group_owners.entry(tag).or_insert(count_tag);
        }

        Ok(Some(count_tag))
    }

    /// Adds everything `other` defines that `self` lacks.
    ///
    /// Entries already present in `self` are never replaced, so the more
    /// specific dictionary wins ties. Used to layer the transport dictionary
    /// beneath FIX 5.0+ application dictionaries.
    pub fn merge(&mut self, other: &FlatDictionary) {
        for (tag, name) in &other.tag_to_name {
            self.tag_to_name.entry(*tag).or_insert_with(|| name.clone());
        }
        for (name, tag) in &other.name_to_tag {
            self.name_to_tag.entry(name.clone()).or_insert(*tag);
        }
        for (tag, values) in &other.enum_map {
            let own = self.enum_map.entry(*tag).or_default();
            for (code, description) in values {
                own.entry(code.clone())
                    .or_insert_with(|| description.clone());
            }
        }
        for (tag, data_type) in &other.field_types {
            self.field_types
                .entry(*tag)
                .or_insert_with(|| data_type.clone());
        }
        for (tag, type_name) in &other.type_names {
            self.type_names
                .entry(*tag)
                .or_insert_with(|| type_name.clone());
        }
        self.group_counts.extend(other.group_counts.iter().copied());
        for (member, owner) in &other.group_owners {
            self.group_owners.entry(*member).or_insert(*owner);
        }
        for (tag, def) in &other.group_defs {
            self.group_defs.entry(*tag).or_insert_with(|| def.clone());
        }
        for (msg_type, def) in &other.messages {
            self.messages
                .entry(msg_type.clone())
                .or_insert_with(|| def.clone());
        }
    }

    /// Returns the declared name of `tag`, or the tag number itself.
    pub fn field_name(&self, tag: u32) -> Cow<'_, str> {
        match self.tag_to_name.get(&tag) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(tag.to_string()),
        }
    }

    /// Returns true if `tag` is declared.
    pub fn has_field(&self, tag: u32) -> bool {
        self.tag_to_name.contains_key(&tag)
    }

    pub fn tag_by_name(&self, name: &str) -> Option<u32> {
        self.name_to_tag.get(name).copied()
    }

    /// Returns the description of an enum code, or an empty string when
    /// either the tag or the code is not declared.
    pub fn enum_description(&self, tag: u32, value: &str) -> &str {
        self.enum_map
            .get(&tag)
            .and_then(|values| values.get(value))
            .map_or("", String::as_str)
    }

    pub fn enum_values(&self, tag: u32) -> Option<&HashMap<String, String>> {
        self.enum_map.get(&tag)
    }

    pub fn field_type(&self, tag: u32) -> Option<&FieldType> {
        self.field_types.get(&tag)
    }

    /// Returns the type name of `tag` as the dictionary spells it, e.g.
    /// `LONG` where [`field_type`](FlatDictionary::field_type) says `INT`.
    pub fn type_name(&self, tag: u32) -> Option<&str> {
        self.type_names.get(&tag).map(String::as_str)
    }

    pub fn is_group_count_field(&self, tag: u32) -> bool {
        self.group_counts.contains(&tag)
    }

    /// Returns the counting tag of the group `tag` belongs to.
    pub fn group_owner(&self, tag: u32) -> Option<u32> {
        self.group_owners.get(&tag).copied()
    }

    pub fn group(&self, count_tag: u32) -> Option<&GroupDef> {
        self.group_defs.get(&count_tag)
    }

    pub fn message(&self, msg_type: &str) -> Option<&MessageDef> {
        self.messages.get(msg_type)
    }

    pub fn messages(&self) -> impl Iterator<Item = &MessageDef> {
        self.messages.values()
    }

    pub fn field_count(&self) -> usize {
        self.tag_to_name.len()
    }
}
