//! XML representation of FIX dictionary sources.
//!
//! This module handles the deserialization of QuickFIX-style XML dictionaries
//! into plain Rust structures using serde and quick-xml. The structures here
//! mirror the document shape one to one; the flat lookup
//! ([`FlatDictionary`](crate::FlatDictionary)) and the display tree
//! ([`SchemaTree`](crate::SchemaTree)) are both built from the same
//! [`RawDictionary`] without re-reading the XML.
//!
//! Parsing is deliberately tolerant about content (missing attributes default,
//! unknown field types are kept verbatim) and strict about structure
//! (malformed XML is an error).

use std::{convert::Infallible, fmt, fs, path::Path, str::FromStr};

use quick_xml::de::from_str;
use serde::{Deserialize, Deserializer};

use crate::Error;

#[cfg(test)]
mod tests;

// Module for custom deserialization of boolean "required" flag
mod required_flag {
    use serde::{Deserialize, Deserializer, de};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "Y" | "YES" | "y" | "yes" => Ok(true),
            "N" | "NO" | "n" | "no" | "" => Ok(false),
            _ => Err(de::Error::custom(format!(
                "invalid `required` flag value: {s}",
            ))),
        }
    }
}

/// A member of a message, component, group, header or trailer.
///
/// Members keep their declaration order, which is significant both for
/// field ordering checks and for display.
#[derive(Clone, Debug, Deserialize)]
pub enum Member {
    /// Reference to a field declared in the `<fields>` section
    #[serde(rename = "field")]
    Field(MemberRef),

    /// Reference to a component declared in the `<components>` section
    #[serde(rename = "component")]
    Component(MemberRef),

    /// Inline repeating group
    #[serde(rename = "group")]
    Group(Group),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Field(member_ref) => &member_ref.name,
            Member::Component(member_ref) => &member_ref.name,
            Member::Group(group) => &group.name,
        }
    }

    pub fn required(&self) -> bool {
        match self {
            Member::Field(member_ref) => member_ref.required,
            Member::Component(member_ref) => member_ref.required,
            Member::Group(group) => group.required,
        }
    }
}

/// A reference to a field or component by name.
#[derive(Clone, Debug, Deserialize)]
pub struct MemberRef {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@required", default, with = "required_flag")]
    pub required: bool,
}

/// `<header>` or `<trailer>` section. Uses the component reference grammar.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(rename = "$value", default)]
    pub members: Vec<Member>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Component {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "$value", default)]
    pub members: Vec<Member>,
}

/// Repeating group. The group name is the name of its NumInGroup counter
/// field (e.g. `NoPartyIDs`).
#[derive(Clone, Debug, Deserialize)]
pub struct Group {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@required", default, with = "required_flag")]
    pub required: bool,
    #[serde(rename = "$value", default)]
    pub members: Vec<Member>,
}

/// Primitive value kinds defined by the FIX protocol.
///
/// Type names are matched case-insensitively. Names the enum does not know
/// are preserved in [`FieldType::Other`] so that custom dictionaries load and
/// display unchanged.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum FieldType {
    /// Amount (decimal number with specific precision)
    Amt,
    /// Boolean value (Y/N)
    Boolean,
    /// Single character
    Char,
    /// Country code (ISO 3166)
    Country,
    /// Currency code (ISO 4217)
    Currency,
    /// Raw binary data
    Data,
    /// Day of month (1-31)
    DayOfMonth,
    /// Exchange identifier (ISO 10383 MIC)
    Exchange,
    /// Floating point number
    Float,
    /// Integer number (`LONG` in some dictionaries)
    Int,
    /// Language identifier (ISO 639-1)
    Language,
    /// Binary data length
    Length,
    /// Local market date (YYYYMMDD)
    LocalMktDate,
    /// Month and year (YYYYMM, YYYYMMDD or YYYYMMwN)
    MonthYear,
    /// Multiple character value (space-delimited)
    MultipleCharValue,
    /// Multiple string value (space-delimited)
    MultipleStringValue,
    /// FIX 4.2 spelling of a space-delimited multiple value
    MultipleValueString,
    /// Number of entries in a repeating group
    NumInGroup,
    /// Percentage value
    Percentage,
    /// Price value
    Price,
    /// Price offset value
    PriceOffset,
    /// Quantity value
    Qty,
    /// Sequence number
    SeqNum,
    /// Character string
    String,
    /// Tag number reference
    TagNum,
    /// Time with timezone
    TzTimeOnly,
    /// Timestamp with timezone
    TzTimestamp,
    /// UTC date (YYYYMMDD)
    UtcDateOnly,
    /// UTC time (HH:MM[:SS[.sss]])
    UtcTimeOnly,
    /// UTC timestamp (YYYYMMDD-HH:MM:SS[.sss])
    UtcTimestamp,
    /// XML data
    XmlData,
    /// Custom or unrecognised type name, kept as written in the dictionary
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Amt => "AMT",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Char => "CHAR",
            FieldType::Country => "COUNTRY",
            FieldType::Currency => "CURRENCY",
            FieldType::Data => "DATA",
            FieldType::DayOfMonth => "DAYOFMONTH",
            FieldType::Exchange => "EXCHANGE",
            FieldType::Float => "FLOAT",
            FieldType::Int => "INT",
            FieldType::Language => "LANGUAGE",
            FieldType::Length => "LENGTH",
            FieldType::LocalMktDate => "LOCALMKTDATE",
            FieldType::MonthYear => "MONTHYEAR",
            FieldType::MultipleCharValue => "MULTIPLECHARVALUE",
            FieldType::MultipleStringValue => "MULTIPLESTRINGVALUE",
            FieldType::MultipleValueString => "MULTIPLEVALUESTRING",
            FieldType::NumInGroup => "NUMINGROUP",
            FieldType::Percentage => "PERCENTAGE",
            FieldType::Price => "PRICE",
            FieldType::PriceOffset => "PRICEOFFSET",
            FieldType::Qty => "QTY",
            FieldType::SeqNum => "SEQNUM",
            FieldType::String => "STRING",
            FieldType::TagNum => "TAGNUM",
            FieldType::TzTimeOnly => "TZTIMEONLY",
            FieldType::TzTimestamp => "TZTIMESTAMP",
            FieldType::UtcDateOnly => "UTCDATEONLY",
            FieldType::UtcTimeOnly => "UTCTIMEONLY",
            FieldType::UtcTimestamp => "UTCTIMESTAMP",
            FieldType::XmlData => "XMLDATA",
            FieldType::Other(name) => name,
        }
    }

    /// Returns true for kinds whose values are space-separated lists.
    pub fn is_multiple_value(&self) -> bool {
        matches!(
            self,
            FieldType::MultipleCharValue
                | FieldType::MultipleStringValue
                | FieldType::MultipleValueString
        )
    }
}

impl FieldType {
    /// Maps a dictionary type name onto a kind, case-insensitively.
    pub fn from_name(s: &str) -> FieldType {
        match s.to_ascii_uppercase().as_str() {
            "AMT" | "AMOUNT" => FieldType::Amt,
            "BOOLEAN" => FieldType::Boolean,
            "CHAR" => FieldType::Char,
            "COUNTRY" => FieldType::Country,
            "CURRENCY" => FieldType::Currency,
            "DATA" => FieldType::Data,
            "DAYOFMONTH" => FieldType::DayOfMonth,
            "EXCHANGE" => FieldType::Exchange,
            "FLOAT" => FieldType::Float,
            "INT" | "LONG" => FieldType::Int,
            "LANGUAGE" => FieldType::Language,
            "LENGTH" => FieldType::Length,
            "LOCALMKTDATE" => FieldType::LocalMktDate,
            "MONTHYEAR" => FieldType::MonthYear,
            "MULTIPLECHARVALUE" => FieldType::MultipleCharValue,
            "MULTIPLESTRINGVALUE" => FieldType::MultipleStringValue,
            "MULTIPLEVALUESTRING" => FieldType::MultipleValueString,
            "NUMINGROUP" => FieldType::NumInGroup,
            "PERCENTAGE" => FieldType::Percentage,
            "PRICE" => FieldType::Price,
            "PRICEOFFSET" => FieldType::PriceOffset,
            "QTY" | "QUANTITY" => FieldType::Qty,
            "SEQNUM" => FieldType::SeqNum,
            "STRING" => FieldType::String,
            "TAGNUM" => FieldType::TagNum,
            "TZTIMEONLY" => FieldType::TzTimeOnly,
            "TZTIMESTAMP" => FieldType::TzTimestamp,
            "UTCDATEONLY" | "UTCDATE" => FieldType::UtcDateOnly,
            "UTCTIMEONLY" => FieldType::UtcTimeOnly,
            "UTCTIMESTAMP" => FieldType::UtcTimestamp,
            "XMLDATA" => FieldType::XmlData,
            _ => FieldType::Other(s.to_owned()),
        }
    }
}

impl FromStr for FieldType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FieldType::from_name(s))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(FieldType::from_name(&s))
    }
}

/// A field definition from the `<fields>` section.
#[derive(Clone, Debug, Deserialize)]
pub struct Field {
    /// The tag number that identifies this field
    #[serde(rename = "@number")]
    pub number: u32,

    /// The human-readable name of this field
    #[serde(rename = "@name")]
    pub name: String,

    /// The type name as written in the dictionary, if declared
    #[serde(rename = "@type", default)]
    pub type_name: Option<String>,

    /// Enumerated values declared directly under `<field>`
    #[serde(rename = "value", default)]
    pub values: Vec<Value>,

    /// Enumerated values declared under a `<values>` wrapper element
    #[serde(rename = "values", default)]
    pub wrapped_values: Option<ValueList>,
}

impl Field {
    /// The kind behind the declared type name.
    pub fn data_type(&self) -> Option<FieldType> {
        self.type_name.as_deref().map(FieldType::from_name)
    }

    /// Returns every enumerated value of this field, direct children first,
    /// then wrapped ones. Duplicated codes are not removed here.
    pub fn all_values(&self) -> impl Iterator<Item = &Value> {
        self.values
            .iter()
            .chain(self.wrapped_values.iter().flat_map(|list| list.values.iter()))
    }
}

/// `<values>` wrapper used by some dictionary dialects.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ValueList {
    #[serde(rename = "value", default)]
    pub values: Vec<Value>,
}

/// An enumerated value for a field.
#[derive(Clone, Debug, Deserialize)]
pub struct Value {
    /// The actual value (as it appears on the wire)
    #[serde(rename = "@enum")]
    pub value_enum: String,

    /// Human-readable description of what this value means
    #[serde(rename = "@description", default)]
    pub description: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Message {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@msgtype")]
    pub msg_type: String,
    #[serde(rename = "@msgcat", default)]
    pub msg_cat: String,
    #[serde(rename = "$value", default)]
    pub members: Vec<Member>,
}

fn unwrap_messages<'de, D>(deserializer: D) -> Result<Vec<Message>, D::Error>
where
    D: Deserializer<'de>,
{
    /// Represents <messages>...</messages>
    #[derive(Deserialize)]
    struct List {
        #[serde(default)]
        message: Vec<Message>,
    }
    Ok(List::deserialize(deserializer)?.message)
}

fn unwrap_components<'de, D>(deserializer: D) -> Result<Vec<Component>, D::Error>
where
    D: Deserializer<'de>,
{
    /// Represents <components>...</components>
    #[derive(Deserialize)]
    struct List {
        #[serde(default)]
        component: Vec<Component>,
    }
    Ok(List::deserialize(deserializer)?.component)
}

fn unwrap_groups<'de, D>(deserializer: D) -> Result<Vec<Group>, D::Error>
where
    D: Deserializer<'de>,
{
    /// Represents <groups>...</groups>
    #[derive(Deserialize)]
    struct List {
        #[serde(default)]
        group: Vec<Group>,
    }
    Ok(List::deserialize(deserializer)?.group)
}

fn unwrap_fields<'de, D>(deserializer: D) -> Result<Vec<Field>, D::Error>
where
    D: Deserializer<'de>,
{
    /// Represents <fields>...</fields>
    #[derive(Deserialize)]
    struct List {
        #[serde(default)]
        field: Vec<Field>,
    }
    Ok(List::deserialize(deserializer)?.field)
}

/// Type of FIX protocol.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[serde(rename_all = "UPPERCASE")]
pub enum FixType {
    /// Application protocol (FIX 2.7 - FIX 5.0SP2)
    Fix,

    /// Session transport protocol (FIXT 1.1)
    Fixt,
}

impl fmt::Display for FixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixType::Fix => f.write_str("FIX"),
            FixType::Fixt => f.write_str("FIXT"),
        }
    }
}

/// The parsed `<fix>` document, shared input of both dictionary views.
#[derive(Clone, Debug, Deserialize)]
pub struct RawDictionary {
    #[serde(rename = "@type", default)]
    pub fix_type: Option<FixType>,
    #[serde(rename = "@major", default)]
    pub major: String,
    #[serde(rename = "@minor", default)]
    pub minor: String,
    #[serde(rename = "@servicepack", default)]
    pub servicepack: Option<String>,
    #[serde(default)]
    pub header: Envelope,
    #[serde(default)]
    pub trailer: Envelope,
    #[serde(default, deserialize_with = "unwrap_messages")]
    pub messages: Vec<Message>,
    #[serde(default, deserialize_with = "unwrap_components")]
    pub components: Vec<Component>,
    #[serde(default, deserialize_with = "unwrap_groups")]
    pub groups: Vec<Group>,
    #[serde(default, deserialize_with = "unwrap_fields")]
    pub fields: Vec<Field>,
}

impl RawDictionary {
    /// Parses dictionary XML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::XmlParse`] when the document is not well formed or
    /// does not have the dictionary shape.
    pub fn parse(xml: &str) -> Result<RawDictionary, Error> {
        Ok(from_str(xml)?)
    }

    /// Reads and parses a dictionary file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<RawDictionary, Error> {
        let xml = fs::read_to_string(path)?;
        RawDictionary::parse(&xml)
    }
}

impl FromStr for RawDictionary {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RawDictionary::parse(s)
    }
}
