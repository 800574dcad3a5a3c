//! Text rendering of a [`SchemaTree`]: tag, message and component listings,
//! message structures and dictionary summaries.

use std::io::{self, Write};

use fixdecoder_dictionary::{
    ComponentNode, EnumValue, FieldNode, FieldSpec, GroupNode, MSG_TYPE_TAG, Members, MessageNode,
    SchemaTree, supported_versions,
};

/// Spaces added per nesting level.
const INDENT: usize = 4;

/// Indent of a top-level message structure.
pub const MESSAGE_INDENT: usize = 4;

fn required_marker(required: bool) -> &'static str {
    if required { " - (Y)" } else { "" }
}

fn field_line(field: &FieldSpec) -> String {
    format!("{:<4}: {} ({})", field.number, field.name, field.type_name())
}

/// Writes `items` top to bottom, then left to right, in as many equal-width
/// columns as fit in `width`.
pub fn write_columns<W: Write>(
    out: &mut W,
    items: &[String],
    indent: usize,
    width: usize,
) -> io::Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    let cell = items.iter().map(String::len).max().unwrap_or(0) + 2;
    let usable = match width.saturating_sub(indent) {
        0 => width,
        usable => usable,
    };
    let cols = (usable / cell).max(1);
    let rows = items.len().div_ceil(cols);

    for row in 0..rows {
        write!(out, "{:indent$}", "")?;
        for col in 0..cols {
            if let Some(item) = items.get(col * rows + row) {
                write!(out, "{item:<cell$}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub struct SchemaPrinter<'a> {
    schema: &'a SchemaTree,
    verbose: bool,
    column: bool,
    width: usize,
}

impl<'a> SchemaPrinter<'a> {
    pub fn new(schema: &'a SchemaTree, verbose: bool, column: bool, width: usize) -> Self {
        SchemaPrinter {
            schema,
            verbose,
            column,
            width,
        }
    }

    pub fn list_tags<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let lines: Vec<String> = self.schema.fields().map(field_line).collect();
        if self.column {
            return write_columns(out, &lines, 0, self.width);
        }
        for line in lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    /// Details of one tag, given as typed on the command line.
    pub fn tag<W: Write>(&self, out: &mut W, tag: &str) -> io::Result<()> {
        let Ok(number) = tag.parse::<u32>() else {
            return writeln!(out, "Invalid tag: {tag}");
        };
        let Some(field) = self.schema.field_by_tag(number) else {
            return writeln!(out, "Tag not found: {number}");
        };

        writeln!(out, "{}", field_line(field))?;
        if self.verbose {
            self.enums(out, &field.values, 4)?;
        }
        Ok(())
    }

    /// Lists messages ordered by MsgType.
    pub fn list_messages<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.column {
            let mut lines: Vec<String> = self
                .schema
                .messages()
                .map(|m| format!("{:>2}: {} ({})", m.msg_type, m.name, m.msg_cat))
                .collect();
            lines.sort();
            return write_columns(out, &lines, 0, self.width);
        }

        let mut messages: Vec<&MessageNode> = self.schema.messages().collect();
        messages.sort_by(|a, b| a.msg_type.cmp(&b.msg_type));
        for m in messages {
            writeln!(out, "{:<4}: {} ({})", m.msg_type, m.name, m.msg_cat)?;
        }
        Ok(())
    }

    /// Structure of a message looked up by name or MsgType.
    pub fn message<W: Write>(
        &self,
        out: &mut W,
        name: &str,
        include_header: bool,
        include_trailer: bool,
    ) -> io::Result<()> {
        let found = self
            .schema
            .message(name)
            .or_else(|| self.schema.message_by_type(name));
        match found {
            Some(message) => self.message_structure(
                out,
                message,
                include_header,
                include_trailer,
                MESSAGE_INDENT,
            ),
            None => writeln!(out, "Message not found: {name}"),
        }
    }

    pub fn message_structure<W: Write>(
        &self,
        out: &mut W,
        message: &MessageNode,
        include_header: bool,
        include_trailer: bool,
        indent: usize,
    ) -> io::Result<()> {
        let msg_type = Some(message.msg_type.as_str());

        writeln!(out, "Message: {} ({})", message.name, message.msg_type)?;
        if include_header {
            self.component_node(out, self.schema.header(), msg_type, indent)?;
        }
        self.members(out, message, msg_type, indent)?;
        if include_trailer {
            self.component_node(out, self.schema.trailer(), msg_type, indent)?;
        }
        Ok(())
    }

    /// Component names in alphabetical order.
    pub fn list_components<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let names: Vec<String> = self
            .schema
            .components()
            .map(|component| component.name.clone())
            .collect();
        if self.column {
            return write_columns(out, &names, 0, self.width);
        }
        for name in names {
            writeln!(out, "{name}")?;
        }
        Ok(())
    }

    pub fn component<W: Write>(&self, out: &mut W, name: &str) -> io::Result<()> {
        match self.schema.component(name) {
            Some(component) => self.component_node(out, component, None, 0),
            None => writeln!(out, "Component not found: {name}"),
        }
    }

    /// One line overview of the dictionary.
    pub fn summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "Fields: {}   Components: {}   Messages: {}   Version: {}  Service Pack: {}",
            self.schema.field_count(),
            self.schema.component_count(),
            self.schema.message_count(),
            self.schema.version(),
            self.schema.service_pack(),
        )
    }

    pub fn info<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Available FIX Dictionaries: {}", supported_versions())?;
        writeln!(out, "Current Schema:")?;
        writeln!(out, "  FIX Version:  {}", self.schema.version())?;
        writeln!(out, "  Service Pack: {}", self.schema.service_pack())?;
        writeln!(out, "  Messages:     {}", self.schema.message_count())?;
        writeln!(out, "  Components:   {}", self.schema.component_count())?;
        writeln!(out, "  Fields:       {}", self.schema.field_count())
    }

    /// Fields first, then components, then groups, each in declaration order.
    fn members<W: Write>(
        &self,
        out: &mut W,
        node: &impl Members,
        msg_type: Option<&str>,
        indent: usize,
    ) -> io::Result<()> {
        for field in node.fields() {
            self.field_node(out, field, msg_type, indent)?;
        }
        for component in node.components() {
            self.component_node(out, component, msg_type, indent)?;
        }
        for group in node.groups() {
            self.group_node(out, group, msg_type, indent)?;
        }
        Ok(())
    }

    fn component_node<W: Write>(
        &self,
        out: &mut W,
        component: &ComponentNode,
        msg_type: Option<&str>,
        indent: usize,
    ) -> io::Result<()> {
        writeln!(out, "{:indent$}Component: {}", "", component.name)?;
        self.members(out, component, msg_type, indent + INDENT)
    }

    fn group_node<W: Write>(
        &self,
        out: &mut W,
        group: &GroupNode,
        msg_type: Option<&str>,
        indent: usize,
    ) -> io::Result<()> {
        writeln!(
            out,
            "{:indent$}Group: {}{}",
            "",
            group.name,
            required_marker(group.required)
        )?;
        self.members(out, group, msg_type, indent + INDENT)
    }

    fn field_node<W: Write>(
        &self,
        out: &mut W,
        node: &FieldNode,
        msg_type: Option<&str>,
        indent: usize,
    ) -> io::Result<()> {
        writeln!(
            out,
            "{:indent$}{}{}",
            "",
            field_line(&node.field),
            required_marker(node.required)
        )?;
        if !self.verbose {
            return Ok(());
        }

        // the MsgType of a message structure only lists that message
        if let (MSG_TYPE_TAG, Some(msg_type)) = (node.field.number, msg_type) {
            for value in node.field.values.iter().filter(|v| v.value == msg_type) {
                Self::enum_line(out, value, indent + 2)?;
            }
            return Ok(());
        }
        self.enums(out, &node.field.values, indent + 2)
    }

    fn enums<W: Write>(&self, out: &mut W, values: &[EnumValue], indent: usize) -> io::Result<()> {
        if self.column {
            let mut sorted: Vec<&EnumValue> = values.iter().collect();
            sorted.sort_by(|a, b| a.value.cmp(&b.value));
            let cells: Vec<String> = sorted
                .iter()
                .map(|v| format!("{}: {}", v.value, v.description))
                .collect();
            return write_columns(out, &cells, indent, self.width);
        }
        for value in values {
            Self::enum_line(out, value, indent)?;
        }
        Ok(())
    }

    fn enum_line<W: Write>(out: &mut W, value: &EnumValue, indent: usize) -> io::Result<()> {
        let indent = indent + INDENT;
        writeln!(out, "{:indent$}{} : {}", "", value.value, value.description)
    }
}
