//! Minimal HCL writer
//!
//! Produces the subset of Terraform's native syntax the renderers need:
//!
//! ```text
//! resource "inwx_domain" "example_com" {
//!     name = "example.com"
//!     contacts {
//!         admin = inwx_domain_contact.jane_doe.id
//!     }
//! }
//! ```
//!
//! Output is consumed by `terraform` without further editing, so the layout
//! (four-space indent, ` = ` assignments) is part of the contract.
//! Attributes keep the order they were pushed in.

use std::fmt::{self, Write};

const INDENT: &str = "    ";

/// An attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Quoted string
    Str(String),
    /// Bare integer
    Int(i64),
    /// Bare `true` / `false`
    Bool(bool),
    /// Bare traversal such as `inwx_domain_contact.c1.id`
    Ref(String),
    /// List of quoted strings, rendered on one line
    StrList(Vec<String>),
    /// Object of string values, one entry per line
    StrMap(Vec<(String, String)>),
}

impl Value {
    pub fn reference(value: impl Into<String>) -> Self {
        Value::Ref(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Attribute(String, Value),
    Block(String, Body),
}

/// Ordered block contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    entries: Vec<Entry>,
}

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push(Entry::Attribute(key.into(), value.into()));
        self
    }

    /// Append an attribute only when `value` is present
    pub fn opt_attr<V: Into<Value>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.attr(key, value),
            None => self,
        }
    }

    /// Append a nested block (`key { ... }`)
    pub fn block(mut self, key: impl Into<String>, body: Body) -> Self {
        self.entries.push(Entry::Block(key.into(), body));
        self
    }

    /// Attribute keys in order, for assertions
    pub fn keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Attribute(key, _) | Entry::Block(key, _) => key.as_str(),
            })
            .collect()
    }

    fn write_to(&self, out: &mut String, depth: usize) -> fmt::Result {
        let indent = INDENT.repeat(depth);
        for entry in &self.entries {
            match entry {
                Entry::Attribute(key, value) => {
                    write!(out, "{indent}{} = ", format_key(key))?;
                    write_value(out, value, depth)?;
                    out.push('\n');
                }
                Entry::Block(key, body) => {
                    writeln!(out, "{indent}{} {{", format_key(key))?;
                    body.write_to(out, depth + 1)?;
                    writeln!(out, "{indent}}}")?;
                }
            }
        }
        Ok(())
    }
}

/// A top-level block: `kind "label" ... { body }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    kind: String,
    labels: Vec<String>,
    body: Body,
}

impl Block {
    pub fn new(kind: impl Into<String>, body: Body) -> Self {
        Self {
            kind: kind.into(),
            labels: Vec::new(),
            body,
        }
    }

    /// `resource "<resource_type>" "<name>" { ... }`
    pub fn resource(resource_type: &str, name: &str, body: Body) -> Self {
        Self {
            kind: "resource".to_string(),
            labels: vec![resource_type.to_string(), name.to_string()],
            body,
        }
    }

    /// `import { id = "<id>" to = <address> }`
    pub fn import(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self::new(
            "import",
            Body::new()
                .attr("id", Value::Str(id.into()))
                .attr("to", Value::Ref(address.into())),
        )
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        out.push_str(&self.kind);
        for label in &self.labels {
            write!(out, " \"{}\"", escape(label))?;
        }
        out.push_str(" {\n");
        self.body.write_to(&mut out, 1)?;
        out.push('}');
        f.write_str(&out)
    }
}

fn write_value(out: &mut String, value: &Value, depth: usize) -> fmt::Result {
    match value {
        Value::Str(s) => write!(out, "\"{}\"", escape(s)),
        Value::Int(i) => write!(out, "{i}"),
        Value::Bool(b) => write!(out, "{b}"),
        Value::Ref(r) => out.write_str(r),
        Value::StrList(items) => {
            let quoted: Vec<String> = items.iter().map(|s| format!("\"{}\"", escape(s))).collect();
            write!(out, "[{}]", quoted.join(","))
        }
        Value::StrMap(entries) => {
            out.push_str("{\n");
            let inner = INDENT.repeat(depth + 1);
            for (key, value) in entries {
                writeln!(out, "{inner}{} = \"{}\"", format_key(key), escape(value))?;
            }
            write!(out, "{}}}", INDENT.repeat(depth))
        }
    }
}

/// Keys with a hyphen or space must be quoted
fn format_key(key: &str) -> String {
    if key.contains('-') || key.contains(' ') {
        format!("\"{}\"", escape(key))
    } else {
        key.to_string()
    }
}

/// Escape a string literal, including template sequences
///
/// Record contents such as SPF macros (`%{i}`) would otherwise be parsed
/// as template directives.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
