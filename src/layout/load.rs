use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use serde_json::{Map, Value};

use crate::foundation::error::{LayerforgeError, LayerforgeResult};
use crate::layout::model::Element;

/// A layout document: the element list plus whatever wrapper it came in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    /// Elements in file order.
    pub elements: Vec<Element>,
    /// Other top-level keys when the file root is an object; `None` for a bare array.
    wrapper: Option<Map<String, Value>>,
}

impl Layout {
    /// Wrap an element list as a bare-array layout.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self {
            elements,
            wrapper: None,
        }
    }

    /// Same wrapper, different elements. Used to write resolved layouts back out.
    pub fn with_elements(&self, elements: Vec<Element>) -> Self {
        Self {
            elements,
            wrapper: self.wrapper.clone(),
        }
    }

    /// Interpret an already-parsed JSON value.
    ///
    /// The root must be an array of elements or an object with an `elements` array. Entries that
    /// are not JSON objects are skipped.
    pub fn from_value(value: Value) -> LayerforgeResult<Self> {
        let (items, wrapper) = match value {
            Value::Array(items) => (items, None),
            Value::Object(mut map) => match map.remove("elements") {
                Some(Value::Array(items)) => (items, Some(map)),
                _ => {
                    return Err(LayerforgeError::validation(
                        "layout object must contain an \"elements\" array",
                    ));
                }
            },
            other => {
                return Err(LayerforgeError::validation(format!(
                    "layout root must be an array of elements, found {}",
                    json_kind(&other)
                )));
            }
        };

        let mut elements = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => elements.push(Element::from_map(map)),
                other => {
                    tracing::warn!(index = i, kind = json_kind(&other), "skipping non-object layout entry");
                }
            }
        }
        Ok(Self { elements, wrapper })
    }

    /// Parse a layout from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LayerforgeResult<Self> {
        let value: Value = serde_json::from_reader(r)
            .map_err(|e| LayerforgeError::serde(format!("parse layout JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Parse a layout from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LayerforgeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open layout JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize back into the same root shape the layout was read from.
    pub fn to_value(&self) -> LayerforgeResult<Value> {
        let elements = serde_json::to_value(&self.elements)
            .map_err(|e| LayerforgeError::serde(format!("serialize layout elements: {e}")))?;
        Ok(match &self.wrapper {
            None => elements,
            Some(map) => {
                let mut map = map.clone();
                map.insert("elements".to_owned(), elements);
                Value::Object(map)
            }
        })
    }

    /// Write pretty-printed JSON to `w`.
    pub fn to_writer<W: Write>(&self, w: W) -> LayerforgeResult<()> {
        serde_json::to_writer_pretty(w, &self.to_value()?)
            .map_err(|e| LayerforgeError::serde(format!("write layout JSON: {e}")))
    }

    /// Write pretty-printed JSON to `path`, creating parent directories.
    pub fn write_path(&self, path: impl AsRef<Path>) -> LayerforgeResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create layout dir '{}'", parent.display()))?;
        }
        let f = File::create(path)
            .with_context(|| format!("create layout JSON '{}'", path.display()))?;
        let mut w = BufWriter::new(f);
        self.to_writer(&mut w)?;
        w.flush()
            .with_context(|| format!("flush layout JSON '{}'", path.display()))?;
        Ok(())
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/load.rs"]
mod tests;
