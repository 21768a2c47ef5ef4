use indexmap::IndexMap;
use serde_yaml_ng::Value;
use thiserror::Error;

use crate::config::EditorEntry;

/// Where to look for an editor, as written in the config file.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSpec {
    /// No `path`: search the executable search path for the name.
    Absent,
    Single(String),
    List(Vec<String>),
}

/// One configured editor. Position in the config list is its priority.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSpec {
    pub name: String,
    pub path: PathSpec,
    pub env: IndexMap<String, String>,
}

#[derive(Debug, Error)]
#[error(
    "malformed path field for editor `{name}` (entry #{index}): expected a string or a list of strings, found {found}"
)]
pub struct ConfigShapeError {
    pub index: usize,
    pub name: String,
    pub found: &'static str,
}

impl EditorSpec {
    /// Checks the shape of every entry. Any malformed entry fails the whole list.
    pub fn from_entries(entries: &[EditorEntry]) -> Result<Vec<Self>, ConfigShapeError> {
        entries.iter().enumerate().map(|(index, entry)| Self::from_entry(index, entry)).collect()
    }

    pub fn from_entry(index: usize, entry: &EditorEntry) -> Result<Self, ConfigShapeError> {
        let shape_error =
            |found| ConfigShapeError { index, name: entry.name.clone(), found };

        let path = match &entry.path {
            None | Some(Value::Null) => PathSpec::Absent,
            Some(Value::String(path)) => PathSpec::Single(path.clone()),
            Some(Value::Sequence(items)) => {
                let paths = items
                    .iter()
                    .map(|item| match item {
                        Value::String(path) => Ok(path.clone()),
                        other => Err(shape_error(describe_item(other))),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                PathSpec::List(paths)
            }
            Some(other) => return Err(shape_error(describe(other))),
        };

        Ok(Self { name: entry.name.clone(), path, env: entry.env.clone().unwrap_or_default() })
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn describe_item(value: &Value) -> &'static str {
    match value {
        Value::Null => "a list containing null",
        Value::Bool(_) => "a list containing a boolean",
        Value::Number(_) => "a list containing a number",
        Value::Sequence(_) => "a nested list",
        Value::Mapping(_) => "a list containing a mapping",
        _ => "a list containing a tagged value",
    }
}
