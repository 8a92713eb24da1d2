//! JSON value tree.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::rc::Rc;

use core_types::{number_to_string, Float64, Int64, Position};

use crate::JsonError;

/// Type of a [`JsonValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    /// `null`
    Null,
    /// `true`
    True,
    /// `false`
    False,
    /// Integer number
    Int64,
    /// Floating point number
    Float64,
    /// String
    String,
    /// Array of values
    Array,
    /// Object with members sorted by name
    Object,
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JsonType::Null => "NULL",
            JsonType::True => "TRUE",
            JsonType::False => "FALSE",
            JsonType::Int64 => "INT64",
            JsonType::Float64 => "FLOAT64",
            JsonType::String => "STRING",
            JsonType::Array => "ARRAY",
            JsonType::Object => "OBJECT",
        })
    }
}

/// Members of a JSON object.
pub type JsonObject = BTreeMap<String, JsonValue>;

enum Data {
    Null,
    Boolean(bool),
    Int64(Int64),
    Float64(Float64),
    String(String),
    Array(Vec<JsonValue>),
    Object(JsonObject),
}

struct Inner {
    position: Position,
    data: RefCell<Data>,
    /// Set while the value is being converted, to detect cycles
    visiting: Cell<bool>,
}

/// Shared handle to a JSON value.
///
/// Cloning the handle does not copy the value: arrays and objects can be
/// modified through any of their handles, which also makes it possible to
/// build a structure including itself. Such structures are rejected by
/// [`JsonValue::to_string`] and [`JsonValue::to_serde`].
///
/// # Examples
///
/// ```
/// use core_types::Position;
/// use json::JsonValue;
///
/// let pos = Position::default();
/// let list = JsonValue::array(pos.clone(), Vec::new());
/// list.set_item(0, JsonValue::string(pos.clone(), "a")).unwrap();
/// list.set_item(1, JsonValue::boolean(pos, true)).unwrap();
/// assert_eq!(list.to_string().unwrap(), r#"["a",true]"#);
/// ```
#[derive(Clone)]
pub struct JsonValue(Rc<Inner>);

impl JsonValue {
    fn new(position: Position, data: Data) -> Self {
        JsonValue(Rc::new(Inner {
            position,
            data: RefCell::new(data),
            visiting: Cell::new(false),
        }))
    }

    /// A `null` value.
    pub fn null(position: Position) -> Self {
        Self::new(position, Data::Null)
    }

    /// A `true` or `false` value.
    pub fn boolean(position: Position, value: bool) -> Self {
        Self::new(position, Data::Boolean(value))
    }

    /// An integer.
    pub fn int64(position: Position, value: Int64) -> Self {
        Self::new(position, Data::Int64(value))
    }

    /// A floating point number.
    pub fn float64(position: Position, value: Float64) -> Self {
        Self::new(position, Data::Float64(value))
    }

    /// A string.
    pub fn string(position: Position, value: impl Into<String>) -> Self {
        Self::new(position, Data::String(value.into()))
    }

    /// An array.
    pub fn array(position: Position, items: Vec<JsonValue>) -> Self {
        Self::new(position, Data::Array(items))
    }

    /// An object.
    pub fn object(position: Position, members: JsonObject) -> Self {
        Self::new(position, Data::Object(members))
    }

    /// Type of this value.
    pub fn get_type(&self) -> JsonType {
        match &*self.0.data.borrow() {
            Data::Null => JsonType::Null,
            Data::Boolean(true) => JsonType::True,
            Data::Boolean(false) => JsonType::False,
            Data::Int64(_) => JsonType::Int64,
            Data::Float64(_) => JsonType::Float64,
            Data::String(_) => JsonType::String,
            Data::Array(_) => JsonType::Array,
            Data::Object(_) => JsonType::Object,
        }
    }

    /// Where the value was read.
    pub fn get_position(&self) -> Position {
        self.0.position.clone()
    }

    /// Whether both handles refer to the same value.
    pub fn ptr_eq(&self, other: &JsonValue) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn mismatch(&self, expected: JsonType) -> JsonError {
        JsonError::TypeMismatch {
            expected,
            found: self.get_type(),
        }
    }

    /// The integer of an INT64 value.
    pub fn get_int64(&self) -> Result<Int64, JsonError> {
        match &*self.0.data.borrow() {
            Data::Int64(value) => Ok(*value),
            _ => Err(self.mismatch(JsonType::Int64)),
        }
    }

    /// The number of a FLOAT64 value.
    pub fn get_float64(&self) -> Result<Float64, JsonError> {
        match &*self.0.data.borrow() {
            Data::Float64(value) => Ok(*value),
            _ => Err(self.mismatch(JsonType::Float64)),
        }
    }

    /// The text of a STRING value.
    pub fn get_string(&self) -> Result<String, JsonError> {
        match &*self.0.data.borrow() {
            Data::String(value) => Ok(value.clone()),
            _ => Err(self.mismatch(JsonType::String)),
        }
    }

    /// Handles to the items of an ARRAY value.
    pub fn get_array(&self) -> Result<Vec<JsonValue>, JsonError> {
        match &*self.0.data.borrow() {
            Data::Array(items) => Ok(items.clone()),
            _ => Err(self.mismatch(JsonType::Array)),
        }
    }

    /// Handles to the members of an OBJECT value.
    pub fn get_object(&self) -> Result<JsonObject, JsonError> {
        match &*self.0.data.borrow() {
            Data::Object(members) => Ok(members.clone()),
            _ => Err(self.mismatch(JsonType::Object)),
        }
    }

    /// Replace the item at `index`, or append it when `index` is the
    /// number of items.
    pub fn set_item(&self, index: usize, value: JsonValue) -> Result<(), JsonError> {
        let mut data = self.0.data.borrow_mut();
        let Data::Array(items) = &mut *data else {
            drop(data);
            return Err(self.mismatch(JsonType::Array));
        };
        match index.cmp(&items.len()) {
            std::cmp::Ordering::Less => items[index] = value,
            std::cmp::Ordering::Equal => items.push(value),
            std::cmp::Ordering::Greater => {
                return Err(JsonError::IndexOutOfRange {
                    index,
                    len: items.len(),
                })
            }
        }
        Ok(())
    }

    /// Add or replace the member `name`; the empty name is valid.
    pub fn set_member(&self, name: impl Into<String>, value: JsonValue) -> Result<(), JsonError> {
        let mut data = self.0.data.borrow_mut();
        let Data::Object(members) = &mut *data else {
            drop(data);
            return Err(self.mismatch(JsonType::Object));
        };
        members.insert(name.into(), value);
        Ok(())
    }

    /// Compact JSON text of this value.
    ///
    /// Floating point numbers are written the way JavaScript prints them,
    /// so `NaN` and `Infinity` come out as is.
    pub fn to_string(&self) -> Result<String, JsonError> {
        let mut out = String::new();
        self.write(&mut out)?;
        Ok(out)
    }

    fn write(&self, out: &mut String) -> Result<(), JsonError> {
        let data = self.0.data.borrow();
        match &*data {
            Data::Null => out.push_str("null"),
            Data::Boolean(true) => out.push_str("true"),
            Data::Boolean(false) => out.push_str("false"),
            Data::Int64(value) => out.push_str(&value.get().to_string()),
            Data::Float64(value) => out.push_str(&number_to_string(value.get())),
            Data::String(value) => write_string(out, value),
            Data::Array(items) => {
                let _visit = Visit::enter(self)?;
                out.push('[');
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    item.write(out)?;
                }
                out.push(']');
            }
            Data::Object(members) => {
                let _visit = Visit::enter(self)?;
                out.push('{');
                for (index, (name, member)) in members.iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    write_string(out, name);
                    out.push(':');
                    member.write(out)?;
                }
                out.push('}');
            }
        }
        Ok(())
    }

    /// Convert to a [`serde_json::Value`].
    ///
    /// Numbers serde cannot represent (NaN and the infinities) become `null`.
    pub fn to_serde(&self) -> Result<serde_json::Value, JsonError> {
        use serde_json::Value;

        let data = self.0.data.borrow();
        Ok(match &*data {
            Data::Null => Value::Null,
            Data::Boolean(value) => Value::Bool(*value),
            Data::Int64(value) => Value::from(value.get()),
            Data::Float64(value) => serde_json::Number::from_f64(value.get())
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Data::String(value) => Value::String(value.clone()),
            Data::Array(items) => {
                let _visit = Visit::enter(self)?;
                Value::Array(
                    items
                        .iter()
                        .map(JsonValue::to_serde)
                        .collect::<Result<_, _>>()?,
                )
            }
            Data::Object(members) => {
                let _visit = Visit::enter(self)?;
                let mut map = serde_json::Map::new();
                for (name, member) in members {
                    map.insert(name.clone(), member.to_serde()?);
                }
                Value::Object(map)
            }
        })
    }

    /// Build a value tree from a [`serde_json::Value`]; all the values get
    /// the default position.
    pub fn from_serde(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        let position = Position::default();
        match value {
            Value::Null => Self::null(position),
            Value::Bool(b) => Self::boolean(position, *b),
            Value::Number(number) => match number.as_i64() {
                Some(i) => Self::int64(position, Int64::new(i)),
                None => Self::float64(position, Float64::new(number.as_f64().unwrap_or(f64::NAN))),
            },
            Value::String(s) => Self::string(position, s.as_str()),
            Value::Array(items) => {
                Self::array(position, items.iter().map(Self::from_serde).collect())
            }
            Value::Object(map) => Self::object(
                position,
                map.iter()
                    .map(|(name, member)| (name.clone(), Self::from_serde(member)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Debug for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonValue")
            .field("type", &self.get_type())
            .field("position", &self.0.position)
            .finish()
    }
}

/// Marks a container as being visited until dropped.
struct Visit<'a> {
    value: &'a JsonValue,
}

impl<'a> Visit<'a> {
    fn enter(value: &'a JsonValue) -> Result<Self, JsonError> {
        if value.0.visiting.replace(true) {
            return Err(JsonError::CyclicalStructure);
        }
        Ok(Visit { value })
    }
}

impl Drop for Visit<'_> {
    fn drop(&mut self) {
        self.value.0.visiting.set(false);
    }
}

fn write_string(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                // writing to a String cannot fail
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
