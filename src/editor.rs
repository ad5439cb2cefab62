use crate::composer::{release_subtree, JsonValue, ObjectMember, MEMBER_SLOT, VALUE_SLOT};
use crate::config::Config;
use crate::error::{invalid_arguments, not_found, JsonError, JsonResult};

/// A structural edit that refused its input.
///
/// Operations that take ownership of an item hand it back here when they
/// reject it (wrong target type, refused allocation), so the caller keeps
/// both the item and its accounting.
#[derive(Debug)]
pub struct EditRejected {
    pub error: JsonError,
    pub item: JsonValue,
}

impl EditRejected {
    pub fn into_parts(self) -> (JsonError, JsonValue) {
        (self.error, self.item)
    }
}

impl std::fmt::Display for EditRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "edit rejected: {}", self.error)
    }
}

// === VALUE FACTORIES ===
//
// Node records are plain Rust values, so only operations that create owned
// byte buffers go through the configuration.

/// Null value (the Undefined variant is its document face)
pub fn create_null_value() -> JsonValue {
    JsonValue::Undefined
}

pub fn create_boolean_value(value: bool) -> JsonValue {
    JsonValue::Boolean(value)
}

pub fn create_integer_value(value: i64) -> JsonValue {
    JsonValue::Integer(value)
}

pub fn create_double_value(value: f64) -> JsonValue {
    JsonValue::Double(value)
}

/// Empty array container
pub fn create_array_value() -> JsonValue {
    JsonValue::Array(Vec::new())
}

/// Empty object container
pub fn create_object_value() -> JsonValue {
    JsonValue::Object(Vec::new())
}

/// Owned string value; charges the byte buffer to the configuration
pub fn create_string_value(config: &Config, value: &str) -> JsonResult<JsonValue> {
    config.allocate(value.len())?;
    Ok(JsonValue::String(value.to_owned()))
}

// === STRUCTURAL EDITS ===

/// Append `item` to an array value, transferring ownership
pub fn add_to_array(
    config: &Config,
    array: &mut JsonValue,
    item: JsonValue,
) -> Result<(), EditRejected> {
    add_to_array_at(config, array, item, usize::MAX)
}

/// Insert `item` at `index`, clamped to the length; later items shift right
pub fn add_to_array_at(
    config: &Config,
    array: &mut JsonValue,
    item: JsonValue,
    index: usize,
) -> Result<(), EditRejected> {
    let items = match array {
        JsonValue::Array(items) => items,
        _ => {
            return Err(EditRejected {
                error: invalid_arguments("target is not an array"),
                item,
            })
        }
    };

    if let Err(error) = config.allocate(VALUE_SLOT) {
        return Err(EditRejected { error, item });
    }

    let index = index.min(items.len());
    items.insert(index, item);
    Ok(())
}

/// Free the element at `index` and shift the tail leftward
pub fn remove_from_array(config: &Config, array: &mut JsonValue, index: usize) -> JsonResult<()> {
    let items = match array {
        JsonValue::Array(items) => items,
        _ => return Err(invalid_arguments("target is not an array")),
    };

    if index >= items.len() {
        return Err(not_found("array index out of range"));
    }

    let item = items.remove(index);
    config.release(VALUE_SLOT);
    release_subtree(config, &item);
    Ok(())
}

/// Set an object property, transferring ownership of `item`.
///
/// A pre-existing key is replaced in place: the old value is freed, the key
/// keeps its position in the member sequence. Otherwise a new member is
/// appended.
pub fn set_object_property(
    config: &Config,
    object: &mut JsonValue,
    item: JsonValue,
    key: &str,
) -> Result<(), EditRejected> {
    let members = match object {
        JsonValue::Object(members) => members,
        _ => {
            return Err(EditRejected {
                error: invalid_arguments("target is not an object"),
                item,
            })
        }
    };

    if let Some(member) = members.iter_mut().find(|member| member.key == key) {
        release_subtree(config, &member.value);
        member.value = item;
        return Ok(());
    }

    if let Err(error) = config.allocate(MEMBER_SLOT) {
        return Err(EditRejected { error, item });
    }
    if let Err(error) = config.allocate(key.len()) {
        config.release(MEMBER_SLOT);
        return Err(EditRejected { error, item });
    }

    members.push(ObjectMember {
        key: key.to_owned(),
        value: item,
    });
    Ok(())
}

/// Remove an object property, freeing its key and value
pub fn remove_object_property(config: &Config, object: &mut JsonValue, key: &str) -> JsonResult<()> {
    let members = match object {
        JsonValue::Object(members) => members,
        _ => return Err(invalid_arguments("target is not an object")),
    };

    let index = members
        .iter()
        .position(|member| member.key == key)
        .ok_or_else(|| not_found("object key not present"))?;

    let member = members.remove(index);
    config.release(MEMBER_SLOT);
    config.release(member.key.len());
    release_subtree(config, &member.value);
    Ok(())
}
