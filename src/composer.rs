/*!
 * ===============================================================================
 * EJSON-Rust: Document Composer
 * ===============================================================================
 *
 * This file implements the DOCUMENT MODEL and its builder:
 *
 * 1. 🏗️  COMPOSITION: Flat token array → Typed value tree
 * 2. 🌳  OWNERSHIP: Strict arborescence; every node owns its children
 * 3. 📊  ACCOUNTING: Every owned byte is charged to the configuration
 * 4. 🔄  UNWINDING: Child failures release the built prefix before bubbling
 *
 * COMPOSER ARCHITECTURE:
 * ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
 * │   Tokens    │ -> │  Composer   │ -> │ JsonValue   │ -> │   Editor /  │
 * │ (Scanner)   │    │ (Cursor)    │    │ (Tree)      │    │   Emitter   │
 * └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
 *
 * VALUE VARIANTS:
 * - 🔘 Undefined: null and anything the classifier could not place
 * - 🔤 Scalars: Boolean, Integer (i64), Double (f64), String (owned)
 * - 📋 Array: ordered children
 * - 🗂️ Object: ordered (key, value) members, insertion order preserved
 */

use crate::config::Config;
use crate::error::{invalid_arguments, invalid_input, JsonResult};
use crate::scanner::{to_boolean, to_double, to_integer, Token, TokenType};

// ===============================================================================
// 🌳 VALUE TREE: Typed document nodes
// ===============================================================================

/**
 * 🌳 VALUE ENUM: JsonValue
 *
 * PURPOSE:
 * - Discriminated node whose variants mirror the token types
 * - Containers own their children; no back references exist
 *
 * DESIGN:
 * - Objects use a Vec of members instead of a map to keep insertion order
 *   and tolerate duplicate keys on input
 */
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonValue {
    #[default]
    Undefined,                          // null / unclassified
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Array(Vec<JsonValue>),              // Ordered children
    Object(Vec<ObjectMember>),          // Ordered key/value members
}

/// One object property: owned key plus owned child value
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMember {
    pub key: String,
    pub value: JsonValue,
}

// Accounting units for container interiors. Strings charge their byte
// length; array and object sequences charge one slot per element.
pub(crate) const VALUE_SLOT: usize = std::mem::size_of::<JsonValue>();
pub(crate) const MEMBER_SLOT: usize = std::mem::size_of::<ObjectMember>();

impl JsonValue {
    /// Type tag shared with the scanner's token classification
    pub fn value_type(&self) -> TokenType {
        match self {
            JsonValue::Undefined => TokenType::Undefined,
            JsonValue::Boolean(_) => TokenType::Boolean,
            JsonValue::Integer(_) => TokenType::Integer,
            JsonValue::Double(_) => TokenType::Double,
            JsonValue::String(_) => TokenType::String,
            JsonValue::Array(_) => TokenType::Array,
            JsonValue::Object(_) => TokenType::Object,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            JsonValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            JsonValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            JsonValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[ObjectMember]> {
        match self {
            JsonValue::Object(members) => Some(members),
            _ => None,
        }
    }

    /**
     * 🔎 KEY LOOKUP: get_child()
     *
     * Linear byte-wise search over the member sequence of an object value.
     * Returns the first match; `None` for missing keys and for values that
     * are not objects.
     */
    pub fn get_child(&self, key: &str) -> Option<&JsonValue> {
        self.get_mapped_child(key).map(|member| &member.value)
    }

    pub fn get_child_mut(&mut self, key: &str) -> Option<&mut JsonValue> {
        self.get_mapped_child_mut(key).map(|member| &mut member.value)
    }

    /// Same search as `get_child`, returning the whole member record
    pub fn get_mapped_child(&self, key: &str) -> Option<&ObjectMember> {
        match self {
            JsonValue::Object(members) => members.iter().find(|member| member.key == key),
            _ => None,
        }
    }

    pub fn get_mapped_child_mut(&mut self, key: &str) -> Option<&mut ObjectMember> {
        match self {
            JsonValue::Object(members) => members.iter_mut().find(|member| member.key == key),
            _ => None,
        }
    }
}

/// Release the accounting for everything `value` transitively owns.
/// Symmetric with the charges made by the composer and the editor.
pub(crate) fn release_subtree(config: &Config, value: &JsonValue) {
    match value {
        JsonValue::String(text) => config.release(text.len()),
        JsonValue::Array(items) => {
            for item in items {
                config.release(VALUE_SLOT);
                release_subtree(config, item);
            }
        }
        JsonValue::Object(members) => {
            for member in members {
                config.release(MEMBER_SLOT);
                config.release(member.key.len());
                release_subtree(config, &member.value);
            }
        }
        _ => {}
    }
}

// ===============================================================================
// 🏗️ COMPOSER: Preorder walk over the token array
// ===============================================================================

/**
 * 🏗️ COMPOSER STATE: Composer
 *
 * PURPOSE:
 * - Shared cursor over the token array produced by the scanner
 * - One preorder recursion rebuilds the tree without re-scanning bytes
 *
 * FIELDS:
 * - config: Accounting configuration for every owned allocation
 * - json: Source bytes the token spans index into
 * - tokens: Fully parsed token array (no token has end == -1)
 * - current_token: Emission-order cursor
 */
pub struct Composer<'a> {
    config: &'a Config,
    json: &'a [u8],
    tokens: &'a [Token],
    current_token: usize,
}

impl<'a> Composer<'a> {
    pub fn new(config: &'a Config, json: &'a [u8], tokens: &'a [Token]) -> Self {
        Self {
            config,
            json,
            tokens,
            current_token: 0,
        }
    }

    /**
     * 🚀 ENTRY POINT: compose_value()
     *
     * Reads the token at the cursor, advances, and dispatches on its type.
     * Container tokens recurse for `size` children; object pairs read the
     * key token first, then the value.
     */
    pub fn compose_value(&mut self) -> JsonResult<JsonValue> {
        if self.current_token >= self.tokens.len() {
            return Err(invalid_arguments("token cursor out of range"));
        }

        let token = self.tokens[self.current_token];
        self.current_token += 1;

        match token.token_type {
            TokenType::Undefined => Ok(JsonValue::Undefined),
            TokenType::Boolean => Ok(JsonValue::Boolean(to_boolean(token.span(self.json)))),
            TokenType::Integer => Ok(JsonValue::Integer(to_integer(token.span(self.json)))),
            TokenType::Double => Ok(JsonValue::Double(to_double(token.span(self.json)))),
            TokenType::String => self.compose_string(token),
            TokenType::Array => self.compose_array(token),
            TokenType::Object => self.compose_object(token),
        }
    }

    /// Copy a string span into an owned, accounted buffer
    fn compose_string(&self, token: Token) -> JsonResult<JsonValue> {
        Ok(JsonValue::String(self.copy_span(token)?))
    }

    fn compose_array(&mut self, token: Token) -> JsonResult<JsonValue> {
        let count = token.size as usize;
        let mut items = Vec::with_capacity(count);

        for _ in 0..count {
            if let Err(err) = self.config.allocate(VALUE_SLOT) {
                self.unwind_array(&items);
                return Err(err);
            }
            match self.compose_value() {
                Ok(child) => items.push(child),
                Err(err) => {
                    self.config.release(VALUE_SLOT);
                    self.unwind_array(&items);
                    return Err(err);
                }
            }
        }

        Ok(JsonValue::Array(items))
    }

    fn compose_object(&mut self, token: Token) -> JsonResult<JsonValue> {
        let count = token.size as usize;
        let mut members: Vec<ObjectMember> = Vec::with_capacity(count);

        for _ in 0..count {
            if let Err(err) = self.config.allocate(MEMBER_SLOT) {
                self.unwind_object(&members);
                return Err(err);
            }

            let key = match self.compose_key() {
                Ok(key) => key,
                Err(err) => {
                    self.config.release(MEMBER_SLOT);
                    self.unwind_object(&members);
                    return Err(err);
                }
            };

            let value = if self.current_token >= self.tokens.len() {
                // A key with no value token ({"x":}). Tolerant framing
                // composes it as Undefined; strict framing rejects it.
                if cfg!(feature = "strict") {
                    self.config.release(MEMBER_SLOT);
                    self.config.release(key.len());
                    self.unwind_object(&members);
                    return Err(invalid_input("missing value after object key", self.json.len()));
                }
                JsonValue::Undefined
            } else {
                match self.compose_value() {
                    Ok(value) => value,
                    Err(err) => {
                        self.config.release(MEMBER_SLOT);
                        self.config.release(key.len());
                        self.unwind_object(&members);
                        return Err(err);
                    }
                }
            };

            members.push(ObjectMember { key, value });
        }

        Ok(JsonValue::Object(members))
    }

    /// Read the next token as an object key
    fn compose_key(&mut self) -> JsonResult<String> {
        if self.current_token >= self.tokens.len() {
            return Err(invalid_arguments("token cursor out of range"));
        }

        let token = self.tokens[self.current_token];
        if token.token_type != TokenType::String {
            return Err(invalid_input(
                "object key is not a string",
                token.start.max(0) as usize,
            ));
        }
        self.current_token += 1;

        self.copy_span(token)
    }

    fn copy_span(&self, token: Token) -> JsonResult<String> {
        let span = token.span(self.json);
        let text = std::str::from_utf8(span)
            .map_err(|_| invalid_input("span is not valid UTF-8", token.start.max(0) as usize))?;
        self.config.allocate(span.len())?;
        Ok(text.to_owned())
    }

    fn unwind_array(&self, items: &[JsonValue]) {
        for item in items {
            self.config.release(VALUE_SLOT);
            release_subtree(self.config, item);
        }
    }

    fn unwind_object(&self, members: &[ObjectMember]) {
        for member in members {
            self.config.release(MEMBER_SLOT);
            self.config.release(member.key.len());
            release_subtree(self.config, &member.value);
        }
    }
}
