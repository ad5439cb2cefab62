/*!
 * ===============================================================================
 * EJSON-Rust: High-Level API
 * ===============================================================================
 *
 * This file implements the whole-input entry points over the pipeline:
 *
 * 1. 📥  LOADING: parse_to_value() — bytes → value tree in one call
 * 2. 🌐  DECODING: parse_document() — BOM/encoding normalization first
 * 3. 🧹  LIFECYCLE: free_value() — accounted release of a whole tree
 * 4. 📤  DUMPING: dump_to_string() — convenience over the emitter
 *
 * TOKEN BUFFER GROWTH:
 * The internal token buffer starts at 1024 slots and doubles whenever the
 * scanner reports an exhausted pool, up to a hard ceiling of 8192 slots.
 * Only the scanner's own OutOfMemory triggers a retry; a refusing allocator
 * aborts immediately (retrying a failing allocator with a bigger request
 * cannot succeed).
 */

use crate::composer::{release_subtree, Composer, JsonValue};
use crate::config::Config;
use crate::emitter;
use crate::error::{invalid_arguments, JsonErrorType, JsonResult};
use crate::reader;
use crate::scanner::{Scanner, Token};

/// First token buffer size tried by `parse_to_value`
pub const INITIAL_TOKEN_CAPACITY: usize = 1024;

/// Hard ceiling for the internal token buffer
pub const MAX_TOKEN_CAPACITY: usize = 8192;

/**
 * 📥 END-TO-END PARSE: parse_to_value()
 *
 * Tokenizes `json` with an internally grown token buffer, then composes the
 * value tree from token 0. Scanner and composer errors surface unchanged.
 * The returned tree owns all of its children; release it with `free_value`.
 */
pub fn parse_to_value(config: &Config, json: &[u8]) -> JsonResult<JsonValue> {
    if json.is_empty() {
        return Err(invalid_arguments("empty JSON input"));
    }

    tracing::debug!(bytes = json.len(), "parsing document");

    let token_bytes = |capacity: usize| capacity * std::mem::size_of::<Token>();

    let mut scanner = Scanner::new();
    let mut capacity = INITIAL_TOKEN_CAPACITY;

    let (tokens, count) = loop {
        config.allocate(token_bytes(capacity))?;
        let mut tokens = vec![Token::default(); capacity];

        match scanner.parse_tokens(json, &mut tokens) {
            Ok(count) => break (tokens, count),
            Err(err) => {
                config.release(token_bytes(capacity));
                if err.error_type == JsonErrorType::OutOfMemory && capacity < MAX_TOKEN_CAPACITY {
                    capacity = (capacity * 2).min(MAX_TOKEN_CAPACITY);
                    tracing::trace!(capacity, "token pool exhausted, doubling");
                    continue;
                }
                return Err(err);
            }
        }
    };

    let result = Composer::new(config, json, &tokens[..count]).compose_value();
    config.release(token_bytes(tokens.len()));
    result
}

/// Decode a raw document (UTF-8/UTF-16, optional BOM) and parse it
pub fn parse_document(config: &Config, bytes: &[u8]) -> JsonResult<JsonValue> {
    let text = reader::decode_document(bytes)?;
    parse_to_value(config, text.as_bytes())
}

/// Release a value tree and every allocation attributable to it
pub fn free_value(config: &Config, value: JsonValue) {
    release_subtree(config, &value);
}

/// Serialize into a growing buffer; see `emitter::value_to_string` for the
/// bounded-buffer form
pub fn dump_to_string(value: &JsonValue, pretty: bool) -> JsonResult<String> {
    let text = emitter::emit_to_string(value, pretty)?;
    tracing::debug!(bytes = text.len(), pretty, "dumped document");
    Ok(text)
}
