/*!
 * ===============================================================================
 * EJSON-Rust: Main Entry Point
 * ===============================================================================
 *
 * This file (lib.rs) wires together the EJSON pipeline. EJSON is a JSON
 * library for constrained environments:
 *
 * 1. 🗂️  MODULES: All components of the tokenize/compose/emit pipeline
 * 2. 📦  MEMORY: Every owned allocation is accounted to a caller-supplied
 *        configuration; the library holds no global state
 * 3. 🔄  PIPELINE: Complete load/edit/dump flow over typed value trees
 *
 * PIPELINE ARCHITECTURE:
 * ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
 * │   Scanner   │ -> │  Composer   │ -> │   Editor    │ -> │   Emitter   │
 * │ (Tokens)    │    │ (Values)    │    │ (Edits)     │    │ (Text)      │
 * └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
 *
 * CHARACTERISTICS:
 * - 🔍 Single-pass tokenizer, O(1) scratch memory, caller-supplied slots
 * - 🌳 Value trees are strict arborescences (no back references)
 * - 📝 Compact and pretty serialization into bounded buffers
 * - 🎯 Tolerant framing by default; `strict` feature tightens it
 */

pub mod composer;          // 🏗️ Structural composition: Tokens → Values
pub mod config;            // ⚙️ Allocator accounting and configuration
pub mod editor;            // ✏️ Value factories and structural edits
pub mod emitter;           // 📝 JSON serialization: Values → Text
pub mod error;             // ❌ Status taxonomy and error reporting
pub mod high_level;        // 🛡️ High-level API: load / free / dump
pub mod reader;            // 📖 Input decoding: BOM and encodings
pub mod scanner;           // 🔍 Lexical analysis: Bytes → Tokens

pub use composer::{Composer, JsonValue, ObjectMember};
pub use config::{Allocator, Config, CountingAllocator, SystemAllocator};
pub use editor::{
    add_to_array, add_to_array_at, create_array_value, create_boolean_value, create_double_value,
    create_integer_value, create_null_value, create_object_value, create_string_value,
    remove_from_array, remove_object_property, set_object_property, EditRejected,
};
pub use emitter::{emit_to_string, value_to_string, Emitter};
pub use error::{status_is_bad, status_is_good, JsonError, JsonErrorType, JsonResult};
pub use high_level::{
    dump_to_string, free_value, parse_document, parse_to_value, INITIAL_TOKEN_CAPACITY,
    MAX_TOKEN_CAPACITY,
};
pub use reader::{decode_document, detect_encoding, EncodingInfo};
pub use scanner::{Scanner, Token, TokenType};
