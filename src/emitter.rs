/*!
 * ===============================================================================
 * EJSON-Rust: Text Emitter
 * ===============================================================================
 *
 * This file implements JSON SERIALIZATION over bounded buffers:
 *
 * 1. 📝  SERIALIZATION: Value tree → JSON text
 * 2. 🎨  MODES: Compact (no whitespace) and pretty (indented, one item/line)
 * 3. 📦  BUFFERS: Caller-provided byte buffer; exhaustion is OutOfMemory
 * 4. ⚙️  CONFIGURATION: Builder-style options (indent width)
 *
 * EMITTER ARCHITECTURE:
 * ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
 * │ JsonValue   │ -> │   Emitter   │ -> │ JSON Bytes  │
 * │ (Tree)      │    │ (Writer)    │    │ (Buffer)    │
 * └─────────────┘    └─────────────┘    └─────────────┘
 *
 * EMISSION NOTES:
 * - 🔘 Undefined emits `null`
 * - 🔢 Doubles emit the shortest round-trip decimal, suffixed with `.0`
 *   when needed so the text re-tokenizes as a double
 * - 🔤 String bytes are emitted verbatim between quotes; the emitter
 *   trusts its source and does not re-escape (documented limitation)
 */

use std::io::{Cursor, Write};

use crate::composer::{JsonValue, ObjectMember};
use crate::error::{invalid_arguments, out_of_memory, JsonResult};

const INDENT_UNIT: &[u8] = b"        "; // Widest supported unit (8 spaces)

/**
 * 📝 EMITTER: Emitter<W: Write>
 *
 * PURPOSE:
 * - Render a value tree into any writer; the public entry points wrap a
 *   bounded caller buffer or a growing vector
 * - A short write (full buffer) aborts the emission with OutOfMemory;
 *   the written prefix is unspecified on failure
 */
pub struct Emitter<W: Write> {
    writer: W,                          // Output sink
    pretty: bool,                       // Indented mode
    indent: usize,                      // Spaces per nesting level
}

impl<W: Write> Emitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
            indent: 4,
        }
    }

    /// Enable or disable pretty printing
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Set the indentation unit, clamped to 1–8 spaces
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.clamp(1, INDENT_UNIT.len());
        self
    }

    /// Render the whole tree
    pub fn emit(&mut self, value: &JsonValue) -> JsonResult<()> {
        self.emit_value(value, 0)
    }

    fn emit_value(&mut self, value: &JsonValue, depth: usize) -> JsonResult<()> {
        match value {
            JsonValue::Undefined => self.write_bytes(b"null"),
            JsonValue::Boolean(true) => self.write_bytes(b"true"),
            JsonValue::Boolean(false) => self.write_bytes(b"false"),
            JsonValue::Integer(number) => self.write_bytes(number.to_string().as_bytes()),
            JsonValue::Double(number) => self.emit_double(*number),
            JsonValue::String(text) => self.emit_string(text),
            JsonValue::Array(items) => self.emit_array(items, depth),
            JsonValue::Object(members) => self.emit_object(members, depth),
        }
    }

    fn emit_double(&mut self, value: f64) -> JsonResult<()> {
        if !value.is_finite() {
            // JSON has no NaN/Infinity spelling
            return self.write_bytes(b"null");
        }

        let mut text = value.to_string();
        if !text.contains('.') && !text.contains('e') && !text.contains('E') {
            text.push_str(".0");
        }
        self.write_bytes(text.as_bytes())
    }

    fn emit_string(&mut self, text: &str) -> JsonResult<()> {
        self.write_bytes(b"\"")?;
        self.write_bytes(text.as_bytes())?;
        self.write_bytes(b"\"")
    }

    fn emit_array(&mut self, items: &[JsonValue], depth: usize) -> JsonResult<()> {
        if items.is_empty() {
            return self.write_bytes(b"[]");
        }

        self.write_bytes(b"[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write_bytes(b",")?;
            }
            self.write_newline()?;
            self.write_indent(depth + 1)?;
            self.emit_value(item, depth + 1)?;
        }
        self.write_newline()?;
        self.write_indent(depth)?;
        self.write_bytes(b"]")
    }

    fn emit_object(&mut self, members: &[ObjectMember], depth: usize) -> JsonResult<()> {
        if members.is_empty() {
            return self.write_bytes(b"{}");
        }

        self.write_bytes(b"{")?;
        for (i, member) in members.iter().enumerate() {
            if i > 0 {
                self.write_bytes(b",")?;
            }
            self.write_newline()?;
            self.write_indent(depth + 1)?;
            self.emit_string(&member.key)?;
            self.write_bytes(b":")?;
            if self.pretty {
                self.write_bytes(b" ")?;
            }
            self.emit_value(&member.value, depth + 1)?;
        }
        self.write_newline()?;
        self.write_indent(depth)?;
        self.write_bytes(b"}")
    }

    fn write_newline(&mut self) -> JsonResult<()> {
        if self.pretty {
            self.write_bytes(b"\n")?;
        }
        Ok(())
    }

    fn write_indent(&mut self, depth: usize) -> JsonResult<()> {
        if self.pretty {
            for _ in 0..depth {
                self.write_bytes(&INDENT_UNIT[..self.indent])?;
            }
        }
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> JsonResult<()> {
        self.writer
            .write_all(data)
            .map_err(|_| out_of_memory("dump buffer exhausted"))
    }
}

/**
 * 🚀 ENTRY POINT: value_to_string()
 *
 * Writes JSON text into the caller's byte buffer and returns the number of
 * bytes written (no terminator byte is appended). Fails with OutOfMemory
 * when the buffer is exhausted mid-write.
 */
pub fn value_to_string(value: &JsonValue, buffer: &mut [u8], pretty: bool) -> JsonResult<usize> {
    if buffer.is_empty() {
        return Err(invalid_arguments("empty dump buffer"));
    }

    let mut cursor = Cursor::new(buffer);
    Emitter::new(&mut cursor).with_pretty(pretty).emit(value)?;
    Ok(cursor.position() as usize)
}

/// Render into a growing buffer (convenience entry for unconstrained hosts)
pub fn emit_to_string(value: &JsonValue, pretty: bool) -> JsonResult<String> {
    let mut output = Vec::new();
    Emitter::new(&mut output).with_pretty(pretty).emit(value)?;
    String::from_utf8(output).map_err(|_| invalid_arguments("emitted text is not valid UTF-8"))
}
