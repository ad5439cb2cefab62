/*!
 * ===============================================================================
 * EJSON-Rust: Single-Pass JSON Tokenizer
 * ===============================================================================
 *
 * This file implements the JSON LEXICAL SCANNER of the pipeline:
 *
 * 1. 🔍  ANALYSIS: JSON bytes → Flat array of token descriptors
 * 2. 🧠  NESTING: One "superior token" index instead of a stack
 * 3. 📦  MEMORY: O(1) scratch space, caller-supplied token slice
 * 4. 🎯  MODES: Tolerant framing by default, strict framing by feature/flag
 *
 * SCANNER ARCHITECTURE:
 * ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
 * │ JSON Bytes  │ -> │   Scanner   │ -> │   Tokens    │ -> │  Composer   │
 * │ (&[u8])     │    │ (Rust)      │    │ (&[Token])  │    │ (Values)    │
 * └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
 *
 * TOKEN STREAM SHAPE:
 * - 🌳 Preorder: a parent token always precedes its children
 * - 📐 Spans: string spans exclude quotes, container spans include delimiters
 * - 🔢 size: child count (array items, object key/value pairs)
 * - 🚧 Open containers carry end == -1 until their close delimiter arrives
 */

use crate::error::{invalid_arguments, invalid_input, out_of_memory, partial_input, JsonResult};

// ===============================================================================
// 🏷️ TOKEN TYPES: JSON lexical elements
// ===============================================================================

/**
 * 🏷️ TOKEN TYPE ENUM: TokenType
 *
 * PURPOSE:
 * - Classifies every token the scanner emits
 * - Shared with the document model: value variants mirror these tags
 *
 * NOTE:
 * - `null` has no tag of its own; it is classified as Undefined and the
 *   composer gives it the Undefined value variant
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenType {
    #[default]
    Undefined,           // Unclassified primitive (includes null)
    Boolean,             // true / false
    Integer,             // Digits with optional leading minus
    Double,              // Fraction and/or exponent present
    String,              // Quoted span (quotes excluded)
    Array,               // [ ... ]
    Object,              // { ... }
}

// ===============================================================================
// 🎫 TOKEN STRUCTURE: Fixed-size span descriptor
// ===============================================================================

/**
 * 🎫 TOKEN STRUCTURE: Token
 *
 * FIELDS:
 * - token_type: Classification (enum above)
 * - start, end: Byte offsets into the source; -1 marks "not yet known"
 * - size: Direct child count; for object keys, the value-attachment count
 *
 * A fully parsed token satisfies start >= 0 && end > start.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,          // Classification
    pub start: i32,                     // Span start (inclusive)
    pub end: i32,                       // Span end (exclusive)
    pub size: u32,                      // Child count
}

impl Default for Token {
    fn default() -> Self {
        Self {
            token_type: TokenType::Undefined,
            start: -1,
            end: -1,
            size: 0,
        }
    }
}

impl Token {
    /// Opened but not yet closed (containers awaiting their delimiter)
    pub fn is_open(&self) -> bool {
        self.start != -1 && self.end == -1
    }

    /// Borrow the token's bytes out of the source it was scanned from
    pub fn span<'a>(&self, json: &'a [u8]) -> &'a [u8] {
        &json[self.start as usize..self.end as usize]
    }
}

// ===============================================================================
// 🔤 LEXICAL PREDICATES: Primitive classification and conversion
// ===============================================================================

/// Exactly `true` or `false`
pub fn is_boolean(data: &[u8]) -> bool {
    data == b"true" || data == b"false"
}

/// Optional leading `-`, then one or more ASCII digits, nothing else
pub fn is_integer(data: &[u8]) -> bool {
    let digits = match data.first() {
        Some(b'-') => &data[1..],
        _ => data,
    };
    !digits.is_empty() && digits.iter().all(u8::is_ascii_digit)
}

/// Decimal with at most one `.` and at most one optionally-signed exponent
pub fn is_double(data: &[u8]) -> bool {
    let mut i = usize::from(data.first() == Some(&b'-'));
    if i >= data.len() {
        return false;
    }

    let mut dot_seen = false;
    let mut exp_seen = false;
    let mut digit_seen = false;

    while i < data.len() {
        let c = data[i];
        if c.is_ascii_digit() {
            digit_seen = true;
            i += 1;
        } else if c == b'.' && !dot_seen && !exp_seen {
            dot_seen = true;
            i += 1;
        } else if (c == b'e' || c == b'E') && !exp_seen && digit_seen {
            exp_seen = true;
            i += 1;
            if i < data.len() && (data[i] == b'+' || data[i] == b'-') {
                i += 1;
            }
            if i >= data.len() {
                return false;           // Exponent marker without digits
            }
        } else {
            return false;
        }
    }

    digit_seen
}

/// Most likely token type for a primitive span, or Undefined
pub fn classify_primitive(data: &[u8]) -> TokenType {
    if data.is_empty() {
        TokenType::Undefined
    } else if is_boolean(data) {
        TokenType::Boolean
    } else if is_integer(data) {
        TokenType::Integer
    } else if is_double(data) {
        TokenType::Double
    } else {
        TokenType::Undefined
    }
}

/// `true` → true, anything else → false
pub fn to_boolean(data: &[u8]) -> bool {
    data == b"true"
}

/// Sign plus digits, non-digits skipped. Overflow wraps (unchecked by design).
pub fn to_integer(data: &[u8]) -> i64 {
    let (digits, sign): (&[u8], i64) = match data.first() {
        Some(b'-') => (&data[1..], -1),
        _ => (data, 1),
    };

    let mut result: i64 = 0;
    for &c in digits {
        if c.is_ascii_digit() {
            result = result.wrapping_mul(10).wrapping_add(i64::from(c - b'0'));
        }
    }

    result.wrapping_mul(sign)
}

/**
 * 🔢 DOUBLE CONVERSION: to_double()
 *
 * ALGORITHM:
 * 1. Accumulate the mantissa digits into an f64, counting fraction digits
 *    as a negative decimal exponent
 * 2. Fold in the optional signed exponent
 * 3. Apply the combined exponent by repeated multiply/divide by 10
 *
 * Accuracy: within one ULP for typical inputs; not bit-exact for
 * adversarial mantissas.
 */
pub fn to_double(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut i = 0;
    let mut sign = 1.0;
    if data[0] == b'-' {
        sign = -1.0;
        i = 1;
    }

    let mut result = 0.0f64;
    let mut exp: i64 = 0;
    let mut after_dot = false;

    while i < data.len() {
        let c = data[i];
        if c.is_ascii_digit() {
            result = result * 10.0 + f64::from(c - b'0');
            if after_dot {
                exp -= 1;
            }
        } else if c == b'.' {
            after_dot = true;
        } else if c == b'e' || c == b'E' {
            i += 1;
            let mut exp_sign: i64 = 1;
            if i < data.len() && (data[i] == b'+' || data[i] == b'-') {
                if data[i] == b'-' {
                    exp_sign = -1;
                }
                i += 1;
            }
            exp += exp_sign * to_integer(&data[i..]);
            break;
        }
        i += 1;
    }

    // Past ±400 the result has saturated to 0 or infinity anyway
    let mut exp = exp.clamp(-400, 400);
    while exp < 0 {
        result /= 10.0;
        exp += 1;
    }
    while exp > 0 {
        result *= 10.0;
        exp -= 1;
    }

    sign * result
}

// ===============================================================================
// 🔍 SCANNER: Byte-dispatch state machine
// ===============================================================================

/**
 * 🔍 SCANNER STATE: Scanner
 *
 * FIELDS:
 * - pos: Cursor into the input bytes
 * - next_token: Next free slot in the caller's token slice
 * - superior_token: Index of the owning container or promoted key, -1 at
 *   top level. `:` promotes the just-emitted key string here so the next
 *   value attaches as its child; `,` rewinds to the enclosing container.
 * - strict: Framing policy; defaults to the `strict` cargo feature
 *
 * A scanner instance is single-caller state; distinct instances over
 * distinct inputs are independent.
 */
#[derive(Debug, Clone)]
pub struct Scanner {
    pos: usize,                         // Cursor into input
    next_token: usize,                  // Next free token slot
    superior_token: i32,                // Owning token index, -1 at top level
    strict: bool,                       // Framing policy
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Scanner with the compile-time framing policy
    pub fn new() -> Self {
        Self::with_strict(cfg!(feature = "strict"))
    }

    /// Scanner with an explicit framing policy (tests drive both)
    pub fn with_strict(strict: bool) -> Self {
        Self {
            pos: 0,
            next_token: 0,
            superior_token: -1,
            strict,
        }
    }

    /// Zero cursors, keep the framing policy
    pub fn reset(&mut self) {
        self.pos = 0;
        self.next_token = 0;
        self.superior_token = -1;
    }

    /**
     * 🚀 ENTRY POINT: parse_tokens()
     *
     * PURPOSE:
     * - Tokenize `json` into the caller's slice in a single pass
     * - Return the number of tokens written
     *
     * DISPATCH:
     * - `{` `[`  open a container and make it the superior token
     * - `}` `]`  close the nearest open token, rewind the superior
     * - `"`      string sub-routine
     * - `:`      promote the just-emitted key to superior
     * - `,`      rewind a key-superior back to its container
     * - other    primitive sub-routine (boolean / number / null)
     *
     * Scanning stops at the end of the slice or at a NUL byte, whichever
     * comes first. Any token still open afterwards means truncated input.
     */
    pub fn parse_tokens(&mut self, json: &[u8], tokens: &mut [Token]) -> JsonResult<usize> {
        if json.is_empty() {
            return Err(invalid_arguments("empty JSON input"));
        }
        if tokens.is_empty() {
            return Err(invalid_arguments("empty token buffer"));
        }

        self.reset();

        while self.pos < json.len() && json[self.pos] != 0 {
            let c = json[self.pos];
            match c {
                b'{' | b'[' => {
                    let index = self
                        .allocate_token(tokens)
                        .ok_or_else(|| out_of_memory("token pool exhausted"))?;
                    if self.superior_token != -1 {
                        tokens[self.superior_token as usize].size += 1;
                    }
                    tokens[index].token_type = if c == b'{' {
                        TokenType::Object
                    } else {
                        TokenType::Array
                    };
                    tokens[index].start = self.pos as i32;
                    self.superior_token = index as i32;
                }

                b'}' | b']' => {
                    // Close the nearest open token, scanning indices downward
                    let mut i = self.next_token as i64 - 1;
                    let mut closed = false;
                    while i >= 0 {
                        let token = &mut tokens[i as usize];
                        if token.is_open() {
                            self.superior_token = -1;
                            token.end = self.pos as i32 + 1;
                            closed = true;
                            break;
                        }
                        i -= 1;
                    }

                    if !closed {
                        return Err(invalid_input("close delimiter with no open container", self.pos));
                    }

                    // The nearest still-open ancestor becomes the superior
                    while i >= 0 {
                        if tokens[i as usize].is_open() {
                            self.superior_token = i as i32;
                            break;
                        }
                        i -= 1;
                    }
                }

                b'"' => {
                    self.parse_string(json, tokens)?;
                    if self.superior_token != -1 {
                        tokens[self.superior_token as usize].size += 1;
                    }
                }

                b'\t' | b'\r' | b'\n' | b' ' => {}

                b':' => {
                    // The just-emitted key string owns the upcoming value
                    self.superior_token = self.next_token as i32 - 1;
                }

                b',' => {
                    // Undo a key promotion: rewind to the enclosing open container
                    if self.superior_token != -1
                        && tokens[self.superior_token as usize].token_type != TokenType::Array
                        && tokens[self.superior_token as usize].token_type != TokenType::Object
                    {
                        let mut i = self.next_token as i64 - 1;
                        while i >= 0 {
                            let token = &tokens[i as usize];
                            if (token.token_type == TokenType::Array
                                || token.token_type == TokenType::Object)
                                && token.is_open()
                            {
                                self.superior_token = i as i32;
                                break;
                            }
                            i -= 1;
                        }
                    }
                }

                _ => {
                    if self.strict {
                        if !matches!(c, b'-' | b'0'..=b'9' | b't' | b'f' | b'n') {
                            return Err(invalid_input("unexpected byte", self.pos));
                        }
                        // Catches {foo} style garbage: a primitive cannot sit
                        // directly inside an object or under a satisfied key
                        if self.superior_token != -1 {
                            let owner = &tokens[self.superior_token as usize];
                            if owner.token_type == TokenType::Object
                                || (owner.token_type == TokenType::String && owner.size != 0)
                            {
                                return Err(invalid_input("primitive not allowed here", self.pos));
                            }
                        }
                    }

                    self.parse_primitive(json, tokens)?;
                    if self.superior_token != -1 {
                        tokens[self.superior_token as usize].size += 1;
                    }
                }
            }
            self.pos += 1;
        }

        for token in tokens[..self.next_token].iter() {
            if token.is_open() {
                return Err(partial_input("unclosed container", self.pos));
            }
        }

        Ok(self.next_token)
    }

    /// Hand out the next slot from the caller's token slice
    fn allocate_token(&mut self, tokens: &mut [Token]) -> Option<usize> {
        if self.next_token >= tokens.len() {
            return None;
        }
        let index = self.next_token;
        self.next_token += 1;
        tokens[index] = Token::default();
        Some(index)
    }

    /**
     * 🔤 STRING SUB-ROUTINE: parse_string()
     *
     * Span runs from the byte after the opening quote to the byte before the
     * closing quote. `\` consumes one byte; allowed escapes are
     * `" / \ b f r n t` and `u` followed by exactly four hex digits. The
     * escape bytes stay in the span untouched (shape validation only).
     * On failure the cursor rewinds to the opening quote.
     */
    fn parse_string(&mut self, json: &[u8], tokens: &mut [Token]) -> JsonResult<()> {
        let start = self.pos;
        self.pos += 1;

        while self.pos < json.len() && json[self.pos] != 0 {
            let c = json[self.pos];

            if c == b'"' {
                let index = match self.allocate_token(tokens) {
                    Some(index) => index,
                    None => {
                        self.pos = start;
                        return Err(out_of_memory("token pool exhausted"));
                    }
                };
                tokens[index] = Token {
                    token_type: TokenType::String,
                    start: start as i32 + 1,
                    end: self.pos as i32,
                    size: 0,
                };
                return Ok(());
            }

            if c == b'\\' && self.pos + 1 < json.len() {
                self.pos += 1;
                match json[self.pos] {
                    b'"' | b'/' | b'\\' | b'b' | b'f' | b'r' | b'n' | b't' => {}
                    b'u' => {
                        self.pos += 1;
                        let mut digits = 0;
                        while digits < 4 && self.pos < json.len() && json[self.pos] != 0 {
                            if !json[self.pos].is_ascii_hexdigit() {
                                let at = self.pos;
                                self.pos = start;
                                return Err(invalid_input("malformed \\u escape", at));
                            }
                            digits += 1;
                            self.pos += 1;
                        }
                        self.pos -= 1;
                    }
                    _ => {
                        let at = self.pos;
                        self.pos = start;
                        return Err(invalid_input("unknown escape", at));
                    }
                }
            }

            self.pos += 1;
        }

        let at = self.pos;
        self.pos = start;
        Err(partial_input("unterminated string", at))
    }

    /**
     * 🔢 PRIMITIVE SUB-ROUTINE: parse_primitive()
     *
     * Advances to the next terminator (whitespace, `,`, `]`, `}`; in
     * tolerant mode also `:`), classifies the span, then backs the cursor
     * up one byte so the dispatcher re-reads the terminator. Strict mode
     * requires the terminator to exist before end of input.
     */
    fn parse_primitive(&mut self, json: &[u8], tokens: &mut [Token]) -> JsonResult<()> {
        let start = self.pos;
        let mut found = false;

        while self.pos < json.len() && json[self.pos] != 0 {
            let c = json[self.pos];
            let terminator = matches!(c, b'\t' | b'\n' | b'\r' | b' ' | b',' | b']' | b'}')
                || (!self.strict && c == b':');
            if terminator {
                found = true;
                break;
            }
            self.pos += 1;
        }

        if self.strict && !found {
            let at = self.pos;
            self.pos = start;
            return Err(partial_input("unterminated primitive", at));
        }

        let index = match self.allocate_token(tokens) {
            Some(index) => index,
            None => {
                self.pos = start;
                return Err(out_of_memory("token pool exhausted"));
            }
        };

        tokens[index] = Token {
            token_type: classify_primitive(&json[start..self.pos]),
            start: start as i32,
            end: self.pos as i32,
            size: 0,
        };

        self.pos -= 1;
        Ok(())
    }
}
