use flat::FixedFlatMap;

use crate::impls::{JsonMap, JsonSet};
use crate::object::JsonObject;
use crate::{Error, KeySet, ParseJson, ParseOptions};

static ESCAPED_CHARACTER_BY_CODE: FixedFlatMap<u8, u8, 8> = FixedFlatMap::<u8, u8, 8>::from_entries([
    (b'"', b'"'),
    (b'\\', b'\\'),
    (b'/', b'/'),
    (b'b', 8),
    (b'f', 12),
    (b'n', 10),
    (b'r', 13),
    (b't', 9),
]);

/// Streaming JSON parser over an input slice.
///
/// The syntax is described at <https://www.json.org/>.
pub struct Parser<'a> {
    options: ParseOptions,
    input: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, options: ParseOptions) -> Self {
        Self { options, input }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses a complete value; trailing non-whitespace input is a syntax
    /// error.
    pub fn parse<T: ParseJson>(&mut self) -> Result<T, Error> {
        let value = T::parse_json(self)?;
        self.consume_whitespace();
        if self.input.is_empty() {
            Ok(value)
        } else {
            Err(Error::Syntax)
        }
    }

    pub(crate) fn consume_prefix(&mut self, prefix: &str) -> bool {
        match self.input.strip_prefix(prefix) {
            Some(rest) => {
                self.input = rest;
                true
            }
            None => false,
        }
    }

    /// Consumes `prefix` or fails with a syntax error.
    pub(crate) fn require_prefix(&mut self, prefix: &str) -> Result<(), Error> {
        if self.consume_prefix(prefix) {
            Ok(())
        } else {
            Err(Error::Syntax)
        }
    }

    /// Consumes `prefix` or fails with a format error.
    pub(crate) fn expect_prefix(&mut self, prefix: &str) -> Result<(), Error> {
        if self.consume_prefix(prefix) {
            Ok(())
        } else {
            Err(Error::Format)
        }
    }

    pub(crate) fn consume_whitespace(&mut self) {
        let end = self
            .input
            .bytes()
            .position(|b| !matches!(b, b' ' | b'\r' | b'\n' | b'\t'))
            .unwrap_or(self.input.len());
        self.input = &self.input[end..];
    }

    pub fn read_null(&mut self) -> Result<(), Error> {
        self.consume_whitespace();
        self.require_prefix("null")
    }

    pub fn read_boolean(&mut self) -> Result<bool, Error> {
        self.consume_whitespace();
        if self.consume_prefix("true") {
            Ok(true)
        } else if self.consume_prefix("false") {
            Ok(false)
        } else {
            Err(Error::Syntax)
        }
    }

    /// The JSON integer grammar: optional minus, then `0` or a nonzero
    /// digit run.
    fn consume_integer(&mut self) -> Result<&'a str, Error> {
        let bytes = self.input.as_bytes();
        let mut end = 0;
        if bytes.first() == Some(&b'-') {
            end += 1;
        }
        match bytes.get(end) {
            Some(b'0') => end += 1,
            Some(b'1'..=b'9') => {
                while matches!(bytes.get(end), Some(b'0'..=b'9')) {
                    end += 1;
                }
            }
            _ => return Err(Error::Syntax),
        }
        let (token, rest) = self.input.split_at(end);
        self.input = rest;
        Ok(token)
    }

    /// The full JSON number grammar: integer part plus optional fraction
    /// and exponent.
    fn consume_number(&mut self) -> Result<&'a str, Error> {
        let bytes = self.input.as_bytes();
        let mut end = 0;
        if bytes.first() == Some(&b'-') {
            end += 1;
        }
        match bytes.get(end) {
            Some(b'0') => end += 1,
            Some(b'1'..=b'9') => {
                while matches!(bytes.get(end), Some(b'0'..=b'9')) {
                    end += 1;
                }
            }
            _ => return Err(Error::Syntax),
        }
        if bytes.get(end) == Some(&b'.') {
            end += 1;
            if !matches!(bytes.get(end), Some(b'0'..=b'9')) {
                return Err(Error::Syntax);
            }
            while matches!(bytes.get(end), Some(b'0'..=b'9')) {
                end += 1;
            }
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            end += 1;
            if matches!(bytes.get(end), Some(b'+' | b'-')) {
                end += 1;
            }
            if !matches!(bytes.get(end), Some(b'0'..=b'9')) {
                return Err(Error::Syntax);
            }
            while matches!(bytes.get(end), Some(b'0'..=b'9')) {
                end += 1;
            }
        }
        let (token, rest) = self.input.split_at(end);
        self.input = rest;
        Ok(token)
    }

    pub fn read_integer<T: std::str::FromStr>(&mut self) -> Result<T, Error> {
        self.consume_whitespace();
        if self.input.is_empty() {
            return Err(Error::Syntax);
        }
        let token = self.consume_integer()?;
        token.parse::<T>().map_err(|_| Error::Format)
    }

    pub fn read_float<T: std::str::FromStr>(&mut self) -> Result<T, Error> {
        self.consume_whitespace();
        if self.input.is_empty() {
            return Err(Error::Syntax);
        }
        let token = self.consume_number()?;
        token.parse::<T>().map_err(|_| Error::Format)
    }

    pub fn read_string(&mut self) -> Result<String, Error> {
        self.consume_whitespace();
        self.require_prefix("\"")?;
        let bytes = self.input.as_bytes();

        // First pass: validate and find the closing quote.
        let mut offset = 0;
        while offset < bytes.len() && bytes[offset] != b'"' {
            if bytes[offset] != b'\\' {
                offset += 1;
                continue;
            }
            offset += 1;
            if offset >= bytes.len() {
                return Err(Error::Syntax);
            }
            let code = bytes[offset];
            offset += 1;
            if code != b'u' {
                if !ESCAPED_CHARACTER_BY_CODE.contains_key(&code) {
                    return Err(Error::Syntax);
                }
                continue;
            }
            if offset + 4 > bytes.len() {
                return Err(Error::Syntax);
            }
            if bytes[offset] != b'0' || bytes[offset + 1] != b'0' {
                // TODO: implement UTF-16 to UTF-8 transcoding of
                // multi-byte escapes.
                return Err(Error::UnimplementedEscape);
            }
            if !bytes[offset + 2].is_ascii_hexdigit() || !bytes[offset + 3].is_ascii_hexdigit() {
                return Err(Error::Syntax);
            }
            offset += 4;
        }
        if offset >= bytes.len() {
            return Err(Error::Syntax);
        }

        // Second pass: rebuild the decoded bytes. `\u00XX` escapes carry
        // raw bytes of the original string, so the result is validated as
        // UTF-8 only once they are all reassembled.
        let mut result = Vec::with_capacity(offset);
        let mut i = 0;
        while i < offset {
            let chunk_start = i;
            while i < offset && bytes[i] != b'\\' {
                i += 1;
            }
            result.extend_from_slice(&bytes[chunk_start..i]);
            if i >= offset {
                break;
            }
            i += 1;
            let code = bytes[i];
            i += 1;
            if code == b'u' {
                let decoded = parse_hex_digit(bytes[i + 2]) * 16 + parse_hex_digit(bytes[i + 3]);
                result.push(decoded);
                i += 4;
            } else {
                let decoded = ESCAPED_CHARACTER_BY_CODE
                    .get(&code)
                    .copied()
                    .unwrap_or(code);
                result.push(decoded);
            }
        }
        self.input = &self.input[offset + 1..];
        String::from_utf8(result).map_err(|_| Error::Format)
    }

    /// Reads `{...}` into a record type, tracking which keys were seen.
    /// Duplicate keys and, at the closing brace, missing non-optional
    /// fields are format errors. Unknown keys honor the
    /// `allow_extra_fields` / `fast_skipping` options.
    pub fn read_object<O: JsonObject>(&mut self) -> Result<O, Error> {
        self.consume_whitespace();
        self.expect_prefix("{")?;
        self.consume_whitespace();
        let mut keys = KeySet::new();
        let mut result = O::default();
        if self.consume_prefix("}") {
            return if O::check_presence(&keys) {
                Ok(result)
            } else {
                Err(Error::Format)
            };
        }
        while !self.input.is_empty() {
            let key = self.read_string()?;
            if !keys.insert(key.clone()) {
                return Err(Error::Format); // duplicate key
            }
            self.consume_whitespace();
            self.require_prefix(":")?;
            if !result.read_field(self, &key)? {
                if !self.options.allow_extra_fields {
                    return Err(Error::Format);
                }
                tracing::trace!(key = %key, "skipping unrecognized field");
                self.skip_field(self.options.fast_skipping)?;
            }
            self.consume_whitespace();
            if self.consume_prefix(",") {
                self.consume_whitespace();
            } else if self.consume_prefix("}") {
                return if O::check_presence(&keys) {
                    Ok(result)
                } else {
                    Err(Error::Format)
                };
            } else {
                return Err(Error::Syntax);
            }
        }
        Err(Error::Syntax)
    }

    /// Reads `{"key": value, ...}` into a string-keyed map shape.
    /// Duplicate keys are format errors.
    pub fn read_dictionary<V: ParseJson, M: JsonMap<V>>(&mut self) -> Result<M, Error> {
        self.consume_whitespace();
        self.expect_prefix("{")?;
        self.consume_whitespace();
        let mut result = M::default();
        if self.consume_prefix("}") {
            return Ok(result);
        }
        loop {
            let key = self.read_string()?;
            self.consume_whitespace();
            self.require_prefix(":")?;
            let value = V::parse_json(self)?;
            if !result.insert_new(key, value) {
                return Err(Error::Format); // duplicate key
            }
            self.consume_whitespace();
            if self.consume_prefix("}") {
                return Ok(result);
            }
            self.require_prefix(",")?;
            self.consume_whitespace();
        }
    }

    pub fn read_vector<T: ParseJson>(&mut self) -> Result<Vec<T>, Error> {
        self.consume_whitespace();
        self.expect_prefix("[")?;
        self.consume_whitespace();
        if self.consume_prefix("]") {
            return Ok(Vec::new());
        }
        let mut result = Vec::new();
        while !self.input.is_empty() {
            result.push(T::parse_json(self)?);
            self.consume_whitespace();
            if self.consume_prefix(",") {
                self.consume_whitespace();
            } else if self.consume_prefix("]") {
                return Ok(result);
            } else {
                return Err(Error::Syntax);
            }
        }
        Err(Error::Syntax)
    }

    /// Reads exactly `N` elements.
    pub fn read_array<T: ParseJson, const N: usize>(&mut self) -> Result<[T; N], Error> {
        self.consume_whitespace();
        self.expect_prefix("[")?;
        let mut elements = Vec::with_capacity(N);
        if N > 0 {
            elements.push(T::parse_json(self)?);
            for _ in 1..N {
                self.consume_whitespace();
                self.require_prefix(",")?;
                elements.push(T::parse_json(self)?);
            }
        }
        self.consume_whitespace();
        self.require_prefix("]")?;
        elements.try_into().map_err(|_| Error::Format)
    }

    /// Reads `[...]` into a set shape; duplicate elements are format
    /// errors.
    pub fn read_set<S: JsonSet>(&mut self) -> Result<S, Error> {
        self.consume_whitespace();
        self.require_prefix("[")?;
        self.consume_whitespace();
        let mut result = S::default();
        if self.consume_prefix("]") {
            return Ok(result);
        }
        loop {
            let value = <S::Elem as ParseJson>::parse_json(self)?;
            if !result.insert_new(value) {
                return Err(Error::Format); // duplicate element
            }
            self.consume_whitespace();
            if self.consume_prefix("]") {
                return Ok(result);
            }
            self.require_prefix(",")?;
            self.consume_whitespace();
        }
    }

    pub fn read_value_or_null<T: ParseJson>(&mut self) -> Result<Option<T>, Error> {
        self.consume_whitespace();
        if self.consume_prefix("null") {
            Ok(None)
        } else {
            T::parse_json(self).map(Some)
        }
    }

    // Skipping machinery for unrecognized object fields.

    /// Fast scan over a quoted string starting at `offset` (which indexes
    /// the opening quote); leaves `offset` on the closing quote.
    fn skip_string(&self, offset: &mut usize) -> Result<(), Error> {
        let bytes = self.input.as_bytes();
        let quote = bytes[*offset];
        *offset += 1;
        while *offset < bytes.len() {
            let ch = bytes[*offset];
            if ch == b'\\' {
                *offset += 1;
                if *offset >= bytes.len() {
                    return Err(Error::Syntax);
                }
                if bytes[*offset] == b'u' {
                    *offset += 4;
                }
            } else if ch == quote {
                return Ok(());
            }
            *offset += 1;
        }
        Err(Error::Syntax)
    }

    fn fast_skip_array(&self, offset: &mut usize) -> Result<(), Error> {
        let bytes = self.input.as_bytes();
        *offset += 1;
        while *offset < bytes.len() {
            match bytes[*offset] {
                b'"' | b'\'' => self.skip_string(offset)?,
                b'[' => self.fast_skip_array(offset)?,
                b'{' => self.fast_skip_object(offset)?,
                b']' => return Ok(()),
                _ => {}
            }
            *offset += 1;
        }
        Err(Error::Syntax)
    }

    fn fast_skip_object(&self, offset: &mut usize) -> Result<(), Error> {
        let bytes = self.input.as_bytes();
        *offset += 1;
        while *offset < bytes.len() {
            match bytes[*offset] {
                b'"' | b'\'' => self.skip_string(offset)?,
                b'[' => self.fast_skip_array(offset)?,
                b'{' => self.fast_skip_object(offset)?,
                b'}' => return Ok(()),
                _ => {}
            }
            *offset += 1;
        }
        Err(Error::Syntax)
    }

    /// Skips to the end of the current field by bracket structure alone,
    /// leaving the `,` or `}` terminator in the input.
    fn fast_skip_field(&mut self) -> Result<(), Error> {
        let mut offset = 0;
        let bytes = self.input.as_bytes();
        while offset < bytes.len() {
            match bytes[offset] {
                b'"' | b'\'' => self.skip_string(&mut offset)?,
                b'[' => self.fast_skip_array(&mut offset)?,
                b'{' => self.fast_skip_object(&mut offset)?,
                b',' | b'}' => {
                    self.input = &self.input[offset..];
                    return Ok(());
                }
                _ => {}
            }
            offset += 1;
        }
        Err(Error::Syntax)
    }

    /// Strict skip of a quoted string (opening quote already consumed):
    /// the escapes are validated even though the content is discarded.
    fn skip_string_partial(&mut self) -> Result<(), Error> {
        let bytes = self.input.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => {
                    i += 1;
                    if i >= bytes.len() {
                        return Err(Error::Syntax);
                    }
                    if bytes[i] != b'u' {
                        if !ESCAPED_CHARACTER_BY_CODE.contains_key(&bytes[i]) {
                            return Err(Error::Syntax);
                        }
                    } else {
                        if i + 4 >= bytes.len()
                            || !bytes[i + 1].is_ascii_hexdigit()
                            || !bytes[i + 2].is_ascii_hexdigit()
                            || !bytes[i + 3].is_ascii_hexdigit()
                            || !bytes[i + 4].is_ascii_hexdigit()
                        {
                            return Err(Error::Syntax);
                        }
                        i += 4;
                    }
                }
                b'"' => {
                    self.input = &self.input[i + 1..];
                    return Ok(());
                }
                _ => {}
            }
            i += 1;
        }
        Err(Error::Syntax)
    }

    fn skip_object_partial(&mut self) -> Result<(), Error> {
        self.consume_whitespace();
        if self.consume_prefix("}") {
            return Ok(());
        }
        loop {
            self.require_prefix("\"")?;
            self.skip_string_partial()?;
            self.consume_whitespace();
            self.require_prefix(":")?;
            self.skip_value()?;
            self.consume_whitespace();
            if !self.consume_prefix(",") {
                return self.require_prefix("}");
            }
            self.consume_whitespace();
        }
    }

    fn skip_array_partial(&mut self) -> Result<(), Error> {
        self.consume_whitespace();
        if self.consume_prefix("]") {
            return Ok(());
        }
        self.skip_value()?;
        self.consume_whitespace();
        while self.consume_prefix(",") {
            self.skip_value()?;
            self.consume_whitespace();
        }
        self.require_prefix("]")
    }

    /// Strict skip of one value of any type.
    fn skip_value(&mut self) -> Result<(), Error> {
        self.consume_whitespace();
        if self.consume_prefix("null")
            || self.consume_prefix("true")
            || self.consume_prefix("false")
        {
            return Ok(());
        }
        if self.consume_prefix("\"") {
            return self.skip_string_partial();
        }
        if self.consume_prefix("{") {
            return self.skip_object_partial();
        }
        if self.consume_prefix("[") {
            return self.skip_array_partial();
        }
        // Anything else must be a number.
        self.read_float::<f64>().map(|_| ())
    }

    pub(crate) fn skip_field(&mut self, fast: bool) -> Result<(), Error> {
        if fast {
            self.fast_skip_field()
        } else {
            self.skip_value()
        }
    }
}

fn parse_hex_digit(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'A'..=b'F' => digit - b'A' + 10,
        _ => digit - b'a' + 10,
    }
}
