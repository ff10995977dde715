//! Text-format parsing: populates a message through its descriptor from
//! the protobuf-like textual syntax.
//!
//! Grammar: `name[:] value` entries separated by optional `,` or `;`,
//! with `#` comments running to end of line. The `:` is mandatory for
//! scalars, enums, and repeated fields, and optional before singular
//! braced sub-messages and map entries. Sub-messages are delimited by
//! `{...}` or `<...>` (the close must match the open), repeated values by
//! `[v, v, ...]`, and map fields by one `{key: ..., value: ...}` entry
//! per occurrence. Repeated and map fields may appear several times and
//! concatenate; any other duplicate field is an error.

use flat::{FixedFlatMap, FlatSet};
use lazy_static::lazy_static;
use regex::Regex;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use crate::{
    Error, FieldKind, FieldType, FieldValue, MapKey, MapValueMut, Message, MessageReflection,
};

static ESCAPED_CHARACTER_BY_CODE: FixedFlatMap<u8, u8, 11> = FixedFlatMap::<u8, u8, 11>::from_entries([
    (b'a', 7),
    (b'b', 8),
    (b'f', 12),
    (b'n', 10),
    (b'r', 13),
    (b't', 9),
    (b'v', 11),
    (b'?', 63),
    (b'\\', 92),
    (b'\'', 39),
    (b'"', 34),
]);

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new("^[A-Za-z_][A-Za-z0-9_]*").unwrap();
    static ref HEX_INTEGER: Regex = Regex::new("^[+-]?0[Xx][0-9A-Fa-f]+").unwrap();
    static ref OCTAL_INTEGER: Regex = Regex::new("^[+-]?0[0-7]+").unwrap();
    static ref DECIMAL_INTEGER: Regex = Regex::new("^[+-]?(?:0|[1-9][0-9]*)").unwrap();
    static ref FLOAT: Regex =
        Regex::new(r"^[+-]?(?:[0-9]*\.)?[0-9]+(?:[Ee][+-]?[0-9]+)?[Ff]?").unwrap();
}

/// Parses a sequence of top-level field entries into `message`.
pub fn parse_fields(
    input: &str,
    descriptor: &dyn MessageReflection,
    message: &mut dyn Message,
) -> Result<(), Error> {
    let mut parser = Parser { input };
    parser.parse_fields_inner(descriptor, message, None)
}

/// Parses a sequence of top-level field entries into a fresh instance
/// allocated through the descriptor.
pub fn parse_new(
    input: &str,
    descriptor: &dyn MessageReflection,
) -> Result<Box<dyn Message>, Error> {
    let mut message = descriptor.create_instance();
    parse_fields(input, descriptor, message.as_mut())?;
    Ok(message)
}

struct Parser<'a> {
    input: &'a str,
}

impl<'a> Parser<'a> {
    fn consume_prefix(&mut self, prefix: &str) -> bool {
        match self.input.strip_prefix(prefix) {
            Some(rest) => {
                self.input = rest;
                true
            }
            None => false,
        }
    }

    fn require_prefix(&mut self, prefix: &str) -> Result<(), Error> {
        if self.consume_prefix(prefix) {
            Ok(())
        } else {
            Err(Error::Syntax)
        }
    }

    fn expect_prefix(&mut self, prefix: &str) -> Result<(), Error> {
        if self.consume_prefix(prefix) {
            Ok(())
        } else {
            Err(Error::Format)
        }
    }

    fn consume_whitespace(&mut self) {
        let end = self
            .input
            .bytes()
            .position(|b| !matches!(b, b' ' | b'\n' | b'\t' | 0x0B | 0x0C | b'\r'))
            .unwrap_or(self.input.len());
        self.input = &self.input[end..];
    }

    /// Skips whitespace and `#` comments.
    fn consume_separators(&mut self) {
        self.consume_whitespace();
        while self.consume_prefix("#") {
            let end = self.input.find('\n').unwrap_or(self.input.len());
            self.input = &self.input[end..];
            self.consume_whitespace();
        }
    }

    fn consume_pattern(&mut self, pattern: &Regex) -> Result<&'a str, Error> {
        match pattern.find(self.input) {
            Some(found) if found.start() == 0 => {
                let (token, rest) = self.input.split_at(found.end());
                self.input = rest;
                Ok(token)
            }
            _ => Err(Error::Syntax),
        }
    }

    fn consume_identifier(&mut self) -> Result<&'a str, Error> {
        self.consume_pattern(&IDENTIFIER)
    }

    fn parse_bool(&mut self) -> Result<bool, Error> {
        self.consume_separators();
        match self.consume_identifier()? {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::Format),
        }
    }

    fn parse_i64(&mut self) -> Result<i64, Error> {
        self.consume_separators();
        if let Ok(token) = self.consume_pattern(&HEX_INTEGER) {
            let (negative, digits) = split_sign(token);
            let digits = &digits[2..];
            let value = i64::from_str_radix(digits, 16).map_err(|_| Error::Format)?;
            return Ok(if negative { -value } else { value });
        }
        if let Ok(token) = self.consume_pattern(&OCTAL_INTEGER) {
            let (negative, digits) = split_sign(token);
            let value = i64::from_str_radix(&digits[1..], 8).map_err(|_| Error::Format)?;
            return Ok(if negative { -value } else { value });
        }
        let token = self.consume_pattern(&DECIMAL_INTEGER)?;
        token.parse::<i64>().map_err(|_| Error::Format)
    }

    fn parse_u64(&mut self) -> Result<u64, Error> {
        self.consume_separators();
        if self.input.starts_with('-') {
            return Err(Error::Format);
        }
        if let Ok(token) = self.consume_pattern(&HEX_INTEGER) {
            let digits = token.trim_start_matches('+');
            return u64::from_str_radix(&digits[2..], 16).map_err(|_| Error::Format);
        }
        if let Ok(token) = self.consume_pattern(&OCTAL_INTEGER) {
            let digits = token.trim_start_matches('+');
            return u64::from_str_radix(&digits[1..], 8).map_err(|_| Error::Format);
        }
        let token = self.consume_pattern(&DECIMAL_INTEGER)?;
        token.trim_start_matches('+').parse::<u64>().map_err(|_| Error::Format)
    }

    fn parse_i32(&mut self) -> Result<i32, Error> {
        self.parse_i64()?.try_into().map_err(|_| Error::Format)
    }

    fn parse_u32(&mut self) -> Result<u32, Error> {
        self.parse_u64()?.try_into().map_err(|_| Error::Format)
    }

    fn parse_f64(&mut self) -> Result<f64, Error> {
        self.consume_separators();
        let token = self.consume_pattern(&FLOAT)?;
        let token = token.trim_end_matches(['f', 'F']);
        token.parse::<f64>().map_err(|_| Error::Format)
    }

    fn parse_f32(&mut self) -> Result<f32, Error> {
        self.consume_separators();
        let token = self.consume_pattern(&FLOAT)?;
        let token = token.trim_end_matches(['f', 'F']);
        token.parse::<f32>().map_err(|_| Error::Format)
    }

    /// Timestamps are quoted RFC 3339 strings.
    fn parse_time(&mut self) -> Result<OffsetDateTime, Error> {
        let text = self.parse_string()?;
        OffsetDateTime::parse(&text, &Rfc3339).map_err(|_| Error::Format)
    }

    /// Durations are decimal seconds with an optional `s` suffix.
    fn parse_duration(&mut self) -> Result<Duration, Error> {
        let seconds = self.parse_f64()?;
        self.consume_prefix("s");
        Ok(Duration::seconds_f64(seconds))
    }

    fn parse_string(&mut self) -> Result<String, Error> {
        // Escapes carry raw bytes of the original string, so the result
        // is validated as UTF-8 only once they are all reassembled.
        String::from_utf8(self.parse_bytes()?).map_err(|_| Error::Format)
    }

    /// Quoted literal scan shared by string and bytes fields.
    fn parse_bytes(&mut self) -> Result<Vec<u8>, Error> {
        self.consume_separators();
        self.require_prefix("\"")?;
        let bytes = self.input.as_bytes();
        let mut result = Vec::new();
        let mut i = 0;
        loop {
            let start = i;
            while i < bytes.len() && bytes[i] != b'"' && bytes[i] != b'\\' {
                i += 1;
            }
            result.extend_from_slice(&bytes[start..i]);
            if i >= bytes.len() {
                return Err(Error::Syntax);
            }
            if bytes[i] == b'"' {
                self.input = &self.input[i + 1..];
                return Ok(result);
            }
            i += 1;
            if i >= bytes.len() {
                return Err(Error::Syntax);
            }
            let code = bytes[i];
            if code == b'u' {
                if i + 4 >= bytes.len() {
                    return Err(Error::Syntax);
                }
                if bytes[i + 1] != b'0' || bytes[i + 2] != b'0' {
                    // TODO: transcode multi-byte escapes once the UTF-16
                    // pairing rules are settled.
                    return Err(Error::UnimplementedEscape);
                }
                if !bytes[i + 3].is_ascii_hexdigit() || !bytes[i + 4].is_ascii_hexdigit() {
                    return Err(Error::Syntax);
                }
                let decoded = parse_hex_digit(bytes[i + 3]) * 16 + parse_hex_digit(bytes[i + 4]);
                result.push(decoded);
                i += 5;
            } else {
                match ESCAPED_CHARACTER_BY_CODE.get(&code) {
                    Some(decoded) => result.push(*decoded),
                    None => return Err(Error::BadEscape(char::from(code))),
                }
                i += 1;
            }
        }
    }

    fn parse_enum_name(&mut self) -> Result<&'a str, Error> {
        self.consume_separators();
        self.consume_identifier()
    }

    /// Parses `[v, v, ...]` or a single bare value, appending through
    /// `one`.
    fn parse_repeated(
        &mut self,
        mut one: impl FnMut(&mut Self) -> Result<(), Error>,
    ) -> Result<(), Error> {
        self.consume_separators();
        if !self.consume_prefix("[") {
            return one(self);
        }
        self.consume_separators();
        if self.consume_prefix("]") {
            return Ok(());
        }
        loop {
            one(self)?;
            self.consume_separators();
            if self.consume_prefix("]") {
                return Ok(());
            }
            self.require_prefix(",")?;
            self.consume_separators();
        }
    }

    fn parse_fields_inner(
        &mut self,
        descriptor: &dyn MessageReflection,
        message: &mut dyn Message,
        terminator: Option<&str>,
    ) -> Result<(), Error> {
        let mut parsed_fields: FlatSet<String> = FlatSet::new();
        loop {
            self.consume_separators();
            match terminator {
                Some(close) => {
                    if self.input.starts_with(close) {
                        return Ok(());
                    }
                    if self.input.is_empty() {
                        return Err(Error::Syntax);
                    }
                }
                None => {
                    if self.input.is_empty() {
                        return Ok(());
                    }
                }
            }
            let name = self.consume_identifier()?.to_owned();
            let (field_type, field_kind) = descriptor.field_type_and_kind(&name)?;
            let repeatable = matches!(field_kind, FieldKind::Repeated | FieldKind::Map);
            if !parsed_fields.insert(name.clone()) && !repeatable {
                return Err(Error::DuplicateField(name));
            }
            self.consume_separators();
            // The colon is waived only for lone brace constructs; repeated
            // fields are written `name: [...]` and keep it mandatory.
            if matches!(field_type, FieldType::SubMessage | FieldType::Map)
                && field_kind != FieldKind::Repeated
            {
                self.consume_prefix(":");
            } else {
                self.require_prefix(":")?;
            }
            tracing::trace!(field = %name, "parsing text-format field");
            let field = descriptor.field_value(message, &name)?;
            self.parse_field_value(field)?;
            self.consume_separators();
            if !self.consume_prefix(",") {
                self.consume_prefix(";");
            }
        }
    }

    fn parse_braced_message(
        &mut self,
        descriptor: &dyn MessageReflection,
        message: &mut dyn Message,
    ) -> Result<(), Error> {
        self.consume_separators();
        let close = if self.consume_prefix("{") {
            "}"
        } else if self.consume_prefix("<") {
            ">"
        } else {
            return Err(Error::Syntax);
        };
        self.parse_fields_inner(descriptor, message, Some(close))?;
        self.consume_separators();
        self.require_prefix(close)
    }

    fn parse_field_value(&mut self, field: FieldValue<'_>) -> Result<(), Error> {
        match field {
            FieldValue::RawInt32(slot) => *slot = self.parse_i32()?,
            FieldValue::OptionalInt32(slot) => *slot = Some(self.parse_i32()?),
            FieldValue::RepeatedInt32(slot) => self.parse_repeated(|p| {
                slot.push(p.parse_i32()?);
                Ok(())
            })?,
            FieldValue::RawUInt32(slot) => *slot = self.parse_u32()?,
            FieldValue::OptionalUInt32(slot) => *slot = Some(self.parse_u32()?),
            FieldValue::RepeatedUInt32(slot) => self.parse_repeated(|p| {
                slot.push(p.parse_u32()?);
                Ok(())
            })?,
            FieldValue::RawInt64(slot) => *slot = self.parse_i64()?,
            FieldValue::OptionalInt64(slot) => *slot = Some(self.parse_i64()?),
            FieldValue::RepeatedInt64(slot) => self.parse_repeated(|p| {
                slot.push(p.parse_i64()?);
                Ok(())
            })?,
            FieldValue::RawUInt64(slot) => *slot = self.parse_u64()?,
            FieldValue::OptionalUInt64(slot) => *slot = Some(self.parse_u64()?),
            FieldValue::RepeatedUInt64(slot) => self.parse_repeated(|p| {
                slot.push(p.parse_u64()?);
                Ok(())
            })?,
            FieldValue::RawBool(slot) => *slot = self.parse_bool()?,
            FieldValue::OptionalBool(slot) => *slot = Some(self.parse_bool()?),
            FieldValue::RepeatedBool(slot) => self.parse_repeated(|p| {
                slot.push(p.parse_bool()?);
                Ok(())
            })?,
            FieldValue::RawString(slot) => *slot = self.parse_string()?,
            FieldValue::OptionalString(slot) => *slot = Some(self.parse_string()?),
            FieldValue::RepeatedString(slot) => self.parse_repeated(|p| {
                slot.push(p.parse_string()?);
                Ok(())
            })?,
            FieldValue::RawBytes(slot) => *slot = self.parse_bytes()?,
            FieldValue::OptionalBytes(slot) => *slot = Some(self.parse_bytes()?),
            FieldValue::RepeatedBytes(slot) => self.parse_repeated(|p| {
                slot.push(p.parse_bytes()?);
                Ok(())
            })?,
            FieldValue::RawDouble(slot) => *slot = self.parse_f64()?,
            FieldValue::OptionalDouble(slot) => *slot = Some(self.parse_f64()?),
            FieldValue::RepeatedDouble(slot) => self.parse_repeated(|p| {
                slot.push(p.parse_f64()?);
                Ok(())
            })?,
            FieldValue::RawFloat(slot) => *slot = self.parse_f32()?,
            FieldValue::OptionalFloat(slot) => *slot = Some(self.parse_f32()?),
            FieldValue::RepeatedFloat(slot) => self.parse_repeated(|p| {
                slot.push(p.parse_f32()?);
                Ok(())
            })?,
            FieldValue::RawTime(slot) => *slot = self.parse_time()?,
            FieldValue::OptionalTime(slot) => *slot = Some(self.parse_time()?),
            FieldValue::RepeatedTime(slot) => self.parse_repeated(|p| {
                slot.push(p.parse_time()?);
                Ok(())
            })?,
            FieldValue::RawDuration(slot) => *slot = self.parse_duration()?,
            FieldValue::OptionalDuration(slot) => *slot = Some(self.parse_duration()?),
            FieldValue::RepeatedDuration(slot) => self.parse_repeated(|p| {
                slot.push(p.parse_duration()?);
                Ok(())
            })?,
            FieldValue::RawEnum(mut handle) => {
                let name = self.parse_enum_name()?;
                handle.set_by_name(name)?;
            }
            FieldValue::OptionalEnum(mut handle) => {
                let name = self.parse_enum_name()?;
                handle.set_by_name(name)?;
            }
            FieldValue::RepeatedEnum(mut handle) => self.parse_repeated(|p| {
                let name = p.parse_enum_name()?;
                handle.append(name)
            })?,
            FieldValue::RawSubMessage(handle) => {
                let descriptor = handle.descriptor();
                self.parse_braced_message(descriptor, handle.into_message_mut())?;
            }
            FieldValue::OptionalSubMessage(mut handle) => {
                let descriptor = handle.descriptor();
                self.parse_braced_message(descriptor, handle.reset())?;
            }
            FieldValue::RepeatedSubMessage(mut handle) => {
                let descriptor = handle.descriptor();
                self.parse_repeated(|p| p.parse_braced_message(descriptor, handle.append()))?;
            }
            FieldValue::Map(mut handle) => self.parse_map_entry(&mut handle)?,
            // The text grammar has no spelling for selecting a oneof arm.
            FieldValue::OneOf(_) => return Err(Error::Format),
        }
        Ok(())
    }

    fn parse_map_key(&mut self, key_type: FieldType) -> Result<MapKey, Error> {
        Ok(match key_type {
            FieldType::Int32 => MapKey::I32(self.parse_i32()?),
            FieldType::UInt32 => MapKey::U32(self.parse_u32()?),
            FieldType::Int64 => MapKey::I64(self.parse_i64()?),
            FieldType::UInt64 => MapKey::U64(self.parse_u64()?),
            FieldType::Bool => MapKey::Bool(self.parse_bool()?),
            FieldType::String => MapKey::String(self.parse_string()?),
            _ => return Err(Error::Format),
        })
    }

    /// One `{key: ..., value: ...}` entry; the key must come first.
    fn parse_map_entry(&mut self, map: &mut crate::Map<'_>) -> Result<(), Error> {
        self.consume_separators();
        let close = if self.consume_prefix("{") {
            "}"
        } else if self.consume_prefix("<") {
            ">"
        } else {
            return Err(Error::Syntax);
        };
        self.consume_separators();
        if self.consume_identifier()? != "key" {
            return Err(Error::Format);
        }
        self.consume_separators();
        self.require_prefix(":")?;
        let key = self.parse_map_key(map.key_type())?;
        self.consume_separators();
        if !self.consume_prefix(",") {
            self.consume_prefix(";");
        }
        self.consume_separators();
        if self.consume_identifier()? != "value" {
            return Err(Error::Format);
        }
        self.consume_separators();
        if map.value_type() == FieldType::SubMessage {
            self.consume_prefix(":");
        } else {
            self.require_prefix(":")?;
        }
        match map.insert_default(&key)? {
            MapValueMut::I32(slot) => *slot = self.parse_i32()?,
            MapValueMut::U32(slot) => *slot = self.parse_u32()?,
            MapValueMut::I64(slot) => *slot = self.parse_i64()?,
            MapValueMut::U64(slot) => *slot = self.parse_u64()?,
            MapValueMut::Bool(slot) => *slot = self.parse_bool()?,
            MapValueMut::String(slot) => *slot = self.parse_string()?,
            MapValueMut::Bytes(slot) => *slot = self.parse_bytes()?,
            MapValueMut::F64(slot) => *slot = self.parse_f64()?,
            MapValueMut::F32(slot) => *slot = self.parse_f32()?,
            MapValueMut::Time(slot) => *slot = self.parse_time()?,
            MapValueMut::Duration(slot) => *slot = self.parse_duration()?,
            MapValueMut::Enum(mut handle) => {
                let name = self.parse_enum_name()?;
                handle.set_by_name(name)?;
            }
            MapValueMut::Message(handle) => {
                let descriptor = handle.descriptor();
                self.parse_braced_message(descriptor, handle.into_message_mut())?;
            }
        }
        self.consume_separators();
        self.require_prefix(close)
    }
}

fn split_sign(token: &str) -> (bool, &str) {
    match token.as_bytes()[0] {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    }
}

fn parse_hex_digit(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'A'..=b'F' => digit - b'A' + 10,
        _ => digit - b'a' + 10,
    }
}
