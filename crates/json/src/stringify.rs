use std::fmt::Display;

use flat::FixedFlatMap;

use crate::object::JsonObject;
use crate::{LineFeedType, StringifyJson, StringifyOptions};

static ESCAPE_CODE_BY_CHARACTER: FixedFlatMap<u8, &str, 7> = FixedFlatMap::<u8, &str, 7>::from_entries([
    (b'"', "\\\""),
    (b'\\', "\\\\"),
    (8, "\\b"),
    (12, "\\f"),
    (b'\n', "\\n"),
    (b'\r', "\\r"),
    (b'\t', "\\t"),
]);

#[rustfmt::skip]
static HIGH_HEX_CODES: [&str; 128] = [
    "80", "81", "82", "83", "84", "85", "86", "87", "88", "89", "8A", "8B", "8C", "8D", "8E", "8F",
    "90", "91", "92", "93", "94", "95", "96", "97", "98", "99", "9A", "9B", "9C", "9D", "9E", "9F",
    "A0", "A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8", "A9", "AA", "AB", "AC", "AD", "AE", "AF",
    "B0", "B1", "B2", "B3", "B4", "B5", "B6", "B7", "B8", "B9", "BA", "BB", "BC", "BD", "BE", "BF",
    "C0", "C1", "C2", "C3", "C4", "C5", "C6", "C7", "C8", "C9", "CA", "CB", "CC", "CD", "CE", "CF",
    "D0", "D1", "D2", "D3", "D4", "D5", "D6", "D7", "D8", "D9", "DA", "DB", "DC", "DD", "DE", "DF",
    "E0", "E1", "E2", "E3", "E4", "E5", "E6", "E7", "E8", "E9", "EA", "EB", "EC", "ED", "EE", "EF",
    "F0", "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "FA", "FB", "FC", "FD", "FE", "FF",
];

/// Escapes and double-quotes `input` onto `out`. Printable ASCII passes
/// through, the special characters get their two-character escape, and
/// any byte with the high bit set becomes `\u00XX`.
pub(crate) fn escape_and_quote(input: &str, out: &mut String) {
    out.push('"');
    for byte in input.bytes() {
        if byte >= 0x80 {
            // TODO: we should actually transcode UTF-8 to UTF-16 here.
            out.push_str("\\u00");
            out.push_str(HIGH_HEX_CODES[(byte - 0x80) as usize]);
        } else if let Some(escape) = ESCAPE_CODE_BY_CHARACTER.get(&byte) {
            out.push_str(escape);
        } else {
            out.push(char::from(byte));
        }
    }
    out.push('"');
}

/// Low-level JSON writer. Supports both compact and pretty output.
///
/// The syntax is described at <https://www.json.org/>.
pub struct Stringifier {
    options: StringifyOptions,
    line_feed: &'static str,
    // The current indentation level, with one prebuilt indentation string
    // per level so nested emission is amortized O(1).
    indentation_level: usize,
    indentation_cache: Vec<String>,
    output: String,
}

impl Stringifier {
    pub fn new(options: StringifyOptions) -> Self {
        let line_feed = match options.line_feed_type {
            LineFeedType::Lf => "\n",
            LineFeedType::Crlf => "\r\n",
            LineFeedType::Cr => "\r",
        };
        Self {
            options,
            line_feed,
            indentation_level: 0,
            indentation_cache: Vec::new(),
            output: String::new(),
        }
    }

    pub fn options(&self) -> &StringifyOptions {
        &self.options
    }

    pub fn finish(mut self) -> String {
        if self.options.trailing_newline {
            self.output.push_str(self.line_feed);
        }
        self.output
    }

    pub fn write_null(&mut self) {
        self.output.push_str("null");
    }

    pub fn write_boolean(&mut self, value: bool) {
        self.output.push_str(if value { "true" } else { "false" });
    }

    pub fn write_number<T: Display>(&mut self, value: T) {
        use std::fmt::Write;
        let _ = write!(self.output, "{value}");
    }

    pub fn write_string(&mut self, value: &str) {
        escape_and_quote(value, &mut self.output);
    }

    pub fn write_object<O: JsonObject>(&mut self, value: &O) {
        if !value.has_visible_fields(self.options.output_empty_fields) {
            self.output.push_str("{}");
            return;
        }
        self.output.push('{');
        if self.options.pretty {
            self.indent();
            value.write_fields(self, true);
            self.output.push_str(self.line_feed);
            self.dedent();
            self.write_indentation();
        } else {
            value.write_fields(self, true);
        }
        self.output.push('}');
    }

    /// Starts a record field: separator, line layout, quoted name, colon.
    pub fn begin_field(&mut self, first: bool, name: &str) {
        if !first {
            self.output.push(',');
        }
        if self.options.pretty {
            self.output.push_str(self.line_feed);
            self.write_indentation();
        }
        self.write_string(name);
        self.output.push(':');
        if self.options.pretty {
            self.output.push(' ');
        }
    }

    pub fn write_dictionary<'a, K, V>(&mut self, entries: impl Iterator<Item = (K, &'a V)>)
    where
        K: AsRef<str>,
        V: StringifyJson + 'a,
    {
        if self.options.pretty {
            self.write_dictionary_pretty(entries);
        } else {
            self.write_dictionary_compressed(entries);
        }
    }

    fn write_dictionary_pretty<'a, K, V>(&mut self, entries: impl Iterator<Item = (K, &'a V)>)
    where
        K: AsRef<str>,
        V: StringifyJson + 'a,
    {
        let mut first = true;
        for (key, value) in entries {
            if first {
                self.output.push('{');
                self.indent();
                first = false;
            } else {
                self.output.push(',');
            }
            self.output.push_str(self.line_feed);
            self.write_indentation();
            self.write_string(key.as_ref());
            self.output.push_str(": ");
            value.stringify_json(self);
        }
        if first {
            self.output.push_str("{}");
            return;
        }
        self.output.push_str(self.line_feed);
        self.dedent();
        self.write_indentation();
        self.output.push('}');
    }

    fn write_dictionary_compressed<'a, K, V>(&mut self, entries: impl Iterator<Item = (K, &'a V)>)
    where
        K: AsRef<str>,
        V: StringifyJson + 'a,
    {
        self.output.push('{');
        let mut first = true;
        for (key, value) in entries {
            if first {
                first = false;
            } else {
                self.output.push(',');
            }
            self.write_string(key.as_ref());
            self.output.push(':');
            value.stringify_json(self);
        }
        self.output.push('}');
    }

    /// Writes a sequence one element per line in pretty mode.
    pub fn write_sequence<T: StringifyJson>(&mut self, elements: impl Iterator<Item = T>) {
        if self.options.pretty {
            self.write_sequence_pretty(elements);
        } else {
            self.write_sequence_compressed(elements);
        }
    }

    fn write_sequence_pretty<T: StringifyJson>(&mut self, elements: impl Iterator<Item = T>) {
        let mut first = true;
        for element in elements {
            if first {
                self.output.push('[');
                self.output.push_str(self.line_feed);
                self.indent();
                first = false;
            } else {
                self.output.push(',');
                self.output.push_str(self.line_feed);
            }
            self.write_indentation();
            element.stringify_json(self);
        }
        if first {
            self.output.push_str("[]");
            return;
        }
        self.output.push_str(self.line_feed);
        self.dedent();
        self.write_indentation();
        self.output.push(']');
    }

    fn write_sequence_compressed<T: StringifyJson>(&mut self, elements: impl Iterator<Item = T>) {
        self.output.push('[');
        let mut first = true;
        for element in elements {
            if first {
                first = false;
            } else {
                self.output.push(',');
            }
            element.stringify_json(self);
        }
        self.output.push(']');
    }

    /// Pairs and tuples always emit in single-line form, even in pretty
    /// mode.
    pub(crate) fn open_inline_list(&mut self) {
        self.output.push('[');
    }

    pub(crate) fn inline_separator(&mut self) {
        self.output.push(',');
        if self.options.pretty {
            self.output.push(' ');
        }
    }

    pub(crate) fn close_inline_list(&mut self) {
        self.output.push(']');
    }

    fn indent(&mut self) {
        self.indentation_level += 1;
        if self.indentation_level > self.indentation_cache.len() {
            self.indentation_cache
                .push(" ".repeat(self.indentation_level * self.options.indent_width));
        }
    }

    fn dedent(&mut self) {
        self.indentation_level -= 1;
    }

    fn write_indentation(&mut self) {
        if self.indentation_level > 0 {
            let indentation = &self.indentation_cache[self.indentation_level - 1];
            self.output.push_str(indentation);
        }
    }
}
