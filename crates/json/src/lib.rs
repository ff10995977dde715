//! Fast JSON parsing and serialization.
//!
//! Parsing decodes into a value whose shape is known at compile time, so
//! fields are accessed directly instead of through a string-keyed lookup.
//! Use [`parse`] to decode and [`stringify`] to encode; both are driven by
//! the [`ParseJson`] / [`StringifyJson`] trait pair, predefined for:
//!
//!   * `bool`, all integer widths, `f32` / `f64`,
//!   * `String`,
//!   * `Option` (serializes `null` when empty),
//!   * pairs and tuples (always emitted on a single line),
//!   * `Vec` and fixed-size arrays (with an exact element count check),
//!   * the set and string-keyed map shapes of the workspace:
//!     `BTreeSet` / `HashSet` / `IndexSet` / [`flat::FlatSet`] /
//!     [`trie::TrieSet`], and `BTreeMap` / `HashMap` / `IndexMap` /
//!     [`flat::FlatMap`] / [`trie::TrieMap`],
//!   * values owned through `Box`, `Rc`, or `Arc`,
//!   * records declared with [`json_object!`].
//!
//! The root value does not have to be an object: `"true"` parses with the
//! type `bool`.
//!
//! ```
//! json::json_object! {
//!     pub struct Point {
//!         pub coord_x: f64,
//!         pub coord_y: f64,
//!     }
//! }
//!
//! let point: Point = json::parse(r#"{"coord_x":12.5,"coord_y":34.0}"#).unwrap();
//! assert_eq!(point.coord_x, 12.5);
//! assert_eq!(json::stringify(&point), r#"{"coord_x":12.5,"coord_y":34}"#);
//! ```
//!
//! Custom types participate by implementing the two traits; that is
//! exactly how the record macro and the reflective message types plug
//! themselves in.

mod impls;
mod object;
mod parse;
mod stringify;

pub use impls::{JsonMap, JsonSet};
pub use object::JsonObject;
pub use parse::Parser;
pub use stringify::Stringifier;

// Re-exported for the `json_object!` macro expansion.
pub use fingerprint::{Fingerprint, State as FingerprintState};

/// The set of keys seen while parsing an object.
pub type KeySet = flat::FlatSet<String>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineFeedType {
    #[default]
    Lf,
    Crlf,
    Cr,
}

/// Options for parsing.
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// If true, object keys that the target record does not define are
    /// ignored. If false, extra keys are a format error.
    pub allow_extra_fields: bool,

    /// When extra fields are allowed, determines how they are skipped.
    /// The standard algorithm scans their values normally, still
    /// verifying the JSON syntax; the fast algorithm skips to the end of
    /// the field by bracket structure alone, without validating the
    /// content.
    pub fast_skipping: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allow_extra_fields: true,
            fast_skipping: false,
        }
    }
}

/// Options for stringification.
#[derive(Clone, Copy, Debug)]
pub struct StringifyOptions {
    /// Whether the output is formatted with indentation and newlines.
    pub pretty: bool,

    /// The line feed sequence used when `pretty` is set.
    pub line_feed_type: LineFeedType,

    /// Spaces per indentation level.
    pub indent_width: usize,

    /// Append a final line feed, independently of `pretty`.
    pub trailing_newline: bool,

    /// When true, empty optional fields serialize as `null`; otherwise
    /// they are omitted entirely.
    pub output_empty_fields: bool,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            line_feed_type: LineFeedType::Lf,
            indent_width: 2,
            trailing_newline: false,
            output_empty_fields: false,
        }
    }
}

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCode {
    InvalidArgument,
    Unimplemented,
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    // TODO: include row and column numbers in the message.
    #[error("invalid JSON syntax")]
    Syntax,
    #[error("invalid format")]
    Format,
    #[error("multi-byte unicode escapes are not implemented")]
    UnimplementedEscape,
}

impl Error {
    pub fn code(&self) -> StatusCode {
        match self {
            Error::Syntax | Error::Format => StatusCode::InvalidArgument,
            Error::UnimplementedEscape => StatusCode::Unimplemented,
        }
    }
}

/// A type that can be decoded from JSON.
pub trait ParseJson: Sized {
    /// Whether a record field of this type may be missing from the input.
    const NULLABLE: bool = false;

    fn parse_json(parser: &mut Parser<'_>) -> Result<Self, Error>;
}

/// A type that can be encoded to JSON.
pub trait StringifyJson {
    fn stringify_json(&self, stringifier: &mut Stringifier);

    /// Whether the value is an empty optional, subject to the
    /// `output_empty_fields` policy.
    fn is_empty_value(&self) -> bool {
        false
    }
}

pub fn parse<T: ParseJson>(input: &str) -> Result<T, Error> {
    parse_with_options(input, ParseOptions::default())
}

pub fn parse_with_options<T: ParseJson>(input: &str, options: ParseOptions) -> Result<T, Error> {
    Parser::new(input, options).parse()
}

pub fn stringify<T: StringifyJson + ?Sized>(value: &T) -> String {
    stringify_with_options(value, StringifyOptions::default())
}

pub fn stringify_with_options<T: StringifyJson + ?Sized>(
    value: &T,
    options: StringifyOptions,
) -> String {
    let mut stringifier = Stringifier::new(options);
    value.stringify_json(&mut stringifier);
    stringifier.finish()
}
