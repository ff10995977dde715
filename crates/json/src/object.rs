use crate::{Error, KeySet, Parser, Stringifier};

/// A record with a compile-time-known set of named, typed fields, as
/// declared by [`json_object!`](crate::json_object). Field access is plain
/// struct field access; no name lookup happens outside of parsing.
pub trait JsonObject: Default {
    /// Parses the value for `key` into the matching field. Returns false
    /// when the record has no such field (the caller then applies the
    /// extra-field policy).
    fn read_field(&mut self, parser: &mut Parser<'_>, key: &str) -> Result<bool, Error>;

    /// Whether every non-optional field appears in `keys`.
    fn check_presence(keys: &KeySet) -> bool;

    /// Writes the record fields, honoring the empty-field policy; `first`
    /// is true when no field of the enclosing object has been written
    /// yet. Returns the final state of the `first` flag.
    fn write_fields(&self, stringifier: &mut Stringifier, first: bool) -> bool;

    /// Whether any field would be written under the given policy.
    fn has_visible_fields(&self, output_empty_fields: bool) -> bool;
}

/// Declares a JSON record: a plain struct plus the [`JsonObject`],
/// [`ParseJson`](crate::ParseJson), [`StringifyJson`](crate::StringifyJson)
/// and [`Fingerprint`](crate::Fingerprint) implementations.
///
/// Fields of type `Option<...>` are optional: they may be missing from
/// the input, and empty ones are omitted on output unless
/// `output_empty_fields` is set. All other fields are required.
///
/// ```
/// json::json_object! {
///     pub struct Server {
///         pub host: String,
///         pub port: u16,
///         pub alias: Option<String>,
///     }
/// }
///
/// let server: Server = json::parse(r#"{"host":"lo","port":8080}"#).unwrap();
/// assert_eq!(server.port, 8080);
/// assert_eq!(server.alias, None);
/// ```
#[macro_export]
macro_rules! json_object {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$field_meta:meta])* $field_vis:vis $field:ident : $field_type:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        $vis struct $name {
            $( $(#[$field_meta])* $field_vis $field : $field_type, )+
        }

        impl $crate::JsonObject for $name {
            fn read_field(
                &mut self,
                parser: &mut $crate::Parser<'_>,
                key: &str,
            ) -> Result<bool, $crate::Error> {
                match key {
                    $(
                        stringify!($field) => {
                            self.$field =
                                <$field_type as $crate::ParseJson>::parse_json(parser)?;
                            Ok(true)
                        }
                    )+
                    _ => Ok(false),
                }
            }

            fn check_presence(keys: &$crate::KeySet) -> bool {
                $(
                    (<$field_type as $crate::ParseJson>::NULLABLE
                        || keys.contains(stringify!($field))) &&
                )+ true
            }

            fn write_fields(
                &self,
                stringifier: &mut $crate::Stringifier,
                mut first: bool,
            ) -> bool {
                $(
                    if stringifier.options().output_empty_fields
                        || !$crate::StringifyJson::is_empty_value(&self.$field)
                    {
                        stringifier.begin_field(first, stringify!($field));
                        $crate::StringifyJson::stringify_json(&self.$field, stringifier);
                        first = false;
                    }
                )+
                first
            }

            fn has_visible_fields(&self, output_empty_fields: bool) -> bool {
                $(
                    if output_empty_fields
                        || !$crate::StringifyJson::is_empty_value(&self.$field)
                    {
                        return true;
                    }
                )+
                false
            }
        }

        impl $crate::ParseJson for $name {
            fn parse_json(parser: &mut $crate::Parser<'_>) -> Result<Self, $crate::Error> {
                parser.read_object::<$name>()
            }
        }

        impl $crate::StringifyJson for $name {
            fn stringify_json(&self, stringifier: &mut $crate::Stringifier) {
                stringifier.write_object(self);
            }
        }

        impl $crate::Fingerprint for $name {
            fn combine(&self, state: &mut $crate::FingerprintState) {
                $( $crate::Fingerprint::combine(&self.$field, state); )+
            }
        }
    };
}
