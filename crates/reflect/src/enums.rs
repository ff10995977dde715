use flat::FixedFlatMap;

use crate::Error;

/// Object-safe facade over the enum descriptors, used wherever the
/// concrete value count must be erased.
pub trait EnumReflection: Sync {
    /// Value names in declaration order.
    fn value_names(&self) -> &[&'static str];

    fn value_for_name(&self, name: &str) -> Result<i64, Error>;

    fn name_for_value(&self, value: i64) -> Result<&'static str, Error>;
}

/// A generated enum type: conversions between the Rust enum and its
/// underlying wire value, plus access to its descriptor.
pub trait ReflectEnum: Copy + std::fmt::Debug + PartialEq + 'static {
    fn descriptor() -> &'static dyn EnumReflection;

    fn from_repr(value: i64) -> Option<Self>;

    fn repr(self) -> i64;
}

/// Describes an enum type: three fixed parallel tables mapping names to
/// underlying values and back. Instances are generated as process-wide
/// constants; the tables are sorted at compile time.
pub struct EnumDescriptor<const N: usize> {
    value_names: [&'static str; N],
    values_by_name: FixedFlatMap<&'static str, i64, N>,
    names_by_value: FixedFlatMap<i64, &'static str, N>,
}

impl<const N: usize> EnumDescriptor<N> {
    pub const fn new(values: [(&'static str, i64); N]) -> Self {
        let mut value_names = [""; N];
        let mut swapped = [(0i64, ""); N];
        let mut i = 0;
        while i < N {
            value_names[i] = values[i].0;
            swapped[i] = (values[i].1, values[i].0);
            i += 1;
        }
        Self {
            value_names,
            values_by_name: FixedFlatMap::<&'static str, i64, N>::from_entries(values),
            names_by_value: FixedFlatMap::<i64, &'static str, N>::from_entries(swapped),
        }
    }

    /// Combined lookup and store: translates `name` and writes the value
    /// through `field`.
    pub fn set_value_by_name<E: ReflectEnum>(&self, field: &mut E, name: &str) -> Result<(), Error> {
        let value = self.value_for_name(name)?;
        *field = E::from_repr(value).ok_or(Error::UnknownEnumValue(value))?;
        Ok(())
    }
}

impl<const N: usize> EnumReflection for EnumDescriptor<N> {
    fn value_names(&self) -> &[&'static str] {
        &self.value_names
    }

    fn value_for_name(&self, name: &str) -> Result<i64, Error> {
        self.values_by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::InvalidEnumName(name.to_owned()))
    }

    fn name_for_value(&self, value: i64) -> Result<&'static str, Error> {
        self.names_by_value
            .get(&value)
            .copied()
            .ok_or(Error::UnknownEnumValue(value))
    }
}

#[cfg(test)]
mod test {
    use super::{EnumDescriptor, EnumReflection, ReflectEnum};
    use crate::Error;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    enum Color {
        #[default]
        Red = 0,
        Green = 10,
        Blue = 20,
    }

    static COLOR_DESCRIPTOR: EnumDescriptor<3> =
        EnumDescriptor::new([("RED", 0), ("GREEN", 10), ("BLUE", 20)]);

    impl ReflectEnum for Color {
        fn descriptor() -> &'static dyn EnumReflection {
            &COLOR_DESCRIPTOR
        }

        fn from_repr(value: i64) -> Option<Self> {
            match value {
                0 => Some(Color::Red),
                10 => Some(Color::Green),
                20 => Some(Color::Blue),
                _ => None,
            }
        }

        fn repr(self) -> i64 {
            self as i64
        }
    }

    #[test]
    fn test_lookup_both_ways() {
        assert_eq!(COLOR_DESCRIPTOR.value_for_name("GREEN"), Ok(10));
        assert_eq!(COLOR_DESCRIPTOR.name_for_value(20), Ok("BLUE"));
        assert_eq!(
            COLOR_DESCRIPTOR.value_for_name("PINK"),
            Err(Error::InvalidEnumName("PINK".to_owned()))
        );
        assert_eq!(COLOR_DESCRIPTOR.name_for_value(5), Err(Error::UnknownEnumValue(5)));
    }

    #[test]
    fn test_value_names_keep_declaration_order() {
        assert_eq!(COLOR_DESCRIPTOR.value_names(), &["RED", "GREEN", "BLUE"]);
    }

    #[test]
    fn test_set_value_by_name() {
        let mut color = Color::Red;
        COLOR_DESCRIPTOR.set_value_by_name(&mut color, "BLUE").unwrap();
        assert_eq!(color, Color::Blue);
        let error = COLOR_DESCRIPTOR.set_value_by_name(&mut color, "MAUVE");
        assert_eq!(error, Err(Error::InvalidEnumName("MAUVE".to_owned())));
        assert_eq!(color, Color::Blue);
    }
}
