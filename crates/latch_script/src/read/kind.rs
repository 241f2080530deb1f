use rquickjs::Value;

/// Coarse classification of a JavaScript value, as seen by the reader.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Kind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Array,
    /// Any non-array object, functions included.
    Object,
    /// Symbols, big integers and engine internals.
    Other,
}

impl Kind {
    pub fn of(value: &Value<'_>) -> Self {
        if value.is_undefined() {
            Kind::Undefined
        } else if value.is_null() {
            Kind::Null
        } else if value.is_bool() {
            Kind::Boolean
        } else if value.is_number() {
            Kind::Number
        } else if value.is_string() {
            Kind::String
        } else if value.is_array() {
            Kind::Array
        } else if value.is_object() {
            Kind::Object
        } else {
            Kind::Other
        }
    }

    /// `null` and `undefined` both read as the destination's zero value.
    pub fn is_nullish(self) -> bool {
        matches!(self, Kind::Undefined | Kind::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rquickjs::{Context, Runtime};

    #[test]
    fn classifies_script_values() {
        let runtime = Runtime::new().unwrap();
        let context = Context::full(&runtime).unwrap();

        context.with(|ctx| {
            let kind_of = |source: &str| {
                let value: Value = ctx.eval(source).unwrap();
                Kind::of(&value)
            };

            assert_eq!(kind_of("undefined"), Kind::Undefined);
            assert_eq!(kind_of("null"), Kind::Null);
            assert_eq!(kind_of("true"), Kind::Boolean);
            assert_eq!(kind_of("1"), Kind::Number);
            assert_eq!(kind_of("1.5"), Kind::Number);
            assert_eq!(kind_of("'text'"), Kind::String);
            assert_eq!(kind_of("[1, 2]"), Kind::Array);
            assert_eq!(kind_of("({ a: 1 })"), Kind::Object);
            assert_eq!(kind_of("(function () {})"), Kind::Object);
            assert_eq!(kind_of("Symbol('s')"), Kind::Other);
            assert!(Kind::Null.is_nullish());
            assert!(!Kind::Number.is_nullish());
        });
    }
}
