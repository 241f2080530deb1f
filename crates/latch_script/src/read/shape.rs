//! Declared shapes of read destinations.
//!
//! A destination type opts into reading by implementing [`Decode`], which
//! hands the reader a typed [`Slot`] view of itself. Scalars get one slot
//! variant per width; containers and structs expose themselves through the
//! object-safe `*Slot` traits so the dispatcher never needs to know the
//! concrete element types.

use crate::read::{Path, ReadError, Reader};
use rquickjs::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc::{Receiver, Sender, SyncSender};

/// Reads the child under a map key into a fresh element.
pub type ReadKey<'a> = dyn FnMut(&str, &mut dyn DynDecode) -> Result<(), ReadError> + 'a;

/// Reads the child at a sequence index into a fresh element.
pub type ReadIndex<'a> = dyn FnMut(usize, &mut dyn DynDecode) -> Result<(), ReadError> + 'a;

/// Reads one declared field into its slot.
pub type ReadField<'a> = dyn FnMut(&Field, &mut dyn DynDecode) -> Result<(), ReadError> + 'a;

/// A type that can be read from a script value.
pub trait Decode: Sized {
    /// Typed view used by the dispatcher.
    fn slot(&mut self) -> Slot<'_>;

    /// Value written when the source is `null` or `undefined`.
    fn zero() -> Self;
}

/// Object-safe form of [`Decode`], used for struct fields and container
/// elements.
pub trait DynDecode {
    fn read_dyn<'js>(
        &mut self,
        reader: &Reader<'js>,
        value: &Value<'js>,
        path: &Path,
    ) -> Result<(), ReadError>;
}

impl<T: Decode> DynDecode for T {
    fn read_dyn<'js>(
        &mut self,
        reader: &Reader<'js>,
        value: &Value<'js>,
        path: &Path,
    ) -> Result<(), ReadError> {
        reader.read(self, value, path)
    }
}

/// Declared shape of a destination, without the destination itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Shape {
    Bool,
    Signed(u32),
    Unsigned(u32),
    Float(u32),
    Text,
    Map,
    Sequence,
    Aggregate,
    Custom,
    Unsupported(&'static str),
}

/// Mutable, shape-tagged view of a destination.
pub enum Slot<'a> {
    Bool(&'a mut bool),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Text(&'a mut String),
    Map(&'a mut dyn MapSlot),
    Sequence(&'a mut dyn SequenceSlot),
    Aggregate(&'a mut dyn AggregateSlot),
    Custom(&'a mut dyn CustomDecode),
    Unsupported(&'static str),
}

impl Slot<'_> {
    pub fn shape(&self) -> Shape {
        match self {
            Slot::Bool(_) => Shape::Bool,
            Slot::I8(_) => Shape::Signed(8),
            Slot::I16(_) => Shape::Signed(16),
            Slot::I32(_) => Shape::Signed(32),
            Slot::I64(_) => Shape::Signed(64),
            Slot::Isize(_) => Shape::Signed(isize::BITS),
            Slot::U8(_) => Shape::Unsigned(8),
            Slot::U16(_) => Shape::Unsigned(16),
            Slot::U32(_) => Shape::Unsigned(32),
            Slot::U64(_) => Shape::Unsigned(64),
            Slot::Usize(_) => Shape::Unsigned(usize::BITS),
            Slot::F32(_) => Shape::Float(32),
            Slot::F64(_) => Shape::Float(64),
            Slot::Text(_) => Shape::Text,
            Slot::Map(_) => Shape::Map,
            Slot::Sequence(_) => Shape::Sequence,
            Slot::Aggregate(_) => Shape::Aggregate,
            Slot::Custom(_) => Shape::Custom,
            Slot::Unsupported(kind) => Shape::Unsupported(kind),
        }
    }
}

/// String-keyed mapping destination.
pub trait MapSlot {
    /// Build a fresh mapping holding one element per key, reading each
    /// element through `read`, then replace `self` with it.
    fn fill(&mut self, keys: Vec<String>, read: &mut ReadKey<'_>) -> Result<(), ReadError>;
}

/// Ordered sequence destination.
pub trait SequenceSlot {
    /// Build a fresh sequence of exactly `len` elements, then replace `self`.
    fn fill(&mut self, len: usize, read: &mut ReadIndex<'_>) -> Result<(), ReadError>;
}

/// Struct destination with a declared field table.
pub trait AggregateSlot {
    fn fields(&self) -> &'static [Field];

    /// Visit every field slot in declared order.
    fn fill(&mut self, read: &mut ReadField<'_>) -> Result<(), ReadError>;
}

/// Type that decodes itself from the JSON form of the source value.
pub trait CustomDecode {
    fn decode_json(&mut self, json: &str) -> Result<(), crate::read::BoxError>;
}

/// Entry of a struct's field table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Field {
    /// Rust field name, used as the path label.
    pub name: &'static str,
    /// Property name on the source object, when it differs from `name`.
    pub rename: Option<&'static str>,
    /// Read the field from the parent object itself instead of a property.
    pub embedded: bool,
}

impl Field {
    pub const fn named(name: &'static str) -> Self {
        Self {
            name,
            rename: None,
            embedded: false,
        }
    }

    /// Name of the property looked up on the source object.
    pub fn lookup_name(&self) -> &'static str {
        self.rename.unwrap_or(self.name)
    }
}

/// Preallocation cap for sequences; a script can claim any `length`.
const MAX_PREALLOCATED: usize = 1024;

macro_rules! decode_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn slot(&mut self) -> Slot<'_> {
                    Slot::$variant(self)
                }

                fn zero() -> Self {
                    Default::default()
                }
            }
        )*
    };
}

decode_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    String => Text,
}

impl<T: Decode> MapSlot for HashMap<String, T> {
    fn fill(&mut self, keys: Vec<String>, read: &mut ReadKey<'_>) -> Result<(), ReadError> {
        let mut built = HashMap::with_capacity(keys.len());
        for key in keys {
            let mut element = T::zero();
            read(&key, &mut element)?;
            built.insert(key, element);
        }
        *self = built;
        Ok(())
    }
}

impl<T: Decode> Decode for HashMap<String, T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Map(self)
    }

    fn zero() -> Self {
        HashMap::new()
    }
}

impl<T: Decode> MapSlot for BTreeMap<String, T> {
    fn fill(&mut self, keys: Vec<String>, read: &mut ReadKey<'_>) -> Result<(), ReadError> {
        let mut built = BTreeMap::new();
        for key in keys {
            let mut element = T::zero();
            read(&key, &mut element)?;
            built.insert(key, element);
        }
        *self = built;
        Ok(())
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Map(self)
    }

    fn zero() -> Self {
        BTreeMap::new()
    }
}

impl<T: Decode> SequenceSlot for Vec<T> {
    fn fill(&mut self, len: usize, read: &mut ReadIndex<'_>) -> Result<(), ReadError> {
        let mut built = Vec::with_capacity(len.min(MAX_PREALLOCATED));
        for index in 0..len {
            let mut element = T::zero();
            read(index, &mut element)?;
            built.push(element);
        }
        *self = built;
        Ok(())
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Sequence(self)
    }

    fn zero() -> Self {
        Vec::new()
    }
}

// Destinations that can hold a zero value but never a script value.

impl<T> Decode for *const T {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Unsupported("raw pointer")
    }

    fn zero() -> Self {
        std::ptr::null()
    }
}

impl<T> Decode for *mut T {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Unsupported("raw pointer")
    }

    fn zero() -> Self {
        std::ptr::null_mut()
    }
}

impl<R> Decode for Option<fn() -> R> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Unsupported("function")
    }

    fn zero() -> Self {
        None
    }
}

impl Decode for Option<Box<dyn std::any::Any>> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Unsupported("interface")
    }

    fn zero() -> Self {
        None
    }
}

macro_rules! decode_channel {
    ($($channel:ident),*) => {
        $(
            impl<T> Decode for Option<$channel<T>> {
                fn slot(&mut self) -> Slot<'_> {
                    Slot::Unsupported("channel")
                }

                fn zero() -> Self {
                    None
                }
            }
        )*
    };
}

decode_channel!(Sender, SyncSender, Receiver);

/// Register a struct as a read destination.
///
/// Fields are read in the listed order. `field as "name"` reads the field
/// from a differently named property; `#[embedded] field` reads a nested
/// struct from the parent object itself. The struct must implement
/// `Default`, which provides its zero value.
///
/// # Example
/// ```ignore
/// #[derive(Default)]
/// struct Base { id: u32 }
///
/// #[derive(Default)]
/// struct Player { base: Base, display_name: String, hp: i32 }
///
/// define_aggregate!(Base { id });
/// define_aggregate!(Player {
///     #[embedded] base,
///     display_name as "displayName",
///     hp,
/// });
/// ```
#[macro_export]
macro_rules! define_aggregate {
    (@rename) => { None };
    (@rename $rename:literal) => { Some($rename) };
    (@embedded) => { false };
    (@embedded embedded) => { true };

    ($ty:ident { $( $(#[$flag:ident])? $field:ident $(as $rename:literal)? ),* $(,)? }) => {
        impl $crate::read::AggregateSlot for $ty {
            fn fields(&self) -> &'static [$crate::read::Field] {
                const FIELDS: &[$crate::read::Field] = &[
                    $(
                        $crate::read::Field {
                            name: stringify!($field),
                            rename: $crate::define_aggregate!(@rename $($rename)?),
                            embedded: $crate::define_aggregate!(@embedded $($flag)?),
                        },
                    )*
                ];
                FIELDS
            }

            #[allow(unused_mut, unused_variables)]
            fn fill(
                &mut self,
                read: &mut $crate::read::ReadField<'_>,
            ) -> ::std::result::Result<(), $crate::read::ReadError> {
                let mut fields = $crate::read::AggregateSlot::fields(self).iter();
                $(
                    if let Some(field) = fields.next() {
                        read(field, &mut self.$field)?;
                    }
                )*
                Ok(())
            }
        }

        impl $crate::read::Decode for $ty {
            fn slot(&mut self) -> $crate::read::Slot<'_> {
                $crate::read::Slot::Aggregate(self)
            }

            fn zero() -> Self {
                ::std::default::Default::default()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Inner {
        id: u32,
    }

    #[derive(Default)]
    struct Outer {
        inner: Inner,
        display_name: String,
    }

    crate::define_aggregate!(Inner { id });
    crate::define_aggregate!(Outer {
        #[embedded] inner,
        display_name as "displayName",
    });

    #[test]
    fn field_table_follows_declaration() {
        let outer = Outer::default();
        let fields = outer.fields();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "inner");
        assert!(fields[0].embedded);
        assert_eq!(fields[1].lookup_name(), "displayName");
        assert_eq!(fields[1].name, "display_name");
        assert!(!fields[1].embedded);
        assert_eq!(Inner::default().fields(), &[Field::named("id")]);
    }

    #[test]
    fn slots_report_their_shape() {
        let mut flag = true;
        let mut small = 0u8;
        let mut wide = 0i64;
        let mut ratio = 0f32;
        let mut items: Vec<String> = Vec::new();
        let mut table: HashMap<String, i32> = HashMap::new();
        let mut outer = Outer::default();
        let mut raw: *const u8 = std::ptr::null();
        let mut json = serde_json::Value::Null;

        assert_eq!(flag.slot().shape(), Shape::Bool);
        assert_eq!(small.slot().shape(), Shape::Unsigned(8));
        assert_eq!(wide.slot().shape(), Shape::Signed(64));
        assert_eq!(ratio.slot().shape(), Shape::Float(32));
        assert_eq!(items.slot().shape(), Shape::Sequence);
        assert_eq!(table.slot().shape(), Shape::Map);
        assert_eq!(outer.slot().shape(), Shape::Aggregate);
        assert_eq!(raw.slot().shape(), Shape::Unsupported("raw pointer"));
        assert_eq!(json.slot().shape(), Shape::Custom);
    }

    #[test]
    fn zero_values() {
        assert!(!bool::zero());
        assert_eq!(i16::zero(), 0);
        assert_eq!(String::zero(), "");
        assert!(Vec::<u8>::zero().is_empty());
        assert!(<*mut u8>::zero().is_null());
        assert!(Option::<Sender<u8>>::zero().is_none());
    }
}
