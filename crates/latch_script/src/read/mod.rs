//! Reading script values into typed Rust destinations
//!
//! [`read_into`] walks a JavaScript value top-down, guided only by the
//! destination's declared [`Shape`]:
//!
//! - `null`/`undefined` write the destination's zero value
//! - scalars use the engine's own `ToBoolean`/`ToNumber`/`ToString` coercions
//! - maps enumerate keys with `Object.keys`, structs use their field table,
//!   sequences read `length` and then each index
//! - [`CustomDecode`] types receive the value's `JSON.stringify` text
//!
//! The first failure aborts the read and carries the [`Path`] of the value
//! that caused it. Containers are built aside and only assigned once every
//! child has been read.

mod custom;
mod error;
mod keys;
mod kind;
mod path;
mod shape;

pub use custom::{Json, RawJson};
pub use error::{BoxError, ReadError, ReadErrorKind};
pub use keys::object_keys;
pub use kind::Kind;
pub use path::{Path, Segment};
pub use shape::{
    AggregateSlot, CustomDecode, Decode, DynDecode, Field, MapSlot, ReadField, ReadIndex,
    ReadKey, SequenceSlot, Shape, Slot,
};

use crate::error::EngineError;
use rquickjs::convert::Coerced;
use rquickjs::{Ctx, FromJs, Function, Object, Value};
use tracing::{debug, trace};

/// Read `value` into `dst`, failing once a value sits deeper than `max_depth`
/// labels below the root.
pub fn read_into<'js, T: Decode>(
    dst: &mut T,
    value: &Value<'js>,
    ctx: &Ctx<'js>,
    max_depth: usize,
) -> Result<(), ReadError> {
    Reader::new(ctx.clone(), max_depth).read_root(dst, value)
}

/// Recursive driver behind [`read_into`].
pub struct Reader<'js> {
    ctx: Ctx<'js>,
    max_depth: usize,
    max_length: Option<usize>,
}

impl<'js> Reader<'js> {
    pub fn new(ctx: Ctx<'js>, max_depth: usize) -> Self {
        Self {
            ctx,
            max_depth,
            max_length: None,
        }
    }

    /// Reject sequences whose `length` is above `max_length`.
    ///
    /// Without a limit a script can claim any `length`, and every index up to
    /// it is read.
    pub fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }

    /// Read `value` into `dst` as the root of a new read.
    pub fn read_root<T: Decode>(&self, dst: &mut T, value: &Value<'js>) -> Result<(), ReadError> {
        self.read(dst, value, &Path::root())
            .inspect_err(|err| debug!(%err, "script value read failed"))
    }

    /// Read `value`, located at `path`, into `dst`.
    pub fn read<T: Decode>(
        &self,
        dst: &mut T,
        value: &Value<'js>,
        path: &Path,
    ) -> Result<(), ReadError> {
        if path.len() > self.max_depth {
            return Err(ReadError::new(
                path.clone(),
                ReadErrorKind::DepthExceeded {
                    max_depth: self.max_depth,
                },
            ));
        }

        let kind = Kind::of(value);
        if kind.is_nullish() {
            *dst = T::zero();
            return Ok(());
        }

        let slot = dst.slot();
        trace!(%path, ?kind, shape = ?slot.shape(), "reading script value");
        self.dispatch(slot, value, kind, path)
    }

    fn dispatch(
        &self,
        slot: Slot<'_>,
        value: &Value<'js>,
        kind: Kind,
        path: &Path,
    ) -> Result<(), ReadError> {
        // Integers narrow from the engine's 64-bit conversion and wrap silently.
        match slot {
            Slot::Bool(dst) => *dst = self.coerce::<bool>(value, path)?,
            Slot::I8(dst) => *dst = self.coerce::<i64>(value, path)? as i8,
            Slot::I16(dst) => *dst = self.coerce::<i64>(value, path)? as i16,
            Slot::I32(dst) => *dst = self.coerce::<i64>(value, path)? as i32,
            Slot::I64(dst) => *dst = self.coerce::<i64>(value, path)?,
            Slot::Isize(dst) => *dst = self.coerce::<i64>(value, path)? as isize,
            Slot::U8(dst) => *dst = self.coerce::<i64>(value, path)? as u8,
            Slot::U16(dst) => *dst = self.coerce::<i64>(value, path)? as u16,
            Slot::U32(dst) => *dst = self.coerce::<i64>(value, path)? as u32,
            Slot::U64(dst) => *dst = self.coerce::<i64>(value, path)? as u64,
            Slot::Usize(dst) => *dst = self.coerce::<i64>(value, path)? as usize,
            Slot::F32(dst) => *dst = self.coerce::<f64>(value, path)? as f32,
            Slot::F64(dst) => *dst = self.coerce::<f64>(value, path)?,
            Slot::Text(dst) => *dst = self.coerce::<String>(value, path)?,
            Slot::Custom(dst) => self.read_custom(dst, value, path)?,
            Slot::Map(dst) => self.read_map(dst, value, kind, path)?,
            Slot::Sequence(dst) => self.read_sequence(dst, value, kind, path)?,
            Slot::Aggregate(dst) => self.read_aggregate(dst, value, kind, path)?,
            Slot::Unsupported(what) => {
                return Err(ReadError::new(
                    path.clone(),
                    ReadErrorKind::UnsupportedShape { kind: what },
                ))
            }
        }
        Ok(())
    }

    fn read_custom(
        &self,
        dst: &mut dyn CustomDecode,
        value: &Value<'js>,
        path: &Path,
    ) -> Result<(), ReadError> {
        let json = self.stringify(value, path)?;
        dst.decode_json(&json)
            .map_err(|err| ReadError::new(path.clone(), ReadErrorKind::CustomDecodeFailed(err)))
    }

    fn read_map(
        &self,
        dst: &mut dyn MapSlot,
        value: &Value<'js>,
        kind: Kind,
        path: &Path,
    ) -> Result<(), ReadError> {
        if kind != Kind::Object {
            return Err(ReadError::new(path.clone(), ReadErrorKind::NotAnObject));
        }

        let keys = object_keys(&self.ctx, Some(value), self.max_depth)?;
        dst.fill(keys, &mut |key: &str, element: &mut dyn DynDecode| {
            let child_path = path.key(key);
            let child = self.property(value, key, &child_path)?;
            element.read_dyn(self, &child, &child_path)
        })
    }

    fn read_sequence(
        &self,
        dst: &mut dyn SequenceSlot,
        value: &Value<'js>,
        kind: Kind,
        path: &Path,
    ) -> Result<(), ReadError> {
        if !matches!(kind, Kind::Array | Kind::Object) {
            return Err(ReadError::new(
                path.clone(),
                ReadErrorKind::NotAnArrayOrObject,
            ));
        }

        let length = self.property(value, "length", path)?;
        let len = self.coerce::<i64>(&length, path)?;
        let len = usize::try_from(len).unwrap_or(0);
        if let Some(max_length) = self.max_length.filter(|max| len > *max) {
            return Err(ReadError::new(
                path.clone(),
                ReadErrorKind::LengthExceeded {
                    length: len,
                    max_length,
                },
            ));
        }

        dst.fill(len, &mut |index: usize, element: &mut dyn DynDecode| {
            let child_path = path.index(index);
            let child = self.element(value, index, &child_path)?;
            element.read_dyn(self, &child, &child_path)
        })
    }

    fn read_aggregate(
        &self,
        dst: &mut dyn AggregateSlot,
        value: &Value<'js>,
        kind: Kind,
        path: &Path,
    ) -> Result<(), ReadError> {
        if kind != Kind::Object {
            return Err(ReadError::new(path.clone(), ReadErrorKind::NotAnObject));
        }

        dst.fill(&mut |field: &Field, slot: &mut dyn DynDecode| {
            if field.embedded {
                return slot.read_dyn(self, value, path);
            }
            let child_path = path.key(field.name);
            let child = self.property(value, field.lookup_name(), &child_path)?;
            slot.read_dyn(self, &child, &child_path)
        })
    }

    fn coerce<T>(&self, value: &Value<'js>, path: &Path) -> Result<T, ReadError>
    where
        Coerced<T>: FromJs<'js>,
    {
        value
            .get::<Coerced<T>>()
            .map(|coerced| coerced.0)
            .map_err(|err| self.engine_error(err, path))
    }

    fn object<'v>(
        &self,
        value: &'v Value<'js>,
        path: &Path,
    ) -> Result<&'v Object<'js>, ReadError> {
        value
            .as_object()
            .ok_or_else(|| ReadError::new(path.clone(), ReadErrorKind::NotAnObject))
    }

    fn property(
        &self,
        value: &Value<'js>,
        name: &str,
        path: &Path,
    ) -> Result<Value<'js>, ReadError> {
        self.object(value, path)?
            .get::<_, Value<'js>>(name)
            .map_err(|err| self.engine_error(err, path))
    }

    fn element(
        &self,
        value: &Value<'js>,
        index: usize,
        path: &Path,
    ) -> Result<Value<'js>, ReadError> {
        let object = self.object(value, path)?;
        let element = match u32::try_from(index) {
            Ok(index) => object.get::<_, Value<'js>>(index),
            Err(_) => object.get::<_, Value<'js>>(index.to_string()),
        };
        element.map_err(|err| self.engine_error(err, path))
    }

    fn stringify(&self, value: &Value<'js>, path: &Path) -> Result<String, ReadError> {
        let json: Object = self
            .ctx
            .globals()
            .get("JSON")
            .map_err(|err| self.engine_error(err, path))?;
        let stringify: Function = json
            .get("stringify")
            .map_err(|err| self.engine_error(err, path))?;
        let text: Option<String> = stringify
            .call((value.clone(),))
            .map_err(|err| self.engine_error(err, path))?;
        // Functions and symbols have no JSON form.
        Ok(text.unwrap_or_else(|| "null".to_string()))
    }

    fn engine_error(&self, err: rquickjs::Error, path: &Path) -> ReadError {
        ReadError::new(path.clone(), EngineError::from_js(&self.ctx, err))
    }
}
