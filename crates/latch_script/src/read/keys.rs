use crate::error::EngineError;
use crate::read::{read_into, Kind, Path, ReadError};
use rquickjs::function::This;
use rquickjs::{Ctx, Function, Object, Value};

/// Own enumerable property names of `value`, in `Object.keys` order.
///
/// Calls the engine's global `Object.keys` and reads the returned array with
/// the regular reader, bounded by `max_depth`. A missing, `null` or
/// `undefined` value has no keys.
pub fn object_keys<'js>(
    ctx: &Ctx<'js>,
    value: Option<&Value<'js>>,
    max_depth: usize,
) -> Result<Vec<String>, ReadError> {
    let Some(value) = value.filter(|value| !Kind::of(value).is_nullish()) else {
        return Ok(Vec::new());
    };

    let engine = |err: rquickjs::Error| ReadError::new(Path::root(), EngineError::from_js(ctx, err));

    let globals = ctx.globals();
    let object: Object = globals.get("Object").map_err(engine)?;
    let keys_fn: Function = object.get("keys").map_err(engine)?;
    let keys: Value = keys_fn
        .call((This(globals), value.clone()))
        .map_err(engine)?;

    let mut names: Vec<String> = Vec::new();
    read_into(&mut names, &keys, ctx, max_depth)?;
    tracing::trace!(count = names.len(), "enumerated object keys");
    Ok(names)
}
