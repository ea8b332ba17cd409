//! Bindings of the built-in scalar types and of the `Vec`, `Option` and `Box`
//! adapters.
//!
//! Integers accept an optional sign, `0x`/`0o`/`0b` prefixes and `_` digit
//! separators. Booleans accept the YAML 1.1 spellings. Floats accept the YAML
//! 1.2 special values `.nan`, `.inf` and `-.inf`.

use std::any::type_name;

use crate::binding::{Binding, Yamlify};
use crate::error::Error;
use crate::node::Node;
use crate::registry::resolve;

/// Parse a YAML 1.1 boolean.
///
/// True: `y`, `yes`, `true`, `on`. False: `n`, `no`, `false`, `off`.
/// Case-insensitive.
pub(crate) fn parse_bool(text: &str) -> Result<bool, String> {
    let t = text.trim();
    if ["true", "yes", "y", "on"].iter().any(|s| t.eq_ignore_ascii_case(s)) {
        Ok(true)
    } else if ["false", "no", "n", "off"].iter().any(|s| t.eq_ignore_ascii_case(s)) {
        Ok(false)
    } else {
        Err(format!("`{text}` is not a boolean"))
    }
}

/// Accumulate `digits` in `radix`, skipping `_`. `None` on overflow or a bad digit.
fn parse_magnitude(digits: &str, radix: u32) -> Option<u128> {
    let mut val: u128 = 0;
    let mut saw = false;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let d = c.to_digit(radix)?;
        val = val.checked_mul(u128::from(radix))?.checked_add(u128::from(d))?;
        saw = true;
    }
    saw.then_some(val)
}

/// Split off a radix prefix.
fn radix_of(rest: &str) -> (u32, &str) {
    let prefixes = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)];
    prefixes
        .iter()
        .find_map(|&(prefix, radix)| rest.strip_prefix(prefix).map(|digits| (radix, digits)))
        .unwrap_or((10, rest))
}

fn parse_signed<T: TryFrom<i128>>(text: &str) -> Result<T, String> {
    let invalid = || format!("`{text}` is not a valid {}", type_name::<T>());
    let t = text.trim();
    let (neg, rest) = match (t.strip_prefix('-'), t.strip_prefix('+')) {
        (Some(rest), _) => (true, rest),
        (None, Some(rest)) => (false, rest),
        (None, None) => (false, t),
    };
    let (radix, digits) = radix_of(rest);
    let mag = parse_magnitude(digits, radix).ok_or_else(invalid)?;
    // i128::MIN has no positive counterpart.
    let value = if neg {
        0i128.checked_sub_unsigned(mag).ok_or_else(invalid)?
    } else {
        i128::try_from(mag).map_err(|_| invalid())?
    };
    T::try_from(value).map_err(|_| invalid())
}

fn parse_unsigned<T: TryFrom<u128>>(text: &str) -> Result<T, String> {
    let invalid = || format!("`{text}` is not a valid {}", type_name::<T>());
    let t = text.trim();
    if t.starts_with('-') {
        return Err(invalid());
    }
    let (radix, digits) = radix_of(t.strip_prefix('+').unwrap_or(t));
    let mag = parse_magnitude(digits, radix).ok_or_else(invalid)?;
    T::try_from(mag).map_err(|_| invalid())
}

pub(crate) fn parse_f64(text: &str) -> Result<f64, String> {
    let t = text.trim();
    match t.to_ascii_lowercase().as_str() {
        ".nan" | "+.nan" | "-.nan" => Ok(f64::NAN),
        ".inf" | "+.inf" => Ok(f64::INFINITY),
        "-.inf" => Ok(f64::NEG_INFINITY),
        _ => t
            .parse::<f64>()
            .map_err(|_| format!("`{text}` is not a floating point value")),
    }
}

fn parse_char(text: &str) -> Result<char, String> {
    text.chars()
        .next()
        .ok_or_else(|| "an empty value is not a character".to_owned())
}

macro_rules! signed {
    ($($ty:ty),*) => {$(
        impl Yamlify for $ty {
            fn binding() -> Result<Binding<Self>, Error> {
                Ok(Binding::scalar(parse_signed::<$ty>))
            }
        }
    )*};
}

macro_rules! unsigned {
    ($($ty:ty),*) => {$(
        impl Yamlify for $ty {
            fn binding() -> Result<Binding<Self>, Error> {
                Ok(Binding::scalar(parse_unsigned::<$ty>))
            }
        }
    )*};
}

signed!(i8, i16, i32, i64, i128, isize);
unsigned!(u8, u16, u32, u64, u128, usize);

impl Yamlify for bool {
    fn binding() -> Result<Binding<Self>, Error> {
        Ok(Binding::scalar(parse_bool))
    }
}

impl Yamlify for f64 {
    fn binding() -> Result<Binding<Self>, Error> {
        Ok(Binding::scalar(parse_f64))
    }
}

impl Yamlify for f32 {
    fn binding() -> Result<Binding<Self>, Error> {
        Ok(Binding::scalar(|text: &str| parse_f64(text).map(|v| v as f32)))
    }
}

impl Yamlify for char {
    fn binding() -> Result<Binding<Self>, Error> {
        Ok(Binding::scalar(parse_char))
    }
}

impl Yamlify for String {
    fn binding() -> Result<Binding<Self>, Error> {
        Ok(Binding::scalar(|text: &str| Ok::<_, String>(text.to_owned())))
    }
}

/// Items of a nested block, in source order. Keys are not inspected, so both
/// `- item` lines and named entries are accepted.
impl<U: Yamlify> Yamlify for Vec<U> {
    fn binding() -> Result<Binding<Self>, Error> {
        Ok(Binding::adapter(false, |node: &Node| match node {
            Node::Mapping(mapping) => {
                let element = resolve::<U>()?;
                mapping
                    .values()
                    .map(|item| element.coerce(item))
                    .collect::<Result<Vec<U>, Error>>()
            }
            Node::Scalar(scalar) => Err(Error::conversion(
                &scalar.value,
                type_name::<Vec<U>>(),
                "expected a nested block of items, found a scalar",
                scalar.location,
            )),
        }))
    }
}

/// Always `Some`: absence is expressed with a field default.
impl<U: Yamlify> Yamlify for Option<U> {
    fn binding() -> Result<Binding<Self>, Error> {
        let scalar = resolve::<U>()?.is_scalar();
        Ok(Binding::adapter(scalar, |node: &Node| {
            resolve::<U>()?.coerce(node).map(Some)
        }))
    }
}

impl<U: Yamlify> Yamlify for Box<U> {
    fn binding() -> Result<Binding<Self>, Error> {
        let scalar = resolve::<U>()?.is_scalar();
        Ok(Binding::adapter(scalar, |node: &Node| {
            resolve::<U>()?.coerce(node).map(Box::new)
        }))
    }
}
