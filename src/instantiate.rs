//! Instantiator: validates the keys of a block against a record's parameters,
//! coerces the supplied values, fills defaults and calls the constructor.

use std::any::{Any, type_name};
use std::ops::RangeInclusive;

use ahash::AHashMap;
use smallvec::{SmallVec, smallvec};

use crate::binding::{Field, FieldCoercion, TextFn};
use crate::error::Error;
use crate::node::{Mapping, Node};

/// Type-erased argument value.
pub(crate) type Value = Box<dyn Any>;

type ErasedFn = Box<dyn Fn(&Node) -> Result<Value, Error> + Send + Sync>;
type DefaultFn = Box<dyn Fn() -> Value + Send + Sync>;

/// Most records have few parameters; keep their arguments on the stack.
type Slots<T> = SmallVec<[T; 8]>;

pub(crate) enum Coercion {
    /// Custom converter applied to scalar text. Always wins over `Derived`.
    Converter {
        target: &'static str,
        convert: TextFn<Value>,
    },
    /// Coercion derived from the parameter's static type.
    Derived(ErasedFn),
}

/// Type-erased [`Field`].
pub(crate) struct Param {
    pub(crate) name: &'static str,
    pub(crate) alias: Option<&'static str>,
    coercion: Coercion,
    default: Option<DefaultFn>,
}

impl<V: 'static> From<Field<V>> for Param {
    fn from(field: Field<V>) -> Self {
        let coercion = match field.coercion {
            FieldCoercion::Converter(convert) => Coercion::Converter {
                target: type_name::<V>(),
                convert: Box::new(move |text: &str| convert(text).map(|value| Box::new(value) as Value)),
            },
            FieldCoercion::Derived(derive) => Coercion::Derived(Box::new(move |node: &Node| {
                derive(node).map(|value| Box::new(value) as Value)
            })),
        };
        let default = field.default.map(|default| {
            Box::new(move || Box::new(default()) as Value) as DefaultFn
        });
        Self {
            name: field.name,
            alias: field.alias,
            coercion,
            default,
        }
    }
}

impl Param {
    fn coerce(&self, node: &Node) -> Result<Value, Error> {
        match (&self.coercion, node) {
            (Coercion::Converter { target, convert }, Node::Scalar(scalar)) => convert(&scalar.value)
                .map_err(|reason| Error::conversion(&scalar.value, *target, reason, scalar.location)),
            (Coercion::Converter { target, .. }, Node::Mapping(mapping)) => Err(Error::conversion(
                "<block>",
                *target,
                format!("the converter of `{}` only accepts scalar values", self.name),
                mapping.location(),
            )),
            (Coercion::Derived(coerce), node) => coerce(node),
        }
    }
}

/// Where the value of one parameter comes from.
enum Slot<'a> {
    Supplied(&'a Node),
    Default(&'a DefaultFn),
}

pub(crate) type Constructor<T> = Box<dyn Fn(&mut Arguments) -> Result<T, Error> + Send + Sync>;

pub(crate) struct Record<T> {
    name: &'static str,
    params: Vec<Param>,
    /// Every accepted source key (names and aliases) to its parameter index.
    keys: AHashMap<&'static str, usize>,
    mandatory: usize,
    construct: Constructor<T>,
}

impl<T> Record<T> {
    pub(crate) fn new(
        name: &'static str,
        params: Vec<Param>,
        keys: AHashMap<&'static str, usize>,
        construct: Constructor<T>,
    ) -> Self {
        let mandatory = params.iter().filter(|param| param.default.is_none()).count();
        Self {
            name,
            params,
            keys,
            mandatory,
            construct,
        }
    }

    pub(crate) fn arity(&self) -> RangeInclusive<usize> {
        self.mandatory..=self.params.len()
    }

    pub(crate) fn accepts(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Build a `T` from the entries of `mapping`.
    ///
    /// Keys and arity are validated before any value is coerced, so custom
    /// converters never run for a block that is rejected by shape.
    pub(crate) fn instantiate(&self, mapping: &Mapping) -> Result<T, Error> {
        let mut supplied: Slots<Option<&Node>> = smallvec![None; self.params.len()];
        for entry in mapping {
            let &at = self
                .keys
                .get(entry.key.as_str())
                .ok_or_else(|| Error::UnknownKey {
                    type_name: self.name,
                    key: entry.key.clone(),
                    location: entry.location,
                })?;
            // A name and its alias fill the same slot; the later entry wins.
            supplied[at] = Some(&entry.value);
        }

        let count = supplied.iter().filter(|node| node.is_some()).count();
        if !self.arity().contains(&count) {
            return Err(Error::ArityMismatch {
                type_name: self.name,
                supplied: count,
                mandatory: self.mandatory,
                total: self.params.len(),
                location: mapping.location(),
            });
        }

        let plan = self
            .params
            .iter()
            .zip(supplied)
            .map(|(param, node)| match (node, &param.default) {
                (Some(node), _) => Ok(Slot::Supplied(node)),
                (None, Some(default)) => Ok(Slot::Default(default)),
                (None, None) => Err(Error::MissingField {
                    type_name: self.name,
                    field: param.name,
                    location: mapping.location(),
                }),
            })
            .collect::<Result<Slots<Slot<'_>>, Error>>()?;

        let values = self
            .params
            .iter()
            .zip(plan)
            .map(|(param, slot)| match slot {
                Slot::Supplied(node) => param.coerce(node),
                Slot::Default(default) => Ok(default()),
            })
            .collect::<Result<Slots<Value>, Error>>()?;

        let mut args = Arguments {
            type_name: self.name,
            values: values.into_iter(),
            taken: 0,
        };
        // Constructor errors keep their kind; only a missing location is filled in.
        (self.construct)(&mut args).map_err(|err| err.or_location(mapping.location()))
    }
}

/// Ordered constructor arguments of one record.
///
/// Values come in field declaration order, with defaults already filled in.
pub struct Arguments {
    type_name: &'static str,
    values: smallvec::IntoIter<[Value; 8]>,
    taken: usize,
}

impl Arguments {
    /// Take the next argument as a `V`.
    ///
    /// Fails if every argument was already taken or if the next one is not a `V`.
    pub fn take<V: 'static>(&mut self) -> Result<V, Error> {
        let position = self.taken;
        let value = self.values.next().ok_or_else(|| {
            Error::msg(format!(
                "constructor of {} takes more than the {position} arguments it declares",
                self.type_name
            ))
        })?;
        self.taken += 1;
        value.downcast::<V>().map(|value| *value).map_err(|_| {
            Error::msg(format!(
                "argument {position} of {} is not a {}",
                self.type_name,
                type_name::<V>()
            ))
        })
    }

    /// Number of arguments not yet taken.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}
