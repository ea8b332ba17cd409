//! Binding metadata: how a type is built from a document node.
//!
//! Every bindable type implements [`Yamlify`] and describes itself once as a
//! [`Binding`]. The registry memoizes that description per type for the rest of
//! the process, so `binding()` runs at most a handful of times no matter how many
//! documents are parsed.
//!
//! Three shapes exist:
//! - scalars, built from the raw text of a leaf by a parse function;
//! - records, built from a nested block through a constructor whose parameters
//!   are described by [`Field`]s;
//! - adapters such as `Vec<U>` and `Option<U>`, which delegate to the binding of
//!   their element type.
//!
//! ```rust
//! use yamlify::{Binding, Error, Field, Yamlify};
//!
//! struct Grade {
//!     subject: String,
//!     classification: i32,
//! }
//!
//! impl Yamlify for Grade {
//!     fn binding() -> Result<Binding<Self>, Error> {
//!         Binding::record("Grade")
//!             .field(Field::<String>::new("subject"))
//!             .field(Field::<i32>::new("classification").alias("grade"))
//!             .construct(|args| {
//!                 Ok(Grade {
//!                     subject: args.take()?,
//!                     classification: args.take()?,
//!                 })
//!             })
//!     }
//! }
//!
//! let grade: Grade = yamlify::from_str("subject: LAE\ngrade: 18\n").unwrap();
//! assert_eq!(grade.subject, "LAE");
//! assert_eq!(grade.classification, 18);
//! ```

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::ops::RangeInclusive;

use ahash::AHashMap;

use crate::error::Error;
use crate::instantiate::{Arguments, Param, Record};
use crate::node::Node;
use crate::registry::coerce;

pub(crate) type TextFn<T> = Box<dyn Fn(&str) -> Result<T, String> + Send + Sync>;
pub(crate) type NodeFn<T> = Box<dyn Fn(&Node) -> Result<T, Error> + Send + Sync>;

/// A type that can be bound from a document.
///
/// The default body reports [`Error::UnsupportedType`]: `impl Yamlify for T {}`
/// declares a type that exists in the model but has no usable constructor.
pub trait Yamlify: Sized + 'static {
    /// Describe how to build `Self`. Called once per type by the registry.
    fn binding() -> Result<Binding<Self>, Error> {
        Err(Error::UnsupportedType {
            type_name: type_name::<Self>(),
            reason: "no constructor is described for this type".to_owned(),
        })
    }
}

/// Compiled description of how to build a `T`.
pub struct Binding<T> {
    type_name: &'static str,
    shape: Shape<T>,
}

enum Shape<T> {
    Scalar(TextFn<T>),
    Record(Record<T>),
    Adapter { scalar: bool, coerce: NodeFn<T> },
}

impl<T: 'static> Binding<T> {
    /// Binding of a scalar type, parsed from the raw text of a leaf.
    pub fn scalar<F, E>(parse: F) -> Self
    where
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        Self {
            type_name: type_name::<T>(),
            shape: Shape::Scalar(Box::new(move |text: &str| parse(text).map_err(|e| e.to_string()))),
        }
    }

    /// Start describing a record built from a nested block.
    ///
    /// `name` is used in error messages.
    pub fn record(name: &'static str) -> RecordBuilder<T> {
        RecordBuilder {
            name,
            params: Vec::new(),
            target: PhantomData,
        }
    }

    /// Binding that coerces whole nodes itself, typically by delegating to the
    /// binding of another type. `scalar` tells list parsing whether items are
    /// written one per line.
    pub fn adapter<F>(scalar: bool, coerce: F) -> Self
    where
        F: Fn(&Node) -> Result<T, Error> + Send + Sync + 'static,
    {
        Self {
            type_name: type_name::<T>(),
            shape: Shape::Adapter {
                scalar,
                coerce: Box::new(coerce),
            },
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// True if values of this type are written as a single scalar.
    pub fn is_scalar(&self) -> bool {
        match &self.shape {
            Shape::Scalar(_) => true,
            Shape::Record(_) => false,
            Shape::Adapter { scalar, .. } => *scalar,
        }
    }

    /// `mandatory..=total` parameter counts, for records.
    pub fn arity(&self) -> Option<RangeInclusive<usize>> {
        match &self.shape {
            Shape::Record(record) => Some(record.arity()),
            Shape::Scalar(_) | Shape::Adapter { .. } => None,
        }
    }

    /// True if `key` names a parameter of this record, by its name or its alias.
    pub fn accepts(&self, key: &str) -> bool {
        match &self.shape {
            Shape::Record(record) => record.accepts(key),
            Shape::Scalar(_) | Shape::Adapter { .. } => false,
        }
    }

    /// Build a `T` from a document node.
    pub fn coerce(&self, node: &Node) -> Result<T, Error> {
        match (&self.shape, node) {
            (Shape::Scalar(parse), Node::Scalar(scalar)) => parse(&scalar.value).map_err(|reason| {
                Error::conversion(&scalar.value, self.type_name, reason, scalar.location)
            }),
            (Shape::Scalar(_), Node::Mapping(mapping)) => Err(Error::conversion(
                "<block>",
                self.type_name,
                "expected a scalar value, found a nested block",
                mapping.location(),
            )),
            (Shape::Record(record), Node::Mapping(mapping)) => record.instantiate(mapping),
            (Shape::Record(_), Node::Scalar(scalar)) => Err(Error::conversion(
                &scalar.value,
                self.type_name,
                "expected a nested block, found a scalar",
                scalar.location,
            )),
            (Shape::Adapter { coerce, .. }, node) => coerce(node),
        }
    }
}

impl<T> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match &self.shape {
            Shape::Scalar(_) => "scalar",
            Shape::Record(_) => "record",
            Shape::Adapter { .. } => "adapter",
        };
        f.debug_struct("Binding")
            .field("type_name", &self.type_name)
            .field("shape", &shape)
            .finish()
    }
}

pub(crate) enum FieldCoercion<V> {
    Derived(fn(&Node) -> Result<V, Error>),
    Converter(TextFn<V>),
}

/// One constructor parameter of a record.
///
/// A field accepts its own name and at most one alias as source keys. A custom
/// converter, when present, always wins over the coercion derived from `V`.
pub struct Field<V> {
    pub(crate) name: &'static str,
    pub(crate) alias: Option<&'static str>,
    pub(crate) coercion: FieldCoercion<V>,
    pub(crate) default: Option<Box<dyn Fn() -> V + Send + Sync>>,
}

impl<V: Yamlify> Field<V> {
    /// Mandatory parameter coerced through the binding of `V`.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            coercion: FieldCoercion::Derived(coerce::<V>),
            default: None,
        }
    }
}

impl<V: 'static> Field<V> {
    /// Mandatory parameter built only by `converter`, for types without a binding.
    pub fn converted<F, E>(name: &'static str, converter: F) -> Self
    where
        F: Fn(&str) -> Result<V, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        Self {
            name,
            alias: None,
            coercion: FieldCoercion::Converter(Box::new(move |text: &str| {
                converter(text).map_err(|e| e.to_string())
            })),
            default: None,
        }
    }

    /// Also accept `alias` as the source key of this parameter.
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Build this parameter from scalar text with `converter` instead of the
    /// coercion derived from its type.
    pub fn converter<F, E>(mut self, converter: F) -> Self
    where
        F: Fn(&str) -> Result<V, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        self.coercion = FieldCoercion::Converter(Box::new(move |text: &str| {
            converter(text).map_err(|e| e.to_string())
        }));
        self
    }

    /// Make the parameter optional; `default` supplies its value when absent.
    pub fn default_with<F>(mut self, default: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
    {
        self.default = Some(Box::new(default));
        self
    }
}

impl<V: Default + 'static> Field<V> {
    /// Make the parameter optional with `V::default()` as its default.
    pub fn optional(self) -> Self {
        self.default_with(V::default)
    }
}

/// Builder returned by [`Binding::record`].
pub struct RecordBuilder<T> {
    name: &'static str,
    params: Vec<Param>,
    target: PhantomData<fn() -> T>,
}

impl<T: 'static> RecordBuilder<T> {
    /// Append the next constructor parameter.
    pub fn field<V: 'static>(mut self, field: Field<V>) -> Self {
        self.params.push(Param::from(field));
        self
    }

    /// Finish the description with the constructor.
    ///
    /// The constructor receives the arguments in field order and takes them with
    /// [`Arguments::take`]. Fails with [`Error::UnsupportedType`] if two
    /// parameters accept the same source key.
    pub fn construct<F>(self, construct: F) -> Result<Binding<T>, Error>
    where
        F: Fn(&mut Arguments) -> Result<T, Error> + Send + Sync + 'static,
    {
        let mut keys = AHashMap::with_capacity(self.params.len() * 2);
        for (at, param) in self.params.iter().enumerate() {
            for key in std::iter::once(param.name).chain(param.alias) {
                if keys.insert(key, at).is_some() {
                    return Err(Error::UnsupportedType {
                        type_name: self.name,
                        reason: format!("key `{key}` is accepted by more than one parameter"),
                    });
                }
            }
        }
        Ok(Binding {
            type_name: self.name,
            shape: Shape::Record(Record::new(self.name, self.params, keys, Box::new(construct))),
        })
    }
}
