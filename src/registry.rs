//! Process-wide cache of compiled bindings.
//!
//! A binding is built the first time its type is needed and shared afterwards.
//! Building happens outside the lock; if two threads race on the same type, the
//! first one to insert wins and both observe the same [`Arc`].

use std::any::{Any, TypeId, type_name};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use ahash::AHashMap;
use tracing::debug;

use crate::binding::{Binding, Yamlify};
use crate::error::Error;
use crate::node::Node;

type Erased = Arc<dyn Any + Send + Sync>;

static REGISTRY: OnceLock<RwLock<AHashMap<TypeId, Erased>>> = OnceLock::new();

fn registry() -> &'static RwLock<AHashMap<TypeId, Erased>> {
    REGISTRY.get_or_init(|| RwLock::new(AHashMap::new()))
}

fn downcast<T: 'static>(erased: Erased) -> Result<Arc<Binding<T>>, Error> {
    erased.downcast::<Binding<T>>().map_err(|_| {
        Error::msg(format!("registry entry of {} has the wrong type", type_name::<T>()))
    })
}

/// Binding of `T`, built on first use and memoized for the rest of the process.
///
/// A failed build is not cached: the error is returned to every caller until
/// `T::binding()` succeeds.
pub fn resolve<T: Yamlify>() -> Result<Arc<Binding<T>>, Error> {
    let id = TypeId::of::<T>();
    let cached = registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned();
    if let Some(erased) = cached {
        return downcast(erased);
    }

    debug!(type_name = type_name::<T>(), "building binding");
    let built: Erased = Arc::new(T::binding()?);
    let erased = registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(id)
        .or_insert(built)
        .clone();
    downcast(erased)
}

/// True if the binding of `T` was already built.
pub fn is_resolved<T: 'static>() -> bool {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(&TypeId::of::<T>())
}

/// Build a `V` from `node` through its registered binding.
pub fn coerce<V: Yamlify>(node: &Node) -> Result<V, Error> {
    resolve::<V>()?.coerce(node)
}
