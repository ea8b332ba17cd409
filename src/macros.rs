//! Public macros for constructing option structs without relying on struct literal syntax.
//!
//! These keep call sites short while allowing the option structs to gain fields
//! without breaking callers.

/// Construct [`crate::Options`] from `Default` and a list of field assignments.
///
/// Example:
///
/// ```rust
/// use yamlify::options::{DuplicateKeyPolicy, FolderOrder};
///
/// let options = yamlify::options! {
///     duplicate_keys: DuplicateKeyPolicy::Error,
///     folder_order: FolderOrder::Filesystem,
/// };
/// ```
#[macro_export]
macro_rules! options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::Options::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Construct [`crate::Budget`] from `Default` and a list of field assignments.
///
/// Example:
///
/// ```rust
/// let budget = yamlify::budget! {
///     max_lines: 10_000,
///     max_depth: 16,
/// };
/// assert_eq!(budget.max_depth, 16);
/// ```
#[macro_export]
macro_rules! budget {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut budget = $crate::Budget::default();
        $(
            budget.$field = $value;
        )*
        budget
    }};
}
