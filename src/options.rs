use crate::budget::Budget;
use serde::{Deserialize, Serialize};

/// Duplicate key handling policy for mappings.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicateKeyPolicy {
    /// Error out on encountering a duplicate key.
    Error,
    /// First key wins: later duplicate entries are ignored.
    FirstWins,
    /// Last key wins: a later entry replaces the value but keeps the key's first position.
    LastWins,
}

/// Order in which folder entries are bound.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FolderOrder {
    /// Sort entries by file name.
    Name,
    /// Keep the order reported by the filesystem, which is platform dependent.
    Filesystem,
}

/// Parser configuration options.
///
/// Example: parse a small `Config` using custom `Options`.
///
/// ```rust
/// use yamlify::options::DuplicateKeyPolicy;
/// use yamlify::{Binding, Error, Field, Yamlify, from_str_with_options};
///
/// struct Config {
///     name: String,
///     retries: i32,
/// }
///
/// impl Yamlify for Config {
///     fn binding() -> Result<Binding<Self>, Error> {
///         Binding::record("Config")
///             .field(Field::<String>::new("name"))
///             .field(Field::<i32>::new("retries"))
///             .construct(|args| Ok(Config { name: args.take()?, retries: args.take()? }))
///     }
/// }
///
/// let yaml = "name: My Application\nretries: 5\nretries: 7\n";
///
/// let options = yamlify::options! {
///     duplicate_keys: DuplicateKeyPolicy::FirstWins,
/// };
///
/// let cfg: Config = from_str_with_options(yaml, &options).unwrap();
/// assert_eq!(cfg.name, "My Application");
/// assert_eq!(cfg.retries, 5);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Options {
    /// Optional budget enforced while reducing each document.
    pub budget: Option<Budget>,
    /// Policy for duplicate keys within one mapping level.
    pub duplicate_keys: DuplicateKeyPolicy,
    /// Order in which folder entries are bound.
    pub folder_order: FolderOrder,
    /// If true (default), entry points that have access to the source text wrap
    /// located errors with a rendered snippet of the offending lines.
    pub with_snippet: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            budget: Some(Budget::default()),
            duplicate_keys: DuplicateKeyPolicy::LastWins,
            folder_order: FolderOrder::Name,
            with_snippet: true,
        }
    }
}
