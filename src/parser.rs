//! Parser façade: objects, lists, lazy sequences and folders of documents.
//!
//! A [`YamlParser<T>`] holds the binding of `T` and the [`Options`] used for
//! every document it reads. Text entry points wrap located errors in a rendered
//! snippet unless [`Options::with_snippet`] is off.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::vec;

use encoding_rs_io::DecodeReaderBytesBuilder;
use tracing::{debug, trace};

use crate::binding::{Binding, Yamlify};
use crate::error::Error;
use crate::node::{Node, is_synthetic_key};
use crate::options::{FolderOrder, Options};
use crate::reducer::{parse_document, scalar_items};
use crate::registry::resolve;

/// Path shown in snippets of documents that do not come from a file.
const INPUT: &str = "<input>";

/// Read the whole input, sniffing a UTF-8 or UTF-16 byte order mark.
pub fn read_source<R: Read>(reader: R) -> Result<String, Error> {
    let mut decoder = DecodeReaderBytesBuilder::new()
        .encoding(None) // None = sniff BOM, UTF-8 otherwise
        .build(reader);
    let mut text = String::new();
    decoder.read_to_string(&mut text)?;
    Ok(text)
}

/// Parser of documents into `T`.
///
/// ```rust
/// use yamlify::{Binding, Error, Field, YamlParser, Yamlify};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Yamlify for Point {
///     fn binding() -> Result<Binding<Self>, Error> {
///         Binding::record("Point")
///             .field(Field::<i32>::new("x"))
///             .field(Field::<i32>::new("y").optional())
///             .construct(|args| Ok(Point { x: args.take()?, y: args.take()? }))
///     }
/// }
///
/// let parser = YamlParser::<Point>::new().unwrap();
/// let points = parser.parse_list_str("-\n  x: 1\n  y: 2\n-\n  x: 3\n").unwrap();
/// assert_eq!(points.len(), 2);
/// assert_eq!((points[1].x, points[1].y), (3, 0));
/// ```
pub struct YamlParser<T> {
    binding: Arc<Binding<T>>,
    options: Options,
}

impl<T> Clone for YamlParser<T> {
    fn clone(&self) -> Self {
        Self {
            binding: Arc::clone(&self.binding),
            options: self.options.clone(),
        }
    }
}

impl<T: Yamlify> YamlParser<T> {
    /// Parser with default [`Options`].
    ///
    /// Fails with [`Error::UnsupportedType`] if `T` cannot be bound.
    pub fn new() -> Result<Self, Error> {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Result<Self, Error> {
        Ok(Self {
            binding: resolve::<T>()?,
            options,
        })
    }

    pub fn binding(&self) -> &Binding<T> {
        &self.binding
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    fn located(&self, result: Result<T, Error>, text: &str, path: &str) -> Result<T, Error> {
        if self.options.with_snippet {
            result.map_err(|err| err.with_snippet(text, path))
        } else {
            result
        }
    }

    fn bind_document(&self, text: &str) -> Result<T, Error> {
        let document = parse_document(text, &self.options)?;
        self.binding.coerce(&Node::Mapping(document))
    }

    /// Parse one document into a `T`.
    pub fn parse_object_str(&self, text: &str) -> Result<T, Error> {
        self.located(self.bind_document(text), text, INPUT)
    }

    pub fn parse_object<R: Read>(&self, reader: R) -> Result<T, Error> {
        self.parse_object_str(&read_source(reader)?)
    }

    /// Split a list document into its item nodes.
    ///
    /// Scalar items are taken one per line. Composite items are the entries of
    /// the top-level mapping, each of which must be a `-` item.
    fn items(&self, text: &str) -> Result<Vec<Node>, Error> {
        if self.binding.is_scalar() {
            return scalar_items(text, &self.options);
        }
        parse_document(text, &self.options)?
            .into_entries()
            .into_iter()
            .map(|entry| {
                if is_synthetic_key(&entry.key) {
                    Ok(entry.value)
                } else {
                    Err(Error::malformed(
                        format!("expected a `-` list item, found key `{}`", entry.key),
                        entry.location,
                    ))
                }
            })
            .collect()
    }

    /// Parse a list document into all of its items, in source order.
    pub fn parse_list_str(&self, text: &str) -> Result<Vec<T>, Error> {
        let wrap = |err: Error| {
            if self.options.with_snippet {
                err.with_snippet(text, INPUT)
            } else {
                err
            }
        };
        self.items(text)
            .map_err(wrap)?
            .iter()
            .map(|item| self.binding.coerce(item).map_err(wrap))
            .collect()
    }

    pub fn parse_list<R: Read>(&self, reader: R) -> Result<Vec<T>, Error> {
        self.parse_list_str(&read_source(reader)?)
    }

    /// Decompose a list document now and bind its items one at a time as the
    /// returned iterator is pulled.
    ///
    /// Structural errors are reported here; binding errors are yielded by the
    /// iterator, which can be pulled again for the next item.
    pub fn parse_sequence_str(&self, text: &str) -> Result<Sequence<T>, Error> {
        let items = match self.items(text) {
            Ok(items) => items,
            Err(err) if self.options.with_snippet => return Err(err.with_snippet(text, INPUT)),
            Err(err) => return Err(err),
        };
        Ok(Sequence {
            parser: self.clone(),
            source: self.options.with_snippet.then(|| text.to_owned()),
            items: items.into_iter(),
            index: 0,
        })
    }

    pub fn parse_sequence<R: Read>(&self, reader: R) -> Result<Sequence<T>, Error> {
        self.parse_sequence_str(&read_source(reader)?)
    }

    /// Regular files of `dir`, ordered by [`Options::folder_order`].
    fn list_folder(&self, dir: &Path) -> Result<Vec<PathBuf>, Error> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        if self.options.folder_order == FolderOrder::Name {
            files.sort();
        }
        debug!(dir = %dir.display(), files = files.len(), "enumerated folder");
        Ok(files)
    }

    fn bind_file(&self, path: &Path) -> Result<T, Error> {
        let text = read_source(File::open(path)?)?;
        self.located(self.bind_document(&text), &text, &path.display().to_string())
    }

    /// Bind every regular file of `dir` as one document.
    ///
    /// Files are read and bound before returning; the first failure stops the
    /// batch. Once one file has been bound, a later file whose keys do not fit
    /// `T` is reported as [`Error::InconsistentElementShape`].
    pub fn parse_folder_eager<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<T>, Error> {
        let files = self.list_folder(dir.as_ref())?;
        let mut values = Vec::with_capacity(files.len());
        for (index, path) in files.into_iter().enumerate() {
            let value = self
                .bind_file(&path)
                .map_err(|err| remap(err, index, &path, !values.is_empty()))?;
            values.push(value);
        }
        Ok(values)
    }

    /// Capture the listing of `dir` now and read and bind each file when the
    /// returned iterator is pulled.
    ///
    /// Edits to files that were not yet pulled are observed.
    pub fn parse_folder_lazy<P: AsRef<Path>>(&self, dir: P) -> Result<FolderSequence<T>, Error> {
        let files = self.list_folder(dir.as_ref())?;
        Ok(FolderSequence {
            parser: self.clone(),
            files: files.into_iter(),
            index: 0,
            bound_any: false,
        })
    }
}

/// Report a shape error as an inconsistency with the elements bound before it.
fn remap(err: Error, index: usize, path: &Path, bound_any: bool) -> Error {
    if bound_any && err.is_shape_error() {
        Error::InconsistentElementShape {
            index,
            path: Some(path.to_path_buf()),
            cause: Box::new(err),
        }
    } else {
        err
    }
}

/// Lazily bound items of a list document. See [`YamlParser::parse_sequence_str`].
pub struct Sequence<T> {
    parser: YamlParser<T>,
    source: Option<String>,
    items: vec::IntoIter<Node>,
    index: usize,
}

impl<T: Yamlify> Iterator for Sequence<T> {
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.next()?;
        trace!(index = self.index, "binding sequence item");
        self.index += 1;
        let result = self.parser.binding.coerce(&item);
        Some(match &self.source {
            Some(text) => result.map_err(|err| err.with_snippet(text, INPUT)),
            None => result,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

/// Lazily read and bound files of a folder. See [`YamlParser::parse_folder_lazy`].
pub struct FolderSequence<T> {
    parser: YamlParser<T>,
    files: vec::IntoIter<PathBuf>,
    index: usize,
    bound_any: bool,
}

impl<T: Yamlify> Iterator for FolderSequence<T> {
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.files.next()?;
        let index = self.index;
        self.index += 1;
        trace!(index, path = %path.display(), "binding folder element");
        let result = self
            .parser
            .bind_file(&path)
            .map_err(|err| remap(err, index, &path, self.bound_any));
        self.bound_any |= result.is_ok();
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.files.size_hint()
    }
}

/// Bind a single document.
///
/// ```rust
/// use yamlify::{Binding, Error, Field, Yamlify};
///
/// struct Config {
///     name: String,
///     enabled: bool,
///     retries: i32,
/// }
///
/// impl Yamlify for Config {
///     fn binding() -> Result<Binding<Self>, Error> {
///         Binding::record("Config")
///             .field(Field::<String>::new("name"))
///             .field(Field::<bool>::new("enabled"))
///             .field(Field::<i32>::new("retries"))
///             .construct(|args| {
///                 Ok(Config {
///                     name: args.take()?,
///                     enabled: args.take()?,
///                     retries: args.take()?,
///                 })
///             })
///     }
/// }
///
/// let yaml = "
///     name: My Application
///     enabled: true
///     retries: 5
/// ";
///
/// let cfg: Config = yamlify::from_str(yaml).unwrap();
/// assert!(cfg.enabled);
/// assert_eq!(cfg.name, "My Application");
/// ```
pub fn from_str<T: Yamlify>(input: &str) -> Result<T, Error> {
    from_str_with_options(input, &Options::default())
}

/// Bind a single document with configurable [`Options`].
pub fn from_str_with_options<T: Yamlify>(input: &str, options: &Options) -> Result<T, Error> {
    YamlParser::with_options(options.clone())?.parse_object_str(input)
}

/// Bind a single document read from `reader`.
pub fn from_reader<R: Read, T: Yamlify>(reader: R) -> Result<T, Error> {
    YamlParser::new()?.parse_object(reader)
}

/// Bind every item of a list document.
///
/// ```rust
/// let numbers: Vec<i32> = yamlify::list_from_str("- 1\n- 2\n- 3\n").unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
/// ```
pub fn list_from_str<T: Yamlify>(input: &str) -> Result<Vec<T>, Error> {
    YamlParser::new()?.parse_list_str(input)
}
