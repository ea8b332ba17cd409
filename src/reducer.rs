//! Indentation reducer: turns the line stream into a nested ordered [`Mapping`].
//!
//! Recognized line shapes (after the indentation):
//! - `- value`: sequence item with an inline scalar.
//! - `-`: sequence item header; a nested block follows.
//! - `name: value`: leaf entry, split on the first colon.
//! - `name:`: header of a nested block.
//!
//! Equal indentation continues the current level, deeper indentation opens a
//! block for the pending header and shallower indentation closes the level and
//! is handed back to the caller.

use tracing::trace;

use crate::budget::BudgetEnforcer;
use crate::error::{Error, budget_error};
use crate::lines::{Line, Lines};
use crate::location::Location;
use crate::node::{Mapping, Node, SEQUENCE_MARKER, Scalar, is_synthetic_key, synthetic_key};
use crate::options::{DuplicateKeyPolicy, Options};

/// Content of one line, classified.
#[derive(Debug, PartialEq, Eq)]
enum Content<'a> {
    /// Sequence item, with its inline value if any.
    Item(Option<&'a str>),
    /// Named entry, with its inline value if any.
    Pair(&'a str, Option<&'a str>),
}

fn classify<'a>(line: &Line<'a>) -> Result<Content<'a>, Error> {
    let content = line.content;
    if content == SEQUENCE_MARKER {
        return Ok(Content::Item(None));
    }
    if let Some(rest) = content.strip_prefix("- ") {
        let rest = rest.trim();
        return Ok(Content::Item(Some(rest).filter(|v| !v.is_empty())));
    }
    let Some((name, value)) = content.split_once(':') else {
        return Err(Error::malformed(
            format!("expected `name: value`, `name:` or `- value`, found `{content}`"),
            line.location(),
        ));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::malformed("empty key", line.location()));
    }
    if is_synthetic_key(name) {
        return Err(Error::malformed(
            format!("key `{name}` is reserved for sequence items"),
            line.location(),
        ));
    }
    let value = value.trim();
    Ok(Content::Pair(name, Some(value).filter(|v| !v.is_empty())))
}

/// Value column of a line: where the scalar after the marker or colon starts.
fn value_location(line: &Line<'_>, value: &str) -> Location {
    let offset = line
        .content
        .rfind(value)
        .map_or(0, |at| line.content[..at].chars().count());
    Location::new(line.row, line.indent + offset + 1)
}

struct Reducer<'a> {
    lines: Lines<'a>,
    budget: BudgetEnforcer,
    duplicate_keys: DuplicateKeyPolicy,
}

impl<'a> Reducer<'a> {
    fn scalar(&mut self, line: &Line<'a>, value: &str) -> Result<Node, Error> {
        self.budget
            .observe_scalar(value)
            .map_err(|breach| budget_error(breach, line.location()))?;
        Ok(Node::Scalar(Scalar {
            value: value.to_owned(),
            location: value_location(line, value),
        }))
    }

    /// Store the inline value of `line` into `mapping`, or return the key of the
    /// block the line opens.
    fn leaf_or_header(
        &mut self,
        line: &Line<'a>,
        mapping: &mut Mapping,
        counter: &mut usize,
    ) -> Result<Option<String>, Error> {
        let (key, value) = match classify(line)? {
            Content::Item(value) => {
                let key = synthetic_key(*counter);
                *counter += 1;
                (key, value)
            }
            Content::Pair(name, value) => (name.to_owned(), value),
        };
        match value {
            Some(value) => {
                let node = self.scalar(line, value)?;
                mapping.insert(key, line.location(), node, self.duplicate_keys)?;
                Ok(None)
            }
            None => Ok(Some(key)),
        }
    }

    /// Fill `mapping` with the lines indented exactly `base`.
    ///
    /// Returns the indentation of the first line that closed the level, or `0`
    /// at the end of the stream.
    fn reduce(
        &mut self,
        mapping: &mut Mapping,
        base: usize,
        counter: &mut usize,
    ) -> Result<usize, Error> {
        let mut pending: Option<(String, Location)> = None;
        while let Some(line) = self.lines.next() {
            if line.indent == base {
                pending = self
                    .leaf_or_header(&line, mapping, counter)?
                    .map(|key| (key, line.location()));
            } else if line.indent > base {
                let Some((key, key_location)) = pending.take() else {
                    return Err(Error::malformed(
                        "indented block without a header",
                        line.location(),
                    ));
                };
                let mut block = Mapping::new(line.location());
                // Sequence items of the nested level count from zero again.
                let mut block_counter = 0;
                if self
                    .leaf_or_header(&line, &mut block, &mut block_counter)?
                    .is_some()
                {
                    // Header line: let the nested level read it at its own indentation.
                    block_counter = 0;
                    self.lines.rewind();
                }

                self.budget
                    .enter_block()
                    .map_err(|breach| budget_error(breach, line.location()))?;
                let stop = self.reduce(&mut block, line.indent, &mut block_counter)?;
                self.budget.leave_block();

                mapping.insert(key, key_location, Node::Mapping(block), self.duplicate_keys)?;
                if stop < base {
                    return Ok(stop);
                }
                if stop > base {
                    let location = self
                        .lines
                        .peek()
                        .map_or(Location::UNKNOWN, |line| line.location());
                    return Err(Error::malformed(
                        format!(
                            "inconsistent indentation: {stop} spaces closes a block but matches no open level"
                        ),
                        location,
                    ));
                }
            } else {
                self.lines.rewind();
                return Ok(line.indent);
            }
        }
        Ok(0)
    }
}

/// Reduce a whole document into its top-level mapping.
///
/// Blank lines are ignored. The first line's indentation is the document's
/// base level; no later line may be indented less.
///
/// ```rust
/// let options = yamlify::Options::default();
/// let doc = yamlify::parse_document("name: Maria\naddress:\n  city: Lisbon\n", &options).unwrap();
/// let city = doc.get("address").and_then(|a| a.as_mapping()).and_then(|a| a.get("city"));
/// assert_eq!(city.and_then(|c| c.as_str()), Some("Lisbon"));
/// ```
pub fn parse_document(text: &str, options: &Options) -> Result<Mapping, Error> {
    let lines = Lines::new(text)?;
    let Some(first) = lines.first() else {
        return Err(Error::malformed("empty document", Location::UNKNOWN));
    };
    trace!(lines = lines.len(), base = first.indent, "reducing document");

    let budget = BudgetEnforcer::new(options.budget.clone());
    budget
        .observe_lines(lines.len())
        .map_err(|breach| budget_error(breach, Location::UNKNOWN))?;

    let mut reducer = Reducer {
        lines,
        budget,
        duplicate_keys: options.duplicate_keys,
    };
    let mut mapping = Mapping::new(first.location());
    let mut counter = 0;
    reducer.reduce(&mut mapping, first.indent, &mut counter)?;

    if let Some(line) = reducer.lines.peek() {
        return Err(Error::malformed(
            "line is indented less than the first line of the document",
            line.location(),
        ));
    }
    Ok(mapping)
}

/// Every non-blank line as one scalar, with a leading `- ` marker removed.
pub(crate) fn scalar_items(text: &str, options: &Options) -> Result<Vec<Node>, Error> {
    let lines = Lines::new(text)?;
    let mut budget = BudgetEnforcer::new(options.budget.clone());
    budget
        .observe_lines(lines.len())
        .map_err(|breach| budget_error(breach, Location::UNKNOWN))?;

    let mut items = Vec::with_capacity(lines.len());
    for line in lines.into_inner() {
        let value = if line.content == SEQUENCE_MARKER {
            ""
        } else {
            line.content.strip_prefix("- ").unwrap_or(line.content).trim()
        };
        budget
            .observe_scalar(value)
            .map_err(|breach| budget_error(breach, line.location()))?;
        items.push(Node::Scalar(Scalar {
            value: value.to_owned(),
            location: value_location(&line, value),
        }));
    }
    Ok(items)
}
