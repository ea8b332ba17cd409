//! Ready-made converters for [`Field::converter`](crate::Field::converter) and
//! [`Field::converted`](crate::Field::converted).

/// Parse an ISO 8601 calendar date such as `1998-03-22`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use yamlify::{Binding, Error, Field, Yamlify};
///
/// struct Birth {
///     date: NaiveDate,
/// }
///
/// impl Yamlify for Birth {
///     fn binding() -> Result<Binding<Self>, Error> {
///         Binding::record("Birth")
///             .field(Field::converted("date", yamlify::convert::iso_date))
///             .construct(|args| Ok(Birth { date: args.take()? }))
///     }
/// }
///
/// let birth: Birth = yamlify::from_str("date: 1998-03-22\n").unwrap();
/// assert_eq!(birth.date, NaiveDate::from_ymd_opt(1998, 3, 22).unwrap());
/// ```
#[cfg(feature = "chrono")]
pub fn iso_date(text: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
}

/// Split a comma-separated scalar into trimmed, non-empty items.
///
/// `tags: red, green` becomes `["red", "green"]`.
pub fn comma_list(text: &str) -> Result<Vec<String>, std::convert::Infallible> {
    Ok(text
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect())
}
