//! The crate's own construction convention.

// -----------------------------------------------------------------------------
// FromText

/// Construction from a canonical text form.
///
/// This is the highest-priority conversion convention: when a type registers
/// both a [`FromText`] and a [`FromStr`](core::str::FromStr) entry, resolution
/// always picks the `FromText` one. Implement it when the text accepted here
/// should differ from (or take precedence over) the general `FromStr`
/// behavior of the type.
///
/// # Examples
///
/// ```
/// use textform_convert::FromText;
///
/// struct Channel(u8);
///
/// #[derive(Debug)]
/// struct BadChannel;
///
/// impl core::fmt::Display for BadChannel {
///     fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
///         f.write_str("channel out of range")
///     }
/// }
///
/// impl core::error::Error for BadChannel {}
///
/// impl FromText for Channel {
///     type Err = BadChannel;
///
///     fn from_text(text: &str) -> Result<Self, Self::Err> {
///         match text.strip_prefix("ch-").and_then(|n| n.parse().ok()) {
///             Some(n) => Ok(Channel(n)),
///             None => Err(BadChannel),
///         }
///     }
/// }
///
/// assert!(Channel::from_text("ch-7").is_ok());
/// assert!(Channel::from_text("7").is_err());
/// ```
pub trait FromText: Sized {
    /// The error returned when the text is not a valid form of `Self`.
    type Err;

    /// Constructs an instance from its text form.
    fn from_text(text: &str) -> Result<Self, Self::Err>;
}
