pub mod driver;
pub mod snapshot;
pub mod trip;

/// Treats blank strings the same as missing ones.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
