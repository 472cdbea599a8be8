//! Small string helpers shared by the classifier and the extractors.

/// Replace underscores with spaces, turning tag values into keyword form.
///
/// # Examples
/// ```
/// use placegrain_data::snake_to_words;
///
/// assert_eq!(snake_to_words("drinking_water"), "drinking water");
/// ```
#[must_use]
pub fn snake_to_words(value: &str) -> String {
    value.replace('_', " ")
}

/// Split a multi-valued tag on `;`, trimming tokens and dropping empty ones.
pub fn split_tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').map(str::trim).filter(|token| !token.is_empty())
}

/// Trimmed value when it is not blank.
pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
