use validator::ValidationError;

/// Reject strings that are empty once surrounding whitespace is removed.
///
/// # Examples
/// ```
/// use cue_api::validation::not_blank;
///
/// assert!(not_blank("What is SM-2?").is_ok());
/// assert!(not_blank("  \n").is_err());
/// ```
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}
