pub mod course;
pub mod user;

pub use course::{Course, CourseFields, CourseInput, CourseWithOwner};
pub use user::{NewUser, User, UserInput, UserProfile, ValidUser};

/// Collect the message for a missing or blank required field, returning the
/// value when it is present.
pub(crate) fn required(
    value: Option<String>,
    missing: &str,
    empty: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    match value {
        None => {
            errors.push(missing.to_string());
            None
        }
        Some(v) if v.trim().is_empty() => {
            errors.push(empty.to_string());
            None
        }
        Some(v) => Some(v),
    }
}
