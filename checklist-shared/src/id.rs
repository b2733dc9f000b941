/// Identifier generation
///
/// Users and todos are keyed by random UUID v4 values rendered as
/// lowercase hyphenated text, e.g. `67e55044-10b1-426f-9247-bb680e5fe0c8`.
///
/// # Example
///
/// ```
/// use checklist_shared::id;
///
/// let first = id::generate();
/// let second = id::generate();
/// assert_ne!(first, second);
/// ```

use uuid::Uuid;

/// Generates a fresh identifier
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}
