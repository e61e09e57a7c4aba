use super::GraphError;

/// Characters an author may not use in a card name.
pub const INVALID_NAME_CHARS: &[char] = &[
    '#', ':', '/', '|', '_', '%', '<', '>', '[', ']', '{', '}', '\\', '\u{FFFD}', '\u{7F}',
];

pub const DEFAULT_MAX_STATE_NAME_LENGTH: usize = 50;

/// Collapses runs of whitespace into a single space and trims both ends.
pub fn normalize_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn validate_state_name(name: &str, max_length: usize) -> Result<(), GraphError> {
    if name.is_empty() {
        return Err(GraphError::invalid_name(name, "name must not be empty"));
    }
    if name.chars().count() > max_length {
        return Err(GraphError::invalid_name(
            name,
            format!("name must be at most {} characters", max_length),
        ));
    }
    if let Some(c) = name.chars().find(|c| INVALID_NAME_CHARS.contains(c)) {
        return Err(GraphError::invalid_name(
            name,
            format!("name must not contain '{}'", c.escape_default()),
        ));
    }
    Ok(())
}
