/// Returns whether `c` may occur in a variable name of the proof format.
pub fn is_name_character(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '[' | ']' | '{' | '}' | '^' | '_' | '-')
}

/// Replace every character that cannot occur in a variable name with an underscore.
///
/// Planning tasks carry arbitrary operator and variable names (e.g. `(move a b)`), which have to be
/// mapped to identifiers the checker accepts.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if is_name_character(c) { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_and_parentheses_are_replaced() {
        assert_eq!("_move_a_b_", sanitize_name("(move a b)"));
    }

    #[test]
    fn allowed_characters_are_kept() {
        assert_eq!("prime^var_1-[2]", sanitize_name("prime^var_1-[2]"));
    }
}
