/// Makes a user-supplied base name safe to use as a file name.
pub fn sanitize_base_name(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
