/// Single-line comment token for a source file extension (`"cpp"` or `".cpp"`).
pub fn comment_token(ext: &str) -> Option<&'static str> {
    match ext.trim_start_matches('.') {
        "c" | "cpp" | "cc" | "java" | "rs" | "js" | "ts" | "go" | "kt" => Some("//"),
        "py" | "rb" | "sh" => Some("#"),
        _ => None,
    }
}

/// Drops characters that are awkward in file names from a problem title.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\'' | '(' | ')' | ',' | '*' | '/' | '"' | ' ' | '#' | '[' | ']'))
        .collect()
}

/// Initial contents of a new source file: a comment naming the problem, if the language has one.
pub fn source_header(title: &str, ext: &str) -> String {
    match comment_token(ext) {
        Some(token) => format!("{} {}\n", token, title),
        None => String::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn comment_tokens() {
        assert_eq!(comment_token("cpp"), Some("//"));
        assert_eq!(comment_token(".java"), Some("//"));
        assert_eq!(comment_token("c"), Some("//"));
        assert_eq!(comment_token("py"), Some("#"));
        assert_eq!(comment_token("hs"), None);
        assert_eq!(comment_token(""), None);
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_name("A. Watermelon (easy)"), "A.Watermeloneasy");
        assert_eq!(normalize_name("B - \"Sum\" [x*y/z], #2 'ok'"), "B-Sumxyz2ok");
        assert_eq!(normalize_name("plain"), "plain");
    }

    #[test]
    fn headers() {
        assert_eq!(source_header("A. Watermelon", "cpp"), "// A. Watermelon\n");
        assert_eq!(source_header("A. Watermelon", ".py"), "# A. Watermelon\n");
        assert_eq!(source_header("A. Watermelon", "txt"), "");
    }
}
