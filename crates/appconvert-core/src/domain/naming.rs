//! Identifier and file-name casing.
//!
//! Step keys, auth field keys, and app titles arrive in whatever shape the
//! definition author chose. Everything that turns them into file names,
//! import bindings, or environment variables goes through [`split_words`] so
//! that, for example, the import path written into `index.js` always matches
//! the file name the writer produced.

/// JavaScript reserved words that cannot be used as binding names.
const JS_RESERVED_WORDS: &[&str] = &[
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Convert a string to snake_case.
///
/// | Input | Output |
/// |-------|--------|
/// | "newItem" | "new_item" |
/// | "new-item" | "new_item" |
/// | "HTTPRequest" | "http_request" |
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Convert a string to kebab-case. Used for package names.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Convert a string to UPPER_SNAKE_CASE. Used for environment variables.
pub fn to_upper_snake_case(s: &str) -> String {
    to_snake_case(s).to_uppercase()
}

/// Convert a string to camelCase.
///
/// | Input | Output |
/// |-------|--------|
/// | "new_item" | "newItem" |
/// | "Recipe Created" | "recipeCreated" |
pub fn to_camel_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w } else { capitalize(&w) })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::new();
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// `true` if `name` can be used verbatim as a property key.
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// `true` if `name` can be used as a `const` binding.
pub fn is_binding_name(name: &str) -> bool {
    is_identifier_name(name) && !JS_RESERVED_WORDS.contains(&name)
}

/// Turn an arbitrary key into a usable binding name.
///
/// Valid names pass through untouched so that the common case (`perform`,
/// `inputFields`) keeps the author's spelling.
pub fn to_binding_name(name: &str) -> String {
    if is_binding_name(name) {
        return name.to_string();
    }

    let mut camel = to_camel_case(name);
    camel.retain(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if camel.is_empty() {
        return "_".to_string();
    }
    if !is_binding_name(&camel) {
        camel.insert(0, '_');
    }
    camel
}

/// Split a string into lowercase words.
///
/// ## Word Boundary Detection
///
/// 1. **Separators:** any character that is not alphanumeric
/// 2. **Case transition (camelCase):** `aB` → split between `a` and `B`
/// 3. **Acronym boundary:** `HTTPRequest` → split between `P` and `R`
pub fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            // "myApp" → "my" + "App"
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            // "HTTPServer" → "HTTP" + "Server"
            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_variants() {
        assert_eq!(to_snake_case("new_item"), "new_item");
        assert_eq!(to_snake_case("newItem"), "new_item");
        assert_eq!(to_snake_case("New Item"), "new_item");
        assert_eq!(to_snake_case("HTTPRequest"), "http_request");
        assert_eq!(to_snake_case("oauth_consumer_key"), "oauth_consumer_key");
    }

    #[test]
    fn camel_case_variants() {
        assert_eq!(to_camel_case("new_item"), "newItem");
        assert_eq!(to_camel_case("Recipe Created"), "recipeCreated");
        assert_eq!(to_camel_case("contact"), "contact");
    }

    #[test]
    fn kebab_case_title() {
        assert_eq!(to_kebab_case("My Great App!"), "my-great-app");
    }

    #[test]
    fn upper_snake_for_env() {
        assert_eq!(to_upper_snake_case("access_token"), "ACCESS_TOKEN");
        assert_eq!(to_upper_snake_case("apiKey"), "API_KEY");
    }

    #[test]
    fn identifier_checks() {
        assert!(is_identifier_name("inputFields"));
        assert!(is_identifier_name("$ref"));
        assert!(!is_identifier_name("1st"));
        assert!(!is_identifier_name("my-key"));
        assert!(!is_identifier_name(""));
        assert!(is_identifier_name("default"));
        assert!(!is_binding_name("default"));
    }

    #[test]
    fn binding_names_are_sanitized() {
        assert_eq!(to_binding_name("perform"), "perform");
        assert_eq!(to_binding_name("my-field"), "myField");
        assert_eq!(to_binding_name("2fa"), "_2fa");
        assert_eq!(to_binding_name("default"), "_default");
        assert_eq!(to_binding_name("--"), "_");
    }
}
