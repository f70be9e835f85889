//! Identifier casing helpers.
//!
//! Contract schemas name things in snake_case; generated TypeScript wants
//! camelCase methods and PascalCase type names. The splitter also accepts
//! kebab-case and mixed-case input so contract names like `my-counter` come
//! out as `MyCounter`.

/// Split an identifier into words. Boundaries: `_`, `-`, `.`, spaces, and a
/// lower→upper case transition.
pub fn words(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in input.chars() {
        if matches!(ch, '_' | '-' | '.' | ' ') {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            out.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
    }
}

pub fn camel(input: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(input).iter().enumerate() {
        if i == 0 {
            out.extend(word.chars().flat_map(|c| c.to_lowercase()));
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

pub fn pascal(input: &str) -> String {
    words(input).iter().map(|w| capitalize(w)).collect()
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_from_snake() {
        assert_eq!(camel("get_count"), "getCount");
        assert_eq!(camel("increment"), "increment");
        assert_eq!(camel("owner_addr"), "ownerAddr");
    }

    #[test]
    fn camel_is_stable_on_camel_input() {
        assert_eq!(camel("getCount"), "getCount");
        assert_eq!(camel("ownerAddr"), "ownerAddr");
    }

    #[test]
    fn pascal_from_mixed_inputs() {
        assert_eq!(pascal("get_count"), "GetCount");
        assert_eq!(pascal("my-counter"), "MyCounter");
        assert_eq!(pascal("counterClient"), "CounterClient");
        assert_eq!(pascal("Count"), "Count");
    }

    #[test]
    fn words_split_on_case_and_separators() {
        assert_eq!(words("ExecuteMsgForEmpty"), vec!["Execute", "Msg", "For", "Empty"]);
        assert_eq!(words("all_nft_info"), vec!["all", "nft", "info"]);
    }
}
