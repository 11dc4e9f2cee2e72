//! Identifier case transforms shared by every backend
//!
//! Case mapping is ASCII-only: non-ASCII characters are copied unchanged, so
//! generated identifiers never depend on locale tables.

/// Uppercase the first character
pub fn capitalize(input: &str) -> String {
    map_first(input, |c| c.to_ascii_uppercase())
}

/// Lowercase the first character
pub fn decapitalize(input: &str) -> String {
    map_first(input, |c| c.to_ascii_lowercase())
}

/// Lowercase every character
pub fn lowercase(input: &str) -> String {
    input.to_ascii_lowercase()
}

/// Convert camelCase / PascalCase to snake_case.
///
/// ```text
/// aMultiWord -> a_multi_word
/// CamelCase  -> camel_case
/// Name       -> name
/// Vec3D      -> vec3_d
/// ```
pub fn underscore(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut chars = input.chars();

    if let Some(first) = chars.next() {
        out.push(first.to_ascii_lowercase());
    }
    for c in chars {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert snake_case to camelCase.
///
/// Every `_` is dropped and the next kept character is uppercased. A run of
/// underscores acts like a single one.
///
/// ```text
/// a_multi_word -> aMultiWord
/// _foo         -> Foo
/// foo_         -> foo
/// ```
pub fn camelcase(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_upper = false;

    for c in input.chars() {
        if c == '_' {
            pending_upper = true;
            continue;
        }
        if pending_upper {
            out.push(c.to_ascii_uppercase());
            pending_upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn map_first(input: &str, f: impl FnOnce(char) -> char) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(input.len());
            out.push(f(first));
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}
