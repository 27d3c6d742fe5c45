//! Constructor signature parsing
//!
//! Heuristic reader for constructor signature text such as
//! `fn new(users: Arc<UserService>, cache_service: &CacheService, logger: Logger)`.
//! Only the parameter list is read; bodies, default values and attributes
//! are out of scope.

use onebun_domain::constants::{RESERVED_PARAM_FRAGMENTS, SERVICE_SUFFIX};

/// Type wrappers unwrapped when reducing a type to its bare name
const TRANSPARENT_WRAPPERS: [&str; 6] = ["Arc", "Rc", "Box", "Option", "Weak", "Mutex"];

/// Constructor keywords, in search order
const CONSTRUCTOR_KEYWORDS: [&str; 2] = ["new", "constructor"];

/// Leading words dropped from a parameter pattern
const PATTERN_MODIFIERS: [&str; 5] = ["mut ", "private ", "public ", "protected ", "readonly "];

/// One parameter read from a signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParam {
    /// Identifier, with modifiers and leading underscores removed
    pub name: String,
    /// Bare type name, when the parameter was annotated
    pub type_name: Option<String>,
    /// Bound by a destructuring pattern; `name` holds the pattern text
    pub destructured: bool,
}

impl SignatureParam {
    /// Whether the framework injects this parameter itself
    pub fn is_reserved(&self) -> bool {
        is_reserved(&self.name) || self.type_name.as_deref().is_some_and(is_reserved)
    }
}

fn is_reserved(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    RESERVED_PARAM_FRAGMENTS
        .iter()
        .any(|fragment| lower.contains(fragment))
}

/// Parse every parameter of the first constructor in `source`
pub fn parse_signature(source: &str) -> Vec<SignatureParam> {
    extract_param_list(source)
        .map(|list| split_top_level(list).into_iter().filter_map(parse_param).collect())
        .unwrap_or_default()
}

/// Text between the parentheses of the first `new(` or `constructor(`
pub fn extract_param_list(source: &str) -> Option<&str> {
    let open = CONSTRUCTOR_KEYWORDS
        .iter()
        .filter_map(|keyword| find_call_open(source, keyword))
        .min()?;

    let mut depth = 0usize;
    for (offset, ch) in source[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&source[open + 1..open + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Byte offset of the `(` following a standalone `keyword`
///
/// Whitespace between the keyword and the parenthesis is allowed, since
/// `stringify!` may emit `new (`.
fn find_call_open(source: &str, keyword: &str) -> Option<usize> {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    let mut from = 0;
    while let Some(found) = source[from..].find(keyword) {
        let start = from + found;
        let end = start + keyword.len();
        let standalone = !source[..start].chars().next_back().is_some_and(is_ident);
        let rest = &source[end..];
        let gap = rest.len() - rest.trim_start().len();
        if standalone && rest[gap..].starts_with('(') {
            return Some(end + gap);
        }
        from = end;
    }
    None
}

/// Split on commas that are not nested in `<>`, `()` or `[]`
pub fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut previous = '\0';

    for (offset, ch) in list.char_indices() {
        match ch {
            '<' | '(' | '[' => depth += 1,
            // `->` inside a fn type is not a closing bracket
            '>' if previous != '-' => depth -= 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&list[start..offset]);
                start = offset + 1;
            }
            _ => {}
        }
        previous = ch;
    }
    parts.push(&list[start..]);
    parts
}

/// Read one parameter; `None` for receivers and empty slots
///
/// Access modifiers and `mut` are dropped. Parameters bound by a pattern
/// are kept with `destructured` set so callers can report them.
pub fn parse_param(raw: &str) -> Option<SignatureParam> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (pattern, type_text) = match raw.split_once(':') {
        Some((pattern, type_text)) => (pattern.trim(), Some(type_text.trim())),
        None => (raw, None),
    };
    let type_name = type_text.map(bare_type_name).filter(|name| !name.is_empty());

    let pattern = strip_modifiers(pattern);
    if is_receiver(pattern) {
        return None;
    }
    if !pattern.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Some(SignatureParam {
            name: pattern.to_string(),
            type_name,
            destructured: true,
        });
    }

    let name = pattern.trim_start_matches('_');
    if name.is_empty() {
        return None;
    }

    Some(SignatureParam {
        name: name.to_string(),
        type_name,
        destructured: false,
    })
}

fn strip_modifiers(mut pattern: &str) -> &str {
    while let Some(rest) = PATTERN_MODIFIERS
        .iter()
        .find_map(|modifier| pattern.strip_prefix(modifier))
    {
        pattern = rest.trim_start();
    }
    pattern
}

fn is_receiver(pattern: &str) -> bool {
    matches!(pattern, "self" | "&self" | "&mut self" | "this")
        || pattern.starts_with('&') && pattern.ends_with("self")
}

/// Reduce a type to its bare name
///
/// `&'a std::sync::Arc<crate::users::UserService>` becomes `UserService`.
pub fn bare_type_name(type_text: &str) -> String {
    let mut current = type_text.trim();

    loop {
        let before = current;
        current = current.trim_start_matches('&').trim_start();
        if current.starts_with('\'') {
            current = current
                .split_once(char::is_whitespace)
                .map_or("", |(_, rest)| rest.trim_start());
        }
        for prefix in ["mut ", "dyn ", "impl "] {
            if let Some(rest) = current.strip_prefix(prefix) {
                current = rest.trim_start();
            }
        }

        let head = current.split('<').next().unwrap_or(current);
        let head = head.rsplit("::").next().unwrap_or(head).trim();
        if TRANSPARENT_WRAPPERS.contains(&head) {
            if let (Some(open), Some(close)) = (current.find('<'), current.rfind('>')) {
                if open < close {
                    current = current[open + 1..close].trim();
                    continue;
                }
            }
        }

        if current == before {
            break;
        }
    }

    let head = current.split('<').next().unwrap_or(current);
    let head = head.rsplit("::").next().unwrap_or(head);
    head.split_whitespace().collect()
}

/// Guess a service class name from a parameter identifier
///
/// `user_service`, `userService` and `user` all become `UserService`;
/// `service` alone becomes `Service`.
pub fn guess_class_name(identifier: &str) -> String {
    let mut stem = identifier;
    let lower = stem.to_ascii_lowercase();
    let suffix = SERVICE_SUFFIX.to_ascii_lowercase();
    if lower.ends_with(&suffix) {
        stem = &stem[..stem.len() - suffix.len()];
    }
    let stem = stem.trim_end_matches('_');

    let mut pascal = String::with_capacity(stem.len() + SERVICE_SUFFIX.len());
    for segment in stem.split('_').filter(|segment| !segment.is_empty()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            pascal.extend(first.to_uppercase());
            pascal.push_str(chars.as_str());
        }
    }
    pascal.push_str(SERVICE_SUFFIX);
    pascal
}
