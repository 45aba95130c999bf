//! Naming conventions and inflection helpers for fixtree.
//!
//! Models are declared by class name (`UserRole`) while tables, foreign keys
//! and template nodes use snake case (`user_roles`, `user_role_id`). This
//! crate converts between the two. It has no dependencies and can be used by
//! any other fixtree crate.

const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "fish",
    "information",
    "metadata",
    "news",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("status", "statuses"),
    ("alias", "aliases"),
    ("bus", "buses"),
];

// ============================================================================
// Inflection
// ============================================================================

/// Split a snake_case word into everything up to the last segment and the last segment.
fn split_last_segment(word: &str) -> (&str, &str) {
    match word.rfind('_') {
        Some(idx) => (&word[..=idx], &word[idx + 1..]),
        None => ("", word),
    }
}

fn ends_with_consonant_y(lower: &str) -> bool {
    lower.len() > 1
        && lower.ends_with('y')
        && !matches!(
            lower.as_bytes()[lower.len() - 2],
            b'a' | b'e' | b'i' | b'o' | b'u'
        )
}

/// Pluralize the last segment of a snake_case word.
///
/// Words that already look plural are returned unchanged.
///
/// # Examples
/// ```
/// use fixtree_naming::pluralize;
///
/// assert_eq!(pluralize("post"), "posts");
/// assert_eq!(pluralize("category"), "categories");
/// assert_eq!(pluralize("user_address"), "user_addresses");
/// assert_eq!(pluralize("status"), "statuses");
/// assert_eq!(pluralize("person"), "people");
/// assert_eq!(pluralize("posts"), "posts");
/// ```
pub fn pluralize(word: &str) -> String {
    let (head, last) = split_last_segment(word);
    let lower = last.to_lowercase();

    if last.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return format!("{head}{plural}");
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
        return word.to_string();
    }

    let plural = if ["ss", "x", "ch", "sh", "zz"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        format!("{last}es")
    } else if lower.ends_with('s') {
        last.to_string()
    } else if ends_with_consonant_y(&lower) {
        format!("{}ies", &last[..last.len() - 1])
    } else {
        format!("{last}s")
    };

    format!("{head}{plural}")
}

/// Singularize the last segment of a snake_case word.
///
/// # Examples
/// ```
/// use fixtree_naming::singularize;
///
/// assert_eq!(singularize("posts"), "post");
/// assert_eq!(singularize("categories"), "category");
/// assert_eq!(singularize("user_addresses"), "user_address");
/// assert_eq!(singularize("statuses"), "status");
/// assert_eq!(singularize("people"), "person");
/// assert_eq!(singularize("post"), "post");
/// ```
pub fn singularize(word: &str) -> String {
    let (head, last) = split_last_segment(word);
    let lower = last.to_lowercase();

    if last.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == lower) {
        return format!("{head}{singular}");
    }
    if IRREGULAR.iter().any(|(singular, _)| *singular == lower) {
        return word.to_string();
    }

    let singular = if lower.len() > 3 && lower.ends_with("ies") {
        format!("{}y", &last[..last.len() - 3])
    } else if ["sses", "xes", "ches", "shes", "zzes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        last[..last.len() - 2].to_string()
    } else if lower.ends_with("ss") || lower.ends_with("us") {
        last.to_string()
    } else if let Some(stripped) = last.strip_suffix(['s', 'S']) {
        stripped.to_string()
    } else {
        last.to_string()
    };

    format!("{head}{singular}")
}

/// Convert snake_case to CamelCase.
///
/// # Examples
/// ```
/// use fixtree_naming::camelize;
///
/// assert_eq!(camelize("user_role"), "UserRole");
/// assert_eq!(camelize("post"), "Post");
/// assert_eq!(camelize("UserRole"), "UserRole");
/// ```
pub fn camelize(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize = true;
    for c in s.chars() {
        if c == '_' || c == '-' {
            capitalize = true;
            continue;
        }
        if capitalize {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
        capitalize = false;
    }
    result
}

/// Convert CamelCase to snake_case.
///
/// # Examples
/// ```
/// use fixtree_naming::underscore;
///
/// assert_eq!(underscore("UserRole"), "user_role");
/// assert_eq!(underscore("HTTPRequest"), "http_request");
/// assert_eq!(underscore("post"), "post");
/// assert_eq!(underscore("api-key"), "api_key");
/// ```
pub fn underscore(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' {
            result.push('_');
            continue;
        }
        if c.is_ascii_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
                if prev.is_ascii_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_ascii_uppercase() && next_is_lower)
                {
                    result.push('_');
                }
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Class name for a table or association name.
///
/// # Examples
/// ```
/// use fixtree_naming::classify;
///
/// assert_eq!(classify("user_roles"), "UserRole");
/// assert_eq!(classify("posts"), "Post");
/// assert_eq!(classify("author"), "Author");
/// assert_eq!(classify("User"), "User");
/// ```
pub fn classify(name: &str) -> String {
    camelize(&singularize(&underscore(name)))
}

/// Table name for a class name.
///
/// # Examples
/// ```
/// use fixtree_naming::tableize;
///
/// assert_eq!(tableize("UserRole"), "user_roles");
/// assert_eq!(tableize("Person"), "people");
/// ```
pub fn tableize(class_name: &str) -> String {
    pluralize(&underscore(class_name))
}

/// Foreign key column pointing at a class.
///
/// # Examples
/// ```
/// use fixtree_naming::foreign_key;
///
/// assert_eq!(foreign_key("User"), "user_id");
/// assert_eq!(foreign_key("UserRole"), "user_role_id");
/// ```
pub fn foreign_key(class_name: &str) -> String {
    format!("{}_id", underscore(class_name))
}

/// Default join table for a many-to-many association: both table names in
/// lexical order joined with an underscore.
///
/// # Examples
/// ```
/// use fixtree_naming::join_table_name;
///
/// assert_eq!(join_table_name("users", "roles"), "roles_users");
/// assert_eq!(join_table_name("posts", "tags"), "posts_tags");
/// ```
pub fn join_table_name(left: &str, right: &str) -> String {
    if left <= right {
        format!("{left}_{right}")
    } else {
        format!("{right}_{left}")
    }
}

// ============================================================================
// Fixture Keys
// ============================================================================

/// Synthetic fixture key for a row with an integer primary key.
/// Format: {Class}-{id:05}
pub fn fixture_key(class_name: &str, id: i64) -> String {
    format!("{class_name}-{id:05}")
}

/// Ordinal key for a join table row.
/// Format: join_{index:05}
pub fn join_key(index: usize) -> String {
    format!("join_{index:05}")
}
