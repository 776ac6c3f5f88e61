use heck::{ToSnakeCase, ToUpperCamelCase};
use serde::{Deserialize, Serialize};

/// Short tokens that read as acronyms and stay fully lowercase in the
/// first-letter-lowered variant ("Id" would otherwise come out as "Id").
const LOWER_ACRONYMS: &[&str] = &["id", "ids", "ip", "ips", "api", "url", "uri"];

/// All derived spellings of one source name.
///
/// Variants are computed once at extraction time so templates and fragments
/// never re-derive them (derivation is deterministic and idempotent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSet {
    /// Name exactly as it appeared in the source schema
    pub raw: String,
    /// `UpperCamelCase` variant (e.g. `OrderItem`)
    pub upper_camel: String,
    /// `lowerCamel` variant with acronym handling (e.g. `orderItem`, `id`)
    pub lower_camel: String,
    /// `snake_case` variant (e.g. `order_item`)
    pub snake: String,
    /// Pluralized snake variant (e.g. `order_items`)
    pub plural_snake: String,
    /// Pluralized `UpperCamelCase` variant (e.g. `OrderItems`)
    pub plural_upper_camel: String,
}

impl NameSet {
    pub fn derive(raw: &str) -> Self {
        let snake = raw.to_snake_case();
        let plural_snake = pluralize(&snake);
        NameSet {
            raw: raw.to_string(),
            upper_camel: raw.to_upper_camel_case(),
            lower_camel: lower_camel(raw),
            snake,
            plural_snake: plural_snake.clone(),
            plural_upper_camel: plural_snake.to_upper_camel_case(),
        }
    }
}

/// First-letter-lowered camel variant.
///
/// Acronym-like tokens (`id`, `ip` and their plurals) are forced fully
/// lowercase regardless of the general casing rules, so `ID` becomes `id`
/// rather than `iD`.
pub fn lower_camel(s: &str) -> String {
    let camel = s.to_upper_camel_case();
    let lowered = camel.to_lowercase();
    if LOWER_ACRONYMS.contains(&lowered.as_str()) {
        return lowered;
    }
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Pluralize a name, treating names that already look plural as fixed points.
///
/// Rules, in order:
/// - trailing `s` that is not a sibilant double-`s` → already plural, unchanged
/// - sibilant endings (`ss`, `x`, `z`, `ch`, `sh`) → append `es`
/// - consonant + `y` → replace `y` with `ies`
/// - everything else → append `s`
///
/// Idempotent by construction: every produced form ends in a plain trailing
/// `s` and is returned unchanged on a second pass.
pub fn pluralize(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    let lower = s.to_lowercase();
    if lower.ends_with('s') && !lower.ends_with("ss") {
        return s.to_string();
    }
    if lower.ends_with("ss")
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{s}es");
    }
    if lower.ends_with('y') {
        let stem: Vec<char> = s.chars().collect();
        if stem.len() >= 2 {
            let before = stem[stem.len() - 2].to_ascii_lowercase();
            if !matches!(before, 'a' | 'e' | 'i' | 'o' | 'u') {
                return format!("{}ies", &s[..s.len() - 1]);
            }
        }
    }
    format!("{s}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize_regular() {
        assert_eq!(pluralize("user"), "users");
        assert_eq!(pluralize("order_item"), "order_items");
    }

    #[test]
    fn test_pluralize_sibilants() {
        assert_eq!(pluralize("class"), "classes");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("batch"), "batches");
    }

    #[test]
    fn test_pluralize_y_endings() {
        assert_eq!(pluralize("city"), "cities");
        assert_eq!(pluralize("day"), "days");
    }

    #[test]
    fn test_pluralize_idempotent() {
        for name in ["user", "class", "city", "box"] {
            let once = pluralize(name);
            assert_eq!(pluralize(&once), once, "double-pluralized {name}");
        }
    }

    #[test]
    fn test_lower_camel_acronyms() {
        assert_eq!(lower_camel("id"), "id");
        assert_eq!(lower_camel("ID"), "id");
        assert_eq!(lower_camel("ids"), "ids");
        assert_eq!(lower_camel("ip"), "ip");
        assert_eq!(lower_camel("user_id"), "userId");
    }

    #[test]
    fn test_name_set_derive() {
        let names = NameSet::derive("order_item");
        assert_eq!(names.upper_camel, "OrderItem");
        assert_eq!(names.lower_camel, "orderItem");
        assert_eq!(names.snake, "order_item");
        assert_eq!(names.plural_snake, "order_items");
        assert_eq!(names.plural_upper_camel, "OrderItems");
    }
}
