//! Naming helpers shared by the catalog and the compiler

/// Lower-case the first character: `OrderItem` → `orderItem`.
///
/// Entities are addressed in source scripts by this form of their name.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Upper-case the first character: `orderItem` → `OrderItem`.
pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
