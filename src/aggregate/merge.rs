//! Pure selection and merge logic for the composite endpoints.
//!
//! Kept free of I/O so every policy is testable in isolation: the handlers
//! fetch, these functions decide.

use serde_json::Value;

/// Uppercased first character of a team name, `None` for an empty name.
pub fn first_letter(name: &str) -> Option<char> {
    name.chars().next().map(|c| c.to_ascii_uppercase())
}

/// Whether a team payload signals "not found": absent entirely or carrying
/// an `error` field, the two shapes the sports backend produces.
pub fn is_error_payload(entity: &Value) -> bool {
    entity.is_null() || entity.get("error").is_some()
}

/// Select one recipe with an injected index picker.
///
/// `pick` receives the collection length and returns an index; the production
/// picker is uniform random, tests inject a deterministic one. Out-of-range
/// picks clamp to the last element rather than faulting. `None` only for an
/// empty collection.
pub fn pick_recipe(recipes: &[Value], pick: impl Fn(usize) -> usize) -> Option<&Value> {
    if recipes.is_empty() {
        return None;
    }
    let index = pick(recipes.len()).min(recipes.len() - 1);
    recipes.get(index)
}

/// First recipe (collection order) whose name starts with `letter`.
pub fn first_starting_with(recipes: &[Value], letter: char) -> Option<&Value> {
    recipes.iter().find(|recipe| {
        recipe
            .get("name")
            .and_then(Value::as_str)
            .is_some_and(|name| name.starts_with(letter))
    })
}
