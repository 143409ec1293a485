//! URL slugs derived from display names.

/// Derive a slug: lowercase ASCII, runs of anything outside `[a-z0-9]`
/// collapsed to one `-`, no leading or trailing `-`.
///
/// ```
/// use storefront::slug::slugify;
///
/// assert_eq!(slugify("Sports Shoes"), "sports-shoes");
/// assert_eq!(slugify("  T-Shirts & Tops!  "), "t-shirts-tops");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Best-effort display name for a slug: words split on `-`, first letter
/// upper-cased.
///
/// ```
/// use storefront::slug::slug_to_name;
///
/// assert_eq!(slug_to_name("sports-shoes"), "Sports Shoes");
/// ```
#[must_use]
pub fn slug_to_name(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
