//! String utilities for deriving entity ids from display names.

/// Lowercase, collapse every run of non-alphanumerics to `-`, trim the edges.
///
/// `"Main St. Café #2"` becomes `"main-st-caf-2"`.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for c in value.trim().chars().flat_map(char::to_lowercase) {
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

/// Build `<prefix>-<parts...>` skipping empty parts, then append `suffix` when
/// `taken` reports a collision. A suffixed id that is also taken gets a counter
/// (`-2`, `-3`, ...) until it is free.
pub fn unique_id(
    prefix: &str,
    parts: &[&str],
    suffix: impl FnOnce() -> String,
    taken: impl Fn(&str) -> bool,
) -> String {
    let mut base = String::from(prefix);
    for part in parts.iter().filter(|p| !p.is_empty()) {
        base.push('-');
        base.push_str(part);
    }
    if !taken(&base) {
        return base;
    }
    let stamped = format!("{base}-{}", suffix());
    if !taken(&stamped) {
        return stamped;
    }
    let mut n = 2u64;
    loop {
        let candidate = format!("{stamped}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
