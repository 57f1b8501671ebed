//! Human-readable names derived from preview class and method identifiers

use heck::ToSnakeCase;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PREVIEW_SUFFIX: Regex = Regex::new(r"(_mailer)?_preview$").unwrap();
}

/// Lower snake case form of a class id; `::` namespace separators become `/`.
///
/// `"OrderMailerPreview"` -> `"order_mailer_preview"`,
/// `"Admin::WelcomePreview"` -> `"admin/welcome_preview"`.
pub fn underscore(class_id: &str) -> String {
    class_id
        .split("::")
        .map(|segment| segment.to_snake_case())
        .collect::<Vec<_>>()
        .join("/")
}

/// Leading underscores are dropped, the rest become spaces, and the result is
/// lower-cased except for its first character.
pub fn humanize(identifier: &str) -> String {
    let spaced = identifier.trim_start_matches('_').replace('_', " ");

    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Group label for a preview class, without the `_mailer_preview` / `_preview` suffix
pub fn group_name(class_id: &str) -> String {
    let underscored = underscore(class_id);
    humanize(&PREVIEW_SUFFIX.replace(&underscored, ""))
}

/// Label for a preview method, e.g. `"welcome_email"` -> `"Welcome email"`
pub fn method_name(method_id: &str) -> String {
    humanize(method_id)
}
