// src/util/text.rs
use crate::domain::Reference;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FILE_EXTENSION_REGEX: Regex =
        Regex::new(r"(?i)\.(pdf|jpg|png|ppt|pptx)$").expect("Failed to compile extension regex");
}

/// Reference name without a trailing document or image extension.
///
/// # Examples
///
/// ```
/// use studyaid::util::text::display_name;
///
/// assert_eq!(display_name("Lecture 3.PDF"), "Lecture 3");
/// assert_eq!(display_name("notes.txt"), "notes.txt");
/// ```
pub fn display_name(name: &str) -> String {
    FILE_EXTENSION_REGEX.replace(name, "").into_owned()
}

/// Numbered reference lines for inclusion in prompts:
/// `1. name - description (Source: url)`
pub fn reference_context_lines(references: &[Reference]) -> String {
    references
        .iter()
        .enumerate()
        .map(|(index, reference)| {
            let description = reference.description().unwrap_or("No description available");
            match reference.url() {
                Some(url) => format!(
                    "{}. {} - {} (Source: {})",
                    index + 1,
                    reference.name,
                    description,
                    url
                ),
                None => format!("{}. {} - {}", index + 1, reference.name, description),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mask all but the last four characters of a secret
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
