//! Product category slugs.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when deriving a [`Category`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CategoryError {
    /// The input string is empty (or whitespace only).
    #[error("category cannot be empty")]
    Empty,
}

/// A category slug used for grouping and filtering products.
///
/// Categories double as CSS class names on the storefront, so free-form
/// input is normalized into a slug: lowercased, every character outside
/// `[a-z0-9-]` replaced by `-`, and runs of `-` collapsed to one. The
/// transform does not trim leading or trailing hyphens; whatever it
/// produces is what gets persisted and filtered on.
///
/// ## Examples
///
/// ```
/// use maos_de_fada_core::Category;
///
/// assert_eq!(Category::slugify("Amigurumi").unwrap().as_str(), "amigurumi");
/// assert_eq!(Category::slugify("Tricô & Crochê!!").unwrap().as_str(), "tric-croch-");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Derive a category slug from free-form input.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::Empty`] if the input is empty or
    /// whitespace only.
    pub fn slugify(input: &str) -> Result<Self, CategoryError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CategoryError::Empty);
        }

        let lowered = trimmed.to_lowercase();
        let mut slug = String::with_capacity(lowered.len());
        let mut last_was_hyphen = false;
        for c in lowered.chars() {
            let mapped = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            };
            if mapped == '-' {
                if !last_was_hyphen {
                    slug.push('-');
                }
                last_was_hyphen = true;
            } else {
                slug.push(mapped);
                last_was_hyphen = false;
            }
        }

        Ok(Self(slug))
    }

    /// Wrap a slug loaded from the catalog store without re-normalizing.
    ///
    /// Persisted categories are already slugs; loading must not alter them.
    #[must_use]
    pub fn from_stored(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// The slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_replaces_specials() {
        assert_eq!(Category::slugify("Bordado").unwrap().as_str(), "bordado");
        assert_eq!(
            Category::slugify("Tricô & Crochê!!").unwrap().as_str(),
            "tric-croch-"
        );
    }

    #[test]
    fn slugify_collapses_hyphen_runs() {
        assert_eq!(
            Category::slugify("laços -- de fita").unwrap().as_str(),
            "la-os-de-fita"
        );
        assert_eq!(Category::slugify("a___b").unwrap().as_str(), "a-b");
    }

    #[test]
    fn slugify_keeps_digits_and_existing_hyphens() {
        assert_eq!(
            Category::slugify("kit-bebe-2024").unwrap().as_str(),
            "kit-bebe-2024"
        );
    }

    #[test]
    fn slugify_rejects_empty_input() {
        assert!(matches!(Category::slugify(""), Err(CategoryError::Empty)));
        assert!(matches!(Category::slugify("   "), Err(CategoryError::Empty)));
    }
}
