//! Browsable record categories.
//!
//! A category is a named style filter on the records endpoint.

use std::borrow::Cow;
use std::fmt;

/// A record category shown in the shop navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    slug: Cow<'static, str>,
    name: Cow<'static, str>,
}

/// Categories featured on the home page. Also the category list when the
/// styles endpoint cannot be reached.
pub const CATEGORIES: &[Category] = &[
    Category::featured("jungle", "Jungle"),
    Category::featured("dub", "Dub"),
    Category::featured("house", "House"),
    Category::featured("liquid", "Liquid Funk"),
];

impl Category {
    const fn featured(slug: &'static str, name: &'static str) -> Self {
        Self {
            slug: Cow::Borrowed(slug),
            name: Cow::Borrowed(name),
        }
    }

    /// Look up a featured category by slug.
    #[must_use]
    pub fn find(slug: &str) -> Option<&'static Self> {
        CATEGORIES.iter().find(|category| category.slug == slug)
    }

    /// Resolve a slug, falling back to an ad-hoc category whose style name is
    /// the slug with dashes turned into spaces (`drum-n-bass` -> `drum n bass`).
    #[must_use]
    pub fn from_slug(slug: &str) -> Self {
        Self::find(slug).cloned().unwrap_or_else(|| Self {
            slug: Cow::Owned(slug.to_owned()),
            name: Cow::Owned(slug.replace('-', " ")),
        })
    }

    /// Category for a style from the styles endpoint. The slug is the name
    /// lowercased with each whitespace run replaced by `-`; the name is kept
    /// as the style filter.
    #[must_use]
    pub fn from_style_name(name: &str) -> Self {
        let mut slug = String::with_capacity(name.len());
        let mut in_space = false;
        for c in name.chars() {
            if c.is_whitespace() {
                if !in_space {
                    slug.push('-');
                }
                in_space = true;
            } else {
                slug.extend(c.to_lowercase());
                in_space = false;
            }
        }

        Self {
            slug: Cow::Owned(slug),
            name: Cow::Owned(name.to_owned()),
        }
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value for the catalog's `style` filter.
    #[must_use]
    pub fn style_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.slug)
    }
}
