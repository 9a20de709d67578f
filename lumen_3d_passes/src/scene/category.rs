/// Drawable categories and the set type used as an exclusion filter.

use bitflags::bitflags;

/// Category every drawable is tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawableCategory {
    /// Light representation geometry (markers, gizmos)
    Light,
    /// Regular scene geometry
    Model,
}

bitflags! {
    /// Set of drawable categories
    ///
    /// Passes use it as an exclusion filter: drawables whose category is
    /// in the set are skipped. `Categories::empty()` excludes nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Categories: u8 {
        const LIGHT = 0b01;
        const MODEL = 0b10;
    }
}

impl DrawableCategory {
    /// Single-element set for this category
    pub fn flag(self) -> Categories {
        match self {
            DrawableCategory::Light => Categories::LIGHT,
            DrawableCategory::Model => Categories::MODEL,
        }
    }

    /// True when `exclude` filters this category out
    pub fn is_excluded_by(self, exclude: Categories) -> bool {
        exclude.contains(self.flag())
    }
}

impl From<DrawableCategory> for Categories {
    fn from(category: DrawableCategory) -> Self {
        category.flag()
    }
}
