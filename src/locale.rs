//! Locales understood by the MagicPod API.
//!
//! The locale selects the language of `human_readable_steps` returned by the
//! service. Each locale also owns the marker that introduces a shared-step
//! reference in that language, so adding a locale here is all it takes to
//! teach the step extractor a new marker.

use clap::ValueEnum;
use std::fmt;

/// Language requested from the API through `Accept-Language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Locale {
    /// English step text.
    En,
    /// Japanese step text.
    #[default]
    Ja,
}

impl Locale {
    /// Every supported locale, in the order their markers are checked.
    pub const ALL: [Self; 2] = [Self::En, Self::Ja];

    /// Value sent in the `Accept-Language` header.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ja => "ja",
        }
    }

    /// Prefix marking a line as a shared-step reference in this locale.
    ///
    /// Markers must not be prefixes of one another.
    #[must_use]
    pub const fn reference_marker(self) -> &'static str {
        match self {
            Self::En => "Shared step:",
            Self::Ja => "共有ステップ:",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
