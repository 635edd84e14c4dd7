//! Engine behavior presets.
//!
//! A [`ScrapingProfile`] names the set of engine behavior flags applied to
//! every browser session, so alternate profiles can be added without
//! touching fetch logic.
//!
//! # Example
//!
//! ```
//! use browser_fetch::ScrapingProfile;
//!
//! // Default preset: CSS off, images off, popups blocked.
//! let profile = ScrapingProfile::default();
//! assert!(!profile.load_css);
//!
//! // Everything back on, for rendering-sensitive pages.
//! let profile = ScrapingProfile::permissive();
//! assert!(profile.load_images);
//! ```

// ============================================================================
// ScrapingProfile
// ============================================================================

/// Named preset for per-session engine behavior flags.
///
/// The default profile is tuned for scraping: stylesheets and images are
/// not loaded and popups are blocked. Sessions are always private and
/// discarded per call, so no history accumulates regardless of profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapingProfile {
    /// Download and apply stylesheets.
    pub load_css: bool,

    /// Download images.
    pub load_images: bool,

    /// Block popup windows.
    pub block_popups: bool,
}

impl Default for ScrapingProfile {
    fn default() -> Self {
        Self {
            load_css: false,
            load_images: false,
            block_popups: true,
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ScrapingProfile {
    /// Creates the default scraping preset.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a preset with stylesheets, images and popups all enabled.
    #[inline]
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            load_css: true,
            load_images: true,
            block_popups: false,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ScrapingProfile {
    /// Sets whether stylesheets are loaded.
    #[inline]
    #[must_use]
    pub fn with_css(mut self, load_css: bool) -> Self {
        self.load_css = load_css;
        self
    }

    /// Sets whether images are downloaded.
    #[inline]
    #[must_use]
    pub fn with_images(mut self, load_images: bool) -> Self {
        self.load_images = load_images;
        self
    }

    /// Sets whether popup windows are blocked.
    #[inline]
    #[must_use]
    pub fn with_popups_blocked(mut self, block_popups: bool) -> Self {
        self.block_popups = block_popups;
        self
    }
}

// ============================================================================
// Conversion Methods
// ============================================================================

impl ScrapingProfile {
    /// Converts the preset to engine launch arguments.
    ///
    /// Stylesheet suppression has no launch flag and is enforced through
    /// response interception instead; see [`Self::blocks_stylesheets`].
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(2);

        if !self.load_images {
            args.push("--blink-settings=imagesEnabled=false".to_string());
        }

        if self.block_popups {
            args.push("--block-new-web-contents".to_string());
        }

        args
    }

    /// Returns `true` if stylesheet responses must be blocked.
    #[inline]
    #[must_use]
    pub const fn blocks_stylesheets(&self) -> bool {
        !self.load_css
    }

    /// Returns `true` if image responses must be blocked.
    #[inline]
    #[must_use]
    pub const fn blocks_images(&self) -> bool {
        !self.load_images
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_scraping_preset() {
        let profile = ScrapingProfile::default();
        assert!(!profile.load_css);
        assert!(!profile.load_images);
        assert!(profile.block_popups);
    }

    #[test]
    fn test_permissive_enables_everything() {
        let profile = ScrapingProfile::permissive();
        assert!(profile.load_css);
        assert!(profile.load_images);
        assert!(!profile.block_popups);
        assert!(profile.to_args().is_empty());
    }

    #[test]
    fn test_builder_chain() {
        let profile = ScrapingProfile::new()
            .with_css(true)
            .with_images(true)
            .with_popups_blocked(false);
        assert_eq!(profile, ScrapingProfile::permissive());
    }

    #[test]
    fn test_default_args() {
        let args = ScrapingProfile::default().to_args();
        assert!(args.contains(&"--blink-settings=imagesEnabled=false".to_string()));
        assert!(args.contains(&"--block-new-web-contents".to_string()));
    }

    #[test]
    fn test_default_blocks_stylesheets() {
        assert!(ScrapingProfile::default().blocks_stylesheets());
        assert!(!ScrapingProfile::permissive().blocks_stylesheets());
    }
}
