//! Rendering options.

/// Options for markdown rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include YAML frontmatter with document metadata
    pub include_frontmatter: bool,

    /// Maximum heading level (1-6); deeper headings clamp to this
    pub max_heading: u8,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Include or omit YAML frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Set the heading-level clamp.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading = level;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: false,
            max_heading: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_frontmatter(true)
            .with_max_heading(3);
        assert!(options.include_frontmatter);
        assert_eq!(options.max_heading, 3);
    }

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert!(!options.include_frontmatter);
        assert_eq!(options.max_heading, 6);
    }
}
