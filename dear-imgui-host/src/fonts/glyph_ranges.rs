/// Inclusive range of codepoints to rasterize.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct GlyphRange {
    pub start: u32,
    pub end: u32,
}

impl GlyphRange {
    /// Basic Latin and Latin-1 Supplement
    pub const DEFAULT: [GlyphRange; 1] = [GlyphRange::new(0x0020, 0x00FF)];

    /// Printable ASCII
    pub const ASCII: [GlyphRange; 1] = [GlyphRange::new(0x0020, 0x007E)];

    /// Font Awesome 5 private use area
    pub const FONT_AWESOME: [GlyphRange; 1] = [GlyphRange::new(0xF000, 0xF8FF)];

    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Valid characters in this range
    pub fn chars(&self) -> impl Iterator<Item = char> {
        (self.start..=self.end).filter_map(char::from_u32)
    }

    pub fn contains(&self, ch: char) -> bool {
        (self.start..=self.end).contains(&(ch as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_inclusive() {
        let range = GlyphRange::new('a' as u32, 'c' as u32);
        assert_eq!(range.chars().collect::<String>(), "abc");
        assert!(range.contains('c'));
        assert!(!range.contains('d'));
    }

    #[test]
    fn surrogates_are_skipped() {
        let range = GlyphRange::new(0xD7FF, 0xE000);
        assert_eq!(range.chars().count(), 2);
    }
}
