use crate::prelude::*;

/// Heading depth of a chapter on the legal notice page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Level {
    /// A top-level section, rendered as `h2`.
    Section,
    /// A sub-section of a [`Level::Section`], rendered as `h3`.
    Subsection,
}

impl Level {
    pub(crate) fn number(&self) -> u8 {
        match self {
            Self::Section => 1,
            Self::Subsection => 2,
        }
    }
}

/// Whether the site is run by a single person or by a group of people.
///
/// Selects between the two phrasings of [`ChapterContent::Styled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Voice {
    Singular,
    Plural,
}

impl Voice {
    /// Singular iff the site has exactly one administrator.
    pub(crate) fn for_administrators(count: usize) -> Self {
        if count == 1 { Self::Singular } else { Self::Plural }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ChapterContent {
    Paragraphs(Vec<String>),
    Styled {
        singular: Vec<String>,
        plural: Vec<String>,
    },
}

impl ChapterContent {
    pub(crate) fn empty() -> Self {
        Self::Paragraphs(Vec::default())
    }

    pub(crate) fn paragraphs(&self, voice: Voice) -> &[String] {
        match (self, voice) {
            (Self::Paragraphs(paragraphs), _) => paragraphs,
            (Self::Styled { singular, .. }, Voice::Singular) => singular,
            (Self::Styled { plural, .. }, Voice::Plural) => plural,
        }
    }
}

/// One section of legal notice text, as shown on the page and in the admin form.
///
/// Chapters are built by [`crate::order::merge`] from catalog metadata; the
/// level/link pairing is taken from there unchecked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Chapter {
    key: &'static str,
    id: u16,
    heading: &'static str,
    level: Level,
    link: u16,
    enabled: bool,
    content: ChapterContent,
}

impl Chapter {
    pub(crate) fn new(key: &'static str, id: u16, heading: &'static str, level: Level, link: u16, enabled: bool, content: ChapterContent) -> Self {
        Self { key, id, heading, level, link, enabled, content }
    }

    pub(crate) fn key(&self) -> &'static str { self.key }
    pub(crate) fn id(&self) -> u16 { self.id }
    pub(crate) fn heading(&self) -> &'static str { self.heading }
    pub(crate) fn level(&self) -> Level { self.level }
    pub(crate) fn enabled(&self) -> bool { self.enabled }
    pub(crate) fn content(&self) -> &ChapterContent { &self.content }

    /// The id of the parent section, unless this is a top-level chapter.
    pub(crate) fn parent(&self) -> Option<u16> {
        (self.link != 0).then_some(self.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_follows_administrator_count() {
        assert_eq!(Voice::for_administrators(0), Voice::Plural);
        assert_eq!(Voice::for_administrators(1), Voice::Singular);
        assert_eq!(Voice::for_administrators(3), Voice::Plural);
    }

    #[test]
    fn styled_content_picks_phrasing() {
        let content = ChapterContent::Styled {
            singular: vec![format!("I wrote this.")],
            plural: vec![format!("We wrote this.")],
        };
        assert_eq!(content.paragraphs(Voice::Singular), [format!("I wrote this.")]);
        assert_eq!(content.paragraphs(Voice::Plural), [format!("We wrote this.")]);
        let flat = ChapterContent::Paragraphs(vec![format!("Same for everyone.")]);
        assert_eq!(flat.paragraphs(Voice::Singular), flat.paragraphs(Voice::Plural));
    }

    #[test]
    fn top_level_chapter_has_no_parent() {
        let section = Chapter::new("Legal", 1, "Legal", Level::Section, 0, true, ChapterContent::empty());
        let sub = Chapter::new("Links", 2, "Links", Level::Subsection, 1, false, ChapterContent::empty());
        assert_eq!(section.parent(), None);
        assert_eq!(sub.parent(), Some(1));
        assert_eq!(sub.level().number(), 2);
        assert!(!sub.enabled());
    }
}
