//! Page-at-a-time presentation of a single text block.
//!
//! Pages are delimited by [`PAGE_BREAK`]. The text is copied once and never
//! mutated; page boundaries are byte ranges computed by a forward scan when
//! the pager is built. The reader only ever moves forward.

use std::ops::Range;

use thiserror::Error;

pub const PAGE_BREAK: char = '\n';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    HasMore,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PagerError {
    #[error("cutscene text is empty")]
    EmptyText,
}

#[derive(Debug, Clone)]
pub struct TextPager {
    text: String,
    pages: Vec<Range<usize>>,
    index: usize,
    total_length: usize,
}

impl TextPager {
    pub fn new(raw: &str) -> Result<Self, PagerError> {
        if raw.is_empty() {
            return Err(PagerError::EmptyText);
        }

        let mut pages = Vec::new();
        let mut start = 0;
        for (offset, _) in raw.match_indices(PAGE_BREAK) {
            pages.push(start..offset);
            start = offset + PAGE_BREAK.len_utf8();
        }
        // A trailing marker closes the last page rather than opening an empty one.
        if start < raw.len() || pages.is_empty() {
            pages.push(start..raw.len());
        }

        Ok(TextPager {
            text: raw.to_string(),
            pages,
            index: 0,
            total_length: raw.len() - 1,
        })
    }

    pub fn current_page(&self) -> &str {
        &self.text[self.pages[self.index].clone()]
    }

    /// Moves to the next page when one follows the current page's marker.
    /// Once exhausted the pager stays put.
    pub fn advance(&mut self) -> Advance {
        let page = &self.pages[self.index];
        if page.end < self.total_length {
            debug_assert!(self.index + 1 < self.pages.len());
            self.index += 1;
            Advance::HasMore
        } else {
            Advance::Exhausted
        }
    }

    /// Byte offset of the current page's first character.
    pub fn cursor(&self) -> usize {
        self.pages[self.index].start
    }

    pub fn total_length(&self) -> usize {
        self.total_length
    }

    pub fn page_index(&self) -> usize {
        self.index
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_last_page(&self) -> bool {
        self.index + 1 == self.pages.len()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
