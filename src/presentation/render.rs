//! Plain-text rendering for terminal output.

use std::fmt;

use crate::application::pagination::PageLink;

use super::views::{CardView, CategoryListView, ListingPageView};

impl fmt::Display for CardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{key:<10} {title} [{badge}]\n           {gender} · {age} · {area}\n           {status}  {path}",
            key = self.navigation_key.to_string(),
            title = self.title,
            badge = self.badge_text,
            gender = self.gender_text,
            age = self.age_location_text,
            area = self.area_text,
            status = self.status_text,
            path = self.detail_path(),
        )
    }
}

/// The numbered pagination bar, e.g. `‹ 1 … 5 [6] 7 … 10 ›`.
pub struct PaginationBar<'a> {
    pub window: &'a [PageLink],
    pub has_previous: bool,
    pub has_next: bool,
}

impl fmt::Display for PaginationBar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.has_previous { "‹" } else { " " })?;
        for link in self.window {
            match link {
                PageLink::Page {
                    number,
                    current: true,
                } => write!(f, " [{number}]")?,
                PageLink::Page { number, .. } => write!(f, " {number}")?,
                PageLink::Ellipsis => f.write_str(" …")?,
            }
        }
        f.write_str(if self.has_next { " ›" } else { "  " })
    }
}

impl fmt::Display for ListingPageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = self.message {
            writeln!(f, "{message}")?;
        }
        for card in &self.cards {
            writeln!(f, "{card}")?;
        }
        let bar = PaginationBar {
            window: &self.window,
            has_previous: self.has_previous,
            has_next: self.has_next,
        };
        write!(
            f,
            "{bar}  trang {}/{} · {} kết quả",
            self.current_page, self.total_pages, self.total_matches
        )
    }
}

impl fmt::Display for CategoryListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for option in &self.options {
            match option.id {
                Some(id) => writeln!(f, "{id:>4}  {}", option.label)?,
                None => writeln!(f, "   -  {}", option.label)?,
            }
        }
        Ok(())
    }
}
