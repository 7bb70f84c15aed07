use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::email::Email;

pub const DEFAULT_LIMIT: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Subject,
    Sender,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// Inclusive date range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Filter/sort/pagination request. Immutable per engine invocation;
/// callers rebuild it between renders (see [`crate::query::commit`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailQueryParams {
    pub limit: u32,
    pub page: u32,
    pub search: Option<String>,
    pub sender: Option<String>,
    pub subject: Option<String>,
    pub date: Option<DateRange>,
    pub sort_by: Option<SortField>,
    pub sort_dir: SortDir,
    pub is_favorite: Option<bool>,
}

impl Default for EmailQueryParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: 1,
            search: None,
            sender: None,
            subject: None,
            date: None,
            sort_by: None,
            sort_dir: SortDir::Asc,
            is_favorite: None,
        }
    }
}

/// One parameter edit coming from the UI surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamChange {
    Search(Option<String>),
    Sender(Option<String>),
    Subject(Option<String>),
    Date(Option<DateRange>),
    IsFavorite(Option<bool>),
    SortBy(Option<SortField>),
    SortDir(SortDir),
    Limit(u32),
    Page(u32),
}

impl ParamChange {
    /// Text-filter edits come from keystrokes and are coalesced before
    /// committing; everything else commits immediately.
    pub fn is_text_filter(&self) -> bool {
        matches!(
            self,
            ParamChange::Search(_) | ParamChange::Sender(_) | ParamChange::Subject(_)
        )
    }

    fn is_filter(&self) -> bool {
        matches!(
            self,
            ParamChange::Search(_)
                | ParamChange::Sender(_)
                | ParamChange::Subject(_)
                | ParamChange::Date(_)
                | ParamChange::IsFavorite(_)
        )
    }
}

impl EmailQueryParams {
    /// Apply one edit. Any filter-field change resets `page` to 1;
    /// changing only the page (or sort/limit) does not.
    pub fn apply_change(&mut self, change: ParamChange) {
        let reset_page = change.is_filter();
        match change {
            ParamChange::Search(v) => self.search = v,
            ParamChange::Sender(v) => self.sender = v,
            ParamChange::Subject(v) => self.subject = v,
            ParamChange::Date(v) => self.date = v,
            ParamChange::IsFavorite(v) => self.is_favorite = v,
            ParamChange::SortBy(v) => self.sort_by = v,
            ParamChange::SortDir(v) => self.sort_dir = v,
            ParamChange::Limit(v) => self.limit = v.max(1),
            ParamChange::Page(v) => self.page = v.max(1),
        }
        if reset_page {
            self.page = 1;
        }
    }
}

/// Pagination metadata for one result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub total_pages: usize,
}

/// The engine's output: a bounded slice of matches plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub emails: Vec<Email>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_change_resets_page() {
        let mut params = EmailQueryParams {
            page: 7,
            ..EmailQueryParams::default()
        };
        params.apply_change(ParamChange::Search(Some("alice".into())));
        assert_eq!(params.page, 1);
        assert_eq!(params.search.as_deref(), Some("alice"));
    }

    #[test]
    fn page_change_keeps_other_fields() {
        let mut params = EmailQueryParams::default();
        params.apply_change(ParamChange::Sender(Some("bob".into())));
        params.apply_change(ParamChange::Page(3));
        assert_eq!(params.page, 3);
        assert_eq!(params.sender.as_deref(), Some("bob"));
    }

    #[test]
    fn sort_change_does_not_reset_page() {
        let mut params = EmailQueryParams {
            page: 4,
            ..EmailQueryParams::default()
        };
        params.apply_change(ParamChange::SortBy(Some(SortField::Date)));
        params.apply_change(ParamChange::SortDir(SortDir::Desc));
        assert_eq!(params.page, 4);
    }

    #[test]
    fn limit_and_page_are_clamped_to_one() {
        let mut params = EmailQueryParams::default();
        params.apply_change(ParamChange::Limit(0));
        params.apply_change(ParamChange::Page(0));
        assert_eq!(params.limit, 1);
        assert_eq!(params.page, 1);
    }
}
