pub mod commit;

use crate::domain::email::Email;
use crate::domain::query::{EmailQueryParams, PageMeta, PageResult, SortDir, SortField};

/// Filter, sort and paginate in one pass. Pure: the input collection is
/// never mutated; the page holds fresh clones of the matching records.
///
/// Total over any input — an empty collection yields `total = 0`,
/// `total_pages = 1` and an empty page, and a page past the end comes
/// back empty with its metadata intact.
pub fn apply(emails: &[Email], params: &EmailQueryParams) -> PageResult {
    let q_search = lowered(params.search.as_deref());
    let q_sender = lowered(params.sender.as_deref());
    let q_subject = lowered(params.subject.as_deref());

    let mut matched: Vec<&Email> = emails
        .iter()
        .filter(|email| {
            // Favorite is one-way: true shows favorites only, false or
            // absent shows everything.
            if params.is_favorite == Some(true) && !email.is_favorite {
                return false;
            }
            // Global search matches sender and subject only. Body is
            // deliberately left out; see DESIGN.md.
            if let Some(q) = &q_search {
                let haystack = format!("{} {}", email.sender, email.subject).to_lowercase();
                if !haystack.contains(q.as_str()) {
                    return false;
                }
            }
            if let Some(q) = &q_sender {
                if !email.sender.to_lowercase().contains(q.as_str()) {
                    return false;
                }
            }
            if let Some(q) = &q_subject {
                if !email.subject.to_lowercase().contains(q.as_str()) {
                    return false;
                }
            }
            if let Some(range) = &params.date {
                // Both bounds inclusive at the boundary instant.
                if let Some(from) = range.from {
                    if email.date < from {
                        return false;
                    }
                }
                if let Some(to) = range.to {
                    if email.date > to {
                        return false;
                    }
                }
            }
            true
        })
        .collect();

    match params.sort_by {
        Some(SortField::Subject) => {
            matched.sort_by(|a, b| cmp_text(&a.subject, &b.subject));
        }
        Some(SortField::Sender) => {
            matched.sort_by(|a, b| cmp_text(&a.sender, &b.sender));
        }
        Some(SortField::Date) => {
            matched.sort_by_key(|email| email.date);
        }
        None => {}
    }
    // Descending is always "ascending, then reversed". On duplicate sort
    // keys this flips tie order relative to a true descending comparator,
    // and with no sort field it reverses filter order; both are kept as
    // observable behavior.
    if params.sort_dir == SortDir::Desc {
        matched.reverse();
    }

    let total = matched.len();
    let limit = params.limit.max(1) as usize;
    let total_pages = total.div_ceil(limit).max(1);

    let start = params.page.saturating_sub(1) as usize * limit;
    let emails = if start >= total {
        Vec::new()
    } else {
        let end = (start + limit).min(total);
        matched[start..end].iter().map(|e| (*e).clone()).collect()
    };

    log::debug!("query: {total} matched, page {}/{total_pages}", params.page);

    PageResult {
        emails,
        meta: PageMeta {
            page: params.page,
            limit: params.limit,
            total,
            total_pages,
        },
    }
}

fn lowered(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.is_empty()).map(str::to_lowercase)
}

/// Case-insensitive lexicographic order, standing in for the original
/// locale-aware collation.
fn cmp_text(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
