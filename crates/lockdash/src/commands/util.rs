//! Shared helpers for command handlers.

use chrono::{DateTime, Utc};

use lockdash_core::{CodeUsed, Pagination};

use crate::error::CliError;

pub fn fmt_time(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn fmt_code_used(code: &CodeUsed) -> String {
    match code {
        CodeUsed::None => "-".into(),
        CodeUsed::Button => "Button".into(),
        CodeUsed::Code(value) => value.clone(),
    }
}

pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

/// "Page 2 of 5 (43 total)" footer for paginated listings.
pub fn page_footer(pagination: &Pagination) -> String {
    let mut line = format!("Page {} of {}", pagination.page, pagination.pages.max(1));
    if let Some(total) = pagination.total {
        line.push_str(&format!(" ({total} total)"));
    }
    if pagination.has_next() {
        line.push_str(&format!(", next: --page {}", pagination.page + 1));
    }
    line
}

/// Reject page numbers the backend would answer with an empty listing.
pub fn validate_page(page: u32) -> Result<u32, CliError> {
    if page == 0 {
        return Err(CliError::Validation {
            field: "page".into(),
            reason: "pages are numbered from 1".into(),
        });
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_used_display() {
        assert_eq!(fmt_code_used(&CodeUsed::None), "-");
        assert_eq!(fmt_code_used(&CodeUsed::Button), "Button");
        assert_eq!(fmt_code_used(&CodeUsed::Code("1234".into())), "1234");
    }

    #[test]
    fn footer_mentions_next_page() {
        let pagination = Pagination {
            page: 1,
            pages: 3,
            total: Some(12),
            per_page: Some(5),
        };
        assert_eq!(
            page_footer(&pagination),
            "Page 1 of 3 (12 total), next: --page 2"
        );
    }

    #[test]
    fn footer_on_last_page() {
        let pagination = Pagination {
            page: 2,
            pages: 2,
            total: None,
            per_page: None,
        };
        assert_eq!(page_footer(&pagination), "Page 2 of 2");
    }

    #[test]
    fn page_zero_rejected() {
        assert!(validate_page(0).is_err());
        assert_eq!(validate_page(4).ok(), Some(4));
    }
}
