//! Admission gates for scraped titles and links.
//!
//! Listing pages mix real announcements with navigation, footer and
//! notice-board links. A candidate is kept only when both its title and
//! its link look like they belong to a programme announcement.

use url::Url;

/// Title terms that mark site furniture: terms of service, privacy,
/// sitemap, notices, maintenance, amendments, and staff recruiting.
const NEGATIVE_TERMS: &[&str] = &[
    "이용약관",
    "개인정보",
    "사이트맵",
    "공지사항",
    "점검",
    "수정 안내",
    "채용",
];

/// Title terms that mark a programme: support, business, announcement,
/// recruitment, voucher, package, startup, subsidy, R&D.
const POSITIVE_TERMS: &[&str] = &[
    "지원", "사업", "공고", "모집", "바우처", "패키지", "창업", "보조", "R&D",
];

/// Titles without a positive term must be at least this many characters.
const MIN_TITLE_CHARS: usize = 8;

/// Path or query fragments typical of detail pages.
const DETAIL_HINTS: &[&str] = &["detail", "view", "notice", "bbs", "board", "post", "article"];

/// A query string must be longer than this to count as present.
const MIN_QUERY_CHARS: usize = 2;

/// Whether `title` looks like a programme announcement.
///
/// Negative terms veto, positive terms admit, and anything else is
/// admitted only when it is long enough to be more than a nav label.
pub fn passes_title(title: &str) -> bool {
    if title.trim().is_empty() {
        return false;
    }
    if NEGATIVE_TERMS.iter().any(|term| title.contains(term)) {
        return false;
    }
    if POSITIVE_TERMS.iter().any(|term| title.contains(term)) {
        return true;
    }
    title.chars().count() >= MIN_TITLE_CHARS
}

/// Whether `link` looks like a detail page rather than a category or
/// navigation link. Unparsable links are rejected.
pub fn is_detail_link(link: &str) -> bool {
    let Ok(url) = Url::parse(link) else {
        return false;
    };
    let path = url.path().to_lowercase();
    let query = url.query().unwrap_or_default().to_lowercase();

    let has_hint = DETAIL_HINTS
        .iter()
        .any(|hint| path.contains(hint) || query.contains(hint));
    if has_hint {
        return true;
    }

    let deep_path = path.split('/').filter(|s| !s.is_empty()).count() >= 2;
    let has_query = query.chars().count() > MIN_QUERY_CHARS;
    deep_path && has_query
}

/// Resolve `href` against `base`.
///
/// Absolute `http(s)` links are returned unchanged. Empty or unresolvable
/// links become `""`.
pub fn resolve_link(base: &str, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    let lower = href.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return href.to_string();
    }
    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_titles_rejected() {
        assert!(!passes_title(""));
        assert!(!passes_title("   "));
    }

    #[test]
    fn negative_terms_veto_even_with_positive_terms() {
        assert!(!passes_title("창업지원 홈페이지 이용약관"));
        assert!(!passes_title("시스템 점검 안내"));
        assert!(!passes_title("2024년 직원 채용 공고"));
    }

    #[test]
    fn positive_terms_admit_short_titles() {
        assert!(passes_title("R&D 공고"));
        assert!(passes_title("바우처"));
    }

    #[test]
    fn neutral_titles_need_minimum_length() {
        assert!(!passes_title("로그인"));
        assert!(!passes_title("더보기 >"));
        assert!(passes_title("2025 글로벌 액셀러레이팅 프로그램"));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // Seven Hangul syllables are 21 bytes but only 7 characters.
        assert!(!passes_title("가나다라마바사"));
        assert!(passes_title("가나다라마바사아"));
    }

    #[test]
    fn board_view_link_admitted() {
        assert!(is_detail_link("https://example.org/board/view?id=42"));
    }

    #[test]
    fn site_root_rejected() {
        assert!(!is_detail_link("https://example.org/"));
    }

    #[test]
    fn hint_in_query_admitted() {
        assert!(is_detail_link("https://example.org/index.do?mode=detail"));
    }

    #[test]
    fn deep_path_with_query_admitted() {
        assert!(is_detail_link("https://example.org/web/contents/item.do?pbancSn=1234"));
    }

    #[test]
    fn deep_path_without_query_rejected() {
        assert!(!is_detail_link("https://example.org/web/contents/intro.do"));
    }

    #[test]
    fn shallow_path_with_query_rejected() {
        assert!(!is_detail_link("https://example.org/list.do?page=2"));
    }

    #[test]
    fn malformed_link_rejected() {
        assert!(!is_detail_link(""));
        assert!(!is_detail_link("javascript:void(0)x"));
        assert!(!is_detail_link("/relative/only"));
    }

    #[test]
    fn hint_match_is_case_insensitive() {
        assert!(is_detail_link("https://example.org/BBS/List.do"));
    }

    #[test]
    fn resolve_keeps_absolute_links() {
        assert_eq!(
            resolve_link("https://base.org/", "HTTPS://other.org/view?id=1"),
            "HTTPS://other.org/view?id=1"
        );
    }

    #[test]
    fn resolve_joins_relative_links() {
        assert_eq!(
            resolve_link("https://www.bizinfo.go.kr/web/lay1/list.do", "/web/view.do?id=7"),
            "https://www.bizinfo.go.kr/web/view.do?id=7"
        );
        assert_eq!(
            resolve_link("https://www.bizinfo.go.kr/web/lay1/list.do", "view.do?id=7"),
            "https://www.bizinfo.go.kr/web/lay1/view.do?id=7"
        );
    }

    #[test]
    fn resolve_empty_or_broken_is_empty() {
        assert_eq!(resolve_link("https://base.org/", ""), "");
        assert_eq!(resolve_link("not a base", "/x"), "");
    }
}
