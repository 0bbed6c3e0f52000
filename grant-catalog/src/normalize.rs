//! Canonicalisation of arbitrarily keyed source rows.
//!
//! Each canonical field has an ordered alias list. The first alias whose
//! value is non-empty wins; a field with no usable alias becomes `""`.

use crate::types::{RawRow, Record};

const TITLE: &[&str] = &["title", "program_title", "사업명", "프로그램명", "name", "제목"];
const REGION: &[&str] = &["region", "지역"];
const TARGET: &[&str] = &["target", "대상"];
const INDUSTRY: &[&str] = &["industry", "산업분야", "분야"];
const BUDGET: &[&str] = &["budget", "예산"];
const BENEFIT_TYPE: &[&str] = &["benefit_type", "유형", "지원형태"];
const DEADLINE: &[&str] = &["deadline", "마감일", "접수마감"];
const LINK: &[&str] = &["link", "링크", "url"];
const SUMMARY: &[&str] = &["summary", "요약", "설명"];
const KEYWORDS: &[&str] = &["keywords", "키워드"];

/// First non-empty value among `aliases`, in order.
fn lookup(row: &RawRow, aliases: &[&str]) -> String {
    aliases
        .iter()
        .filter_map(|alias| row.get(alias))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Map a raw row onto the canonical [`Record`] shape. Never fails.
pub fn normalize(row: &RawRow) -> Record {
    Record {
        title: lookup(row, TITLE),
        region: lookup(row, REGION),
        target: lookup(row, TARGET),
        industry: lookup(row, INDUSTRY),
        budget: lookup(row, BUDGET),
        benefit_type: lookup(row, BENEFIT_TYPE),
        deadline: lookup(row, DEADLINE),
        link: lookup(row, LINK),
        summary: lookup(row, SUMMARY),
        keywords: lookup(row, KEYWORDS),
    }
}
