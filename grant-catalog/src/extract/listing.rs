//! Listing-page descriptions and HTML extraction.
//!
//! A [`ListingPage`] carries an ordered list of [`SelectorStrategy`]
//! values. Extraction adopts the first strategy whose container selector
//! matches at least `min_nodes` nodes, so an empty or decorative list
//! is never picked by accident. Upstream markup changes break this
//! silently, which is why the adopted strategy is logged.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::types::RawRow;

use super::heuristics::{is_detail_link, passes_title, resolve_link};

/// One way of locating announcement nodes on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorStrategy {
    /// Selector for the repeated announcement node (row or list item).
    pub container: String,
    /// Selectors for the title anchor inside a node, tried in order.
    pub title: Vec<String>,
    /// Selector for the issuing agency label.
    pub agency: String,
    /// Selector for the application period label.
    pub period: String,
}

impl SelectorStrategy {
    fn new(container: &str, title: &[&str], agency: &str, period: &str) -> Self {
        Self {
            container: container.into(),
            title: title.iter().map(|s| (*s).to_string()).collect(),
            agency: agency.into(),
            period: period.into(),
        }
    }
}

/// A listing page to scrape and the defaults stamped on its rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPage {
    /// Label written to the `source` column of extracted rows.
    pub source: String,
    /// Page URL; also the base for resolving relative links.
    pub url: String,
    /// Strategies tried in order.
    pub strategies: Vec<SelectorStrategy>,
    /// Region used when a node has no agency label.
    #[serde(default = "default_region")]
    pub default_region: String,
    /// Eligible applicants for every programme on this page.
    #[serde(default)]
    pub target: String,
    /// Benefit type for every programme on this page.
    #[serde(default = "default_benefit_type")]
    pub benefit_type: String,
}

fn default_region() -> String {
    "중앙".into()
}

fn default_benefit_type() -> String {
    "지원사업".into()
}

impl ListingPage {
    /// K-Startup ongoing programme announcements.
    pub fn k_startup() -> Self {
        let fields = |container: &str| {
            SelectorStrategy::new(container, &["a.tit", "a"], ".name, .org", ".date, .period")
        };
        Self {
            source: "K-Startup".into(),
            url: "https://www.k-startup.go.kr/web/contents/bizpbanc-ongoing.do".into(),
            strategies: vec![
                fields(".list_ty1 li"),
                fields(".list-type1 li"),
                fields(".tbl_list tbody tr"),
                fields("ul li"),
            ],
            default_region: default_region(),
            target: "청년/예비창업/창업".into(),
            benefit_type: default_benefit_type(),
        }
    }

    /// BizInfo support programme board.
    pub fn bizinfo() -> Self {
        let fields = |container: &str| {
            SelectorStrategy::new(
                container,
                &["td.td_left a", "a"],
                "td:nth-child(3), .org",
                "td:nth-child(5), .date",
            )
        };
        Self {
            source: "기업마당".into(),
            url: "https://www.bizinfo.go.kr/web/lay1/bbs/S1T122C128/AS/74/list.do".into(),
            strategies: vec![
                fields(".table_list tbody tr"),
                fields(".bbsList tbody tr"),
                fields("table tbody tr"),
                fields("ul li"),
            ],
            default_region: default_region(),
            target: "중소기업/청년".into(),
            benefit_type: default_benefit_type(),
        }
    }

    /// Turn an admitted candidate into a raw row for the normaliser.
    pub fn to_raw_row(&self, candidate: &ExtractionCandidate) -> RawRow {
        let region = if candidate.agency.is_empty() {
            self.default_region.clone()
        } else {
            candidate.agency.clone()
        };
        let mut row = RawRow::new();
        row.insert("source", self.source.clone());
        row.insert("title", candidate.title.clone());
        row.insert("region", region);
        row.insert("target", self.target.clone());
        row.insert("benefit_type", self.benefit_type.clone());
        row.insert("deadline", candidate.period.clone());
        row.insert("link", candidate.link.clone());
        row
    }
}

/// Fields scraped from one announcement node, before admission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionCandidate {
    pub title: String,
    /// Absolute link, or `""` if none could be resolved.
    pub link: String,
    pub agency: String,
    pub period: String,
}

/// What a listing page yielded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Container selector of the adopted strategy, if any qualified.
    pub strategy: Option<String>,
    /// Nodes matched by the adopted strategy.
    pub matched_nodes: usize,
    /// Candidates that passed both admission gates.
    pub candidates: Vec<ExtractionCandidate>,
}

/// Extract admitted candidates from `html` using `page`'s strategies.
///
/// Invalid selectors are skipped, never raised.
pub fn extract_listing(html: &str, page: &ListingPage, min_nodes: usize) -> Extraction {
    let document = Html::parse_document(html);

    for strategy in &page.strategies {
        let Some(container) = parse_selector(&strategy.container) else {
            tracing::warn!(source = %page.source, selector = %strategy.container, "invalid container selector");
            continue;
        };
        let nodes: Vec<ElementRef<'_>> = document.select(&container).collect();
        if nodes.len() < min_nodes {
            tracing::trace!(
                source = %page.source,
                selector = %strategy.container,
                matched = nodes.len(),
                "strategy below node threshold"
            );
            continue;
        }

        let title_selectors: Vec<Selector> =
            strategy.title.iter().filter_map(|s| parse_selector(s)).collect();
        let agency = parse_selector(&strategy.agency);
        let period = parse_selector(&strategy.period);

        let candidates = nodes
            .iter()
            .filter_map(|node| {
                let (title, href) = title_and_href(node, &title_selectors)?;
                Some(ExtractionCandidate {
                    title,
                    link: resolve_link(&page.url, &href),
                    agency: first_text(node, agency.as_ref()),
                    period: first_text(node, period.as_ref()),
                })
            })
            .filter(|c| passes_title(&c.title) && is_detail_link(&c.link))
            .collect::<Vec<_>>();

        tracing::debug!(
            source = %page.source,
            strategy = %strategy.container,
            matched = nodes.len(),
            admitted = candidates.len(),
            "listing strategy adopted"
        );
        return Extraction {
            strategy: Some(strategy.container.clone()),
            matched_nodes: nodes.len(),
            candidates,
        };
    }

    tracing::debug!(source = %page.source, "no listing strategy matched");
    Extraction::default()
}

fn parse_selector(selector: &str) -> Option<Selector> {
    Selector::parse(selector).ok()
}

/// Title text and href of the first title selector with non-empty text.
fn title_and_href(node: &ElementRef<'_>, selectors: &[Selector]) -> Option<(String, String)> {
    selectors.iter().find_map(|selector| {
        let anchor = node.select(selector).next()?;
        let title = collapse_whitespace(&anchor.text().collect::<String>());
        if title.is_empty() {
            return None;
        }
        let href = anchor.value().attr("href").unwrap_or_default().to_string();
        Some((title, href))
    })
}

fn first_text(node: &ElementRef<'_>, selector: Option<&Selector>) -> String {
    selector
        .and_then(|s| node.select(s).next())
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
