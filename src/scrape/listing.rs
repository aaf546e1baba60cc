use super::selector;
use crate::core::config::SiteConfig;
use scraper::{Html, Selector};
use std::sync::LazyLock;

pub const FUND_LINK_SELECTOR: &str = "a.pos-rel.f22Link";

static FUND_LINK: LazyLock<Selector> = LazyLock::new(|| selector(FUND_LINK_SELECTOR));

/// Absolute URLs of the fund pages linked from a listing page, in page order.
pub fn extract_fund_links(page: &str, site: &SiteConfig) -> Vec<String> {
    Html::parse_document(page)
        .select(&FUND_LINK)
        .filter_map(|link| link.value().attr("href"))
        .map(|href| site.resolve(href))
        .collect()
}
