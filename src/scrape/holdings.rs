//! Holdings table of a fund page.

use super::{element_text, selector};
use crate::core::model::{FundSnapshot, Holding};
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use std::str::FromStr;
use std::sync::LazyLock;

/// Present once the holdings table has been rendered.
pub const HOLDINGS_TABLE_SELECTOR: &str = "table.tb10Table.holdings101Table";

/// "See All" control that reveals holdings beyond the first few rows.
pub const HOLDINGS_EXPANDER_SELECTOR: &str = "#holdings101Container > div > div > div > div";

static SCHEME_NAME: LazyLock<Selector> =
    LazyLock::new(|| selector("h1.mfh239SchemeName.displaySmall"));
static HOLDINGS_TABLE: LazyLock<Selector> = LazyLock::new(|| selector(HOLDINGS_TABLE_SELECTOR));
static HOLDING_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr.holdings101Row"));
static STOCK_NAME: LazyLock<Selector> = LazyLock::new(|| selector("div.pc543Links"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static STOCK_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.contentPrimary"));

/// Reads the scheme name and holdings from a rendered fund page.
///
/// Returns `None` when the page has no scheme heading or no holdings table.
/// Rows without a name, a percentage cell or a link are left out.
pub fn extract_holdings(page: &str) -> Option<FundSnapshot> {
    let document = Html::parse_document(page);

    let scheme_name = document.select(&SCHEME_NAME).next().map(element_text)?;
    let table = document.select(&HOLDINGS_TABLE).next()?;

    let holdings = table.select(&HOLDING_ROW).filter_map(parse_row).collect();

    Some(FundSnapshot {
        scheme_name,
        holdings,
    })
}

fn parse_row(row: ElementRef<'_>) -> Option<Holding> {
    let stock_name = row.select(&STOCK_NAME).next().map(element_text)?;
    let percent_text = row
        .select(&CELL)
        .map(element_text)
        .find(|text| text.contains('%'))?;
    // A cell like "N/A %" is as good as no cell.
    let holding_percent = Decimal::from_str(percent_text.replace('%', "").trim()).ok()?;
    let stock_url = row
        .select(&STOCK_LINK)
        .find_map(|link| link.value().attr("href"))?;

    Some(Holding::new(&stock_name, holding_percent, stock_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(name: Option<&str>, percent: Option<&str>, href: Option<&str>) -> String {
        let name = name
            .map(|n| format!(r#"<div class="pc543Links">{n}</div>"#))
            .unwrap_or_default();
        let link = href
            .map(|h| format!(r#"<a class="contentPrimary" href="{h}">{name}</a>"#))
            .unwrap_or(name);
        let percent = percent
            .map(|p| format!("<td>{p}</td>"))
            .unwrap_or_default();
        format!(
            r#"<tr class="holdings101Row"><td>{link}</td><td>Banking</td><td>Equity</td>{percent}</tr>"#
        )
    }

    fn fund_page(heading: Option<&str>, rows: &[String]) -> String {
        let heading = heading
            .map(|h| format!(r#"<h1 class="mfh239SchemeName displaySmall"> {h} </h1>"#))
            .unwrap_or_default();
        format!(
            r#"<html><body>{heading}<div id="holdings101Container">
            <table class="tb10Table holdings101Table"><tbody>{}</tbody></table>
            </div></body></html>"#,
            rows.concat()
        )
    }

    #[test]
    fn test_extract_holdings_in_row_order() {
        let page = fund_page(
            Some("Axis Bluechip Fund Direct Growth"),
            &[
                row(Some("HDFC Bank Ltd."), Some("9.42%"), Some("/stocks/hdfc-bank-ltd")),
                row(Some("ICICI Bank Ltd."), Some(" 8.10 % "), Some("/stocks/icici-bank-ltd")),
                row(Some("Infosys Ltd."), Some("6.05%"), Some("/stocks/infosys-ltd")),
            ],
        );

        let snapshot = extract_holdings(&page).unwrap();
        assert_eq!(snapshot.scheme_name, "Axis Bluechip Fund Direct Growth");
        assert_eq!(
            snapshot.holdings,
            vec![
                Holding::new("HDFC Bank Ltd.", dec!(9.42), "/stocks/hdfc-bank-ltd"),
                Holding::new("ICICI Bank Ltd.", dec!(8.10), "/stocks/icici-bank-ltd"),
                Holding::new("Infosys Ltd.", dec!(6.05), "/stocks/infosys-ltd"),
            ]
        );
    }

    #[test]
    fn test_rows_missing_fields_are_skipped() {
        let page = fund_page(
            Some("Fund"),
            &[
                row(Some("No Percent Ltd."), None, Some("/stocks/no-percent")),
                row(None, Some("1.00%"), Some("/stocks/no-name")),
                row(Some("No Link Ltd."), Some("2.00%"), None),
                row(Some("Bad Percent Ltd."), Some("-- %"), Some("/stocks/bad")),
                row(Some("Kept Ltd."), Some("3.00%"), Some("/stocks/kept")),
            ],
        );

        let snapshot = extract_holdings(&page).unwrap();
        assert_eq!(snapshot.holdings.len(), 1);
        assert_eq!(snapshot.holdings[0].stock_name, "Kept Ltd.");
        assert_eq!(snapshot.holdings[0].holding_percent, dec!(3.00));
    }

    #[test]
    fn test_percent_is_not_bounds_checked() {
        let page = fund_page(
            Some("Fund"),
            &[row(Some("Odd Ltd."), Some("104.5%"), Some("/stocks/odd"))],
        );

        let snapshot = extract_holdings(&page).unwrap();
        assert_eq!(snapshot.holdings[0].holding_percent, dec!(104.5));
    }

    #[test]
    fn test_missing_heading_or_table_is_unscrapeable() {
        let rows = [row(Some("A"), Some("1%"), Some("/stocks/a"))];
        assert!(extract_holdings(&fund_page(None, &rows)).is_none());

        let no_table = r#"<h1 class="mfh239SchemeName displaySmall">Fund</h1><p>No holdings</p>"#;
        assert!(extract_holdings(no_table).is_none());
    }

    #[test]
    fn test_empty_table_gives_empty_snapshot() {
        let snapshot = extract_holdings(&fund_page(Some("Fund"), &[])).unwrap();
        assert_eq!(snapshot.scheme_name, "Fund");
        assert!(snapshot.holdings.is_empty());
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let page = fund_page(
            Some("Fund"),
            &[row(Some("A Ltd."), Some("4.2%"), Some("/stocks/a"))],
        );
        assert_eq!(extract_holdings(&page), extract_holdings(&page));
    }
}
