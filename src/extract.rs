use anyhow::Result;
use log::{debug, info};
use scraper::{ElementRef, Html};

use crate::record::{DailyRecord, MonthResult};
use crate::selector;

/// Where the day list lives on the current site layout.
pub const PRIMARY_QUERY: &str = "//ul[@class='thrui']/li";
/// Older / redesigned layouts.
pub const FALLBACK_QUERY: &str = "//div[contains(@class, 'weather-table')]/ul/li";

const CELSIUS_MARKERS: [&str; 2] = ["°C", "℃"];

/// Parse every day entry out of a month page.
///
/// A page without any entry node is not an error, it yields no records.
/// Entries without a date are skipped; any other missing field becomes an
/// empty string.
pub fn extract_records(markup: &str) -> Result<MonthResult> {
    let document = Html::parse_document(markup);

    let primary = selector::compile(PRIMARY_QUERY)?;
    let mut entries: Vec<ElementRef> = document.select(&primary).collect();

    if entries.is_empty() {
        debug!("Primary query matched nothing, trying fallback query");
        let fallback = selector::compile(FALLBACK_QUERY)?;
        entries = document.select(&fallback).collect();
    }

    if entries.is_empty() {
        return Ok(Vec::new());
    }

    info!("Found {} day entries", entries.len());

    let records = entries.into_iter().filter_map(parse_entry).collect();
    Ok(records)
}

fn parse_entry(entry: ElementRef) -> Option<DailyRecord> {
    let date = field_text(entry, 0)?.split_whitespace().next()?.to_string();

    let high_temp = field_text(entry, 1).map(strip_celsius).unwrap_or_default();
    let low_temp = field_text(entry, 2).map(strip_celsius).unwrap_or_default();
    let weather = field_text(entry, 3).map(str::to_string).unwrap_or_default();
    let wind_direction = field_text(entry, 4)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    Some(DailyRecord {
        date,
        high_temp,
        low_temp,
        weather,
        wind_direction,
    })
}

/// First direct text node of the `index`-th `div` child, like `./div[n]/text()`.
fn field_text(entry: ElementRef<'_>, index: usize) -> Option<&str> {
    let div = entry
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "div")
        .nth(index)?;

    div.children()
        .find_map(|node| node.value().as_text())
        .map(|text| &**text)
}

/// Drop a trailing Celsius marker; text without one is returned untouched.
pub fn strip_celsius(raw: &str) -> String {
    let trimmed = raw.trim_end();
    for marker in CELSIUS_MARKERS {
        if let Some(value) = trimmed.strip_suffix(marker) {
            return value.to_string();
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, high: &str, low: &str, weather: &str, wind: &str) -> String {
        format!(
            "<li><div>{}</div><div>{}</div><div>{}</div><div>{}</div><div>{}</div></li>",
            date, high, low, weather, wind
        )
    }

    fn page(entries: &[String]) -> String {
        format!(
            "<html><body><ul class=\"thrui\">{}</ul></body></html>",
            entries.concat()
        )
    }

    #[test]
    fn test_empty_markup_yields_nothing() {
        assert!(extract_records("").unwrap().is_empty());
        assert!(extract_records("<html><body><p>暂无数据</p></body></html>").unwrap().is_empty());
    }

    #[test]
    fn test_full_entry() {
        let html = page(&[entry("2012-01-01 星期日", "28°C", "19°C", "多云", " 东风 2级 ")]);
        let records = extract_records(&html).unwrap();
        assert_eq!(
            records,
            vec![DailyRecord {
                date: "2012-01-01".to_string(),
                high_temp: "28".to_string(),
                low_temp: "19".to_string(),
                weather: "多云".to_string(),
                wind_direction: "东风 2级".to_string(),
            }]
        );
    }

    #[test]
    fn test_fallback_query() {
        let html = format!(
            "<div class=\"box weather-table\"><ul>{}</ul></div>",
            entry("2012-02-03", "25°C", "18°C", "晴", "北风")
        );
        let records = extract_records(&html).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, "2012-02-03");
    }

    #[test]
    fn test_primary_query_requires_exact_class() {
        // class="thrui wide" is not class='thrui' and has no weather-table fallback
        let html = format!(
            "<ul class=\"thrui wide\">{}</ul>",
            entry("2012-02-03", "25°C", "18°C", "晴", "北风")
        );
        assert!(extract_records(&html).unwrap().is_empty());
    }

    #[test]
    fn test_dateless_entries_are_skipped() {
        let html = page(&[
            entry("2012-01-01", "28°C", "19°C", "多云", "东风"),
            "<li><div></div><div>27°C</div><div>18°C</div><div>晴</div><div>南风</div></li>".to_string(),
            "<li><span>广告</span></li>".to_string(),
            entry("   ", "27°C", "18°C", "晴", "南风"),
            entry("2012-01-02", "26°C", "17°C", "阴", "西风"),
        ]);
        let records = extract_records(&html).unwrap();
        let dates: Vec<&str> = records.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2012-01-01", "2012-01-02"]);
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let html = page(&["<li><div>2012-01-05</div><div>30°C</div></li>".to_string()]);
        let records = extract_records(&html).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].high_temp, "30");
        assert_eq!(records[0].low_temp, "");
        assert_eq!(records[0].weather, "");
        assert_eq!(records[0].wind_direction, "");
    }

    #[test]
    fn test_only_direct_text_is_read() {
        let html = page(&[
            "<li><div>2012-01-06</div><div><span>31</span></div><div>20°C</div><div>雨</div><div>东北风</div></li>"
                .to_string(),
        ]);
        let records = extract_records(&html).unwrap();
        assert_eq!(records[0].high_temp, "");
        assert_eq!(records[0].low_temp, "20");
    }

    #[test]
    fn test_document_order_is_preserved() {
        let html = page(&[
            entry("2012-01-01", "", "", "", ""),
            entry("2012-01-03", "", "", "", ""),
            entry("2012-01-02", "", "", "", ""),
            "<li><p>no date here</p></li>".to_string(),
        ]);
        let records = extract_records(&html).unwrap();
        let dates: Vec<&str> = records.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2012-01-01", "2012-01-03", "2012-01-02"]);
    }

    #[test]
    fn test_strip_celsius() {
        assert_eq!(strip_celsius("28°C"), "28");
        assert_eq!(strip_celsius("-3℃"), "-3");
        assert_eq!(strip_celsius("28"), "28");
        assert_eq!(strip_celsius("28°F"), "28°F");
        assert_eq!(strip_celsius(""), "");
    }
}
