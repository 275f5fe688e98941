//! Translation of the small XPath subset used for locating day entries into
//! CSS selectors that `scraper` understands.
//!
//! Supported: `//` descendant steps, `/` child steps, `[@attr='v']`,
//! `[contains(@attr, 'v')]`, positional `[n]` and a trailing `/text()`.

use anyhow::{Result, bail};
use scraper::Selector;

pub fn xpath_to_css_selector(xpath: &str) -> Result<String> {
    let mut css = xpath.trim().to_string();

    // Text extraction is done by the caller, select the element itself
    if let Some(stripped) = css.strip_suffix("/text()") {
        css = stripped.to_string();
    }

    // Handle contains() FIRST, before the plain attribute pattern can eat the '@'
    let re_contains = regex::Regex::new(r#"\[contains\(@([\w-]+),\s*'([^']*)'\)\]"#)?;
    css = re_contains
        .replace_all(&css, |caps: &regex::Captures| {
            format!("[{}*=\"{}\"]", &caps[1], &caps[2])
        })
        .to_string();

    let re_attr_eq = regex::Regex::new(r#"\[@([\w-]+)\s*=\s*'([^']*)'\]"#)?;
    css = re_attr_eq
        .replace_all(&css, |caps: &regex::Captures| {
            format!("[{}=\"{}\"]", &caps[1], &caps[2])
        })
        .to_string();

    // tag[n] counts same-named siblings, which is exactly nth-of-type
    let re_position = regex::Regex::new(r"\[(\d+)\]")?;
    css = re_position.replace_all(&css, ":nth-of-type($1)").to_string();

    if css.contains('@') || css.replace(":nth-of-type(", "").contains('(') {
        bail!("unsupported XPath construct in '{}'", xpath);
    }

    // Relative context prefix
    if let Some(stripped) = css.strip_prefix("./") {
        css = stripped.to_string();
    }

    // '//' is a descendant step, '/' a child step
    let steps: Vec<String> = css
        .split("//")
        .map(|segment| {
            segment
                .split('/')
                .filter(|step| !step.is_empty())
                .collect::<Vec<_>>()
                .join(" > ")
        })
        .filter(|segment| !segment.is_empty())
        .collect();

    if steps.is_empty() {
        bail!("empty XPath expression '{}'", xpath);
    }

    Ok(steps.join(" "))
}

/// Convert and compile in one go.
pub fn compile(xpath: &str) -> Result<Selector> {
    let css = xpath_to_css_selector(xpath)?;
    Selector::parse(&css).map_err(|e| anyhow::anyhow!("Invalid CSS selector '{}': {}", css, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_equality() {
        let css = xpath_to_css_selector("//ul[@class='thrui']/li").unwrap();
        assert_eq!(css, "ul[class=\"thrui\"] > li");
    }

    #[test]
    fn test_contains_attribute() {
        let css = xpath_to_css_selector("//div[contains(@class, 'weather-table')]/ul/li").unwrap();
        assert_eq!(css, "div[class*=\"weather-table\"] > ul > li");
    }

    #[test]
    fn test_positional_steps() {
        let css = xpath_to_css_selector("/html/body/div[7]/div[1]/div[4]/ul/div").unwrap();
        assert_eq!(
            css,
            "html > body > div:nth-of-type(7) > div:nth-of-type(1) > div:nth-of-type(4) > ul > div"
        );
    }

    #[test]
    fn test_relative_text_step() {
        let css = xpath_to_css_selector("./div[2]/text()").unwrap();
        assert_eq!(css, "div:nth-of-type(2)");
    }

    #[test]
    fn test_inner_descendant_step() {
        let css = xpath_to_css_selector("//table//td[@id='x']").unwrap();
        assert_eq!(css, "table td[id=\"x\"]");
    }

    #[test]
    fn test_unsupported_constructs_are_rejected() {
        assert!(xpath_to_css_selector("//a/@href").is_err());
        assert!(xpath_to_css_selector("//li[last()]").is_err());
        assert!(xpath_to_css_selector("//").is_err());
    }

    #[test]
    fn test_compile_produces_working_selector() {
        let selector = compile("//ul[@class='thrui']/li").unwrap();
        let doc = scraper::Html::parse_document(
            "<ul class='thrui'><li>a</li><li>b</li></ul><ul class='other'><li>c</li></ul>",
        );
        assert_eq!(doc.select(&selector).count(), 2);
    }
}
