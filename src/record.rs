use serde::{Deserialize, Serialize};

/// Sort key used for records whose date is missing.
pub const SENTINEL_DATE: &str = "9999-99-99";

/// One calendar day of weather, as scraped. Field renames are the CSV header labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    #[serde(rename = "日期")]
    pub date: String,
    #[serde(rename = "最高气温")]
    pub high_temp: String,
    #[serde(rename = "最低气温")]
    pub low_temp: String,
    #[serde(rename = "天气")]
    pub weather: String,
    #[serde(rename = "风向")]
    pub wind_direction: String,
}

impl DailyRecord {
    /// The date used for ordering, falling back to [`SENTINEL_DATE`].
    pub fn sort_date(&self) -> &str {
        if self.date.is_empty() {
            SENTINEL_DATE
        } else {
            &self.date
        }
    }

    /// `YYYY-MM` prefix of the date, or `None` for a dateless record.
    pub fn month_key(&self) -> Option<&str> {
        if self.date.is_empty() {
            return None;
        }
        Some(self.date.get(..7).unwrap_or(&self.date))
    }
}

/// Records scraped from a single month page.
pub type MonthResult = Vec<DailyRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> DailyRecord {
        DailyRecord {
            date: date.to_string(),
            high_temp: String::new(),
            low_temp: String::new(),
            weather: String::new(),
            wind_direction: String::new(),
        }
    }

    #[test]
    fn test_sort_date_falls_back_to_sentinel() {
        assert_eq!(record("").sort_date(), SENTINEL_DATE);
        assert_eq!(record("2012-03-04").sort_date(), "2012-03-04");
    }

    #[test]
    fn test_month_key() {
        assert_eq!(record("2012-03-04").month_key(), Some("2012-03"));
        assert_eq!(record("2012").month_key(), Some("2012"));
        assert_eq!(record("").month_key(), None);
    }
}
