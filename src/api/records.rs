//! Record types returned by the forecasting API.
//!
//! Field names mirror the backend's JSON keys; the serde renames keep the
//! Rust side snake_case.

use serde::Deserialize;

/// One pre-computed SARIMAX forecast value for a (region, year) pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastRecord {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "SARIMAX_Forecast")]
    pub forecast: f64,
}

/// Forecast-vs-actual comparison row with upstream-computed error columns.
///
/// `AE` and `APE` may be null or absent for years the backend could not
/// score; consumers must skip such rows when averaging.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComparisonRecord {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Actual")]
    pub actual: f64,
    #[serde(rename = "SARIMAX_Forecast")]
    pub forecast: f64,
    #[serde(rename = "AE", default)]
    pub ae: Option<f64>,
    #[serde(rename = "APE", default)]
    pub ape: Option<f64>,
}

/// Linear-regression coefficient for one explanatory driver within a region.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriverRecord {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Driver")]
    pub driver: String,
    #[serde(rename = "Coefficient")]
    pub coefficient: f64,
    // Older exports spell the key "P-value".
    #[serde(rename = "PValue", alias = "P-value")]
    pub p_value: f64,
}

/// Sorted, de-duplicated region names across the forecast collection.
pub fn region_names(forecasts: &[ForecastRecord]) -> Vec<String> {
    let mut names: Vec<String> = forecasts.iter().map(|f| f.region.clone()).collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_forecast_record_shape() {
        let json = r#"{"Region": "CAR", "Year": 2025, "SARIMAX_Forecast": 123456.78}"#;
        let parsed: ForecastRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.region, "CAR");
        assert_eq!(parsed.year, 2025);
        assert!((parsed.forecast - 123456.78).abs() < 1e-9);
    }

    #[test]
    fn comparison_tolerates_null_and_missing_errors() {
        let with_null = r#"{"Region": "A", "Year": 2021, "Actual": 100.0,
            "SARIMAX_Forecast": 90.0, "AE": null, "APE": null}"#;
        let parsed: ComparisonRecord = serde_json::from_str(with_null).unwrap();
        assert_eq!(parsed.ae, None);
        assert_eq!(parsed.ape, None);

        let without = r#"{"Region": "A", "Year": 2021, "Actual": 100.0,
            "SARIMAX_Forecast": 90.0}"#;
        let parsed: ComparisonRecord = serde_json::from_str(without).unwrap();
        assert_eq!(parsed.ae, None);
    }

    #[test]
    fn driver_record_accepts_both_p_value_spellings() {
        let modern = r#"{"Region": "A", "Driver": "Logging", "Coefficient": -0.5, "PValue": 0.01}"#;
        let legacy = r#"{"Region": "A", "Driver": "Logging", "Coefficient": -0.5, "P-value": 0.01}"#;
        let a: DriverRecord = serde_json::from_str(modern).unwrap();
        let b: DriverRecord = serde_json::from_str(legacy).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn region_names_are_sorted_and_distinct() {
        let records = [
            ("NCR", 2021),
            ("CAR", 2021),
            ("NCR", 2022),
            ("Bicol", 2021),
            ("CAR", 2022),
        ]
        .into_iter()
        .map(|(region, year)| ForecastRecord {
            region: region.to_string(),
            year,
            forecast: 0.0,
        })
        .collect::<Vec<_>>();

        let names = region_names(&records);
        assert_eq!(names, ["Bicol", "CAR", "NCR"]);
    }

    #[test]
    fn region_names_of_empty_collection_is_empty() {
        assert!(region_names(&[]).is_empty());
    }
}
