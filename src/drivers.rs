//! Driver (deforestation pressure) categories and coefficient lookup.

use crate::api::DriverRecord;

/// Driver categories shown as coefficient cards, in display order.
pub const DRIVER_CATEGORIES: [&str; 4] = ["Agriculture", "Logging", "Urbanization", "Roads"];

/// Regression intercept row name; never presented.
pub const INTERCEPT_DRIVER: &str = "const";

/// Suffix tried when a driver name has no direct match (`Roads` vs `Roads_km`).
const FALLBACK_SUFFIX: &str = "_km";

/// Find the coefficient record for `(region, driver)`.
///
/// Falls back to the `_km`-suffixed spelling used by older exports when the
/// plain name is absent.
pub fn find_coefficient<'a>(
    drivers: &'a [DriverRecord],
    region: &str,
    driver: &str,
) -> Option<&'a DriverRecord> {
    let direct = drivers
        .iter()
        .find(|r| r.region == region && r.driver == driver);
    if direct.is_some() {
        return direct;
    }
    let suffixed = format!("{driver}{FALLBACK_SUFFIX}");
    drivers
        .iter()
        .find(|r| r.region == region && r.driver == suffixed)
}

/// Group all non-intercept driver rows by region, regions sorted ascending.
pub fn grouped_by_region<'a>(drivers: &'a [DriverRecord]) -> Vec<(String, Vec<&'a DriverRecord>)> {
    let mut groups: Vec<(String, Vec<&DriverRecord>)> = Vec::new();
    for record in drivers {
        if record.driver == INTERCEPT_DRIVER {
            continue;
        }
        match groups.iter_mut().find(|(region, _)| region == &record.region) {
            Some((_, rows)) => rows.push(record),
            None => groups.push((record.region.clone(), vec![record])),
        }
    }
    groups.sort_by(|(a, _), (b, _)| a.cmp(b));
    groups
}

/// One year of a driver's estimated pressure share.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub year: i32,
    /// Share of total deforestation pressure, in percent.
    pub share_pct: f64,
}

const fn hp(year: i32, share_pct: f64) -> HistoryPoint {
    HistoryPoint { year, share_pct }
}

/// Built-in national driver history used until the backend serves one.
pub const DRIVER_HISTORY: &[(&str, &[HistoryPoint])] = &[
    (
        "Logging",
        &[
            hp(2015, 22.0),
            hp(2016, 23.0),
            hp(2017, 24.0),
            hp(2018, 25.0),
            hp(2019, 26.0),
            hp(2020, 25.0),
            hp(2021, 24.0),
            hp(2022, 25.0),
            hp(2023, 26.0),
            hp(2024, 25.0),
        ],
    ),
    (
        "Agriculture",
        &[
            hp(2015, 38.0),
            hp(2016, 39.0),
            hp(2017, 39.0),
            hp(2018, 40.0),
            hp(2019, 41.0),
            hp(2020, 40.0),
            hp(2021, 39.0),
            hp(2022, 40.0),
            hp(2023, 41.0),
            hp(2024, 40.0),
        ],
    ),
    (
        "Urbanization",
        &[
            hp(2015, 13.0),
            hp(2016, 14.0),
            hp(2017, 14.0),
            hp(2018, 15.0),
            hp(2019, 16.0),
            hp(2020, 15.0),
            hp(2021, 14.0),
            hp(2022, 15.0),
            hp(2023, 16.0),
            hp(2024, 15.0),
        ],
    ),
    (
        "Mining",
        &[
            hp(2015, 9.0),
            hp(2016, 9.0),
            hp(2017, 10.0),
            hp(2018, 10.0),
            hp(2019, 11.0),
            hp(2020, 10.0),
            hp(2021, 9.0),
            hp(2022, 10.0),
            hp(2023, 11.0),
            hp(2024, 10.0),
        ],
    ),
];

/// Category names available in the history viewer, in dataset order.
pub fn history_categories() -> Vec<&'static str> {
    DRIVER_HISTORY.iter().map(|(name, _)| *name).collect()
}

/// Yearly points for one history category.
pub fn history_for(category: &str) -> Option<&'static [HistoryPoint]> {
    DRIVER_HISTORY
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, points)| *points)
}
