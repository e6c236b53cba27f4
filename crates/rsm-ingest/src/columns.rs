//! Case-insensitive column alias discovery.
//!
//! Survey exports spell the key columns inconsistently (`Chainage` vs
//! `chain`, `Lane` vs `lane_id`). The first alias that matches a header,
//! case-insensitively, wins.

pub(crate) const CHAINAGE_ALIASES: &[&str] = &["chainage", "chain"];
pub(crate) const LOCATION_ALIASES: &[&str] = &["location"];
pub(crate) const LANE_ALIASES: &[&str] = &["lane", "lane_id", "laneid"];
pub(crate) const TIMESTAMP_ALIASES: &[&str] = &["testdateutc", "timestamp", "datetime"];

/// Index of the first header matching one of `aliases`.
pub(crate) fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    for alias in aliases {
        if let Some(idx) = headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(alias))
        {
            return Some(idx);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn matches_are_case_insensitive() {
        let h = headers(&["RoadName", "CHAIN", "Lane"]);
        assert_eq!(find_column(&h, CHAINAGE_ALIASES), Some(1));
        assert_eq!(find_column(&h, LANE_ALIASES), Some(2));
    }

    #[test]
    fn alias_order_decides_between_competing_headers() {
        let h = headers(&["chain", "chainage"]);
        // "chainage" is the preferred alias even though "chain" comes first.
        assert_eq!(find_column(&h, CHAINAGE_ALIASES), Some(1));
    }

    #[test]
    fn absent_column_returns_none() {
        let h = headers(&["RoadName"]);
        assert_eq!(find_column(&h, TIMESTAMP_ALIASES), None);
    }
}
