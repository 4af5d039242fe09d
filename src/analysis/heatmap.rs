use crate::models::chart::{HeatIntensity, Heatmap, HeatmapCell};
use crate::models::stats::DailyXp;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

pub const HEATMAP_WEEKS: usize = 16;
pub const HEATMAP_DAYS: usize = HEATMAP_WEEKS * 7;

/// 0 → empty, 1–100 → low, 101–300 → medium, above 300 → high.
pub fn heat_intensity(xp: u32) -> HeatIntensity {
    match xp {
        0 => HeatIntensity::Empty,
        1..=100 => HeatIntensity::Low,
        101..=300 => HeatIntensity::Medium,
        _ => HeatIntensity::High,
    }
}

/// One metre of depth per 10 XP.
pub fn max_depth_for(xp: u32) -> u32 {
    xp / 10
}

pub fn daily_xp_record(date: NaiveDate, xp: u32) -> DailyXp {
    DailyXp {
        date: date.format("%Y-%m-%d").to_string(),
        xp,
        max_depth: max_depth_for(xp),
    }
}

/// Lay out the last 112 days ending `today` as 16 week columns.
///
/// Dates without a record are empty cells. Records outside the window or
/// with unparseable dates are ignored; duplicates keep the last value.
pub fn build_heatmap(records: &[DailyXp], today: NaiveDate) -> Heatmap {
    let by_date: HashMap<NaiveDate, u32> = records
        .iter()
        .filter_map(|r| {
            NaiveDate::parse_from_str(&r.date, "%Y-%m-%d")
                .ok()
                .map(|d| (d, r.xp))
        })
        .collect();

    let first = today - Duration::days(HEATMAP_DAYS as i64 - 1);
    let mut weeks = Vec::with_capacity(HEATMAP_WEEKS);
    let mut total_xp = 0u64;
    let mut active_days = 0;

    for week in 0..HEATMAP_WEEKS {
        let mut column = Vec::with_capacity(7);
        for day in 0..7 {
            let date = first + Duration::days((week * 7 + day) as i64);
            let xp = by_date.get(&date).copied().unwrap_or(0);
            let intensity = heat_intensity(xp);

            total_xp += xp as u64;
            if xp > 0 {
                active_days += 1;
            }

            column.push(HeatmapCell {
                date: date.format("%Y-%m-%d").to_string(),
                xp,
                max_depth: max_depth_for(xp),
                intensity,
                is_pulsing: intensity == HeatIntensity::High,
            });
        }
        weeks.push(column);
    }

    Heatmap {
        weeks,
        total_xp,
        active_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
    }

    #[test]
    fn bucket_boundaries_are_inclusive() {
        assert_eq!(heat_intensity(0), HeatIntensity::Empty);
        assert_eq!(heat_intensity(1), HeatIntensity::Low);
        assert_eq!(heat_intensity(100), HeatIntensity::Low);
        assert_eq!(heat_intensity(101), HeatIntensity::Medium);
        assert_eq!(heat_intensity(300), HeatIntensity::Medium);
        assert_eq!(heat_intensity(301), HeatIntensity::High);
    }

    #[test]
    fn grid_covers_sixteen_weeks_ending_today() {
        let today = day("2026-04-30");
        let heatmap = build_heatmap(&[], today);

        assert_eq!(heatmap.weeks.len(), 16);
        assert!(heatmap.weeks.iter().all(|w| w.len() == 7));
        assert_eq!(heatmap.weeks[0][0].date, "2026-01-09");
        assert_eq!(heatmap.weeks[15][6].date, "2026-04-30");
        assert_eq!(heatmap.active_days, 0);
    }

    #[test]
    fn places_records_and_flags_high_days() {
        let today = day("2026-04-30");
        let records = vec![
            daily_xp_record(day("2026-04-29"), 120),
            daily_xp_record(day("2026-04-30"), 450),
            daily_xp_record(day("2025-01-01"), 999),
        ];

        let heatmap = build_heatmap(&records, today);
        let last = &heatmap.weeks[15];

        assert_eq!(last[5].intensity, HeatIntensity::Medium);
        assert!(!last[5].is_pulsing);
        assert_eq!(last[6].intensity, HeatIntensity::High);
        assert!(last[6].is_pulsing);
        assert_eq!(last[6].max_depth, 45);
        assert_eq!(heatmap.total_xp, 570);
        assert_eq!(heatmap.active_days, 2);
    }
}
