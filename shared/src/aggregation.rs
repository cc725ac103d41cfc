//! Daily aggregation of food entries
//!
//! Entries are stored with UTC timestamps; which calendar day an entry
//! belongs to depends on the calendar it is viewed in (local midnight to
//! midnight by default).

use crate::food::{FoodEntry, NutrientTotals};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Calendar used to assign timestamps to days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayCalendar {
    /// The machine's local timezone
    #[default]
    Local,
    /// A fixed offset from UTC
    Fixed(FixedOffset),
}

impl DayCalendar {
    /// Calendar with a fixed UTC offset in minutes; `None` when out of range
    pub fn fixed_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(DayCalendar::Fixed)
    }

    /// Calendar day a timestamp falls on
    pub fn date_of(&self, timestamp: &DateTime<Utc>) -> NaiveDate {
        match self {
            DayCalendar::Local => timestamp.with_timezone(&Local).date_naive(),
            DayCalendar::Fixed(offset) => timestamp.with_timezone(offset).date_naive(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.date_of(&Utc::now())
    }
}

/// Totals for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub totals: NutrientTotals,
    pub entry_count: usize,
}

impl DailySummary {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            totals: NutrientTotals::default(),
            entry_count: 0,
        }
    }
}

/// Keep the entries that fall on `date` in `calendar`
pub fn filter_for_date<E>(
    entries: impl IntoIterator<Item = E>,
    date: NaiveDate,
    calendar: &DayCalendar,
) -> Vec<E>
where
    E: Borrow<FoodEntry>,
{
    entries
        .into_iter()
        .filter(|e| calendar.date_of(&e.borrow().date) == date)
        .collect()
}

/// Sum of every nutrient across the entries
pub fn sum_totals<E>(entries: impl IntoIterator<Item = E>) -> NutrientTotals
where
    E: Borrow<FoodEntry>,
{
    entries.into_iter().map(|e| e.borrow().totals()).sum()
}

pub fn total_calories<E: Borrow<FoodEntry>>(entries: impl IntoIterator<Item = E>) -> f64 {
    entries.into_iter().map(|e| e.borrow().total_calories()).sum()
}

pub fn total_protein<E: Borrow<FoodEntry>>(entries: impl IntoIterator<Item = E>) -> f64 {
    entries.into_iter().map(|e| e.borrow().total_protein()).sum()
}

pub fn total_carbs<E: Borrow<FoodEntry>>(entries: impl IntoIterator<Item = E>) -> f64 {
    entries.into_iter().map(|e| e.borrow().total_carbs()).sum()
}

pub fn total_fat<E: Borrow<FoodEntry>>(entries: impl IntoIterator<Item = E>) -> f64 {
    entries.into_iter().map(|e| e.borrow().total_fat()).sum()
}

pub fn total_fiber<E: Borrow<FoodEntry>>(entries: impl IntoIterator<Item = E>) -> f64 {
    entries.into_iter().map(|e| e.borrow().total_fiber()).sum()
}

pub fn total_sugar<E: Borrow<FoodEntry>>(entries: impl IntoIterator<Item = E>) -> f64 {
    entries.into_iter().map(|e| e.borrow().total_sugar()).sum()
}

/// Filter to one day and aggregate
pub fn summarize_day(entries: &[FoodEntry], date: NaiveDate, calendar: &DayCalendar) -> DailySummary {
    let day = filter_for_date(entries, date, calendar);
    DailySummary {
        date,
        totals: sum_totals(day.iter().copied()),
        entry_count: day.len(),
    }
}

/// Aggregate every entry into its calendar day
pub fn totals_by_day(
    entries: &[FoodEntry],
    calendar: &DayCalendar,
) -> BTreeMap<NaiveDate, DailySummary> {
    let mut days: BTreeMap<NaiveDate, DailySummary> = BTreeMap::new();
    for entry in entries {
        let date = calendar.date_of(&entry.date);
        let summary = days.entry(date).or_insert_with(|| DailySummary::empty(date));
        summary.totals += entry.totals();
        summary.entry_count += 1;
    }
    days
}

/// One summary per day in `start..=end`, with empty days included
pub fn history(
    entries: &[FoodEntry],
    start: NaiveDate,
    end: NaiveDate,
    calendar: &DayCalendar,
) -> Vec<DailySummary> {
    if end < start {
        return Vec::new();
    }
    let days = totals_by_day(entries, calendar);
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| days.get(&d).copied().unwrap_or_else(|| DailySummary::empty(d)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::NutritionRecord;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn utc() -> DayCalendar {
        DayCalendar::fixed_offset_minutes(0).unwrap()
    }

    fn entry_at(calories: f64, grams: f64, at: DateTime<Utc>) -> FoodEntry {
        let source = NutritionRecord {
            name: "Food".to_string(),
            brand: None,
            barcode: None,
            calories_per_100g: calories,
            protein_per_100g: calories / 20.0,
            carbs_per_100g: calories / 10.0,
            fat_per_100g: calories / 40.0,
            fiber_per_100g: 1.0,
            sugar_per_100g: 2.0,
        };
        FoodEntry::from_grams(&source, grams, at).unwrap()
    }

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_filter_for_date() {
        let entries = vec![
            entry_at(100.0, 100.0, ts(2024, 6, 1, 8)),
            entry_at(200.0, 100.0, ts(2024, 6, 1, 23)),
            entry_at(300.0, 100.0, ts(2024, 6, 2, 0)),
        ];
        let june_1 = filter_for_date(&entries, day(2024, 6, 1), &utc());
        assert_eq!(june_1.len(), 2);
        assert_eq!(total_calories(june_1.iter().copied()), 300.0);
    }

    #[test]
    fn test_day_boundary_follows_calendar() {
        // 23:30 UTC on June 1st is already June 2nd at UTC+2
        let entries = vec![entry_at(100.0, 100.0, Utc.with_ymd_and_hms(2024, 6, 1, 23, 30, 0).unwrap())];
        let plus_two = DayCalendar::fixed_offset_minutes(120).unwrap();

        assert_eq!(filter_for_date(&entries, day(2024, 6, 1), &utc()).len(), 1);
        assert_eq!(filter_for_date(&entries, day(2024, 6, 1), &plus_two).len(), 0);
        assert_eq!(filter_for_date(&entries, day(2024, 6, 2), &plus_two).len(), 1);
    }

    #[test]
    fn test_local_calendar_uses_host_timezone() {
        let calendar = DayCalendar::default();
        assert_eq!(calendar, DayCalendar::Local);

        for timestamp in [ts(2024, 6, 1, 0), ts(2024, 6, 1, 12), ts(2024, 12, 31, 23)] {
            assert_eq!(
                calendar.date_of(&timestamp),
                timestamp.with_timezone(&Local).date_naive()
            );
        }
        assert_eq!(calendar.today(), Local::now().date_naive());
    }

    #[test]
    fn test_macro_sums() {
        let entries = vec![
            entry_at(200.0, 150.0, ts(2024, 6, 1, 8)),
            entry_at(400.0, 50.0, ts(2024, 6, 1, 12)),
        ];
        assert_eq!(total_calories(&entries), 500.0);
        assert_eq!(total_protein(&entries), 25.0);
        assert_eq!(total_carbs(&entries), 50.0);
        assert_eq!(total_fat(&entries), 12.5);
        assert_eq!(total_fiber(&entries), 2.0);
        assert_eq!(total_sugar(&entries), 4.0);
        assert_eq!(sum_totals(&entries).calories, 500.0);
    }

    #[test]
    fn test_empty_day() {
        let summary = summarize_day(&[], day(2024, 1, 1), &utc());
        assert_eq!(summary.entry_count, 0);
        assert_eq!(summary.totals, NutrientTotals::default());
    }

    #[test]
    fn test_history_fills_gaps() {
        let entries = vec![
            entry_at(100.0, 100.0, ts(2024, 6, 1, 8)),
            entry_at(100.0, 200.0, ts(2024, 6, 3, 8)),
            entry_at(100.0, 100.0, ts(2024, 6, 9, 8)),
        ];
        let days = history(&entries, day(2024, 6, 1), day(2024, 6, 4), &utc());
        assert_eq!(days.len(), 4);
        assert_eq!(days[0].totals.calories, 100.0);
        assert_eq!(days[1].entry_count, 0);
        assert_eq!(days[2].totals.calories, 200.0);
        assert_eq!(days[3].date, day(2024, 6, 4));

        assert!(history(&entries, day(2024, 6, 4), day(2024, 6, 1), &utc()).is_empty());
    }

    fn entry_strategy() -> impl Strategy<Value = FoodEntry> {
        (0.0f64..900.0, 1.0f64..1000.0, 0u32..72).prop_map(|(cal, grams, hour)| {
            entry_at(cal, grams, ts(2024, 6, 1, 0) + chrono::Duration::hours(hour as i64))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: Day total equals sum of entry totals for that day
        #[test]
        fn prop_aggregation_correctness(entries in proptest::collection::vec(entry_strategy(), 0..50)) {
            let calendar = utc();
            let date = day(2024, 6, 2);
            let expected: f64 = entries
                .iter()
                .filter(|e| e.date.date_naive() == date)
                .map(|e| e.total_calories())
                .sum();
            let summary = summarize_day(&entries, date, &calendar);
            prop_assert!((summary.totals.calories - expected).abs() < 1e-9);
        }

        /// Property: Aggregation is order-independent
        #[test]
        fn prop_aggregation_commutative(entries in proptest::collection::vec(entry_strategy(), 2..30)) {
            let mut reversed = entries.clone();
            reversed.reverse();
            let a = sum_totals(&entries);
            let b = sum_totals(&reversed);
            let tolerance = 1e-9 * a.calories.abs().max(1.0);
            prop_assert!((a.calories - b.calories).abs() < tolerance);
            prop_assert!((a.protein - b.protein).abs() < tolerance);
            prop_assert!((a.fat - b.fat).abs() < tolerance);
        }

        /// Property: Per-day totals partition the overall total
        #[test]
        fn prop_days_partition_total(entries in proptest::collection::vec(entry_strategy(), 0..40)) {
            let by_day = totals_by_day(&entries, &utc());
            let count: usize = by_day.values().map(|d| d.entry_count).sum();
            prop_assert_eq!(count, entries.len());
            let sum: f64 = by_day.values().map(|d| d.totals.calories).sum();
            prop_assert!((sum - total_calories(&entries)).abs() < 1e-6);
        }
    }
}
