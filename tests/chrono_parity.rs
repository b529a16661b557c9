use chrono::{Datelike, NaiveDate};
use datebench::{
    calendar::last_day_of_month,
    rollback::{chrono_date_before, date_before, date_before_as_record, date_before_no_if},
    CalendarDate, DateError,
};
use proptest::prelude::*;

fn valid_date() -> impl Strategy<Value = CalendarDate> {
    (1600i32..2800, 1i32..=12)
        .prop_flat_map(|(year, month)| {
            (1..=last_day_of_month(month, year)).prop_map(move |day| CalendarDate::new(day, month, year))
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        .. ProptestConfig::default()
    })]

    #[test]
    fn hand_written_variants_match_chrono(date in valid_date(), days_before in 1i32..=28) {
        let start = date.to_naive().expect("strategy yields valid dates");
        let expected = chrono_date_before(start, days_before as u64).expect("in range");
        let expected = CalendarDate::new(expected.day() as i32, expected.month() as i32, expected.year());

        prop_assert_eq!(date_before_as_record(date.day, date.month, date.year, days_before), expected);
        prop_assert_eq!(date_before(date.day, date.month, date.year, days_before), Ok(expected.to_array()));
        prop_assert_eq!(date_before_no_if(date.day, date.month, date.year, days_before), expected.to_array());
    }

    #[test]
    fn guard_rejects_and_unguarded_variants_still_answer(date in valid_date(), days_before in 29i32..400) {
        prop_assert_eq!(
            date_before(date.day, date.month, date.year, days_before),
            Err(DateError::OffsetTooLarge { days_before, max: 28 })
        );
        let record = date_before_as_record(date.day, date.month, date.year, days_before);
        let array = date_before_no_if(date.day, date.month, date.year, days_before);
        prop_assert_eq!(record.to_array(), array);
    }
}

#[test]
fn leap_day_exists_only_in_leap_years() {
    for (year, leap) in [(2024, true), (2100, false), (2000, true), (2022, false)] {
        assert_eq!(NaiveDate::from_ymd_opt(year, 2, 29).is_some(), leap, "{year}");
        assert_eq!(format!("29/2/{year}").parse::<CalendarDate>().is_ok(), leap, "{year}");
    }
}
