//! Tests for text bundles.

use chrono::{NaiveDate, Weekday};

use tether::model::FIELD_MUST_BE_FILLED_IN;
use tether::text::{TextBundle, TextError, TextResource};

const DUTCH: &str = r#"{
    "strings": {
        "validation.fieldMustBeFilledIn": "Dit veld moet ingevuld zijn.",
        "gen.close": "Sluiten"
    },
    "formats": {
        "decimalSeparator": ",",
        "groupingSeparator": ".",
        "dateFormat": "%d-%m-%Y",
        "firstDayOfWeek": "Mon"
    }
}"#;

#[test]
fn test_bundle_from_json() {
    let bundle = TextBundle::from_json(DUTCH).unwrap();
    assert_eq!(bundle.string(FIELD_MUST_BE_FILLED_IN), "Dit veld moet ingevuld zijn.");
    assert_eq!(bundle.first_day_of_week(), Weekday::Mon);
    assert_eq!(bundle.formats().fraction_digits, 2);

    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    assert_eq!(bundle.format_date(date), "01-05-2024");
    assert_eq!(bundle.parse_date(" 01-05-2024 "), Ok(date));
    assert_eq!(bundle.parse_double("1.234,5"), Ok(1234.5));
    assert_eq!(bundle.format_double(-0.004), "0,00");
}

#[test]
fn test_bundle_from_reader() {
    let bundle = TextBundle::from_reader(DUTCH.as_bytes()).unwrap();
    assert!(bundle.contains("gen.close"));
}

#[test]
fn test_missing_string_resolves_to_id() {
    let bundle = TextBundle::new();
    assert_eq!(bundle.string("no.such.id"), "no.such.id");
}

#[test]
fn test_merged_bundle_keeps_own_strings() {
    let bundle = TextBundle::from_json(DUTCH)
        .unwrap()
        .merged_with(&TextBundle::english());
    assert_eq!(bundle.string("gen.close"), "Sluiten");
    assert_eq!(bundle.string("gen.calendar"), "Calendar");
}

#[test]
fn test_format_string_substitutes_arguments() {
    let bundle = TextBundle::english();
    assert_eq!(
        bundle.format_string("taskWithProgressDialog.failed", &["disk full"]),
        "The operation failed: disk full"
    );
}

#[test]
fn test_invalid_bundles_are_rejected() {
    assert!(matches!(
        TextBundle::from_json("{ \"strings\": 3 }"),
        Err(TextError::Json(_))
    ));
    assert!(matches!(
        TextBundle::from_json(r#"{ "formats": { "dateFormat": "%Q" } }"#),
        Err(TextError::DateFormat(_))
    ));
}

#[test]
fn test_unparsable_numbers_and_dates() {
    let bundle = TextBundle::english();
    assert!(bundle.parse_double("12abc").is_err());
    assert!(bundle.parse_double("").is_err());
    assert!(bundle.parse_date("2024-13-01").is_err());
}
