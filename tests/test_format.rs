//! Formatter tests.

use agency_reports::{FieldType, FormatSettings, Formatter, ReportError};
use serde_json::{json, Value};
use std::io::Write;

fn fmt(value: Value, field_type: FieldType) -> String {
    Formatter::default().format(Some(&value), field_type)
}

// ---------------------------------------------------------------------------
// Per-type rendering
// ---------------------------------------------------------------------------

#[test]
fn currency_uses_symbol_grouping_and_two_decimals() {
    assert_eq!(fmt(json!(1200), FieldType::Currency), "$1,200.00");
    assert_eq!(fmt(json!(1234567.891), FieldType::Currency), "$1,234,567.89");
    assert_eq!(fmt(json!(0), FieldType::Currency), "$0.00");
    assert_eq!(fmt(json!(-50.5), FieldType::Currency), "-$50.50");
    assert_eq!(fmt(json!("300"), FieldType::Currency), "$300.00");
}

#[test]
fn percentage_has_one_decimal() {
    assert_eq!(fmt(json!(2.5), FieldType::Percentage), "2.5%");
    assert_eq!(fmt(json!(3), FieldType::Percentage), "3.0%");
    assert_eq!(fmt(json!(33.333), FieldType::Percentage), "33.3%");
}

#[test]
fn number_groups_thousands() {
    assert_eq!(fmt(json!(1234567), FieldType::Number), "1,234,567");
    assert_eq!(fmt(json!(1234.5), FieldType::Number), "1,234.5");
    assert_eq!(fmt(json!(0.125), FieldType::Number), "0.125");
    assert_eq!(fmt(json!(-4200), FieldType::Number), "-4,200");
    assert_eq!(fmt(json!(999), FieldType::Number), "999");
}

#[test]
fn date_uses_short_format() {
    assert_eq!(fmt(json!("2024-01-15"), FieldType::Date), "01/15/2024");
    assert_eq!(fmt(json!("2024-03-05T10:30:00Z"), FieldType::Date), "03/05/2024");
    assert_eq!(fmt(json!(1704067200000i64), FieldType::Date), "01/01/2024");
}

#[test]
fn boolean_renders_yes_no() {
    assert_eq!(fmt(json!(true), FieldType::Boolean), "Yes");
    assert_eq!(fmt(json!(false), FieldType::Boolean), "No");
}

#[test]
fn boolean_like_values_render_as_labels() {
    assert_eq!(fmt(json!("true"), FieldType::Boolean), "Yes");
    assert_eq!(fmt(json!("FALSE"), FieldType::Boolean), "No");
    assert_eq!(fmt(json!(1), FieldType::Boolean), "Yes");
    assert_eq!(fmt(json!(0), FieldType::Boolean), "No");
    assert_eq!(fmt(json!("maybe"), FieldType::Boolean), "maybe");
}

#[test]
fn text_coerces_to_string() {
    assert_eq!(fmt(json!("Dubai"), FieldType::Text), "Dubai");
    assert_eq!(fmt(json!(42), FieldType::Text), "42");
    assert_eq!(fmt(json!(42.0), FieldType::Text), "42");
    assert_eq!(fmt(json!(true), FieldType::Text), "true");
}

// ---------------------------------------------------------------------------
// Blank and pass-through values
// ---------------------------------------------------------------------------

#[test]
fn null_and_missing_are_blank_for_every_type() {
    let formatter = Formatter::default();
    for field_type in [
        FieldType::Text,
        FieldType::Number,
        FieldType::Currency,
        FieldType::Percentage,
        FieldType::Date,
        FieldType::Boolean,
    ] {
        assert_eq!(formatter.format(None, field_type), "");
        assert_eq!(formatter.format(Some(&Value::Null), field_type), "");
    }
}

#[test]
fn unparseable_values_pass_through() {
    assert_eq!(fmt(json!("n/a"), FieldType::Currency), "n/a");
    assert_eq!(fmt(json!("someday"), FieldType::Date), "someday");
}

#[test]
fn formatting_twice_is_a_no_op() {
    let formatter = Formatter::default();
    let cases = [
        (json!(1200), FieldType::Currency),
        (json!(-75.25), FieldType::Currency),
        (json!(12.5), FieldType::Percentage),
        (json!(1234567.25), FieldType::Number),
        (json!(999), FieldType::Number),
        (json!("2024-01-15"), FieldType::Date),
        (json!(true), FieldType::Boolean),
        (json!("false"), FieldType::Boolean),
        (json!("Marina"), FieldType::Text),
    ];
    for (value, field_type) in cases {
        let once = formatter.format(Some(&value), field_type);
        let twice = formatter.format(Some(&Value::String(once.clone())), field_type);
        assert_eq!(once, twice, "re-formatting {field_type} changed the value");
    }
}

// ---------------------------------------------------------------------------
// Format settings
// ---------------------------------------------------------------------------

#[test]
fn custom_settings_change_conventions() {
    let settings = FormatSettings {
        currency_symbol: "AED ".to_string(),
        thousands_separator: ".".to_string(),
        decimal_separator: ",".to_string(),
        date_format: "%d/%m/%Y".to_string(),
        true_label: "Ja".to_string(),
        ..FormatSettings::default()
    };
    let formatter = Formatter::new(settings);
    assert_eq!(formatter.format(Some(&json!(1234.5)), FieldType::Currency), "AED 1.234,50");
    assert_eq!(formatter.format(Some(&json!(1234.5)), FieldType::Number), "1.234,5");
    assert_eq!(formatter.format(Some(&json!("2024-01-15")), FieldType::Date), "15/01/2024");
    assert_eq!(formatter.format(Some(&json!(true)), FieldType::Boolean), "Ja");
}

#[test]
fn settings_load_from_json_with_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"currencySymbol": "€", "currencyDecimals": 0}}"#).unwrap();
    file.flush().unwrap();

    let settings = FormatSettings::from_json_file(file.path()).unwrap();
    assert_eq!(settings.currency_symbol, "€");
    assert_eq!(settings.date_format, "%m/%d/%Y");

    let formatter = Formatter::new(settings);
    assert_eq!(formatter.format(Some(&json!(1999.6)), FieldType::Currency), "€2,000");
}

#[test]
fn unrenderable_date_pattern_falls_back_to_iso() {
    let formatter = Formatter::new(FormatSettings {
        date_format: "%Q".to_string(),
        ..FormatSettings::default()
    });
    assert_eq!(
        formatter.format(Some(&json!("2024-01-15")), FieldType::Date),
        "2024-01-15"
    );
}

#[test]
fn empty_decimal_separator_renders_with_a_dot() {
    let formatter = Formatter::new(FormatSettings {
        decimal_separator: String::new(),
        ..FormatSettings::default()
    });
    assert_eq!(formatter.format(Some(&json!(1200)), FieldType::Number), "1,200");
    assert_eq!(formatter.format(Some(&json!(1200.5)), FieldType::Number), "1,200.5");
}

#[test]
fn settings_check_rejects_bad_patterns_and_separators() {
    assert!(FormatSettings::default().check().is_ok());

    let bad_date = FormatSettings {
        date_format: "%Q".to_string(),
        ..FormatSettings::default()
    };
    assert!(matches!(bad_date.check(), Err(ReportError::InvalidArgument(_))));

    let empty_decimal = FormatSettings {
        decimal_separator: String::new(),
        ..FormatSettings::default()
    };
    assert!(matches!(empty_decimal.check(), Err(ReportError::InvalidArgument(_))));

    let same_separators = FormatSettings {
        thousands_separator: ".".to_string(),
        decimal_separator: ".".to_string(),
        ..FormatSettings::default()
    };
    assert!(matches!(same_separators.check(), Err(ReportError::InvalidArgument(_))));
}

#[test]
fn settings_file_with_bad_date_pattern_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"dateFormat": "%Q"}}"#).unwrap();
    file.flush().unwrap();

    let err = FormatSettings::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, ReportError::InvalidArgument(_)));
}
