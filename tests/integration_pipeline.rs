//! End-to-end tests for the analysis pipeline
//!
//! Exercises file reading, encoding detection, table location, parsing,
//! aggregation and forecasting together on realistic export layouts.

use chrono::NaiveDate;
use noshow_analyzer::parser::SkipReason;
use noshow_analyzer::{AnalyzerConfig, NoshowAnalyzer, NoshowError, Weekday};
use std::io::Write;
use tempfile::NamedTempFile;

fn analyzer() -> NoshowAnalyzer {
    NoshowAnalyzer::new(AnalyzerConfig::default()).unwrap()
}

fn date(d: u32, m: u32, y: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

/// Scheme B export as the booking tool writes it: cp1251, CRLF, a title
/// row, a frequency column and a totals row at the bottom
fn scheme_b_cp1251() -> Vec<u8> {
    let text = "Отчет по рейсам;;;;;\r\n\
                Рейс;Дата;Частота;Сегмент;Seg Bkd Total;Nsh\r\n\
                N4-281;01.09.2025;1234567;LED-KGD;216;6\r\n\
                N4-281;08.09.2025;1234567;LED-KGD;192;7\r\n\
                N4-281;02.09.2025;1234567;LED-KGD;180,0;9\r\n\
                N4-300;03.09.2025;1234567;KGD-LED;120;\r\n\
                Итого;;;;708;22\r\n\
                \r\n";
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1251.encode(text);
    assert!(!had_errors);
    bytes.into_owned()
}

#[test]
fn test_scheme_b_cp1251_file() {
    let file = write_temp(&scheme_b_cp1251());
    let analysis = analyzer().analyze_file(file.path()).unwrap();

    assert_eq!(analysis.encoding.label(), "cp1251");
    assert_eq!(analysis.stats.total_rows, 5);
    assert_eq!(analysis.stats.processed_rows, 4);
    assert_eq!(analysis.stats.skipped_for(SkipReason::SummaryRow), 1);
    assert_eq!(analysis.flights, vec!["N4-281", "N4-300"]);

    let report = analysis.flight_report("N4-281", date(15, 9, 2025));
    assert_eq!(report.segment, "LED-KGD");

    let monday = report
        .stats
        .iter()
        .find(|s| s.weekday == Weekday::Monday)
        .unwrap();
    assert_eq!(monday.total_bookings, 408);
    assert_eq!(monday.total_noshows, 13);
    assert_eq!(monday.record_count, 2);
    assert_eq!(monday.avg_bookings, 204);
    assert!((monday.rate - 0.0319).abs() < 0.0001);

    // Tuesday: 9 / 180 = 0.05 beats Monday's 0.0319
    let recommendation = report.recommendation.unwrap();
    assert_eq!(recommendation.weekday, Weekday::Tuesday);
    assert_eq!(recommendation.recommended_extra_seats, 9);
}

#[test]
fn test_scheme_a_utf8_bom_file() {
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend_from_slice(
        "Flight;Date;Segment;seg_bkd_total;noshow\n\
         N4-281;01.09.2025;LED-KGD;216;6\n\
         N4-281;08.09.2025;LED-KGD;192;7\n"
            .as_bytes(),
    );
    let file = write_temp(&bytes);

    let analysis = analyzer().analyze_file(file.path()).unwrap();
    assert_eq!(analysis.encoding.label(), "utf-8-sig");
    assert_eq!(analysis.flights, vec!["N4-281"]);
    assert_eq!(analysis.stats.skipped_rows, 0);
}

#[test]
fn test_comma_delimited_export() {
    let text = "Flight,Date,Segment,seg_bkd_total,noshow\n\
                N4-281,01.09.2025,LED-KGD,216,6\n\
                N4-111,02.09.2025,SVO-LED,100,2\n";
    let analysis = analyzer().analyze_bytes(text.as_bytes()).unwrap();
    assert_eq!(analysis.flights, vec!["N4-111", "N4-281"]);
}

#[test]
fn test_missing_date_row_skipped() {
    let text = "Flight;Segment;seg_bkd_total;noshow;Date\n\
                N4-281;LED-KGD;216;6;01.09.2025\n\
                N4-281;LED-KGD;192;7\n";
    let analysis = analyzer().analyze_bytes(text.as_bytes()).unwrap();

    assert_eq!(analysis.stats.total_rows, 2);
    assert_eq!(analysis.stats.skipped_rows, 1);
    assert_eq!(analysis.stats.skipped_for(SkipReason::MissingDate), 1);
}

#[test]
fn test_huge_counts_in_one_bucket_do_not_overflow() {
    let text = "Flight;Date;Segment;seg_bkd_total;noshow\n\
                N4-281;01.09.2025;LED-KGD;1e30;6\n\
                N4-281;08.09.2025;LED-KGD;1e30;7\n";
    let analysis = analyzer().analyze_bytes(text.as_bytes()).unwrap();

    let monday = analysis.aggregate.bucket("N4-281", Weekday::Monday).unwrap();
    assert_eq!(monday.total_bookings, u64::MAX);
    assert_eq!(monday.total_noshows, 13);
    assert_eq!(monday.record_count, 2);

    let report = analysis.flight_report("N4-281", date(15, 9, 2025));
    assert_eq!(report.forecast.len(), 7);
    let recommendation = report.recommendation.unwrap();
    assert_eq!(recommendation.weekday, Weekday::Monday);
    assert!(recommendation.rate < 1e-15);
}

#[test]
fn test_cp866_export_detected() {
    let text = "Рейс;Дата;Сегмент;Seg Bkd Total;Nsh\r\n\
                N4-281;01.09.2025;ШЕР-КГД;216;6\r\n";
    let (bytes, _, had_errors) = encoding_rs::IBM866.encode(text);
    assert!(!had_errors);

    let analysis = analyzer().analyze_bytes(&bytes).unwrap();
    assert_eq!(analysis.encoding.label(), "cp866");
    assert_eq!(analysis.flights, vec!["N4-281"]);
    let report = analysis.flight_report("N4-281", date(15, 9, 2025));
    assert_eq!(report.segment, "ШЕР-КГД");
}

#[test]
fn test_forecast_defaults_when_weekday_absent() {
    // Only Tuesday history
    let text = "Flight;Date;Segment;seg_bkd_total;noshow\n\
                N4-281;02.09.2025;LED-KGD;200;10\n";
    let analysis = analyzer().analyze_bytes(text.as_bytes()).unwrap();

    let today = date(15, 9, 2025);
    let report = analysis.flight_report("N4-281", today);
    assert_eq!(report.forecast.len(), 7);

    let friday = report
        .forecast
        .iter()
        .find(|e| e.weekday == Weekday::Friday)
        .unwrap();
    assert_eq!(friday.date, date(19, 9, 2025));
    assert_eq!(friday.avg_bookings, 200);
    assert_eq!(friday.predicted_noshow, 0.0);

    // Same inputs, same forecast
    assert_eq!(report, analysis.flight_report("N4-281", today));
}

#[test]
fn test_reordered_header_found_from_first_data_row() {
    let text = "Выгрузка от 10.09.2025\n\
                Flight;Segment;Date;seg_bkd_total;noshow\n\
                N4-281;LED-KGD;01.09.2025;216;6\n";
    let analysis = analyzer().analyze_bytes(text.as_bytes()).unwrap();
    assert_eq!(analysis.flights, vec!["N4-281"]);
    assert_eq!(analysis.stats.processed_rows, 1);
}

#[test]
fn test_not_found_then_next_file_still_works() {
    let analyzer = analyzer();

    let bad = write_temp("Quarterly notes\nNothing to see".as_bytes());
    let err = analyzer.analyze_file(bad.path()).unwrap_err();
    assert!(matches!(err, NoshowError::TableNotFound));
    assert!(err.is_recoverable());

    let good = write_temp(&scheme_b_cp1251());
    assert!(analyzer.analyze_file(good.path()).is_ok());
}

#[test]
fn test_all_rows_rejected_is_no_flights() {
    let text = "Flight;Date;Segment;seg_bkd_total;noshow\n\
                Итого;;;408;13\n";
    let err = analyzer().analyze_bytes(text.as_bytes()).unwrap_err();
    assert!(matches!(err, NoshowError::NoFlights { total: 1, .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = analyzer()
        .analyze_file(std::path::Path::new("/nonexistent/export.csv"))
        .unwrap_err();
    assert!(matches!(err, NoshowError::Io { .. }));
    assert!(!err.is_recoverable());
}
