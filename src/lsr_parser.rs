use super::config::ParserConfig;
use super::diagnostics::{Diagnostics, FieldWarning};
use super::domain::{Magnitude, ParsedEvent, Product};
use super::error::{Error, Result};
use super::parser::{lsr_point, Regexes};
use super::util::{columns, normalize_float, normalize_string, tz_to_offset};
use chrono::prelude::*;
use chrono::Duration;
use slog::Logger;

const MIN_LINES: usize = 16;
const SUMMARY_LINE: usize = 5;
const ISSUED_LINE: usize = 7;
const REMARKS_MARKER: &str = "..REMARKS..";
const UTC_OFFSET: &str = "0000";

// An intermediary structure for an LSR to make parsing easier
struct Skeleton<'a> {
    top_line: &'a str,
    bottom_line: &'a str,
    lines: Vec<&'a str>,
    remarks_index: usize,
}

/**
 * Parses a single-event NWS Local Storm Report (LSR).
 */
pub fn parse(
    product: &Product,
    regexes: &Regexes,
    config: &ParserConfig,
    logger: &Logger,
) -> Result<ParsedEvent> {
    let lsr = get_skeleton(&product.product_text)?;
    let mut diagnostics = Diagnostics::new(logger);

    // 2 lines after ..REMARKS.. contains TIME/EVENT/CITY LOCATION/LAT.LON
    let raw_time = columns(lsr.top_line, 0, Some(7));
    let event_type = normalize_string(columns(lsr.top_line, 12, Some(29)), false);
    let location = normalize_string(columns(lsr.top_line, 29, Some(53)), false);
    let point = lsr_point(columns(lsr.top_line, 53, None), &mut diagnostics);

    // 3 lines after ..REMARKS.. contains DATE/MAG/COUNTY/ST/SOURCE
    let raw_date = columns(lsr.bottom_line, 0, Some(10));
    let magnitude = get_magnitude(columns(lsr.bottom_line, 12, Some(29)), regexes, &mut diagnostics);
    let county = normalize_string(columns(lsr.bottom_line, 29, Some(48)), false);
    let state = normalize_string(columns(lsr.bottom_line, 48, Some(50)), false);

    // CO-OP OBSERVER, TRAINED SPOTTER, STORM CHASER, PUBLIC, EMERGENCY MNGR, ASOS, AWOS, etc.
    let source = normalize_string(columns(lsr.bottom_line, 50, None), false);

    let remarks = get_remarks(&lsr);

    let issued_line = lsr.lines.get(ISSUED_LINE).copied().unwrap_or("");
    let offset = get_timezone_offset(issued_line, regexes, &mut diagnostics);
    let reported_local = get_report_time(raw_date, raw_time, offset)?;
    let reported = reported_local.with_timezone(&Utc);

    // Skip reports too far in the past, since these can come hours, days, or even months later
    let age = product.issuance_time.signed_duration_since(reported);
    if age > Duration::minutes(config.staleness_threshold_min) {
        return Err(Error::StaleReport {
            reported,
            issued: product.issuance_time,
            threshold_min: config.staleness_threshold_min,
        });
    }

    if age < Duration::zero() {
        warn!(logger, "report time is after issuance time"; "reported" => reported.to_rfc3339());
    }

    Ok(ParsedEvent {
        event_type,
        reported_local,
        reported,
        magnitude,
        point,
        location,
        county,
        state,
        source,
        remarks,
        code: product.product_code.to_lowercase(),
        issued: product.issuance_time,
        name: product.product_name.to_string(),
        wfo: product.issuing_office.to_string(),
        warnings: diagnostics.into_warnings(),
    })
}

fn get_skeleton(text: &str) -> Result<Skeleton> {
    let lines: Vec<&str> = text.split('\n').map(|x| x.trim_end_matches('\r')).collect();

    if lines.len() < MIN_LINES {
        return Err(Error::TooFewLines {
            found: lines.len(),
            needed: MIN_LINES,
        });
    }

    if lines[SUMMARY_LINE].contains("SUMMARY") {
        return Err(Error::SummaryProduct);
    }

    let remarks_index = lines
        .iter()
        .position(|x| x.contains(REMARKS_MARKER))
        .ok_or(Error::MissingRemarks)?;

    let top_line = lines.get(remarks_index + 2).copied().unwrap_or("");
    let bottom_line = lines.get(remarks_index + 3).copied().unwrap_or("");

    Ok(Skeleton {
        top_line,
        bottom_line,
        lines,
        remarks_index,
    })
}

/// Remarks span every line from 5 after ..REMARKS.. up to the `&&` or `$$` terminator.
fn get_remarks(lsr: &Skeleton) -> String {
    let text: Vec<&str> = lsr
        .lines
        .iter()
        .skip(lsr.remarks_index + 5)
        .take_while(|x| !x.contains("&&") && !x.contains("$$"))
        .copied()
        .collect();

    normalize_string(&text.join(" "), false)
}

/// Reads an "M1.75 INCH" or "E60 MPH" style magnitude, where M is measured and
/// E is estimated. Wind damage and similar reports carry none.
pub fn get_magnitude(fragment: &str, regexes: &Regexes, diagnostics: &mut Diagnostics) -> Magnitude {
    let normalized = normalize_string(fragment, false);

    if normalized.is_empty() {
        return Magnitude::default();
    }

    let captures = match regexes.magnitude.captures(&normalized) {
        Some(captures) => captures,
        None => {
            diagnostics.warn(FieldWarning::MagnitudeFormat(normalized.to_string()));
            return Magnitude::default();
        }
    };

    Magnitude {
        measured: &captures["marker"] == "m",
        value: normalize_float(&captures["value"], diagnostics),
        units: captures["units"].to_string(),
    }
}

/// Finds the timezone in an "HHMM AM TZ " issuance line, defaulting to UTC.
pub fn get_timezone_offset(line: &str, regexes: &Regexes, diagnostics: &mut Diagnostics) -> &'static str {
    match regexes.timezone.captures(line) {
        Some(captures) => tz_to_offset(&captures["tz"], diagnostics),
        None => {
            diagnostics.warn(FieldWarning::TimezoneNotFound(line.to_string()));
            UTC_OFFSET
        }
    }
}

/// Offsets are hours west of UTC.
fn get_report_time(date: &str, time: &str, offset: &str) -> Result<DateTime<FixedOffset>> {
    let sign = if offset == UTC_OFFSET { "+" } else { "-" };
    let raw = format!("{} {} {}{}", date.trim(), time.trim(), sign, offset);

    DateTime::parse_from_str(&raw, "%m/%d/%Y %I%M %p %z").map_err(|source| Error::ReportTime { raw, source })
}

#[cfg(test)]
mod tests {
    use super::super::domain::Coordinates;
    use super::super::test_util::get_product_from_file;
    use super::*;

    const TORNADO_TEXT: &str = "\n158 \nNWUS52 KMFL 311935\nLSRMFL\n\nPRELIMINARY LOCAL STORM REPORT...CORRECTED\nNATIONAL WEATHER SERVICE MIAMI FL\n701 PM CDT TUE MAY 1 2018\n\n..TIME...   ...EVENT...      ...CITY LOCATION...     ...LAT.LON...\n..DATE...   ....MAG....      ..COUNTY LOCATION..ST.. ...SOURCE....\n            ..REMARKS..\n\n0700 PM     TORNADO          2 SE PAHOKEE            26.80N  80.64W\n05/01/2018                   PALM BEACH         FL   TRAINED SPOTTER \n\n            TRAINED SKYWARN SPOTTER OBSERVED FROM PAHOKEE A FUNNEL \n            CLOUD APPROXIMATELY 3 MILES SOUTHEAST OF PAHOKEE, \n            PARTIALLY RAIN-WRAPPED AND NEARLY STATIONARY. THE FUNNEL \n            EXTENDED TO NEARLY HALFWAY TO THE GROUND BEFORE LIFTING. \n            LOCATION RADAR-ESTIMATED/ADJUSTED. VIDEO RECEIVED OF \n            FUNNEL REACHING THE GROUND WITH DUST BEING KICKED UP. \n            RECLASSIFIED AS A TORNADO. \n\n\n&&\n\nCORRECTED EVENT...FATALITIES...INJURIES...REMARKS\n\nEVENT NUMBER MFL1800020\n\n$$\n\nSI\n\n\n\n";

    fn logger() -> Logger {
        Logger::root(slog::Discard, o!())
    }

    fn tornado_product(issuance_time: &str, text: &str) -> Product {
        Product {
            _id: "_id".to_string(),
            id: "id".to_string(),
            wmo_collective_id: "NWUS52".to_string(),
            issuance_time: issuance_time.parse().unwrap(),
            issuing_office: "KMFL".to_string(),
            product_code: "LSR".to_string(),
            product_name: "Local Storm Report".to_string(),
            product_text: text.to_string(),
        }
    }

    fn parse_text(issuance_time: &str, text: &str) -> Result<ParsedEvent> {
        let regexes = Regexes::new().unwrap();
        let product = tornado_product(issuance_time, text);
        parse(&product, &regexes, &ParserConfig::default(), &logger())
    }

    #[test]
    fn get_skeleton_too_few_lines_should_be_an_error() {
        let text = "\n\n\n\n\n\n\n\n\n\n\n\nthis is bad text";
        match get_skeleton(text) {
            Err(Error::TooFewLines { found, needed }) => {
                assert_eq!(found, 13);
                assert_eq!(needed, 16);
            }
            _ => panic!("expected too few lines"),
        }
    }

    #[test]
    fn get_skeleton_summary_should_be_an_error() {
        let text = TORNADO_TEXT.replace("REPORT...CORRECTED", "REPORT...SUMMARY");
        assert!(matches!(get_skeleton(&text), Err(Error::SummaryProduct)));
    }

    #[test]
    fn get_skeleton_no_remarks_index_should_be_an_error() {
        let text = TORNADO_TEXT.replace("..REMARKS..", "");
        assert!(matches!(get_skeleton(&text), Err(Error::MissingRemarks)));
    }

    #[test]
    fn get_skeleton_should_anchor_on_remarks() {
        let lsr = get_skeleton(TORNADO_TEXT).unwrap();
        assert_eq!(lsr.remarks_index, 11);
        assert!(lsr.top_line.starts_with("0700 PM     TORNADO"));
        assert!(lsr.bottom_line.starts_with("05/01/2018"));
    }

    #[test]
    fn get_remarks_should_stop_at_terminator() {
        let text = "\n\n\n\n\n\n\n\n\n\n\n            ..REMARKS..\n\ntop\nbottom\n\n   FIRST LINE \n   SECOND   LINE\n$$\nIGNORED\n\n";
        let lsr = get_skeleton(text).unwrap();
        assert_eq!(get_remarks(&lsr), "first line second line");
    }

    #[test]
    fn get_magnitude_should_classify_markers() {
        let regexes = Regexes::new().unwrap();
        let logger = logger();
        let mut diagnostics = Diagnostics::new(&logger);
        let tests = vec![
            ("m1.5 in", true, 1.5, "in"),
            ("e2.0 in", false, 2.0, "in"),
            ("E1.25 INCH       ", false, 1.25, "inch"),
            ("M60 MPH", true, 60.0, "mph"),
        ];

        for (fragment, measured, value, units) in tests {
            let magnitude = get_magnitude(fragment, &regexes, &mut diagnostics);
            assert_eq!(
                magnitude,
                Magnitude {
                    measured,
                    value,
                    units: units.to_string()
                }
            );
        }
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn get_magnitude_empty_should_not_warn() {
        let regexes = Regexes::new().unwrap();
        let logger = logger();
        let mut diagnostics = Diagnostics::new(&logger);

        let magnitude = get_magnitude("                 ", &regexes, &mut diagnostics);

        assert_eq!(magnitude, Magnitude::default());
        assert!(!magnitude.measured);
        assert_eq!(magnitude.value, 0.0);
        assert_eq!(magnitude.units, "");
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn get_magnitude_bad_format_should_warn() {
        let regexes = Regexes::new().unwrap();
        let logger = logger();
        let mut diagnostics = Diagnostics::new(&logger);

        assert_eq!(get_magnitude("60 MPH", &regexes, &mut diagnostics), Magnitude::default());
        assert_eq!(get_magnitude("m1.2.3 in", &regexes, &mut diagnostics).value, 0.0);
        assert_eq!(
            diagnostics.into_warnings(),
            vec![
                FieldWarning::MagnitudeFormat("60 mph".to_string()),
                FieldWarning::NumberFormat("1.2.3".to_string()),
            ]
        );
    }

    #[test]
    fn get_timezone_offset_should_read_issued_line() {
        let regexes = Regexes::new().unwrap();
        let logger = logger();
        let mut diagnostics = Diagnostics::new(&logger);

        assert_eq!(get_timezone_offset("701 PM CDT TUE MAY 1 2018", &regexes, &mut diagnostics), "0500");
        assert_eq!(get_timezone_offset("1008 PM AKST WED MAR 6 2019", &regexes, &mut diagnostics), "0900");
        assert!(diagnostics.warnings().is_empty());

        assert_eq!(get_timezone_offset("NATIONAL WEATHER SERVICE", &regexes, &mut diagnostics), "0000");
        assert_eq!(
            diagnostics.warnings(),
            &[FieldWarning::TimezoneNotFound("NATIONAL WEATHER SERVICE".to_string())]
        );
    }

    #[test]
    fn get_report_time_should_apply_offset() {
        let result = get_report_time("03/13/2019", "0300 PM", "0400").unwrap();
        assert_eq!(result.timestamp(), 1552503600);
        assert_eq!(result.offset().utc_minus_local(), 4 * 3600);

        let result = get_report_time("03/13/2019", "0300 PM", "0000").unwrap();
        assert_eq!(result.with_timezone(&Utc).hour(), 15);
    }

    #[test]
    fn get_report_time_garbage_should_be_an_error() {
        assert!(matches!(
            get_report_time("99/99/2018", "0700 PM", "0500"),
            Err(Error::ReportTime { .. })
        ));
    }

    #[test]
    fn parse_tornado_report() {
        let event = parse_text("2018-05-02T00:08:00+00:00", TORNADO_TEXT).unwrap();

        assert_eq!(event.event_type, "tornado");
        assert_eq!(event.location, "2 se pahokee");
        assert_eq!(event.point.lat, 26.8);
        assert_eq!(event.point.lon, -80.64);
        assert_eq!(event.county, "palm beach");
        assert_eq!(event.state, "fl");
        assert_eq!(event.source, "trained spotter");
        assert_eq!(event.magnitude, Magnitude::default());
        assert_eq!(event.reported.to_rfc3339(), "2018-05-02T00:00:00+00:00");
        assert_eq!(event.reported_local.to_rfc3339(), "2018-05-01T19:00:00-05:00");
        assert_eq!(event.remarks, "trained skywarn spotter observed from pahokee a funnel cloud approximately 3 miles southeast of pahokee, partially rain-wrapped and nearly stationary. the funnel extended to nearly halfway to the ground before lifting. location radar-estimated/adjusted. video received of funnel reaching the ground with dust being kicked up. reclassified as a tornado.");
        assert_eq!(event.code, "lsr");
        assert_eq!(event.name, "Local Storm Report");
        assert_eq!(event.wfo, "KMFL");
        assert_eq!(event.issued.to_rfc3339(), "2018-05-02T00:08:00+00:00");
        assert!(event.warnings.is_empty());
    }

    #[test]
    fn parse_accented_location_should_keep_later_columns() {
        let text = TORNADO_TEXT.replace("2 SE PAHOKEE     ", "2 SE PAHOKÉE     ");
        let event = parse_text("2018-05-02T00:08:00+00:00", &text).unwrap();

        assert_eq!(event.event_type, "tornado");
        assert_eq!(event.location, "2 se pahokée");
        assert_eq!(event.point, Coordinates { lat: 26.8, lon: -80.64 });
        assert!(event.warnings.is_empty());
    }

    #[test]
    fn parse_hail_report() {
        let product = get_product_from_file("data/products/lsr_hail.json");
        let regexes = Regexes::new().unwrap();
        let result = parse(&product, &regexes, &ParserConfig::default(), &logger()).unwrap();
        let serialized_result = serde_json::to_string(&result).unwrap();
        let expected = r#"{"event_type":"hail","reported_local":"2018-03-27T15:16:00-06:00","reported":"2018-03-27T21:16:00Z","magnitude":{"measured":false,"value":1.25,"units":"inch"},"point":{"lat":32.07,"lon":-100.66},"location":"1 e silver","county":"coke","state":"tx","source":"storm chaser","remarks":"1.25 hail on hwy 208 near silver","code":"lsr","issued":"2018-03-27T21:18:00Z","name":"Local Storm Report","wfo":"KSJT"}"#;
        assert_eq!(serialized_result, expected);
    }

    #[test]
    fn parse_old_report_should_be_stale() {
        // 90 minutes after the 0700 PM CDT report
        let result = parse_text("2018-05-02T01:30:00+00:00", TORNADO_TEXT);
        match result {
            Err(Error::StaleReport { threshold_min, .. }) => assert_eq!(threshold_min, 60),
            other => panic!("expected stale report, got {:?}", other),
        }
    }

    #[test]
    fn parse_report_at_threshold_should_be_ok() {
        assert!(parse_text("2018-05-02T01:00:00+00:00", TORNADO_TEXT).is_ok());
    }

    #[test]
    fn parse_report_after_issuance_should_be_ok() {
        assert!(parse_text("2018-05-01T23:30:00+00:00", TORNADO_TEXT).is_ok());
    }

    #[test]
    fn parse_custom_threshold_should_be_honored() {
        let regexes = Regexes::new().unwrap();
        let product = tornado_product("2018-05-02T01:30:00+00:00", TORNADO_TEXT);
        let config = ParserConfig {
            staleness_threshold_min: 120,
        };
        assert!(parse(&product, &regexes, &config, &logger()).is_ok());
    }

    #[test]
    fn parse_summary_should_be_rejected() {
        let text = TORNADO_TEXT.replace("REPORT...CORRECTED", "REPORT...SUMMARY");
        assert!(matches!(
            parse_text("2018-05-02T00:08:00+00:00", &text),
            Err(Error::SummaryProduct)
        ));
    }

    #[test]
    fn parse_unknown_timezone_should_degrade_to_utc() {
        let text = TORNADO_TEXT.replace("701 PM CDT", "701 PM XYZ");
        let event = parse_text("2018-05-01T19:10:00+00:00", &text).unwrap();

        assert_eq!(event.reported.to_rfc3339(), "2018-05-01T19:00:00+00:00");
        assert_eq!(event.warnings, vec![FieldWarning::UnknownTimezone("XYZ".to_string())]);
    }

    #[test]
    fn parse_bad_date_should_be_an_error() {
        let text = TORNADO_TEXT.replace("05/01/2018", "99/99/2018");
        assert!(matches!(
            parse_text("2018-05-02T00:08:00+00:00", &text),
            Err(Error::ReportTime { .. })
        ));
    }
}
