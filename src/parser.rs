use super::config::ParserConfig;
use super::diagnostics::{Diagnostics, FieldWarning};
use super::domain::{Coordinates, ParsedEvent, Product, WarningDetails};
use super::error::{Error, Result};
use super::lsr_parser;
use super::util::{normalize_float, normalize_string};
use super::warning_parser;
use regex::{Regex, RegexBuilder};
use slog::Logger;

/// Every pattern the extractors use, compiled once and shared read-only.
pub struct Regexes {
    pub movement: Regex,
    pub lat_lon_section: Regex,
    pub lat_lon_pair: Regex,
    pub issued_for: Regex,
    pub timezone: Regex,
    pub magnitude: Regex,
}

impl Regexes {
    pub fn new() -> Result<Regexes> {
        let movement_pattern = r"(?m)^time\.{3}mot\.{3}loc\s(?P<time>\d{4}z)\s(?P<deg>\d+)\D{3}\s(?P<kt>\d+)kt\s(?P<lat>\d{4})\s(?P<lon>\d{4})";
        let lat_lon_section_pattern = r"lat\.{3}lon\s(?P<section>[\s\S]*?)(?:time\.{3}|\n\n)";
        let lat_lon_pair_pattern = r"\b(?P<lat>\d{4})\s(?P<lon>\d{4})\b";
        let issued_for_pattern = r"\n\n\*\s[^\n]* warning for\.{3}\n(?P<for>[\s\S]*?)\n\n\*";
        let timezone_pattern = r"\d{3,4}\s[AP]M\s(?P<tz>[A-Z]{3,4})\s";
        let magnitude_pattern = r"^(?P<marker>[em])(?P<value>[\d.]+)\s(?P<units>.+)$";

        Ok(Regexes {
            movement: build(movement_pattern)?,
            lat_lon_section: build(lat_lon_section_pattern)?,
            lat_lon_pair: build(lat_lon_pair_pattern)?,
            issued_for: build(issued_for_pattern)?,
            timezone: build(timezone_pattern)?,
            magnitude: build(magnitude_pattern)?,
        })
    }
}

fn build(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParsedProduct {
    Report(ParsedEvent),
    Warning(WarningDetails),
}

/// Entry point for extraction. Holds no mutable state and may be shared
/// across threads.
pub struct Parser {
    regexes: Regexes,
    config: ParserConfig,
    logger: Logger,
}

impl Parser {
    pub fn new(logger: Logger, config: ParserConfig) -> Result<Parser> {
        Ok(Parser {
            regexes: Regexes::new()?,
            config,
            logger,
        })
    }

    pub fn parse(&self, product: &Product) -> Result<ParsedProduct> {
        match product.product_code.to_uppercase().as_ref() {
            "LSR" => Ok(ParsedProduct::Report(self.parse_lsr(product)?)),
            "FFW" | "SVR" | "SVS" | "TOR" => Ok(ParsedProduct::Warning(self.parse_warning(product))),
            _ => Err(Error::UnsupportedProduct(product.product_code.to_string())),
        }
    }

    pub fn parse_lsr(&self, product: &Product) -> Result<ParsedEvent> {
        let logger = self.product_logger(product);
        let result = lsr_parser::parse(product, &self.regexes, &self.config, &logger);

        if let Err(ref e) = result {
            debug!(logger, "lsr rejected"; "reason" => e.to_string());
        }

        result
    }

    pub fn parse_warning(&self, product: &Product) -> WarningDetails {
        let logger = self.product_logger(product);
        warning_parser::parse(&product.product_text, &self.regexes, &logger)
    }

    fn product_logger(&self, product: &Product) -> Logger {
        self.logger.new(o!(
            "code" => product.product_code.to_string(),
            "wfo" => product.issuing_office.to_string(),
            "issued" => product.issuance_time.to_rfc3339(),
        ))
    }
}

/// Decodes a 4-digit latitude token, "4512" => 45.12.
pub fn str_to_lat(input: &str, diagnostics: &mut Diagnostics) -> f32 {
    match split_token(input, diagnostics) {
        Some((degrees, hundredths)) => to_decimal(input, degrees, hundredths, diagnostics),
        None => 0.0,
    }
}

/// Decodes a 4-digit longitude token. Longitudes are west, and values over 100
/// drop the leading '1': "0921" => -109.21.
pub fn str_to_lon(input: &str, diagnostics: &mut Diagnostics) -> f32 {
    let (degrees, hundredths) = match split_token(input, diagnostics) {
        Some(parts) => parts,
        None => return 0.0,
    };

    let degrees = if degrees.starts_with('0') {
        format!("1{}", degrees)
    } else {
        degrees.to_string()
    };

    -to_decimal(input, &degrees, hundredths, diagnostics)
}

/// Decodes an LSR "DD.DDN DDD.DDW" point.
pub fn lsr_point(input: &str, diagnostics: &mut Diagnostics) -> Coordinates {
    let normalized = normalize_string(input, false);
    let mut tokens = normalized.split(' ');
    let lat = decimal_token(tokens.next(), 'n', diagnostics);
    let lon = decimal_token(tokens.next(), 'w', diagnostics);

    // West is negative; a missing value stays 0.0 rather than -0.0
    let lon = if lon == 0.0 { 0.0 } else { -lon.abs() };

    Coordinates { lat, lon }
}

fn split_token<'a>(input: &'a str, diagnostics: &mut Diagnostics) -> Option<(&'a str, &'a str)> {
    if input.len() != 4 || !input.is_ascii() {
        diagnostics.warn(FieldWarning::CoordinateLength(input.to_string()));
        return None;
    }

    Some((&input[0..2], &input[2..4]))
}

fn to_decimal(input: &str, degrees: &str, hundredths: &str, diagnostics: &mut Diagnostics) -> f32 {
    match format!("{}.{}", degrees, hundredths).parse::<f32>() {
        Ok(value) => value,
        Err(_) => {
            diagnostics.warn(FieldWarning::CoordinateFormat(input.to_string()));
            0.0
        }
    }
}

fn decimal_token(token: Option<&str>, hemisphere: char, diagnostics: &mut Diagnostics) -> f32 {
    normalize_float(token.unwrap_or("").trim_end_matches(hemisphere), diagnostics)
}
