use super::diagnostics::{Diagnostics, FieldWarning};
use super::domain::{Coordinates, Movement, Polygon, WarningDetails};
use super::parser::{str_to_lat, str_to_lon, Regexes};
use super::util::normalize_string;
use slog::Logger;

/**
 * Parses the geometry shared by NWS warnings (SVR, TOR, FFW, SVS).
 */
pub fn parse(text: &str, regexes: &Regexes, logger: &Logger) -> WarningDetails {
    let mut diagnostics = Diagnostics::new(logger);
    let movement = get_movement(text, regexes, &mut diagnostics);
    let polygon = get_polygon(text, regexes, &mut diagnostics);
    let issued_for = get_issued_for(text, regexes);

    debug!(logger, "parsed warning";
        "has_movement" => movement.is_some(),
        "polygon_nodes" => polygon.len(),
        "areas" => issued_for.len());

    WarningDetails {
        movement,
        polygon,
        issued_for,
        warnings: diagnostics.into_warnings(),
    }
}

/// Reads the "TIME...MOT...LOC 2236Z 206DEG 24KT 4198 9462" line, if any.
pub fn get_movement(text: &str, regexes: &Regexes, diagnostics: &mut Diagnostics) -> Option<Movement> {
    let captures = regexes.movement.captures(text)?;

    Some(Movement {
        time: captures["time"].to_string(),
        degrees: parse_motion(&captures["deg"], diagnostics),
        knots: parse_motion(&captures["kt"], diagnostics),
        location: Coordinates {
            lat: str_to_lat(&captures["lat"], diagnostics),
            lon: str_to_lon(&captures["lon"], diagnostics),
        },
    })
}

fn parse_motion(raw: &str, diagnostics: &mut Diagnostics) -> u16 {
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            diagnostics.warn(FieldWarning::NumberFormat(raw.to_string()));
            0
        }
    }
}

/// Collects the LAT...LON pairs, in order, up to the TIME... line or a blank line.
pub fn get_polygon(text: &str, regexes: &Regexes, diagnostics: &mut Diagnostics) -> Polygon {
    let section = match regexes.lat_lon_section.captures(text) {
        Some(captures) => captures,
        None => return vec![],
    };

    regexes
        .lat_lon_pair
        .captures_iter(&section["section"])
        .map(|pair| Coordinates {
            lat: str_to_lat(&pair["lat"], diagnostics),
            lon: str_to_lon(&pair["lon"], diagnostics),
        })
        .collect()
}

/// Lists the areas under the "* ... Warning for..." bullet.
pub fn get_issued_for(text: &str, regexes: &Regexes) -> Vec<String> {
    let captures = match regexes.issued_for.captures(text) {
        Some(captures) => captures,
        None => return vec![],
    };

    captures["for"]
        .replace("...", "")
        .lines()
        .map(|x| normalize_string(x, true))
        .filter(|x| !x.is_empty())
        .collect()
}
