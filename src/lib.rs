#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate slog;

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod lsr_parser;
pub mod parser;
pub mod products;
pub mod util;
pub mod warning_parser;

#[cfg(test)]
mod test_util;

pub use self::config::{Config, ParserConfig};
pub use self::diagnostics::{Diagnostics, FieldWarning};
pub use self::domain::{Coordinates, Magnitude, Movement, ParsedEvent, Polygon, Product, WarningDetails};
pub use self::error::{Error, Result};
pub use self::parser::{ParsedProduct, Parser};
