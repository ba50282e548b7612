use slog::Logger;
use thiserror::Error;

/// Degrade-level problems. The affected field falls back to its default and
/// extraction carries on.
#[derive(Clone, Debug, Error, PartialEq, Serialize, Deserialize)]
pub enum FieldWarning {
    #[error("unable to format magnitude: '{0}'")]
    MagnitudeFormat(String),
    #[error("unable to parse number: '{0}'")]
    NumberFormat(String),
    #[error("unrecognized timezone: '{0}'")]
    UnknownTimezone(String),
    #[error("unable to parse timezone offset: '{0}'")]
    TimezoneNotFound(String),
    #[error("coordinate token is not 4 characters: '{0}'")]
    CoordinateLength(String),
    #[error("unable to parse coordinate: '{0}'")]
    CoordinateFormat(String),
    #[error("unknown product kind: {0}")]
    UnknownProductKind(i32),
}

/// Sink for field-level warnings raised while extracting one bulletin.
pub struct Diagnostics<'a> {
    logger: &'a Logger,
    warnings: Vec<FieldWarning>,
}

impl<'a> Diagnostics<'a> {
    pub fn new(logger: &'a Logger) -> Diagnostics<'a> {
        Diagnostics {
            logger,
            warnings: vec![],
        }
    }

    pub fn warn(&mut self, warning: FieldWarning) {
        warn!(self.logger, "field degraded to default"; "reason" => warning.to_string());
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[FieldWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<FieldWarning> {
        self.warnings
    }
}
