use super::diagnostics::{Diagnostics, FieldWarning};
use std::convert::TryFrom;

/// NWS product kinds, numbered as the upstream feed numbers them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductKind {
    Afd = 0,
    Lsr = 1,
    Sel = 2,
    Svr = 3,
    Svs = 4,
    Swo = 5,
    Tor = 6,
    Ffw = 7,
}

impl ProductKind {
    pub fn code(self) -> &'static str {
        match self {
            ProductKind::Afd => "afd",
            ProductKind::Lsr => "lsr",
            ProductKind::Sel => "sel",
            ProductKind::Svr => "svr",
            ProductKind::Svs => "svs",
            ProductKind::Swo => "swo",
            ProductKind::Tor => "tor",
            ProductKind::Ffw => "ffw",
        }
    }
}

impl TryFrom<i32> for ProductKind {
    type Error = i32;

    fn try_from(value: i32) -> Result<ProductKind, i32> {
        match value {
            0 => Ok(ProductKind::Afd),
            1 => Ok(ProductKind::Lsr),
            2 => Ok(ProductKind::Sel),
            3 => Ok(ProductKind::Svr),
            4 => Ok(ProductKind::Svs),
            5 => Ok(ProductKind::Swo),
            6 => Ok(ProductKind::Tor),
            7 => Ok(ProductKind::Ffw),
            _ => Err(value),
        }
    }
}

/// Maps a raw product kind to its lowercase code, or "unknown".
pub fn get_product_code(value: i32, diagnostics: &mut Diagnostics) -> &'static str {
    match ProductKind::try_from(value) {
        Ok(kind) => kind.code(),
        Err(value) => {
            diagnostics.warn(FieldWarning::UnknownProductKind(value));
            "unknown"
        }
    }
}
