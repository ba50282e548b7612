use super::domain::Product;
use std::fs;

pub fn get_product_from_file(path: &str) -> Product {
    let raw = fs::read_to_string(path).unwrap();
    serde_json::from_str(&raw).unwrap()
}
