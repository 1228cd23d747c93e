pub mod db;
pub mod document;
pub mod model;
pub mod parser;

use wasm_bindgen::prelude::*;

pub use db::DatabaseType;
pub use document::{DocumentError, Element};
pub use model::Model;
pub use parser::{Editor, ParseError, Parser};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Parse an exported class diagram with the parser its editor needs.
pub fn parse(root: &Element, database: DatabaseType) -> Result<Model, ParseError> {
    parser::create_parser(root, database)?.parse()
}

/// Parse XMI text.
pub fn parse_xmi(input: &str, database: DatabaseType) -> Result<Model, Error> {
    let root = Element::parse_xml(input)?;
    Ok(parse(&root, database)?)
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Convert XMI source to the model as JSON
#[wasm_bindgen(js_name = "xmiToModel")]
pub fn xmi_to_model(source: &str, database: Option<String>) -> Result<String, String> {
    let database = match database.as_deref() {
        Some(name) => {
            DatabaseType::from_str(name).ok_or_else(|| format!("Unknown database type: {}", name))?
        }
        None => DatabaseType::Sql,
    };
    let model = parse_xmi(source, database).map_err(|e| e.to_string())?;
    serde_json::to_string(&model).map_err(|e| e.to_string())
}
