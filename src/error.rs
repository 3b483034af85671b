//! Host setup errors
//!
//! Simulations never fail; these only describe why a host could not start a
//! loop. Callers log them and leave the page without an animating game.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("no browser window")]
    NoWindow,

    #[error("no document")]
    NoDocument,

    #[error("canvas `{0}` not found")]
    CanvasNotFound(String),

    #[error("2d context unavailable")]
    NoContext,

    #[error("javascript error: {0}")]
    Js(String),

    #[error("invalid game options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("unknown game `{0}`")]
    UnknownGame(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for HostError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        HostError::Js(format!("{:?}", value))
    }
}
