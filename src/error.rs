use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures at the page boundary. The animation core itself never fails;
/// a missing canvas just means nothing is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("2d context unavailable on {0}")]
    ContextUnavailable(String),
    #[error("unknown animation {0:?}")]
    UnknownAnimation(String),
    #[error("js error: {0}")]
    Js(String),
}

pub type PageResult<T> = Result<T, PageError>;

impl From<PageError> for JsValue {
    fn from(err: PageError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        PageError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
