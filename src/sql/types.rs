use serde_json::Value;

/// A piece of SQL text with positional placeholders plus the values bound to
/// them. Every `$k` in `text` pairs with `params[k - 1]`; indices are 1-based
/// and contiguous, and `params.len()` equals the number of placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    pub text: String,
    pub params: Vec<Value>,
}

impl SqlFragment {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            params: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
