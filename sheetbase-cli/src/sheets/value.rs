//! Cell value representation for spreadsheet tables

/// A single cell's content, as read from or written to the document
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Blank cell
    Empty,
    /// Whole number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Boolean (rendered TRUE/FALSE by the spreadsheet)
    Bool(bool),
    /// Text
    String(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Canonical text form used for equality matching
    pub fn to_match_string(&self) -> String {
        self.to_string()
    }

    /// Convert to JSON value for API calls
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Empty => serde_json::Value::String(String::new()),
            CellValue::Int(i) => serde_json::json!(*i),
            CellValue::Float(f) => serde_json::json!(*f),
            CellValue::Bool(b) => serde_json::Value::Bool(*b),
            CellValue::String(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Parse from a JSON cell returned by the values API
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => CellValue::Empty,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    CellValue::Float(f)
                } else {
                    CellValue::Empty
                }
            }
            serde_json::Value::String(s) if s.is_empty() => CellValue::Empty,
            serde_json::Value::String(s) => CellValue::String(s.clone()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                CellValue::String(json.to_string())
            }
        }
    }

    /// The cell as the service renders it on read: its display text, or
    /// blank
    pub fn formatted(&self) -> Self {
        match self.to_string() {
            text if text.is_empty() => CellValue::Empty,
            text => CellValue::String(text),
        }
    }
}

/// Compare two cells by their text form, so `10` matches `"10"`
pub fn values_match(left: &CellValue, right: &CellValue) -> bool {
    left.to_match_string() == right.to_match_string()
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(fl) if fl.fract() == 0.0 && fl.abs() < 1e15 => {
                write!(f, "{}", *fl as i64)
            }
            CellValue::Float(fl) => write!(f, "{}", fl),
            CellValue::Bool(true) => write!(f, "TRUE"),
            CellValue::Bool(false) => write!(f, "FALSE"),
            CellValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<u32> for CellValue {
    fn from(i: u32) -> Self {
        CellValue::Int(i as i64)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}
