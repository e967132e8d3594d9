use std::fmt;

/// Scalar value carried by the parameter pipeline.
///
/// Schema defaults, parsed command-line values and driver-file values all
/// travel through this type, so the resolver can compare them directly
/// (the command-line override rule is an equality check against the
/// schema default).
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
  None,
  Bool(bool),
  Number(f64),
  Str(String),
  List(Vec<String>),
}

impl ParamValue {
  /// True for values that count as "not configured" when falling back to
  /// defaults: unset, `false`, zero, the empty string or the empty list.
  pub fn is_unset(&self) -> bool {
    match self {
      ParamValue::None => true,
      ParamValue::Bool(b) => !b,
      ParamValue::Number(n) => *n == 0.0,
      ParamValue::Str(s) => s.is_empty(),
      ParamValue::List(items) => items.is_empty(),
    }
  }

  pub fn truthy(&self) -> bool {
    !self.is_unset()
  }

  /// Converts into the payload of an `Option<String>` settings field.
  pub fn into_string(self) -> Option<String> {
    match self {
      ParamValue::None => None,
      ParamValue::Bool(b) => Some(b.to_string()),
      ParamValue::Number(n) => Some(n.to_string()),
      ParamValue::Str(s) => Some(s),
      ParamValue::List(_) => None,
    }
  }

  pub fn to_f64(&self) -> Option<f64> {
    match self {
      ParamValue::Number(n) => Some(*n),
      ParamValue::Str(s) => s.parse().ok(),
      _ => None,
    }
  }

  pub fn into_list(self) -> Vec<String> {
    match self {
      ParamValue::None => Vec::new(),
      ParamValue::Bool(b) => vec![b.to_string()],
      ParamValue::Number(n) => vec![n.to_string()],
      ParamValue::Str(s) => vec![s],
      ParamValue::List(items) => items,
    }
  }
}

impl fmt::Display for ParamValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ParamValue::None => write!(f, "null"),
      ParamValue::Bool(b) => write!(f, "{b}"),
      ParamValue::Number(n) => write!(f, "{n}"),
      ParamValue::Str(s) => write!(f, "{s}"),
      ParamValue::List(items) => write!(f, "{}", items.join(", ")),
    }
  }
}
