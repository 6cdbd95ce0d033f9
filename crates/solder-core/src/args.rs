//! Command argument handling.
//!
//! The bridge hands arguments to plugins as the raw serialized JSON array it
//! received from the caller; plugins deserialize lazily. A failed parse
//! surfaces as [`ExecError::Args`], which the dispatcher converts into a
//! JSON-error result.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ExecError;

/// Borrowed view of the serialized argument array of one command.
///
/// # Example
///
/// ```rust,ignore
/// async fn execute(&self, action: &str, args: RawArgs<'_>, channel: CallbackChannel)
///     -> Result<bool, ExecError>
/// {
///     let args = args.parse()?;
///     let message = args.str_at(0)?;
///     // …
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RawArgs<'a> {
    raw: &'a str,
}

impl<'a> RawArgs<'a> {
    /// Wraps a serialized JSON array.
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    /// The raw serialized text, unparsed.
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Parses into positional [`CommandArgs`].
    pub fn parse(&self) -> Result<CommandArgs, ExecError> {
        let values: Vec<Value> = serde_json::from_str(self.raw)?;
        Ok(CommandArgs { values })
    }

    /// Deserializes the whole argument array into `T`.
    ///
    /// Useful for treating the arguments as a typed tuple:
    ///
    /// ```rust,ignore
    /// let (millis, message): (u64, String) = args.decode()?;
    /// ```
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ExecError> {
        Ok(serde_json::from_str(self.raw)?)
    }
}

/// Parsed positional arguments with typed accessors.
///
/// Accessors return [`ExecError::Args`] when an index is missing or holds a
/// value of the wrong shape, so a plugin can propagate them with `?` and let
/// the dispatcher report a JSON-error result.
#[derive(Debug, Clone, Default)]
pub struct CommandArgs {
    values: Vec<Value>,
}

impl CommandArgs {
    /// Number of positional arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the command carried no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw value at `index`, if present.
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// String argument at `index`.
    pub fn str_at(&self, index: usize) -> Result<&str, ExecError> {
        self.value_at(index)
            .and_then(Value::as_str)
            .ok_or_else(|| ExecError::args(format!("expected string at index {index}")))
    }

    /// String argument at `index`, tolerating absence and JSON `null`.
    pub fn opt_str_at(&self, index: usize) -> Option<&str> {
        self.value_at(index).and_then(Value::as_str)
    }

    /// Boolean argument at `index`.
    pub fn bool_at(&self, index: usize) -> Result<bool, ExecError> {
        self.value_at(index)
            .and_then(Value::as_bool)
            .ok_or_else(|| ExecError::args(format!("expected boolean at index {index}")))
    }

    /// Integer argument at `index`.
    pub fn i64_at(&self, index: usize) -> Result<i64, ExecError> {
        self.value_at(index)
            .and_then(Value::as_i64)
            .ok_or_else(|| ExecError::args(format!("expected integer at index {index}")))
    }

    /// Floating-point argument at `index`.
    pub fn f64_at(&self, index: usize) -> Result<f64, ExecError> {
        self.value_at(index)
            .and_then(Value::as_f64)
            .ok_or_else(|| ExecError::args(format!("expected number at index {index}")))
    }

    /// Consumes the arguments, yielding the underlying values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl From<Vec<Value>> for CommandArgs {
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_positional_arguments() {
        let args = RawArgs::new(r#"["hello", 3, true]"#).parse().unwrap();
        assert_eq!(args.len(), 3);
        assert_eq!(args.str_at(0).unwrap(), "hello");
        assert_eq!(args.i64_at(1).unwrap(), 3);
        assert!(args.bool_at(2).unwrap());
    }

    #[test]
    fn malformed_input_is_an_args_error() {
        let err = RawArgs::new("[1, 2").parse().unwrap_err();
        assert!(matches!(err, ExecError::Args(_)));
    }

    #[test]
    fn wrong_shape_is_an_args_error() {
        let args = RawArgs::new(r#"[42]"#).parse().unwrap();
        let err = args.str_at(0).unwrap_err();
        assert!(err.to_string().contains("index 0"));
        assert!(matches!(args.str_at(5).unwrap_err(), ExecError::Args(_)));
    }

    #[test]
    fn decodes_typed_tuples() {
        let (millis, message): (u64, String) =
            RawArgs::new(r#"[250, "later"]"#).decode().unwrap();
        assert_eq!(millis, 250);
        assert_eq!(message, "later");
    }

    #[test]
    fn opt_str_tolerates_null() {
        let args = CommandArgs::from(vec![json!(null)]);
        assert_eq!(args.opt_str_at(0), None);
        assert_eq!(args.opt_str_at(1), None);
    }
}
