use super::error::{NodeError, NodeResult};
use serde_json::{Map, Value};

/// Read access to a node's raw parameter object.
///
/// Every accessor reports failures with the module and node name attached,
/// so validation code reads as a flat list of checks.
#[derive(Debug, Clone, Copy)]
pub struct Parameters<'a> {
    module: &'static str,
    node: &'a str,
    values: Option<&'a Map<String, Value>>,
}

impl<'a> Parameters<'a> {
    /// `Value::Null` is treated as an empty parameter set
    pub fn new(module: &'static str, node: &'a str, raw: &'a Value) -> NodeResult<Self> {
        let values = match raw {
            Value::Object(map) => Some(map),
            Value::Null => None,
            _ => return Err(NodeError::invalid(module, node, "parameters", "must_be_object")),
        };
        Ok(Self { module, node, values })
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn node(&self) -> &'a str {
        self.node
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.values.and_then(|values| values.get(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn missing(&self, key: &str) -> NodeError {
        NodeError::missing(self.module, self.node, key)
    }

    pub fn invalid(&self, key: &str, cause: &str) -> NodeError {
        NodeError::invalid(self.module, self.node, key, cause)
    }

    pub fn require(&self, key: &str) -> NodeResult<&'a Value> {
        self.get(key).ok_or_else(|| self.missing(key))
    }

    /// Fail with `MissingParameter` for the first absent key
    pub fn require_all(&self, keys: &[&str]) -> NodeResult<()> {
        match keys.iter().find(|key| !self.contains(key)) {
            Some(key) => Err(self.missing(key)),
            None => Ok(()),
        }
    }

    pub fn require_int(&self, key: &str) -> NodeResult<i64> {
        self.require(key)?
            .as_i64()
            .ok_or_else(|| self.invalid(key, "must_be_int"))
    }

    pub fn require_bool(&self, key: &str) -> NodeResult<bool> {
        self.require(key)?
            .as_bool()
            .ok_or_else(|| self.invalid(key, "must_be_bool"))
    }

    pub fn require_str(&self, key: &str, cause: &str) -> NodeResult<&'a str> {
        self.require(key)?
            .as_str()
            .ok_or_else(|| self.invalid(key, cause))
    }

    pub fn require_number(&self, key: &str) -> NodeResult<f64> {
        self.require(key)?
            .as_f64()
            .ok_or_else(|| self.invalid(key, "must_be_number"))
    }

    pub fn optional_str(&self, key: &str) -> NodeResult<Option<&'a str>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| self.invalid(key, "must_be_string")),
        }
    }

    /// Optional list of strings: must be a non-empty array of strings when present
    pub fn optional_str_list(&self, key: &str) -> NodeResult<Option<Vec<String>>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let items = value.as_array().ok_or_else(|| self.invalid(key, "must_be_list"))?;
        if items.is_empty() {
            return Err(self.invalid(key, "is_empty"));
        }
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.invalid(key, "must_contain_strings_only"))
            })
            .collect::<NodeResult<Vec<_>>>()
            .map(Some)
    }
}

/// Buffer clearing policy shared by every node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferOptions {
    pub clear_output_buffer_on_data_input: bool,
    pub clear_input_buffer_after_process: bool,
    pub clear_output_buffer_after_process: bool,
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            clear_output_buffer_on_data_input: true,
            clear_input_buffer_after_process: true,
            clear_output_buffer_after_process: true,
        }
    }
}

impl BufferOptions {
    pub const KEY: &'static str = "buffer_options";

    /// Read the optional `buffer_options` object; absent flags keep their default
    pub fn from_parameters(params: &Parameters<'_>) -> NodeResult<Self> {
        let mut options = Self::default();
        let Some(raw) = params.get(Self::KEY) else {
            return Ok(options);
        };
        let values = raw
            .as_object()
            .ok_or_else(|| params.invalid(Self::KEY, "must_be_dict"))?;

        let flags = [
            ("clear_output_buffer_on_data_input", &mut options.clear_output_buffer_on_data_input),
            ("clear_input_buffer_after_process", &mut options.clear_input_buffer_after_process),
            ("clear_output_buffer_after_process", &mut options.clear_output_buffer_after_process),
        ];
        for (key, flag) in flags {
            if let Some(value) = values.get(key) {
                *flag = value
                    .as_bool()
                    .ok_or_else(|| params.invalid(&format!("{}.{}", Self::KEY, key), "must_be_bool"))?;
            }
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MODULE: &str = "node.test";

    #[test]
    fn test_require_int_rejects_float_and_bool() {
        let raw = json!({"a": 3.0, "b": true, "c": 4});
        let params = Parameters::new(MODULE, "n", &raw).unwrap();

        assert_eq!(params.require_int("a").unwrap_err().cause(), Some("must_be_int"));
        assert_eq!(params.require_int("b").unwrap_err().cause(), Some("must_be_int"));
        assert_eq!(params.require_int("c").unwrap(), 4);
        assert_eq!(params.require_int("d").unwrap_err().code(), "missing.parameter");
    }

    #[test]
    fn test_null_is_empty_parameter_set() {
        let raw = Value::Null;
        let params = Parameters::new(MODULE, "n", &raw).unwrap();
        assert!(!params.contains("anything"));
    }

    #[test]
    fn test_non_object_parameters_rejected() {
        let raw = json!([1, 2]);
        let error = Parameters::new(MODULE, "n", &raw).unwrap_err();
        assert_eq!(error.cause(), Some("must_be_object"));
    }

    #[test]
    fn test_buffer_options_defaults_and_overrides() {
        let raw = json!({"buffer_options": {"clear_input_buffer_after_process": false}});
        let params = Parameters::new(MODULE, "n", &raw).unwrap();
        let options = BufferOptions::from_parameters(&params).unwrap();

        assert!(options.clear_output_buffer_on_data_input);
        assert!(!options.clear_input_buffer_after_process);
        assert!(options.clear_output_buffer_after_process);
    }

    #[test]
    fn test_buffer_options_flag_must_be_bool() {
        let raw = json!({"buffer_options": {"clear_output_buffer_after_process": "yes"}});
        let params = Parameters::new(MODULE, "n", &raw).unwrap();
        let error = BufferOptions::from_parameters(&params).unwrap_err();

        assert_eq!(error.parameter(), Some("buffer_options.clear_output_buffer_after_process"));
        assert_eq!(error.cause(), Some("must_be_bool"));
    }
}
