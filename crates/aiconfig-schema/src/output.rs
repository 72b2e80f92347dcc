//! Prompt outputs
//!
//! Outputs are discriminated by `output_type`: an [`ExecuteResult`] records
//! what a model produced, an [`ErrorOutput`] records a failed run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::JsonObject;

/// Output recorded on a prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    /// Successful execution
    ExecuteResult(ExecuteResult),
    /// Failed execution
    Error(ErrorOutput),
}

impl Output {
    /// Create an execute result with the given data and empty metadata
    #[must_use]
    pub fn execute_result(data: impl Into<OutputData>) -> Self {
        Self::ExecuteResult(ExecuteResult::new(data))
    }

    /// Create an error output
    #[must_use]
    pub fn error(
        ename: impl Into<String>,
        evalue: impl Into<String>,
        traceback: Vec<String>,
    ) -> Self {
        Self::Error(ErrorOutput {
            ename: ename.into(),
            evalue: evalue.into(),
            traceback,
        })
    }

    /// Text of an execute result whose data is textual
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::ExecuteResult(result) => result.data.text(),
            Self::Error(_) => None,
        }
    }

    /// Check if this is an error output
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Result of executing a prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResult {
    /// Choice index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_count: Option<i64>,

    /// Produced data
    pub data: OutputData,

    /// MIME type; plain text when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Output metadata
    pub metadata: JsonObject,
}

impl ExecuteResult {
    /// Create a result with empty metadata
    #[must_use]
    pub fn new(data: impl Into<OutputData>) -> Self {
        Self {
            execution_count: None,
            data: data.into(),
            mime_type: None,
            metadata: JsonObject::new(),
        }
    }

    /// With execution count
    #[inline]
    #[must_use]
    pub fn with_execution_count(mut self, count: i64) -> Self {
        self.execution_count = Some(count);
        self
    }

    /// With MIME type
    #[inline]
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Error raised while executing a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Error name
    pub ename: String,
    /// Error message
    pub evalue: String,
    /// Traceback lines
    pub traceback: Vec<String>,
}

/// Data carried by an execute result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputData {
    /// Plain string
    Text(String),
    /// `{kind, value}` object
    WithValue(OutputDataWithValue),
    /// Any other JSON
    Json(Value),
}

impl OutputData {
    /// Text for string data and string-valued `{kind, value}` data
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::WithValue(
                OutputDataWithValue::FileUri { value } | OutputDataWithValue::Base64 { value },
            ) => Some(value),
            Self::WithValue(OutputDataWithValue::ToolCalls { .. }) | Self::Json(_) => None,
        }
    }
}

impl From<&str> for OutputData {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for OutputData {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<OutputDataWithValue> for OutputData {
    fn from(data: OutputDataWithValue) -> Self {
        Self::WithValue(data)
    }
}

/// Output content stored with an explicit `kind`
///
/// For string kinds, `mime_type` on the enclosing result says how to
/// interpret the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum OutputDataWithValue {
    /// URI of a file holding the output
    FileUri {
        /// The URI
        value: String,
    },
    /// Base64-encoded output
    Base64 {
        /// Encoded bytes
        value: String,
    },
    /// Tool calls requested by the model
    ToolCalls {
        /// Calls, in model order
        value: Vec<ToolCallData>,
    },
}

/// A single tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallData {
    /// Call ID: `None` when the key is absent, `Some(None)` for an explicit
    /// `null`, which some providers write
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub id: Option<Option<String>>,

    /// Function being called
    pub function: FunctionCallData,

    /// Call type
    #[serde(rename = "type")]
    pub kind: ToolCallKind,
}

/// Kinds of tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallKind {
    /// Function call
    Function,
}

/// Function call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallData {
    /// Arguments as JSON text, exactly as the model produced them (may be invalid JSON)
    pub arguments: String,

    /// Function name
    pub name: String,

    /// Unknown keys, preserved as-is
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn discriminated_by_output_type() {
        let ok: Output = serde_json::from_value(json!({
            "output_type": "execute_result",
            "execution_count": 0,
            "data": "Hello!",
            "metadata": {}
        }))
        .unwrap();
        assert_eq!(ok.text(), Some("Hello!"));
        assert!(!ok.is_error());

        let err: Output = serde_json::from_value(json!({
            "output_type": "error",
            "ename": "RateLimitError",
            "evalue": "too many requests",
            "traceback": ["line 1", "line 2"]
        }))
        .unwrap();
        assert!(err.is_error());
        assert_eq!(err.text(), None);
    }

    #[test]
    fn unknown_output_type_rejected() {
        let result = serde_json::from_value::<Output>(json!({
            "output_type": "stream",
            "text": "..."
        }));
        assert!(result.is_err());
    }

    #[test]
    fn kind_value_data() {
        let output: Output = serde_json::from_value(json!({
            "output_type": "execute_result",
            "data": {"kind": "file_uri", "value": "s3://bucket/out.png"},
            "mime_type": "image/png",
            "metadata": {}
        }))
        .unwrap();
        assert_eq!(output.text(), Some("s3://bucket/out.png"));
    }

    #[test]
    fn tool_calls_data() {
        let raw = json!({
            "kind": "tool_calls",
            "value": [{
                "id": "call_1",
                "type": "function",
                "function": {"name": "get_weather", "arguments": "{\"city\":\"Paris\"}"}
            }]
        });
        let data: OutputData = serde_json::from_value(raw.clone()).unwrap();
        match &data {
            OutputData::WithValue(OutputDataWithValue::ToolCalls { value }) => {
                assert_eq!(value[0].function.name, "get_weather");
                assert_eq!(value[0].kind, ToolCallKind::Function);
            }
            other => panic!("unexpected data: {other:?}"),
        }
        assert_eq!(data.text(), None);
        assert_eq!(serde_json::to_value(&data).unwrap(), raw);
    }

    #[test]
    fn tool_call_null_id_round_trips() {
        let raw = json!({
            "kind": "tool_calls",
            "value": [
                {"id": null, "type": "function", "function": {"name": "f", "arguments": "{}"}},
                {"type": "function", "function": {"name": "g", "arguments": "{}"}}
            ]
        });
        let data: OutputData = serde_json::from_value(raw.clone()).unwrap();
        match &data {
            OutputData::WithValue(OutputDataWithValue::ToolCalls { value }) => {
                assert_eq!(value[0].id, Some(None));
                assert_eq!(value[1].id, None);
            }
            other => panic!("unexpected data: {other:?}"),
        }
        assert_eq!(serde_json::to_value(&data).unwrap(), raw);
    }

    #[test]
    fn negative_execution_count_is_accepted() {
        let output: Output = serde_json::from_value(json!({
            "output_type": "execute_result",
            "execution_count": -1,
            "data": "x",
            "metadata": {}
        }))
        .unwrap();
        match output {
            Output::ExecuteResult(result) => assert_eq!(result.execution_count, Some(-1)),
            Output::Error(_) => panic!("expected execute result"),
        }
    }

    #[test]
    fn arbitrary_objects_fall_back_to_json() {
        let raw = json!({"kind": "file_uri", "value": "x", "extra": 1});
        let data: OutputData = serde_json::from_value(raw.clone()).unwrap();
        assert!(matches!(data, OutputData::Json(_)));
        assert_eq!(serde_json::to_value(&data).unwrap(), raw);
    }

    #[test]
    fn builder_output_shape() {
        let output = Output::ExecuteResult(
            ExecuteResult::new("hi")
                .with_execution_count(1)
                .with_mime_type("text/plain"),
        );
        assert_eq!(
            serde_json::to_value(output).unwrap(),
            json!({
                "output_type": "execute_result",
                "execution_count": 1,
                "data": "hi",
                "mime_type": "text/plain",
                "metadata": {}
            })
        );
    }
}
