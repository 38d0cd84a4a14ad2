use serde::Deserialize;

/// One object returned by a prefix listing. Names are relative to the
/// listed prefix, matching the storage API's folder semantics.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ObjectEntry {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Error body returned by the storage API. Older deployments use `error`,
/// newer ones `message`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub(crate) fn into_message(self) -> String {
        self.message
            .or(self.error)
            .unwrap_or_else(|| "unknown storage error".to_string())
    }
}
