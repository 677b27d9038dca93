use serde::{Deserialize, Serialize};

/// The fixed list of asset paths one cache generation must contain, plus the
/// version string that names the generation. Literal configuration, never
/// computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub assets: Vec<String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            version: "repl-v1".to_string(),
            assets: vec![".".to_string(), "app.css".to_string(), "app.js".to_string()],
        }
    }
}
