//! Emission options, deserialized from the `[emit]` table of `jslua.toml`.

use serde::Deserialize;

/// Line terminator written between emitted lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Newline {
    Lf,
    #[default]
    Crlf,
}

impl Newline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::Crlf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmitOptions {
    /// Wrap identifier reads in `__RefCheck(...)`
    pub ref_guard: bool,
    pub newline: Newline,
    /// Emit `-- BEGIN`/`-- END` and the try/with phase comments
    pub markers: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            ref_guard: false,
            newline: Newline::Crlf,
            markers: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EmitOptions::default();
        assert!(!options.ref_guard);
        assert!(options.markers);
        assert_eq!(options.newline.as_str(), "\r\n");
    }

    #[test]
    fn test_partial_deserialize() {
        let options: EmitOptions = serde_json::from_str(r#"{"newline": "lf", "ref_guard": true}"#).unwrap();
        assert_eq!(options.newline, Newline::Lf);
        assert!(options.ref_guard);
        assert!(options.markers);
    }
}
