//! Output encodings for config lists and merged documents.

use crate::error::EncodeError;
use clap::ValueEnum;
use serde::Serialize;

/// Wire encoding for responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Encoding {
    Json,
    #[default]
    Yaml,
}

impl Encoding {
    /// MIME type for the `Content-Type` header.
    pub fn content_type(&self) -> &'static str {
        match self {
            Encoding::Json => "application/json",
            Encoding::Yaml => "application/yaml",
        }
    }

    /// Encode a value. JSON output ends with a newline, like YAML output does.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, EncodeError> {
        match self {
            Encoding::Json => {
                let mut out = serde_json::to_string(value)?;
                out.push('\n');
                Ok(out)
            }
            Encoding::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubeconfig::KubeConfig;
    use crate::kubeconfig::tests::SAMPLE;

    #[test]
    fn test_encode_list() {
        let names = vec!["dev".to_string(), "prod".to_string()];
        assert_eq!(Encoding::Json.encode(&names).unwrap(), "[\"dev\",\"prod\"]\n");
        assert_eq!(Encoding::Yaml.encode(&names).unwrap(), "- dev\n- prod\n");
    }

    #[test]
    fn test_encode_document_both_ways() {
        let doc = KubeConfig::parse(SAMPLE.as_bytes()).unwrap();

        let json = Encoding::Json.encode(&doc).unwrap();
        let back: KubeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);

        let yaml = Encoding::Yaml.encode(&doc).unwrap();
        assert!(yaml.starts_with("apiVersion: v1\nkind: Config\n"));
        assert!(yaml.contains("certificate-authority-data: dGVzdC1jZXJ0"));
        assert_eq!(KubeConfig::parse(yaml.as_bytes()).unwrap(), doc);
    }

    #[test]
    fn test_content_type() {
        assert_eq!(Encoding::Json.content_type(), "application/json");
        assert_eq!(Encoding::Yaml.content_type(), "application/yaml");
    }
}
