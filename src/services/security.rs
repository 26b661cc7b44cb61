//! XS security descriptor templates

use std::path::PathBuf;

/// Template shipped with the crate
pub const DEFAULT_XS_SECURITY_TEMPLATE: &str = include_str!("../../templates/xs-security.json");

/// Source of the security descriptor passed to XSUAA instance creation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum XsSecurityTemplate {
    #[default]
    Embedded,
    /// Template file read at creation time
    File(PathBuf),
    Inline(String),
}

impl XsSecurityTemplate {
    /// Template from an optional override path, defaulting to the embedded one
    pub fn from_override(path: Option<PathBuf>) -> Self {
        path.map(Self::File).unwrap_or_default()
    }

    /// Load and parse the template, then set `xsappname`
    ///
    /// The template must be a JSON object.
    pub fn render(&self, xsappname: &str) -> Result<serde_json::Value, String> {
        let content = match self {
            XsSecurityTemplate::Embedded => DEFAULT_XS_SECURITY_TEMPLATE.to_string(),
            XsSecurityTemplate::Inline(content) => content.clone(),
            XsSecurityTemplate::File(path) => std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
        };

        let mut descriptor: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid xs-security template: {}", e))?;

        let object = descriptor
            .as_object_mut()
            .ok_or_else(|| "xs-security template is not a JSON object".to_string())?;
        object.insert(
            "xsappname".to_string(),
            serde_json::Value::String(xsappname.to_string()),
        );

        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_template_renders() {
        let rendered = XsSecurityTemplate::Embedded.render("my_app_42").unwrap();
        assert_eq!(rendered["xsappname"], "my_app_42");
        assert_eq!(rendered["tenant-mode"], "dedicated");
    }

    #[test]
    fn test_file_template() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"xsappname": "placeholder", "scopes": []}}"#).unwrap();

        let template = XsSecurityTemplate::from_override(Some(file.path().to_path_buf()));
        let rendered = template.render("app_1").unwrap();
        assert_eq!(rendered["xsappname"], "app_1");
    }

    #[test]
    fn test_invalid_templates_fail() {
        assert!(XsSecurityTemplate::Inline("not json".to_string()).render("a").is_err());
        assert!(XsSecurityTemplate::Inline("[]".to_string()).render("a").is_err());
        assert!(
            XsSecurityTemplate::File(PathBuf::from("/does/not/exist.json"))
                .render("a")
                .is_err()
        );
    }
}
