//! Handlebars template engine with the built-in goforge templates registered.
//!
//! Output is plain text (Go source, YAML, Markdown, Dockerfiles), so HTML
//! escaping is disabled. Strict mode turns a missing field into an error
//! instead of silently rendering an empty string.

use std::sync::OnceLock;

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{GoforgeError, Result};

pub const TEST_FILE: &str = "test_file";
pub const DOCKERFILE: &str = "dockerfile";
pub const K8S_DEPLOYMENT: &str = "k8s_deployment";
pub const K8S_SERVICE: &str = "k8s_service";
pub const USER_GUIDE: &str = "user_guide";

const BUILTIN: &[(&str, &str)] = &[
    (TEST_FILE, include_str!("../templates/test_file.go.hbs")),
    (DOCKERFILE, include_str!("../templates/dockerfile.hbs")),
    (K8S_DEPLOYMENT, include_str!("../templates/k8s_deployment.yaml.hbs")),
    (K8S_SERVICE, include_str!("../templates/k8s_service.yaml.hbs")),
    (USER_GUIDE, include_str!("../templates/user_guide.md.hbs")),
];

#[derive(Debug)]
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        for (name, source) in BUILTIN {
            handlebars
                .register_template_string(name, *source)
                .map_err(|e| GoforgeError::Template(format!("failed to register '{name}': {e}")))?;
        }

        Ok(Self { handlebars })
    }

    /// Shared engine with the built-in templates. Built once per process.
    pub fn shared() -> Result<&'static TemplateEngine> {
        static ENGINE: OnceLock<std::result::Result<TemplateEngine, String>> = OnceLock::new();
        ENGINE
            .get_or_init(|| TemplateEngine::new().map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|e| GoforgeError::Template(e.clone()))
    }

    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(name, context)
            .map_err(|e| GoforgeError::Template(format!("rendering '{name}' failed: {e}")))
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}
