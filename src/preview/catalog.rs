//! Registration table mapping preview class ids to their generator methods.
//!
//! Hosts register each preview class at startup together with its zero-argument
//! generator closures. The registry only ever sees the string ids; the closures
//! are looked up and invoked on demand when a preview is rendered.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{GenerationError, PreviewError, Result};
use crate::mail::Mail;

/// Zero-argument mail generator
pub type MailGenerator =
    Arc<dyn Fn() -> std::result::Result<Mail, GenerationError> + Send + Sync>;

/// The methods declared on one preview class
#[derive(Clone, Default)]
pub struct MailerClass {
    methods: BTreeMap<String, MailGenerator>,
}

impl MailerClass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method; re-registering a name replaces its generator
    pub fn method<F>(mut self, method_id: impl Into<String>, generator: F) -> Self
    where
        F: Fn() -> std::result::Result<Mail, GenerationError> + Send + Sync + 'static,
    {
        self.methods.insert(method_id.into(), Arc::new(generator));
        self
    }

    /// Method ids in lexical order
    pub fn method_ids(&self) -> Vec<String> {
        self.methods.keys().cloned().collect()
    }

    fn generator(&self, method_id: &str) -> Option<&MailGenerator> {
        self.methods.get(method_id)
    }
}

impl fmt::Debug for MailerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailerClass")
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// All registered preview classes, keyed by class id
#[derive(Debug, Clone, Default)]
pub struct MailerCatalog {
    classes: BTreeMap<String, MailerClass>,
}

impl MailerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class under `class_id`, replacing any previous registration
    pub fn register(&mut self, class_id: impl Into<String>, class: MailerClass) {
        let class_id = class_id.into();
        tracing::debug!(class_id = %class_id, methods = class.methods.len(), "Preview class registered");
        self.classes.insert(class_id, class);
    }

    /// Builder-style variant of [`register`](Self::register)
    pub fn with_class(mut self, class_id: impl Into<String>, class: MailerClass) -> Self {
        self.register(class_id, class);
        self
    }

    /// Registered class ids in lexical order
    pub fn class_ids(&self) -> Vec<String> {
        self.classes.keys().cloned().collect()
    }

    pub fn contains(&self, class_id: &str) -> bool {
        self.classes.contains_key(class_id)
    }

    /// Method ids declared on `class_id`, sorted ascending
    pub fn method_ids(&self, class_id: &str) -> Result<Vec<String>> {
        self.classes
            .get(class_id)
            .map(MailerClass::method_ids)
            .ok_or_else(|| PreviewError::unknown_class(class_id))
    }

    /// Invoke `class_id#method_id` and return the generated mail
    pub fn generate(&self, class_id: &str, method_id: &str) -> Result<Mail> {
        let class = self
            .classes
            .get(class_id)
            .ok_or_else(|| PreviewError::unknown_class(class_id))?;
        let generator = class
            .generator(method_id)
            .ok_or_else(|| PreviewError::unknown_method(class_id, method_id))?;

        generator().map_err(|source| PreviewError::MailGeneration {
            class_id: class_id.to_string(),
            method_id: method_id.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MailerCatalog {
        MailerCatalog::new().with_class(
            "UserMailerPreview",
            MailerClass::new()
                .method("welcome_email", || Ok(Mail::builder("Welcome").build()))
                .method("password_reset", || Ok(Mail::builder("Reset").build()))
                .method("broken", || Err("no user fixture".into())),
        )
    }

    #[test]
    fn test_method_ids_sorted() {
        let ids = catalog().method_ids("UserMailerPreview").unwrap();
        assert_eq!(ids, vec!["broken", "password_reset", "welcome_email"]);
    }

    #[test]
    fn test_unknown_class() {
        let catalog = catalog();
        assert!(matches!(
            catalog.method_ids("NopePreview"),
            Err(PreviewError::ClassResolution(_))
        ));
        assert!(matches!(
            catalog.generate("NopePreview", "welcome_email"),
            Err(PreviewError::ClassResolution(_))
        ));
    }

    #[test]
    fn test_unknown_method() {
        assert!(matches!(
            catalog().generate("UserMailerPreview", "missing"),
            Err(PreviewError::ClassResolution(_))
        ));
    }

    #[test]
    fn test_generate() {
        let mail = catalog().generate("UserMailerPreview", "welcome_email").unwrap();
        assert_eq!(mail.subject, "Welcome");
    }

    #[test]
    fn test_generator_failure() {
        let err = catalog().generate("UserMailerPreview", "broken").unwrap_err();
        match err {
            PreviewError::MailGeneration {
                class_id, method_id, ..
            } => {
                assert_eq!(class_id, "UserMailerPreview");
                assert_eq!(method_id, "broken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reregister_replaces() {
        let mut catalog = catalog();
        catalog.register(
            "UserMailerPreview",
            MailerClass::new().method("digest", || Ok(Mail::default())),
        );
        assert_eq!(catalog.method_ids("UserMailerPreview").unwrap(), vec!["digest"]);
        assert_eq!(catalog.class_ids(), vec!["UserMailerPreview"]);
    }
}
