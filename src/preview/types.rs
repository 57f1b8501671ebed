//! Preview entity and the shared context it renders against

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use serde::Serialize;

use super::attachments::materialize;
use super::catalog::MailerCatalog;
use super::hooks::BeforeRenderHooks;
use super::locale::{LocaleCatalog, StaticLocales};
use super::naming;
use crate::config::Settings;
use crate::error::Result;
use crate::mail::Mail;
use crate::metrics::RenderMetrics;

/// Formats every preview can be displayed in
pub const FORMATS: [&str; 3] = ["text/html", "text/plain", "raw"];

/// Collaborators shared by a registry and every preview it builds
pub struct PreviewContext {
    catalog: MailerCatalog,
    hooks: BeforeRenderHooks,
    locales: Box<dyn LocaleCatalog>,
    attachments_dir: PathBuf,
}

impl PreviewContext {
    pub fn new(catalog: MailerCatalog, attachments_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            hooks: BeforeRenderHooks::new(),
            locales: Box::new(StaticLocales::default()),
            attachments_dir: attachments_dir.into(),
        }
    }

    pub fn from_settings(catalog: MailerCatalog, settings: &Settings) -> Self {
        Self::new(catalog, settings.preview.attachments_dir.clone())
            .with_locales(StaticLocales::new(settings.locale.available.iter().cloned()))
    }

    pub fn with_locales(mut self, locales: impl LocaleCatalog + 'static) -> Self {
        self.locales = Box::new(locales);
        self
    }

    pub fn catalog(&self) -> &MailerCatalog {
        &self.catalog
    }

    pub fn hooks(&self) -> &BeforeRenderHooks {
        &self.hooks
    }

    pub fn attachments_dir(&self) -> &Path {
        &self.attachments_dir
    }

    pub fn locales(&self) -> Vec<String> {
        self.locales.available_locales()
    }
}

impl fmt::Debug for PreviewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewContext")
            .field("catalog", &self.catalog)
            .field("hooks", &self.hooks)
            .field("attachments_dir", &self.attachments_dir)
            .finish()
    }
}

/// One renderable (class, method) pair.
///
/// Names are derived lazily from the immutable ids and computed at most once.
pub struct Preview {
    id: String,
    class_id: String,
    method_id: String,
    context: Arc<PreviewContext>,
    group_name: OnceLock<String>,
    method_name: OnceLock<String>,
    display_name: OnceLock<String>,
}

impl Preview {
    pub fn new(
        id: impl Into<String>,
        class_id: impl Into<String>,
        method_id: impl Into<String>,
        context: Arc<PreviewContext>,
    ) -> Self {
        Self {
            id: id.into(),
            class_id: class_id.into(),
            method_id: method_id.into(),
            context,
            group_name: OnceLock::new(),
            method_name: OnceLock::new(),
            display_name: OnceLock::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    pub fn method_id(&self) -> &str {
        &self.method_id
    }

    pub fn group_name(&self) -> &str {
        self.group_name
            .get_or_init(|| naming::group_name(&self.class_id))
    }

    pub fn method_name(&self) -> &str {
        self.method_name
            .get_or_init(|| naming::method_name(&self.method_id))
    }

    /// `"<group name>: <method name>"`
    pub fn display_name(&self) -> &str {
        self.display_name
            .get_or_init(|| format!("{}: {}", self.group_name(), self.method_name()))
    }

    pub fn locales(&self) -> Vec<String> {
        self.context.locales()
    }

    pub fn formats(&self) -> &'static [&'static str] {
        &FORMATS
    }

    pub fn summary(&self) -> PreviewSummary {
        PreviewSummary {
            id: self.id.clone(),
            class_id: self.class_id.clone(),
            method_id: self.method_id.clone(),
            group_name: self.group_name().to_string(),
            method_name: self.method_name().to_string(),
            display_name: self.display_name().to_string(),
        }
    }

    /// Generate the mail, materialize its attachments and optionally run the
    /// before-render hooks. Every failure is returned to the caller unchanged.
    #[tracing::instrument(
        name = "preview.render",
        skip(self),
        fields(preview_id = %self.id)
    )]
    pub fn render(&self, run_hooks: bool) -> Result<Mail> {
        let started = Instant::now();

        match self.render_mail(run_hooks) {
            Ok(mail) => {
                RenderMetrics::record_success(started.elapsed());
                tracing::debug!(
                    attachments = mail.attachments().len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Preview rendered"
                );
                Ok(mail)
            }
            Err(e) => {
                RenderMetrics::record_failure();
                tracing::warn!(error = %e, "Preview render failed");
                Err(e)
            }
        }
    }

    fn render_mail(&self, run_hooks: bool) -> Result<Mail> {
        let mut mail = self
            .context
            .catalog()
            .generate(&self.class_id, &self.method_id)?;

        materialize(mail.attachments(), self.context.attachments_dir())?;

        if run_hooks {
            self.context.hooks().run(&mut mail, self);
        }

        Ok(mail)
    }
}

impl fmt::Debug for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preview")
            .field("id", &self.id)
            .field("class_id", &self.class_id)
            .field("method_id", &self.method_id)
            .finish_non_exhaustive()
    }
}

/// Serializable listing entry for a preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewSummary {
    pub id: String,
    pub class_id: String,
    pub method_id: String,
    pub group_name: String,
    pub method_name: String,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::Attachment;
    use crate::preview::MailerClass;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn context(dir: &Path) -> Arc<PreviewContext> {
        let catalog = MailerCatalog::new().with_class(
            "WelcomeMailerPreview",
            MailerClass::new()
                .method("welcome_email", || {
                    Ok(Mail::builder("Welcome!")
                        .text("Hello")
                        .attach(Attachment::new("guide.pdf", "application/pdf", "guide"))
                        .build())
                })
                .method("failing", || Err("missing fixture".into())),
        );
        Arc::new(
            PreviewContext::new(catalog, dir).with_locales(StaticLocales::new(["en", "ja"])),
        )
    }

    fn preview(ctx: &Arc<PreviewContext>, method_id: &str) -> Preview {
        Preview::new(
            format!("welcome_mailer_preview-{}", method_id),
            "WelcomeMailerPreview",
            method_id,
            ctx.clone(),
        )
    }

    #[test]
    fn test_derived_names() {
        let tmp = TempDir::new().unwrap();
        let p = preview(&context(tmp.path()), "welcome_email");

        assert_eq!(p.group_name(), "Welcome");
        assert_eq!(p.method_name(), "Welcome email");
        assert_eq!(p.display_name(), "Welcome: Welcome email");
    }

    #[test]
    fn test_names_are_memoized() {
        let tmp = TempDir::new().unwrap();
        let p = preview(&context(tmp.path()), "welcome_email");

        let first = p.display_name().as_ptr();
        assert_eq!(p.display_name().as_ptr(), first);
    }

    #[test]
    fn test_locales_and_formats() {
        let tmp = TempDir::new().unwrap();
        let p = preview(&context(tmp.path()), "welcome_email");

        assert_eq!(p.locales(), vec!["en", "ja"]);
        assert_eq!(p.formats(), &["text/html", "text/plain", "raw"]);
    }

    #[test]
    fn test_render_materializes_attachments() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("attachments");
        let p = preview(&context(&dir), "welcome_email");

        let mail = p.render(false).unwrap();

        assert_eq!(mail.subject, "Welcome!");
        assert_eq!(std::fs::read_to_string(dir.join("guide.pdf")).unwrap(), "guide");
    }

    #[test]
    fn test_hooks_run_only_when_requested() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(tmp.path());
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        ctx.hooks().register(move |mail, preview| {
            counter.fetch_add(1, Ordering::SeqCst);
            mail.subject = format!("[{}] {}", preview.id(), mail.subject);
        });

        let p = preview(&ctx, "welcome_email");

        let plain = p.render(false).unwrap();
        assert_eq!(plain.subject, "Welcome!");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let hooked = p.render(true).unwrap();
        assert_eq!(hooked.subject, "[welcome_mailer_preview-welcome_email] Welcome!");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hooks_run_in_registration_order() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(tmp.path());
        ctx.hooks().register(|mail, _| mail.subject.push_str(" first"));
        ctx.hooks().register(|mail, _| mail.subject.push_str(" second"));

        let mail = preview(&ctx, "welcome_email").render(true).unwrap();
        assert_eq!(mail.subject, "Welcome! first second");
    }

    #[test]
    fn test_render_propagates_generation_error() {
        let tmp = TempDir::new().unwrap();
        let err = preview(&context(tmp.path()), "failing").render(true).unwrap_err();
        assert!(matches!(err, crate::error::PreviewError::MailGeneration { .. }));
    }

    #[test]
    fn test_summary_serializes() {
        let tmp = TempDir::new().unwrap();
        let summary = preview(&context(tmp.path()), "welcome_email").summary();
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["id"], "welcome_mailer_preview-welcome_email");
        assert_eq!(json["display_name"], "Welcome: Welcome email");
    }
}
