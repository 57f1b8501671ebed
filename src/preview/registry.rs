//! Indexed collection of previews with an explicit reload lifecycle

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};

use super::naming::underscore;
use super::types::{Preview, PreviewContext, PreviewSummary};
use crate::error::Result;
use crate::metrics::RegistryMetrics;

/// Immutable result of one `load`
#[derive(Debug, Default)]
pub struct PreviewSnapshot {
    /// Sorted ascending by display name
    pub all: Vec<Arc<Preview>>,
    /// Last write wins on duplicate ids
    pub by_id: HashMap<String, Arc<Preview>>,
    /// Same relative order as `all`
    pub by_class: BTreeMap<String, Vec<Arc<Preview>>>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl PreviewSnapshot {
    fn build(context: &Arc<PreviewContext>, class_ids: &[String]) -> Result<Self> {
        let mut all = Vec::new();
        let mut by_id: HashMap<String, Arc<Preview>> = HashMap::new();

        for class_id in class_ids {
            let prefix = underscore(class_id);

            for method_id in context.catalog().method_ids(class_id)? {
                let id = format!("{}-{}", prefix, method_id);
                let preview = Arc::new(Preview::new(
                    id.clone(),
                    class_id.clone(),
                    method_id,
                    context.clone(),
                ));

                if by_id.insert(id.clone(), preview.clone()).is_some() {
                    tracing::warn!(preview_id = %id, class_id = %class_id, "Duplicate preview id, later definition wins");
                    RegistryMetrics::record_id_collision();
                }
                all.push(preview);
            }
        }

        all.sort_by(|a, b| a.display_name().cmp(b.display_name()));

        let mut by_class: BTreeMap<String, Vec<Arc<Preview>>> = BTreeMap::new();
        for preview in &all {
            by_class
                .entry(preview.class_id().to_string())
                .or_default()
                .push(preview.clone());
        }

        Ok(Self {
            all,
            by_id,
            by_class,
            loaded_at: Some(Utc::now()),
        })
    }
}

/// Registry of previews.
///
/// Empty until [`load`](Self::load) is called. Each load builds a complete new
/// snapshot and swaps it in, so readers see either the old or the new set and
/// never a partial one.
pub struct PreviewRegistry {
    context: Arc<PreviewContext>,
    snapshot: ArcSwap<PreviewSnapshot>,
}

impl PreviewRegistry {
    pub fn new(context: Arc<PreviewContext>) -> Self {
        Self {
            context,
            snapshot: ArcSwap::from_pointee(PreviewSnapshot::default()),
        }
    }

    pub fn context(&self) -> &Arc<PreviewContext> {
        &self.context
    }

    /// Replace the registry contents with one preview per method of each class.
    ///
    /// If any class cannot be resolved the error is returned and the previous
    /// snapshot stays in place.
    #[tracing::instrument(name = "registry.load", skip_all, fields(classes = class_ids.len()))]
    pub fn load<S: AsRef<str>>(&self, class_ids: &[S]) -> Result<()> {
        let class_ids: Vec<String> = class_ids.iter().map(|c| c.as_ref().to_string()).collect();

        match PreviewSnapshot::build(&self.context, &class_ids) {
            Ok(snapshot) => {
                let count = snapshot.all.len();
                self.snapshot.store(Arc::new(snapshot));
                RegistryMetrics::record_loaded(count);
                tracing::info!(previews = count, "Preview registry loaded");
                Ok(())
            }
            Err(e) => {
                RegistryMetrics::record_load_failed();
                tracing::error!(error = %e, "Preview registry load failed");
                Err(e)
            }
        }
    }

    /// Load every class registered in the catalog
    pub fn load_all_registered(&self) -> Result<()> {
        let class_ids = self.context.catalog().class_ids();
        self.load(class_ids.as_slice())
    }

    /// Current snapshot; stays valid even if a reload happens meanwhile
    pub fn snapshot(&self) -> Arc<PreviewSnapshot> {
        self.snapshot.load_full()
    }

    pub fn find(&self, id: &str) -> Option<Arc<Preview>> {
        self.snapshot.load().by_id.get(id).cloned()
    }

    pub fn all(&self) -> Vec<Arc<Preview>> {
        self.snapshot.load().all.clone()
    }

    pub fn all_by_class(&self) -> BTreeMap<String, Vec<Arc<Preview>>> {
        self.snapshot.load().by_class.clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.load().all.is_empty()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.load().loaded_at
    }

    pub fn summaries(&self) -> Vec<PreviewSummary> {
        self.snapshot.load().all.iter().map(|p| p.summary()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreviewError;
    use crate::mail::Mail;
    use crate::preview::{MailerCatalog, MailerClass};
    use pretty_assertions::assert_eq;

    fn class(methods: &[&'static str]) -> MailerClass {
        methods.iter().fold(MailerClass::new(), |class, &name| {
            class.method(name, move || Ok(Mail::builder(name).build()))
        })
    }

    fn registry() -> PreviewRegistry {
        let catalog = MailerCatalog::new()
            .with_class("WelcomeMailerPreview", class(&["welcome_email", "activation"]))
            .with_class("InvoicePreview", class(&["paid", "overdue"]))
            .with_class("ZebraPreview", class(&["alpha"]));
        PreviewRegistry::new(Arc::new(PreviewContext::new(catalog, "unused")))
    }

    fn ids(previews: &[Arc<Preview>]) -> Vec<String> {
        previews.iter().map(|p| p.id().to_string()).collect()
    }

    #[test]
    fn test_empty_until_loaded() {
        let registry = registry();
        assert!(registry.is_empty());
        assert!(registry.loaded_at().is_none());
        assert!(registry.find("invoice_preview-paid").is_none());
        assert!(registry.all_by_class().is_empty());
    }

    #[test]
    fn test_load_assigns_ids() {
        let registry = registry();
        registry.load(&["WelcomeMailerPreview", "InvoicePreview"]).unwrap();

        assert_eq!(registry.len(), 4);
        for id in [
            "welcome_mailer_preview-welcome_email",
            "welcome_mailer_preview-activation",
            "invoice_preview-paid",
            "invoice_preview-overdue",
        ] {
            assert!(registry.find(id).is_some(), "missing {id}");
        }
        assert!(registry.loaded_at().is_some());
    }

    #[test]
    fn test_all_sorted_by_display_name() {
        let registry = registry();
        registry.load(&["WelcomeMailerPreview", "InvoicePreview", "ZebraPreview"]).unwrap();

        let names: Vec<String> = registry
            .all()
            .iter()
            .map(|p| p.display_name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "Invoice: Overdue",
                "Invoice: Paid",
                "Welcome: Activation",
                "Welcome: Welcome email",
                "Zebra: Alpha",
            ]
        );
    }

    #[test]
    fn test_by_class_preserves_order() {
        let registry = registry();
        registry.load(&["WelcomeMailerPreview", "InvoicePreview"]).unwrap();

        let by_class = registry.all_by_class();
        assert_eq!(by_class.len(), 2);
        assert_eq!(
            ids(&by_class["InvoicePreview"]),
            vec!["invoice_preview-overdue", "invoice_preview-paid"]
        );
        assert_eq!(
            ids(&by_class["WelcomeMailerPreview"]),
            vec![
                "welcome_mailer_preview-activation",
                "welcome_mailer_preview-welcome_email"
            ]
        );
    }

    #[test]
    fn test_find_returns_same_instance() {
        let registry = registry();
        registry.load(&["InvoicePreview"]).unwrap();

        let found = registry.find("invoice_preview-paid").unwrap();
        let listed = registry
            .all()
            .into_iter()
            .find(|p| p.id() == "invoice_preview-paid")
            .unwrap();
        assert!(Arc::ptr_eq(&found, &listed));
        assert!(registry.find("invoice_preview-refunded").is_none());
    }

    #[test]
    fn test_reload_replaces_everything() {
        let registry = registry();
        registry.load(&["InvoicePreview"]).unwrap();
        registry.load(&["ZebraPreview"]).unwrap();

        assert!(registry.find("invoice_preview-paid").is_none());
        assert!(registry.find("invoice_preview-overdue").is_none());
        assert!(registry.find("zebra_preview-alpha").is_some());
        assert_eq!(registry.all_by_class().keys().collect::<Vec<_>>(), vec!["ZebraPreview"]);
    }

    #[test]
    fn test_failed_load_keeps_previous_snapshot() {
        let registry = registry();
        registry.load(&["InvoicePreview"]).unwrap();

        let err = registry.load(&["ZebraPreview", "GhostPreview"]).unwrap_err();
        assert!(matches!(err, PreviewError::ClassResolution(_)));
        assert!(registry.find("invoice_preview-paid").is_some());
        assert!(registry.find("zebra_preview-alpha").is_none());
    }

    #[test]
    fn test_duplicate_ids_last_write_wins() {
        let registry = registry();
        registry.load(&["InvoicePreview", "InvoicePreview"]).unwrap();

        assert_eq!(registry.len(), 4);
        let winner = registry.find("invoice_preview-paid").unwrap();
        let last = registry
            .all()
            .into_iter()
            .filter(|p| p.id() == "invoice_preview-paid")
            .last()
            .unwrap();
        // Stable sort keeps construction order for equal names
        assert!(Arc::ptr_eq(&winner, &last));
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let registry = registry();
        registry.load(&["InvoicePreview"]).unwrap();
        let old = registry.snapshot();

        registry.load(&["ZebraPreview"]).unwrap();

        assert_eq!(old.all.len(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_load_all_registered() {
        let registry = registry();
        registry.load_all_registered().unwrap();

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.summaries()[0].display_name, "Invoice: Overdue");
    }
}
