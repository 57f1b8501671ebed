//! Email preview registry.
//!
//! This module provides:
//! - A registration table of preview classes and their generator methods
//! - Deterministic preview ids and lazily derived display names
//! - A reloadable registry indexed by id and by class
//! - Rendering that writes attachments to disk exactly once
//!
//! # Example
//!
//! ```ignore
//! let catalog = MailerCatalog::new().with_class(
//!     "OrderMailerPreview",
//!     MailerClass::new().method("shipped", || Ok(Mail::builder("Shipped").build())),
//! );
//! let context = Arc::new(PreviewContext::new(catalog, "tmp/email_preview_attachments"));
//!
//! let registry = PreviewRegistry::new(context);
//! registry.load(&["OrderMailerPreview"])?;
//!
//! let preview = registry.find("order_mailer_preview-shipped").unwrap();
//! assert_eq!(preview.display_name(), "Order: Shipped");
//! let mail = preview.render(false)?;
//! ```

mod attachments;
mod catalog;
mod hooks;
mod locale;
pub mod naming;
mod registry;
mod types;

pub use attachments::{materialize, sanitize_filename};
pub use catalog::{MailGenerator, MailerCatalog, MailerClass};
pub use hooks::{BeforeRenderHook, BeforeRenderHooks};
pub use locale::{LocaleCatalog, StaticLocales};
pub use registry::{PreviewRegistry, PreviewSnapshot};
pub use types::{Preview, PreviewContext, PreviewSummary, FORMATS};
