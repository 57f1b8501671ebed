use std::sync::Arc;

use anyhow::Result;

use ara_email_preview::config::Settings;
use ara_email_preview::mail::{Attachment, Mail};
use ara_email_preview::preview::{MailerCatalog, MailerClass, PreviewContext, PreviewRegistry};
use ara_email_preview::telemetry::init_tracing;

fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing
    init_tracing(&settings.log)?;
    tracing::info!(
        attachments_dir = %settings.preview.attachments_dir.display(),
        "Configuration loaded"
    );

    let context = Arc::new(PreviewContext::from_settings(demo_catalog(), &settings));
    context.hooks().register(|mail, preview| {
        tracing::debug!(preview_id = %preview.id(), subject = %mail.subject, "Before render");
    });

    let registry = PreviewRegistry::new(context);
    if settings.preview.classes.is_empty() {
        registry.load_all_registered()?;
    } else {
        registry.load(settings.preview.classes.as_slice())?;
    }

    println!("{}", serde_json::to_string_pretty(&registry.summaries())?);

    for preview in registry.all() {
        let mail = preview.render(settings.preview.run_hooks)?;
        tracing::info!(
            preview = %preview.display_name(),
            attachments = mail.attachments().len(),
            "Rendered"
        );
    }

    tracing::info!(previews = registry.len(), "Preview run complete");
    Ok(())
}

/// Sample previews used when running the binary directly
fn demo_catalog() -> MailerCatalog {
    MailerCatalog::new()
        .with_class(
            "OrderMailerPreview",
            MailerClass::new()
                .method("shipped", || {
                    Ok(Mail::builder("Your order has shipped")
                        .sender("orders@example.com")
                        .to("customer@example.com")
                        .html("<p>Order ORD-123 is on its way via FedEx.</p>")
                        .text("Order ORD-123 is on its way via FedEx.")
                        .attach(Attachment::new(
                            "packing slip.txt",
                            "text/plain",
                            "1x Widget\n2x Gadget\n",
                        ))
                        .build())
                })
                .method("cancelled", || {
                    Ok(Mail::builder("Your order was cancelled")
                        .sender("orders@example.com")
                        .to("customer@example.com")
                        .text("Order ORD-123 has been cancelled.")
                        .build())
                }),
        )
        .with_class(
            "InvoicePreview",
            MailerClass::new().method("monthly_statement", || {
                Ok(Mail::builder("Your monthly statement")
                    .sender("billing@example.com")
                    .to("customer@example.com")
                    .html("<p>Your statement is attached.</p>")
                    .attach(Attachment::new("statement-2026-09.csv", "text/csv", "date,amount\n"))
                    .build())
            }),
        )
}
