//! Mail-like objects produced by preview generators.
//!
//! A generator builds a [`Mail`] with one part per format and any number of
//! binary attachments. Attachment bodies are kept as raw bytes so they can be
//! written to disk unchanged.

use serde::{Serialize, Serializer};

/// A single binary attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    #[serde(rename = "size", serialize_with = "serialize_len")]
    pub body: Vec<u8>,
}

#[allow(clippy::ptr_arg)]
fn serialize_len<S: Serializer>(body: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(body.len() as u64)
}

impl Attachment {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Undecoded attachment bytes
    pub fn raw_body(&self) -> &[u8] {
        &self.body
    }
}

/// One alternative representation of the message body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailPart {
    pub content_type: String,
    pub body: String,
}

/// A generated message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Mail {
    pub subject: String,
    pub from: Option<String>,
    pub to: Vec<String>,
    pub parts: Vec<MailPart>,
    pub attachments: Vec<Attachment>,
}

impl Mail {
    pub fn builder(subject: impl Into<String>) -> MailBuilder {
        MailBuilder {
            mail: Mail {
                subject: subject.into(),
                ..Default::default()
            },
        }
    }

    /// Attachments in the order they were added
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Body of the first part with the given content type
    pub fn part(&self, content_type: &str) -> Option<&str> {
        self.parts
            .iter()
            .find(|p| p.content_type == content_type)
            .map(|p| p.body.as_str())
    }
}

/// Fluent constructor used by generator closures
#[derive(Debug, Clone)]
pub struct MailBuilder {
    mail: Mail,
}

impl MailBuilder {
    pub fn sender(mut self, from: impl Into<String>) -> Self {
        self.mail.from = Some(from.into());
        self
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.mail.to.push(to.into());
        self
    }

    pub fn html(self, body: impl Into<String>) -> Self {
        self.part("text/html", body)
    }

    pub fn text(self, body: impl Into<String>) -> Self {
        self.part("text/plain", body)
    }

    pub fn part(mut self, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        self.mail.parts.push(MailPart {
            content_type: content_type.into(),
            body: body.into(),
        });
        self
    }

    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.mail.attachments.push(attachment);
        self
    }

    pub fn build(self) -> Mail {
        self.mail
    }
}
