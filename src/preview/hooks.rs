//! Callbacks run after a preview mail is generated and before it is returned.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::types::Preview;
use crate::mail::Mail;

pub type BeforeRenderHook = Arc<dyn Fn(&mut Mail, &Preview) + Send + Sync>;

/// Ordered list of before-render hooks
#[derive(Default)]
pub struct BeforeRenderHooks {
    hooks: RwLock<Vec<BeforeRenderHook>>,
}

impl BeforeRenderHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook; hooks run in registration order
    pub fn register<F>(&self, hook: F)
    where
        F: Fn(&mut Mail, &Preview) + Send + Sync + 'static,
    {
        self.hooks.write().push(Arc::new(hook));
    }

    pub fn len(&self) -> usize {
        self.hooks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.read().is_empty()
    }

    pub fn run(&self, mail: &mut Mail, preview: &Preview) {
        // Snapshot so a hook may register further hooks without deadlocking
        let hooks: Vec<BeforeRenderHook> = self.hooks.read().clone();
        for hook in hooks {
            hook(mail, preview);
        }
    }
}

impl fmt::Debug for BeforeRenderHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeforeRenderHooks")
            .field("len", &self.len())
            .finish()
    }
}
