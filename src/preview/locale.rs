//! Locale catalog passthrough

/// Source of the locales a preview can be rendered in
pub trait LocaleCatalog: Send + Sync {
    fn available_locales(&self) -> Vec<String>;
}

/// Fixed locale list, usually taken from configuration
#[derive(Debug, Clone)]
pub struct StaticLocales {
    locales: Vec<String>,
}

impl StaticLocales {
    pub fn new<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            locales: locales.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for StaticLocales {
    fn default() -> Self {
        Self::new(["en"])
    }
}

impl LocaleCatalog for StaticLocales {
    fn available_locales(&self) -> Vec<String> {
        self.locales.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_locales_keep_order() {
        let locales = StaticLocales::new(["en", "zh-TW", "de"]);
        assert_eq!(locales.available_locales(), vec!["en", "zh-TW", "de"]);
        assert_eq!(StaticLocales::default().available_locales(), vec!["en"]);
    }
}
