use portal_core::{Fingerprint, ShortCode};
use typed_builder::TypedBuilder;

/// Store key layout for the three projections of a link and the counter.
///
/// With an empty prefix (the default) the keys are:
///
/// | projection | key                           | value          |
/// |------------|-------------------------------|----------------|
/// | counter    | `next:url:id`                 | integer        |
/// | forward    | `short_link:<code>:url`       | original URL   |
/// | detail     | `short_link:<code>:detail`    | JSON detail    |
/// | reverse    | `url_hash:<fingerprint>:url`  | short code     |
#[derive(Debug, Clone, TypedBuilder)]
pub struct KeyLayout {
    /// Prepended to every key, e.g. `"staging:"`.
    #[builder(default, setter(into))]
    prefix: String,
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl KeyLayout {
    pub fn counter(&self) -> String {
        format!("{}next:url:id", self.prefix)
    }

    pub fn forward(&self, code: &str) -> String {
        format!("{}short_link:{}:url", self.prefix, code)
    }

    pub fn detail(&self, code: &str) -> String {
        format!("{}short_link:{}:detail", self.prefix, code)
    }

    pub fn reverse(&self, fingerprint: &Fingerprint) -> String {
        format!("{}url_hash:{}:url", self.prefix, fingerprint)
    }

    /// Keys written for a new allocation, in write order.
    pub fn projections(&self, code: &ShortCode, fingerprint: &Fingerprint) -> [String; 3] {
        [
            self.forward(code.as_str()),
            self.reverse(fingerprint),
            self.detail(code.as_str()),
        ]
    }
}
