use std::sync::OnceLock;

use regex::Regex;

static ATTRIBUTE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Attributes of a tag in source order, values entity-decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Parses `name="value"` / `name='value'` pairs. Anything else in the
    /// attribute area (bare names, unquoted values) is ignored.
    pub fn parse(s: &str) -> Self {
        let attribute_regex = ATTRIBUTE_REGEX.get_or_init(|| {
            Regex::new(r#"([A-Za-z_][A-Za-z0-9_:.\-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
                .expect("Invalid attribute regex")
        });
        let pairs = attribute_regex
            .captures_iter(s)
            .filter_map(|caps| {
                let name = caps.get(1)?.as_str();
                let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
                Some((
                    name.to_string(),
                    html_escape::decode_html_entities(value).into_owned(),
                ))
            })
            .collect();
        Self(pairs)
    }

    /// Value of the first attribute called `name`, if present and not blank.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
