use crate::error::Result;
use crate::zone::attribute::{Attribute, EntityKind};
use crate::zone::value::Value;
use std::collections::HashMap;

/// Per-view attribute storage shared by domains and hosts.
///
/// Values declared without a view live in `default` and are visible from
/// every view. Lookups for a view return the view's own values followed by
/// the default ones.
#[derive(Clone, Debug)]
pub struct Node {
    kind: EntityKind,
    label: String,
    default: HashMap<Attribute, Vec<Value>>,
    views: HashMap<String, HashMap<Attribute, Vec<Value>>>,
}

impl Node {
    pub fn new(kind: EntityKind, label: &str) -> Self {
        Self {
            kind,
            label: label.to_string(),
            default: HashMap::new(),
            views: HashMap::new(),
        }
    }

    /// "domain example.com." or "host www", for error messages.
    pub fn describe(&self) -> String {
        format!("{} {}", self.kind, self.label)
    }

    pub fn check(&self, attribute: Attribute) -> Result<()> {
        self.kind.check(attribute, &self.describe())
    }

    /// Appends a value under `view`, or under the default view for `None`.
    pub fn add(&mut self, attribute: Attribute, value: Value, view: Option<&str>) -> Result<()> {
        self.check(attribute)?;
        value.check(attribute)?;
        let slot = match view {
            Some(view) => self.views.entry(view.to_string()).or_default(),
            None => &mut self.default,
        };
        slot.entry(attribute).or_default().push(value);
        Ok(())
    }

    /// Values declared exactly under `view`, without the default fallback.
    pub fn declared(&self, attribute: Attribute, view: Option<&str>) -> &[Value] {
        let slot = match view {
            Some(view) => self.views.get(view),
            None => Some(&self.default),
        };
        slot.and_then(|values| values.get(&attribute))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Values visible from `view`: the view's own, then the default view's.
    pub fn lookup(&self, attribute: Attribute, view: Option<&str>) -> Result<Vec<&Value>> {
        self.check(attribute)?;
        let mut values: Vec<&Value> = Vec::new();
        if view.is_some() {
            values.extend(self.declared(attribute, view));
        }
        values.extend(self.declared(attribute, None));
        Ok(values)
    }
}
