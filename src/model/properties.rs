use serde::{Deserialize, Serialize};

/// A free-form attribute that has no slot in the canonical vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomProperty {
    pub name: String,
    pub value: String,
}

impl CustomProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered property list. Insertion order is what collaborators display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomProperties(Vec<CustomProperty>);

impl CustomProperties {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert unless a property with the same name already exists.
    /// First writer wins; returns whether the pair was added.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.0.push(CustomProperty::new(name, value));
        true
    }

    /// Append without the uniqueness check.
    pub fn push_raw(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push(CustomProperty::new(name, value));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|p| p.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CustomProperty> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a CustomProperties {
    type Item = &'a CustomProperty;
    type IntoIter = std::slice::Iter<'a, CustomProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<CustomProperty> for CustomProperties {
    fn from_iter<I: IntoIterator<Item = CustomProperty>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
