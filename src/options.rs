use std::collections::{BTreeMap, HashMap};

use crate::{
    error::{AdapterError, Result},
    model::RemoteRepositoryProperties,
    types::RepositoryProperties,
};

/// Named-option lookup supplied by the hosting engine
pub trait OptionsProvider: Send + Sync {
    /// Names this provider advertises, in a stable order
    fn option_names(&self) -> Vec<String>;

    /// Value for `name`, or `None` when the option has no value
    fn get_option(&self, name: &str) -> Option<String>;
}

/// Map-backed options provider
///
/// An entry with a `None` value is advertised but unresolved.
#[derive(Debug, Clone, Default)]
pub struct StaticOptions {
    values: BTreeMap<String, Option<String>>,
}

impl StaticOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), Some(value.into()));
        self
    }

    pub fn with_unset(mut self, name: impl Into<String>) -> Self {
        self.values.insert(name.into(), None);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }
}

impl OptionsProvider for StaticOptions {
    fn option_names(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    fn get_option(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned().flatten()
    }
}

/// Flatten an options provider into a plain name to value map
///
/// Fails on the first advertised name that resolves to nothing.
pub fn convert_options(provider: &dyn OptionsProvider) -> Result<HashMap<String, String>> {
    let mut result = HashMap::new();
    for name in provider.option_names() {
        let value = provider
            .get_option(&name)
            .ok_or_else(|| AdapterError::MissingOption { name: name.clone() })?;
        if result.contains_key(&name) {
            return Err(AdapterError::DuplicateOption { name });
        }
        result.insert(name, value);
    }
    Ok(result)
}

/// Translate both option sets of a request
pub fn convert_properties(properties: &RepositoryProperties) -> Result<RemoteRepositoryProperties> {
    Ok(RemoteRepositoryProperties {
        configuration_options: convert_options(properties.configuration_options.as_ref())?,
        repository_options: convert_options(properties.repository_options.as_ref())?,
    })
}
