use std::fmt;

use opentelemetry::KeyValue;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::value::{attributes_to_map, AttributeValue, Attributes};

/// The entity producing telemetry, as reported by detectors.
///
/// A resource is a set of uniquely keyed attributes plus the schema URL the
/// attribute names follow. The schema URL may be empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resource {
    attributes: Attributes,
    schema_url: String,
}

impl Resource {
    /// Creates an empty resource without schema URL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resource from attributes and a schema URL.
    pub fn with_schema_url<I, K, V>(attributes: I, schema_url: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        Resource {
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            schema_url: schema_url.into(),
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }

    pub fn schema_url(&self) -> &str {
        &self.schema_url
    }

    pub fn set_schema_url(&mut self, schema_url: impl Into<String>) {
        self.schema_url = schema_url.into();
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Inserts an attribute, replacing and returning any previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.attributes.insert(key.into(), value.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.attributes.iter()
    }

    /// Returns the attributes in plain, inspectable form.
    pub fn to_inspectable(&self) -> JsonMap<String, JsonValue> {
        attributes_to_map(&self.attributes)
    }

    /// Converts this resource into an SDK resource.
    ///
    /// Attributes without an SDK representation (empty values, bytes) are
    /// left out.
    pub fn to_sdk_resource(&self) -> opentelemetry_sdk::Resource {
        let attributes = self
            .attributes
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_otel_value()
                    .map(|value| KeyValue::new(key.clone(), value))
            })
            .collect::<Vec<_>>();
        let builder = opentelemetry_sdk::Resource::builder_empty();
        if self.schema_url.is_empty() {
            builder.with_attributes(attributes).build()
        } else {
            builder
                .with_schema_url(attributes, self.schema_url.clone())
                .build()
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", JsonValue::Object(self.to_inspectable()))
    }
}

impl<K, V> FromIterator<(K, V)> for Resource
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Resource::with_schema_url(iter, String::new())
    }
}

impl From<&opentelemetry_sdk::Resource> for Resource {
    fn from(resource: &opentelemetry_sdk::Resource) -> Self {
        Resource {
            attributes: resource
                .iter()
                .map(|(key, value)| (key.as_str().to_owned(), AttributeValue::from(value.clone())))
                .collect(),
            schema_url: resource.schema_url().unwrap_or_default().to_owned(),
        }
    }
}
