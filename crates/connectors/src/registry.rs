//! Plugin registry: the package manifest a host loads, and lookup of
//! connectors by type name.

use serde::Serialize;

use crate::connectors;
use crate::credentials::{CREDENTIAL_TYPE, CredentialDescriptor};
use crate::node::{Connector, NodeDescription};

/// One entry of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Class name (`SapoProduct`).
    #[serde(rename = "type")]
    pub type_name: String,
    /// Where the host finds the compiled node or credential.
    pub source_path: String,
}

/// Every node and credential type the package ships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub nodes: Vec<ManifestEntry>,
    pub credentials: Vec<ManifestEntry>,
}

/// `sapoProduct` -> `SapoProduct`.
fn class_name(type_name: &str) -> String {
    let mut chars = type_name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// `SapoProduct` -> `Product`.
fn resource_dir(class: &str) -> &str {
    class.strip_prefix("Sapo").unwrap_or(class)
}

/// Static registry over the built-in connectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Registry;

impl Registry {
    /// The package manifest.
    #[must_use]
    pub fn manifest() -> Manifest {
        let nodes = connectors::ALL
            .iter()
            .map(|connector| {
                let class = class_name(connector.type_name());
                ManifestEntry {
                    source_path: format!(
                        "dist/nodes/Sapo/{}/{class}.node.js",
                        resource_dir(&class)
                    ),
                    type_name: class,
                }
            })
            .collect();

        let credential_class = class_name(CREDENTIAL_TYPE);
        Manifest {
            nodes,
            credentials: vec![ManifestEntry {
                source_path: format!("dist/credentials/{credential_class}.credentials.js"),
                type_name: CREDENTIAL_TYPE.to_string(),
            }],
        }
    }

    /// Look up a connector by node type (`sapoProduct`) or class name
    /// (`SapoProduct`).
    #[must_use]
    pub fn connector(type_name: &str) -> Option<&'static dyn Connector> {
        connectors::ALL.iter().copied().find(|connector| {
            connector.type_name() == type_name || class_name(connector.type_name()) == type_name
        })
    }

    /// Type names of every connector.
    pub fn type_names() -> impl Iterator<Item = &'static str> {
        connectors::ALL.iter().map(|connector| connector.type_name())
    }

    /// Description of every connector.
    #[must_use]
    pub fn descriptions() -> Vec<NodeDescription> {
        connectors::ALL
            .iter()
            .map(|connector| connector.description())
            .collect()
    }

    /// The credential form.
    #[must_use]
    pub fn credential() -> CredentialDescriptor {
        CredentialDescriptor::sapo_api()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_manifest_lists_every_node() {
        let manifest = Registry::manifest();
        assert_eq!(manifest.nodes.len(), 11);
        assert!(manifest.nodes.contains(&ManifestEntry {
            type_name: "SapoPriceRule".to_string(),
            source_path: "dist/nodes/Sapo/PriceRule/SapoPriceRule.node.js".to_string(),
        }));

        let value = serde_json::to_value(&manifest).expect("serialize");
        assert_eq!(
            value["credentials"],
            json!([{"type": "sapoApi", "sourcePath": "dist/credentials/SapoApi.credentials.js"}])
        );
    }

    #[test]
    fn test_lookup_by_type_or_class() {
        let by_type = Registry::connector("sapoOrder").expect("type name");
        let by_class = Registry::connector("SapoOrder").expect("class name");
        assert_eq!(by_type.type_name(), by_class.type_name());
        assert!(Registry::connector("sapoCart").is_none());
    }

    #[test]
    fn test_type_names_are_unique() {
        let names: HashSet<_> = Registry::type_names().collect();
        assert_eq!(names.len(), connectors::ALL.len());
    }

    #[test]
    fn test_every_description_is_well_formed() {
        for description in Registry::descriptions() {
            let operation = description
                .property("operation")
                .unwrap_or_else(|| panic!("{} has no operation", description.name));
            assert!(!operation.options.is_empty());
            assert_eq!(description.credentials[0].name, CREDENTIAL_TYPE);
            assert_eq!(description.defaults.name, description.display_name);
            assert!(
                operation
                    .options
                    .iter()
                    .any(|option| option.value == operation.default),
                "{} default operation is not an option",
                description.name
            );
        }
    }
}
