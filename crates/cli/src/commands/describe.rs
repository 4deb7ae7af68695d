//! `sapo nodes` and `sapo describe`.

use sapo_connectors::{CREDENTIAL_TYPE, Registry};

use super::{CliError, print_json};

/// Print the package manifest.
pub fn manifest() -> Result<(), CliError> {
    print_json(&Registry::manifest())
}

/// Print the node description of `type_name`, or the credential descriptor
/// for `sapoApi`.
pub fn describe(type_name: &str) -> Result<(), CliError> {
    if type_name == CREDENTIAL_TYPE {
        return print_json(&Registry::credential());
    }

    let connector =
        Registry::connector(type_name).ok_or_else(|| CliError::UnknownType(type_name.to_owned()))?;
    print_json(&connector.description())
}
