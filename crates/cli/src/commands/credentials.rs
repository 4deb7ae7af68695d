//! `sapo test-credentials`.

use std::sync::Arc;

use sapo_connectors::config::SapoConfig;
use sapo_connectors::sapo::HttpTransport;
use sapo_connectors::{CredentialTestResult, test_credentials};

use super::{CliError, print_json};

/// Run the credential smoke test and print the result.
///
/// A failed test is printed, then reported as an error.
pub async fn test() -> Result<(), CliError> {
    let config = SapoConfig::from_env()?;
    let transport = Arc::new(HttpTransport::with_timeout(config.timeout)?);

    let result = test_credentials(&config.credentials(), transport).await;
    print_json(&result)?;

    match result {
        CredentialTestResult::Ok { .. } => Ok(()),
        CredentialTestResult::Failed { message } => Err(CliError::CredentialTest(message)),
    }
}
