//! Source verification against an Etherscan-compatible block explorer
//!
//! Each contract is verified with a single submission followed, after a fixed
//! delay, by a single status query. Nothing is retried: a failed contract is
//! reported and the next one is attempted.

use std::{fs, path::Path, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{error, info};

use crate::{
    constants::{
        CHECK_STATUS_ACTION, EXPLORER_MODULE, EXPLORER_REQUEST_TIMEOUT_SECS, GPL3_LICENSE_TYPE,
        SINGLE_FILE_CODE_FORMAT, VERIFY_SOURCE_ACTION,
    },
    errors::ScriptError,
    types::{CompilerMetadata, ContractInstance},
    utils::read_contract_map,
};

/// A form-encoded request body
pub type Form = Vec<(&'static str, String)>;

/// The envelope every explorer API response is wrapped in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerResponse {
    /// `"1"` on success; some explorers send the number instead of the string
    pub status: Value,
    /// A short human-readable description of the outcome
    #[serde(default)]
    pub message: String,
    /// The job GUID, status text, or error description
    #[serde(default)]
    pub result: Value,
}

impl ExplorerResponse {
    /// Whether the explorer accepted the request
    pub fn is_success(&self) -> bool {
        match &self.status {
            Value::String(s) => s == "1",
            Value::Number(n) => n.as_u64() == Some(1),
            _ => false,
        }
    }

    /// The `result` field as plain text
    pub fn result_text(&self) -> String {
        match &self.result {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// The raw response, for logging
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

/// A client for the explorer's contract verification API
#[derive(Clone)]
pub struct ExplorerClient {
    /// The API endpoint, e.g. `https://api.etherscan.io/api`
    api_url: String,
    /// The API key sent with every request
    api_key: String,
    /// The underlying HTTP client
    http: Client,
}

impl ExplorerClient {
    /// Create a client for the given endpoint
    pub fn new(api_url: &str, api_key: &str) -> Result<Self, ScriptError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(EXPLORER_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ScriptError::Verification(e.to_string()))?;

        Ok(Self {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            http,
        })
    }

    /// Submit a contract's source for verification, returning the job GUID
    pub async fn verify_source_code(
        &self,
        name: &str,
        contract: &ContractInstance,
        source_code: &str,
    ) -> Result<String, ScriptError> {
        let metadata = contract.compiler_metadata()?;
        let form = verify_source_form(&self.api_key, name, contract, source_code, &metadata);

        let response = self.post(&form).await?;
        if !response.is_success() {
            return Err(ScriptError::Verification(format!(
                "failed to verify contract at {:#x}: {}",
                contract.address,
                response.to_json()
            )));
        }

        Ok(response.result_text())
    }

    /// Query the status of a verification job once
    pub async fn check_verify_status(&self, guid: &str) -> Result<ExplorerResponse, ScriptError> {
        self.post(&check_status_form(&self.api_key, guid)).await
    }

    /// POST a form to the API and decode the response envelope
    async fn post(&self, form: &Form) -> Result<ExplorerResponse, ScriptError> {
        self.http
            .post(&self.api_url)
            .form(form)
            .send()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?
            .json::<ExplorerResponse>()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))
    }
}

/// Build the `verifysourcecode` request body
pub fn verify_source_form(
    api_key: &str,
    name: &str,
    contract: &ContractInstance,
    source_code: &str,
    metadata: &CompilerMetadata,
) -> Form {
    vec![
        ("apikey", api_key.to_string()),
        ("module", EXPLORER_MODULE.to_string()),
        ("action", VERIFY_SOURCE_ACTION.to_string()),
        ("contractaddress", format!("{:#x}", contract.address)),
        ("contractname", name.to_string()),
        ("codeformat", SINGLE_FILE_CODE_FORMAT.to_string()),
        ("sourcecode", source_code.to_string()),
        (
            "constructorArguements",
            contract.constructor_arguments.clone(),
        ),
        ("compilerversion", metadata.explorer_compiler_version()),
        (
            "optimizationused",
            metadata.explorer_optimization_used().to_string(),
        ),
        ("runs", metadata.settings.optimizer.runs.to_string()),
        ("licenseType", GPL3_LICENSE_TYPE.to_string()),
    ]
}

/// Build the `checkverifystatus` request body
pub fn check_status_form(api_key: &str, guid: &str) -> Form {
    vec![
        ("apikey", api_key.to_string()),
        ("module", EXPLORER_MODULE.to_string()),
        ("action", CHECK_STATUS_ACTION.to_string()),
        ("guid", guid.to_string()),
    ]
}

/// Verify a single contract: submit, wait `status_delay`, then poll once
///
/// Returns the explorer's final status text on success.
pub async fn verify_contract(
    client: &ExplorerClient,
    name: &str,
    contract: &ContractInstance,
    status_delay: Duration,
) -> Result<String, ScriptError> {
    let source_code = fs::read_to_string(&contract.source_file).map_err(|e| {
        ScriptError::ReadSource(format!("{}: {}", contract.source_file.display(), e))
    })?;

    let guid = client
        .verify_source_code(name, contract, &source_code)
        .await?;
    info!("submitted {name} for verification, guid {guid}");

    sleep(status_delay).await;

    let status = client.check_verify_status(&guid).await?;
    if !status.is_success() {
        return Err(ScriptError::Verification(format!(
            "failed to verify contract at {:#x}: {}",
            contract.address,
            status.to_json()
        )));
    }

    Ok(status.result_text())
}

/// Verify every contract in the contracts file, in key order
///
/// A failure is logged and does not stop the remaining contracts. Returns the
/// number of contracts verified successfully.
pub async fn verify_all(
    client: &ExplorerClient,
    contracts_file: &Path,
    status_delay: Duration,
    interval: Duration,
) -> Result<usize, ScriptError> {
    let contracts = read_contract_map(contracts_file)?;

    let mut verified = 0;
    for (name, contract) in contracts.iter() {
        match verify_contract(client, name, contract, status_delay).await {
            Ok(result) => {
                info!(
                    "succeeded to verify contract at {:#x}: {}",
                    contract.address, result
                );
                verified += 1;
            }
            Err(e) => error!("{name}: {e}"),
        }

        sleep(interval).await;
    }

    if verified < contracts.len() {
        error!("verified {verified} of {} contracts", contracts.len());
    } else {
        info!("verified all {verified} contracts");
    }

    Ok(verified)
}

#[cfg(test)]
mod tests {
    use std::{
        path::PathBuf,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    use alloy::primitives::address;
    use serde_json::json;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
    };

    use super::*;

    /// The metadata of a contract compiled with the optimizer on
    const METADATA: &str = r#"{"compiler":{"version":"0.5.16+commit.9c3226ce"},"settings":{"optimizer":{"enabled":true,"runs":999999}}}"#;

    /// A contract record as written by the deploy command
    fn factory_instance() -> ContractInstance {
        ContractInstance {
            address: address!("0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f"),
            source_file: PathBuf::from("contracts/UniswapV2Factory.sol"),
            metadata: METADATA.to_string(),
            constructor_arguments: format!("{:0>64}", "17ec8597ff92c3f44523bdc65bf0f1be632917ff"),
        }
    }

    /// A submission the explorer accepted
    const SUBMITTED: &str = r#"{"status":"1","message":"OK","result":"ezq878u486pzijkvvmerl6a9mzwhv6sefgvqi5tkwceejc7tvn"}"#;
    /// A job the explorer finished verifying, with a numeric status
    const VERIFIED: &str = r#"{"status":1,"message":"OK","result":"Pass - Verified"}"#;
    /// A job still waiting in the explorer's queue
    const PENDING: &str = r#"{"status":"0","message":"NOTOK","result":"Pending in queue"}"#;
    /// A submission the explorer rejected
    const REJECTED: &str = r#"{"status":"0","message":"NOTOK","result":"Invalid API Key"}"#;

    /// Write a flattened source file unique to this test process
    fn source_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.sol", name, std::process::id()));
        fs::write(&path, "pragma solidity =0.5.16;\ncontract UniswapV2Factory {}\n").unwrap();
        path
    }

    /// Read one HTTP request off the socket, headers and body
    async fn read_request(socket: &mut TcpStream) {
        let mut request = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&chunk[..n]);

            let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let headers = String::from_utf8_lossy(&request[..end]).to_lowercase();
            let body_len = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|len| len.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if request.len() >= end + 4 + body_len {
                return;
            }
        }
    }

    /// Serve the given JSON bodies in order, one per request, then stop
    /// accepting connections
    ///
    /// Returns the API url and the number of requests served so far.
    async fn mock_explorer(bodies: Vec<&'static str>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api", listener.local_addr().unwrap());
        let served = Arc::new(AtomicUsize::new(0));

        let counter = served.clone();
        tokio::spawn(async move {
            for body in bodies {
                let (mut socket, _) = listener.accept().await.unwrap();
                read_request(&mut socket).await;
                counter.fetch_add(1, Ordering::SeqCst);

                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        (url, served)
    }

    /// Look up a form field by name
    fn field<'a>(form: &'a Form, key: &str) -> &'a str {
        form.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or_else(|| panic!("missing form field {key}"))
    }

    #[test]
    fn test_verify_source_form() {
        let contract = factory_instance();
        let metadata = contract.compiler_metadata().unwrap();
        let form = verify_source_form(
            "KEY",
            "UniswapV2Factory",
            &contract,
            "pragma solidity =0.5.16;",
            &metadata,
        );

        let keys: Vec<&str> = form.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec![
                "apikey",
                "module",
                "action",
                "contractaddress",
                "contractname",
                "codeformat",
                "sourcecode",
                "constructorArguements",
                "compilerversion",
                "optimizationused",
                "runs",
                "licenseType",
            ]
        );

        assert_eq!(field(&form, "apikey"), "KEY");
        assert_eq!(field(&form, "module"), "contract");
        assert_eq!(field(&form, "action"), "verifysourcecode");
        assert_eq!(
            field(&form, "contractaddress"),
            "0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f"
        );
        assert_eq!(field(&form, "codeformat"), "solidity-single-file");
        assert_eq!(field(&form, "compilerversion"), "v0.5.16+commit.9c3226ce");
        assert_eq!(field(&form, "optimizationused"), "1");
        assert_eq!(field(&form, "runs"), "999999");
        assert_eq!(field(&form, "licenseType"), "5");
        assert!(!field(&form, "constructorArguements").starts_with("0x"));
    }

    #[test]
    fn test_check_status_form() {
        let form = check_status_form("KEY", "ezq878u486pzijkvvmerl6a9mzwhv6sefgvqi5tkwceejc7tvn");

        assert_eq!(field(&form, "action"), "checkverifystatus");
        assert_eq!(
            field(&form, "guid"),
            "ezq878u486pzijkvvmerl6a9mzwhv6sefgvqi5tkwceejc7tvn"
        );
        assert_eq!(form.len(), 4);
    }

    #[test]
    fn test_response_status_string_or_number() {
        let ok_str: ExplorerResponse =
            serde_json::from_value(json!({"status": "1", "message": "OK", "result": "guid"}))
                .unwrap();
        let ok_num: ExplorerResponse =
            serde_json::from_value(json!({"status": 1, "message": "OK", "result": "guid"}))
                .unwrap();
        let pending: ExplorerResponse = serde_json::from_value(
            json!({"status": "0", "message": "NOTOK", "result": "Pending in queue"}),
        )
        .unwrap();

        assert!(ok_str.is_success());
        assert!(ok_num.is_success());
        assert!(!pending.is_success());
        assert_eq!(pending.result_text(), "Pending in queue");
    }

    #[test]
    fn test_response_missing_fields() {
        let response: ExplorerResponse = serde_json::from_value(json!({"status": "0"})).unwrap();

        assert!(!response.is_success());
        assert!(response.message.is_empty());
        assert_eq!(response.result_text(), "null");
    }

    #[tokio::test]
    async fn test_verify_contract_missing_source() {
        let client = ExplorerClient::new("http://127.0.0.1:1/api", "KEY").unwrap();
        let mut contract = factory_instance();
        contract.source_file = PathBuf::from("/nonexistent/UniswapV2Factory.sol");

        let res = verify_contract(&client, "UniswapV2Factory", &contract, Duration::ZERO).await;
        assert!(matches!(res, Err(ScriptError::ReadSource(_))));
    }

    #[tokio::test]
    async fn test_verify_all_continues_past_failures() {
        let path = std::env::temp_dir().join(format!("verify-all-{}.json", std::process::id()));
        let mut contract = factory_instance();
        contract.source_file = PathBuf::from("/nonexistent/UniswapV2Factory.sol");

        let mut contracts = crate::types::ContractMap::new();
        contracts.insert("UniswapV2Factory".to_string(), contract.clone());
        contracts.insert("UniswapV2Router02".to_string(), contract);
        crate::utils::write_contract_map(&path, &contracts).unwrap();

        let client = ExplorerClient::new("http://127.0.0.1:1/api", "KEY").unwrap();
        let verified = verify_all(&client, &path, Duration::ZERO, Duration::ZERO)
            .await
            .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(verified, 0);
    }

    #[tokio::test]
    async fn test_verify_contract_submits_then_polls_once() {
        let (url, served) = mock_explorer(vec![SUBMITTED, VERIFIED]).await;
        let client = ExplorerClient::new(&url, "KEY").unwrap();
        let mut contract = factory_instance();
        contract.source_file = source_file("verify-success");

        let res = verify_contract(&client, "UniswapV2Factory", &contract, Duration::ZERO).await;
        fs::remove_file(&contract.source_file).unwrap();

        assert_eq!(res.unwrap(), "Pass - Verified");
        assert_eq!(served.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_verify_contract_rejected_submission_skips_poll() {
        let (url, served) = mock_explorer(vec![REJECTED]).await;
        let client = ExplorerClient::new(&url, "KEY").unwrap();
        let mut contract = factory_instance();
        contract.source_file = source_file("verify-rejected");

        let res = verify_contract(&client, "UniswapV2Factory", &contract, Duration::ZERO).await;
        fs::remove_file(&contract.source_file).unwrap();

        match res {
            Err(ScriptError::Verification(msg)) => assert!(msg.contains("Invalid API Key")),
            other => panic!("expected a verification error, got {other:?}"),
        }
        assert_eq!(served.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_verify_contract_pending_status_fails() {
        let (url, served) = mock_explorer(vec![SUBMITTED, PENDING]).await;
        let client = ExplorerClient::new(&url, "KEY").unwrap();
        let mut contract = factory_instance();
        contract.source_file = source_file("verify-pending");

        let res = verify_contract(&client, "UniswapV2Factory", &contract, Duration::ZERO).await;
        fs::remove_file(&contract.source_file).unwrap();

        match res {
            Err(ScriptError::Verification(msg)) => assert!(msg.contains("Pending in queue")),
            other => panic!("expected a verification error, got {other:?}"),
        }
        assert_eq!(served.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_verify_all_counts_verified_contracts() {
        let (url, served) = mock_explorer(vec![SUBMITTED, VERIFIED]).await;
        let client = ExplorerClient::new(&url, "KEY").unwrap();
        let path = std::env::temp_dir().join(format!("verify-some-{}.json", std::process::id()));

        // The factory's source is missing, so only the router reaches the explorer
        let mut missing = factory_instance();
        missing.source_file = PathBuf::from("/nonexistent/UniswapV2Factory.sol");
        let mut present = factory_instance();
        present.source_file = source_file("verify-some");

        let mut contracts = crate::types::ContractMap::new();
        contracts.insert("UniswapV2Factory".to_string(), missing);
        contracts.insert("UniswapV2Router02".to_string(), present.clone());
        crate::utils::write_contract_map(&path, &contracts).unwrap();

        let verified = verify_all(&client, &path, Duration::ZERO, Duration::ZERO)
            .await
            .unwrap();
        fs::remove_file(&path).unwrap();
        fs::remove_file(&present.source_file).unwrap();

        assert_eq!(verified, 1);
        assert_eq!(served.load(Ordering::SeqCst), 2);
    }
}
