//! Integration tests for authorization response generation.
//!
//! These tests wire the generator the way a server would: configuration
//! loaded from TOML, the signing certificate loaded from PEM files, and the
//! in-memory stores. Tokens are checked with the public key from disk.

use std::path::Path;
use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use octofhir_authorize::prelude::*;
use octofhir_authorize::token::{AccessTokenClaims, IdentityTokenClaims};
use rsa::RsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use tempfile::TempDir;

const ISSUER: &str = "https://auth.example.com";

// =============================================================================
// Setup
// =============================================================================

struct Provider {
    generator: AuthorizeResponseGenerator,
    codes: Arc<InMemoryAuthorizationCodeStore>,
    handles: Arc<InMemoryTokenHandleStore>,
    public_key_pem: Vec<u8>,
    _dir: TempDir,
}

fn write_key_pair(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let private_key = RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).unwrap();
    let private_pem = private_key.to_pkcs8_pem(LineEnding::LF).unwrap();
    let public_pem = private_key
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .unwrap();

    let private_path = dir.join("signing.key.pem");
    let public_path = dir.join("signing.pub.pem");
    std::fs::write(&private_path, private_pem.as_bytes()).unwrap();
    std::fs::write(&public_path, public_pem.as_bytes()).unwrap();
    (private_path, public_path)
}

fn provider() -> Provider {
    let dir = tempfile::tempdir().unwrap();
    let (private_path, public_path) = write_key_pair(dir.path());

    let config_path = dir.path().join("authorize.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
            issuer = "{ISSUER}"

            [tokens]
            authorization_code_lifetime = "5m"
            identity_token_lifetime = "5m"
            access_token_lifetime = "1h"

            [signing]
            algorithm = "RS256"
            key_id = "integration-key"
            private_key_path = "{}"
            public_key_path = "{}"

            [handles]
            entropy_bytes = 24
            "#,
            private_path.display(),
            public_path.display(),
        ),
    )
    .unwrap();

    let config = AuthorizeConfig::from_file(&config_path).unwrap();
    config.validate().unwrap();

    let settings = StaticSettings::from_config(&config.signing).unwrap();
    let codes = Arc::new(InMemoryAuthorizationCodeStore::new(
        config.tokens.authorization_code_lifetime,
    ));
    let handles = Arc::new(InMemoryTokenHandleStore::new());

    let generator = AuthorizeResponseGenerator::new(
        Arc::new(JwtTokenIssuer::new(config.issuer.clone(), &config.tokens)),
        codes.clone(),
        handles.clone(),
        Arc::new(settings),
        Arc::new(RandomHandleGenerator::from_config(&config.handles)),
    );

    Provider {
        generator,
        codes,
        handles,
        public_key_pem: std::fs::read(&public_path).unwrap(),
        _dir: dir,
    }
}

fn request(client: Client, openid: bool, resource: bool) -> ValidatedAuthorizeRequest {
    ValidatedAuthorizeRequest {
        client_id: client.client_id.clone(),
        client: Arc::new(client),
        redirect_uri: "https://app.example.com/callback".to_string(),
        requested_scopes: vec![
            "openid".to_string(),
            "profile".to_string(),
            "patient/*.read".to_string(),
        ],
        granted_scopes: vec!["openid".to_string(), "patient/*.read".to_string()],
        state: Some("abc123xyz".to_string()),
        nonce: Some("n-0S6_WzA2Mj".to_string()),
        is_openid_request: openid,
        is_resource_request: resource,
    }
}

fn rs256_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_aud = false;
    validation
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn code_flow_code_is_redeemable_once() {
    let provider = provider();
    let request = request(Client::new("webapp", "Web App"), true, true);

    let response = provider
        .generator
        .create_code_flow_response(&request, &Subject::new("patient-123"))
        .await
        .unwrap();

    let code = response.code().unwrap().to_string();
    assert_eq!(code.len(), 48);
    assert_eq!(response.state(), Some("abc123xyz"));

    let record = provider.codes.remove(&code).await.unwrap().unwrap();
    assert_eq!(record.client_id, "webapp");
    assert_eq!(record.requested_scopes, "openid profile patient/*.read");
    assert_eq!(record.redirect_uri, "https://app.example.com/callback");

    let access = record
        .access_token
        .claims
        .to_typed::<AccessTokenClaims>()
        .unwrap();
    assert_eq!(access.scope, vec!["openid", "patient/*.read"]);

    assert!(provider.codes.get(&code).await.unwrap().is_none());
}

#[tokio::test]
async fn implicit_flow_tokens_verify_with_public_key() {
    let provider = provider();
    let request = request(Client::new("spa", "Single Page App"), true, true);

    let response = provider
        .generator
        .create_implicit_flow_response(&request, &Subject::new("patient-123"))
        .await
        .unwrap();

    assert_eq!(response.scope(), Some("openid patient/*.read"));
    assert_eq!(response.access_token_lifetime(), 3600);

    let key = DecodingKey::from_rsa_pem(&provider.public_key_pem).unwrap();

    let id_token = response.identity_token().unwrap();
    let header = jsonwebtoken::decode_header(id_token).unwrap();
    assert_eq!(header.kid.as_deref(), Some("integration-key"));
    let identity =
        jsonwebtoken::decode::<IdentityTokenClaims>(id_token, &key, &rs256_validation()).unwrap();
    assert_eq!(identity.claims.sub, "patient-123");
    assert_eq!(identity.claims.aud, "spa");
    assert_eq!(identity.claims.nonce.as_deref(), Some("n-0S6_WzA2Mj"));

    let access = jsonwebtoken::decode::<AccessTokenClaims>(
        response.access_token().unwrap(),
        &key,
        &rs256_validation(),
    )
    .unwrap();
    assert_eq!(access.claims.client_id, "spa");
    assert_eq!(access.claims.exp - access.claims.iat, 3600);
    assert!(provider.handles.is_empty());
}

#[tokio::test]
async fn implicit_flow_reference_token_is_stored() {
    let provider = provider();
    let mut client = Client::new("device", "Device");
    client.access_token_type = AccessTokenType::Reference;
    client.access_token_lifetime = Some(900);
    let request = request(client, false, true);

    let response = provider
        .generator
        .create_implicit_flow_response(&request, &Subject::new("patient-123"))
        .await
        .unwrap();

    assert!(response.identity_token().is_none());
    assert_eq!(response.access_token_lifetime(), 900);

    let handle = response.access_token().unwrap();
    let stored = provider.handles.get(handle).await.unwrap().unwrap();
    assert_eq!(stored.lifetime, 900);
    assert_eq!(provider.handles.len(), 1);
}

#[tokio::test]
async fn concurrent_code_flows_get_distinct_codes() {
    let provider = Arc::new(provider());
    let mut tasks = Vec::new();

    for i in 0..16 {
        let provider = provider.clone();
        tasks.push(tokio::spawn(async move {
            let request = request(Client::new("webapp", "Web App"), true, true);
            provider
                .generator
                .create_code_flow_response(&request, &Subject::new(format!("user-{i}")))
                .await
                .unwrap()
                .code()
                .map(str::to_owned)
                .unwrap()
        }));
    }

    let mut codes = Vec::new();
    for task in tasks {
        codes.push(task.await.unwrap());
    }
    codes.sort();
    codes.dedup();

    assert_eq!(codes.len(), 16);
    assert_eq!(provider.codes.len(), 16);
}
