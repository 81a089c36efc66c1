use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::{Url, form_urlencoded};

use crate::settings::Settings;

pub const SPREADSHEETS_READONLY_SCOPE: &str =
    "https://www.googleapis.com/auth/spreadsheets.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Upstream returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to sign service account assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Read access to a spreadsheet, one rectangular range at a time.
#[async_trait]
pub trait SheetReader: Send + Sync {
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, SheetsError>;
}

#[derive(Debug, Serialize)]
struct ServiceAccountClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl From<CellValue> for String {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Text(text) => text,
            CellValue::Number(number) => number.to_string(),
            CellValue::Bool(flag) => flag.to_string(),
        }
    }
}

/// Body of `spreadsheets.values.get`. `values` is omitted for an empty range.
#[derive(Debug, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub values: Vec<Vec<CellValue>>,
}

impl ValueRange {
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(String::from).collect())
            .collect()
    }
}

/// Google Sheets values API client authenticated as a service account.
#[derive(Clone)]
pub struct GoogleSheetsClient {
    client: reqwest::Client,
    client_email: String,
    signing_key: EncodingKey,
    spreadsheet_id: String,
    api_base_url: Url,
    token_url: Url,
}

impl GoogleSheetsClient {
    pub fn new(settings: &Settings) -> Result<Self, SheetsError> {
        let signing_key = EncodingKey::from_rsa_pem(settings.google_private_key.as_bytes())?;
        Ok(Self {
            client: reqwest::Client::new(),
            client_email: settings.google_client_email.clone(),
            signing_key,
            spreadsheet_id: settings.spreadsheet_id.clone(),
            api_base_url: settings.sheets_api_base_url.clone(),
            token_url: settings.token_url.clone(),
        })
    }

    fn values_url(&self, range: &str) -> Result<Url, SheetsError> {
        let mut url = self.api_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SheetsError::InvalidUrl(self.api_base_url.to_string()))?
            .pop_if_empty()
            .extend([self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    fn sign_assertion(&self) -> Result<String, SheetsError> {
        let iat = Utc::now().timestamp();
        let claims = ServiceAccountClaims {
            iss: &self.client_email,
            scope: SPREADSHEETS_READONLY_SCOPE,
            aud: self.token_url.as_str(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let assertion =
            jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)?;
        Ok(assertion)
    }

    async fn access_token(&self) -> Result<String, SheetsError> {
        let assertion = self.sign_assertion()?;
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", JWT_BEARER_GRANT)
            .append_pair("assertion", &assertion)
            .finish();

        let response = self
            .client
            .post(self.token_url.as_str())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;
        let token: TokenResponse = ensure_success(response).await?.json().await?;
        Ok(token.access_token)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SheetsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SheetsError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl SheetReader for GoogleSheetsClient {
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = self.values_url(range)?;
        let token = self.access_token().await?;

        let response = self
            .client
            .get(url.as_str())
            .bearer_auth(token)
            .send()
            .await?;
        let values: ValueRange = ensure_success(response).await?.json().await?;
        let rows = values.into_rows();
        debug!(range, rows = rows.len(), "read spreadsheet range");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = include_str!("../tests/fixtures/service_account_key.pem");

    fn settings(base: &str) -> Settings {
        Settings {
            debug: false,
            enable_swagger: false,
            port: 8080,
            cors_allow_origin: None,
            google_client_email: "svc@project.iam.gserviceaccount.com".to_string(),
            google_private_key: TEST_KEY.to_string(),
            spreadsheet_id: "sheet-123".to_string(),
            lessons_range: "Lessons!A2:O".to_string(),
            reservations_range: "Reservations!A2:K".to_string(),
            sheets_api_base_url: Url::parse(base).unwrap(),
            token_url: Url::parse("https://oauth2.example.com/token").unwrap(),
        }
    }

    #[test]
    fn test_value_range_mixed_cells() {
        let body = r#"{
            "range": "Lessons!A2:O4",
            "majorDimension": "ROWS",
            "values": [["L001", "2025/10/08", 3, true], [], ["x"]]
        }"#;
        let parsed: ValueRange = serde_json::from_str(body).unwrap();
        let rows = parsed.into_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ["L001", "2025/10/08", "3", "true"]);
        assert!(rows[1].is_empty());
    }

    #[test]
    fn test_value_range_without_values() {
        let parsed: ValueRange =
            serde_json::from_str(r#"{"range": "Lessons!A2:O", "majorDimension": "ROWS"}"#)
                .unwrap();
        assert!(parsed.into_rows().is_empty());
    }

    #[test]
    fn test_values_url_encodes_range() {
        let client =
            GoogleSheetsClient::new(&settings("https://sheets.example.com/v4/spreadsheets"))
                .unwrap();
        let url = client.values_url("レッスン管理!A2:O").unwrap();
        assert!(
            url.as_str()
                .starts_with("https://sheets.example.com/v4/spreadsheets/sheet-123/values/")
        );
        assert!(url.as_str().ends_with("!A2:O"));
        assert!(!url.as_str().contains("レッスン"));

        let url = client.values_url("Sheet/1!A1").unwrap();
        assert!(url.as_str().ends_with("/values/Sheet%2F1!A1"));
    }

    #[test]
    fn test_values_url_trailing_slash_base() {
        let client =
            GoogleSheetsClient::new(&settings("https://sheets.example.com/v4/spreadsheets/"))
                .unwrap();
        let url = client.values_url("Lessons!A2:O").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.example.com/v4/spreadsheets/sheet-123/values/Lessons!A2:O"
        );
    }

    #[test]
    fn test_sign_assertion() {
        let client =
            GoogleSheetsClient::new(&settings("https://sheets.example.com/v4/spreadsheets"))
                .unwrap();
        let assertion = client.sign_assertion().unwrap();
        let header = jsonwebtoken::decode_header(&assertion).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(assertion.split('.').count(), 3);
    }

    #[test]
    fn test_new_rejects_invalid_key() {
        let mut settings = settings("https://sheets.example.com/v4/spreadsheets");
        settings.google_private_key = "not a key".to_string();
        assert!(matches!(
            GoogleSheetsClient::new(&settings),
            Err(SheetsError::Signing(_))
        ));
    }
}
