use reqwest::Client;
use uuid::Uuid;

use crate::models::{
    CreateSpreadsheetRequest, ShareAccess, ShareSpreadsheetRequest, SpreadsheetResponse,
};

/// Client for the spreadsheet HTTP API (list/create/share), used by
/// frontends alongside the WebSocket sync connection.
#[derive(Debug)]
pub struct SheetApiClient {
    client: Client,
    base_url: String,
    auth_token: String,
}

impl SheetApiClient {
    pub fn new(base_url: String, auth_token: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            auth_token,
        }
    }

    /// List the spreadsheets the caller owns or was given access to
    pub async fn list_spreadsheets(&self) -> Result<Vec<SpreadsheetResponse>, reqwest::Error> {
        let url = format!("{}/api/v1/spreadsheets", self.base_url);
        self.client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.auth_token))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    /// Create a new spreadsheet owned by the caller
    pub async fn create_spreadsheet(
        &self,
        title: &str,
    ) -> Result<SpreadsheetResponse, reqwest::Error> {
        let url = format!("{}/api/v1/spreadsheets", self.base_url);
        self.client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.auth_token))
            .json(&CreateSpreadsheetRequest {
                title: title.to_string(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    /// Fetch one spreadsheet's metadata
    pub async fn get_spreadsheet(
        &self,
        id: Uuid,
    ) -> Result<SpreadsheetResponse, reqwest::Error> {
        let url = format!("{}/api/v1/spreadsheets/{}", self.base_url, id);
        self.client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.auth_token))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    /// Grant another user access to a spreadsheet the caller owns
    pub async fn share_spreadsheet(
        &self,
        id: Uuid,
        user_id: &str,
        access: ShareAccess,
    ) -> Result<SpreadsheetResponse, reqwest::Error> {
        let url = format!("{}/api/v1/spreadsheets/{}/share", self.base_url, id);
        self.client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.auth_token))
            .json(&ShareSpreadsheetRequest {
                user_id: user_id.to_string(),
                access,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}
