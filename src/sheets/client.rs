//! Worksheet reader built on the Sheets v4 `values.get` endpoint.

use crate::config::Config;
use crate::models::Article;
use crate::sheets::{
    auth::GoogleCredentials,
    types::{SheetsError, ValueRange},
};
use reqwest::{Client, Url};
use serde_json::Value;
use std::path::PathBuf;

const TITLE_COLUMN: &str = "Title";
const CONTENT_COLUMN: &str = "Content";
const TAGS_COLUMN: &str = "Tags";

/// Authorized reader for a single spreadsheet.
pub struct SheetsClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    pub(crate) credentials_path: PathBuf,
}

impl SheetsClient {
    /// Construct a reader from the loaded configuration.
    pub fn new(config: &Config) -> Result<Self, SheetsError> {
        let http = Client::builder().user_agent("sheetsearch/0.1").build()?;
        Ok(Self {
            http,
            base_url: config.google_sheets_api_url.clone(),
            credentials_path: config.google_credentials_path.clone(),
        })
    }

    /// Read every row of `worksheet` and map it into articles, in sheet order.
    ///
    /// The first row is the header. Credentials are exchanged for a fresh token on each call.
    pub async fn fetch_articles(
        &self,
        sheet_id: &str,
        worksheet: &str,
    ) -> Result<Vec<Article>, SheetsError> {
        let credentials = GoogleCredentials::from_file(&self.credentials_path).await?;
        let token = credentials.access_token(&self.http).await?;
        let url = values_url(&self.base_url, sheet_id, worksheet)?;

        tracing::debug!(sheet_id, worksheet, "Reading worksheet values");
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(&[("majorDimension", "ROWS")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = SheetsError::UnexpectedStatus { status, body };
            tracing::error!(sheet_id, worksheet, error = %error, "Worksheet read failed");
            return Err(error);
        }

        let ValueRange { values } = response.json().await?;
        let articles = rows_to_articles(values)?;
        tracing::info!(sheet_id, worksheet, rows = articles.len(), "Worksheet read");
        Ok(articles)
    }
}

/// Build `{base}/v4/spreadsheets/{id}/values/'{worksheet}'` with each segment percent-encoded.
///
/// The worksheet name is quoted as an A1 sheet reference so names like `Q1` are not read as
/// cell ranges.
pub(crate) fn values_url(base: &str, sheet_id: &str, worksheet: &str) -> Result<Url, SheetsError> {
    let mut url = Url::parse(base).map_err(|error| SheetsError::InvalidUrl(error.to_string()))?;
    let range = quote_sheet_name(worksheet);
    url.path_segments_mut()
        .map_err(|()| SheetsError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(["v4", "spreadsheets", sheet_id, "values", range.as_str()]);
    Ok(url)
}

fn quote_sheet_name(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

/// Map raw rows into articles using the header row to locate columns.
///
/// Rows shorter than the header yield empty strings for the missing cells. Blank rows are
/// kept so that document ids stay aligned with row positions.
pub(crate) fn rows_to_articles(values: Vec<Vec<Value>>) -> Result<Vec<Article>, SheetsError> {
    let mut rows = values.into_iter();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };

    let header: Vec<String> = header.iter().map(cell_text).collect();
    let column = |name: &str| {
        header
            .iter()
            .position(|cell| cell == name)
            .ok_or_else(|| SheetsError::MissingColumn(name.to_string()))
    };
    let title = column(TITLE_COLUMN)?;
    let content = column(CONTENT_COLUMN)?;
    let tags = column(TAGS_COLUMN)?;

    let cell = |row: &[Value], idx: usize| row.get(idx).map(cell_text).unwrap_or_default();

    Ok(rows
        .map(|row| Article {
            title: cell(row.as_slice(), title),
            content: cell(row.as_slice(), content),
            tags: cell(row.as_slice(), tags),
        })
        .collect())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
