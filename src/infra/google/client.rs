use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::infra::google::credentials::ServiceAccountKey;
use crate::infra::google::token::TokenSource;
use crate::usecase::ports::sheet::{SheetClient, SheetError};

pub const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

/// Extracts the spreadsheet id from a browser URL
/// (`https://docs.google.com/spreadsheets/d/<id>/edit`). Anything else is
/// taken to be the id itself.
pub fn spreadsheet_id(reference: &str) -> String {
    let reference = reference.trim();
    match reference.split_once("/spreadsheets/d/") {
        Some((_, rest)) => rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
        None => reference.to_string(),
    }
}

/// Column number to A1 letters: 1 → `A`, 27 → `AA`.
pub fn column_letters(col: usize) -> String {
    let mut col = col;
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Tab name as it must appear in an A1 range.
pub fn quote_tab(tab: &str) -> String {
    if !tab.is_empty() && tab.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        tab.to_string()
    } else {
        format!("'{}'", tab.replace('\'', "''"))
    }
}

pub fn cell_range(tab: &str, row: usize, col: usize) -> String {
    format!("{}!{}{}", quote_tab(tab), column_letters(col), row)
}

fn spreadsheet_url(api_base: &str, spreadsheet_id: &str, last: &str) -> Result<Url> {
    let mut url = Url::parse(api_base).context("invalid Sheets API base url")?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Sheets API base url cannot take path segments"))?
        .push(spreadsheet_id)
        .extend(["values", last]);
    Ok(url)
}

/// `values.update` endpoint for `range`, writing raw text.
pub fn update_url(api_base: &str, spreadsheet_id: &str, range: &str) -> Result<Url> {
    let mut url = spreadsheet_url(api_base, spreadsheet_id, range)?;
    url.query_pairs_mut().append_pair("valueInputOption", "RAW");
    Ok(url)
}

/// `values.append` endpoint for the whole of `tab`; new rows are inserted
/// below the last data row.
pub fn append_url(api_base: &str, spreadsheet_id: &str, tab: &str) -> Result<Url> {
    let range = quote_tab(tab);
    let mut url = spreadsheet_url(api_base, spreadsheet_id, &format!("{range}:append"))?;
    url.query_pairs_mut()
        .append_pair("valueInputOption", "RAW")
        .append_pair("insertDataOption", "INSERT_ROWS");
    Ok(url)
}

pub fn clear_url(api_base: &str, spreadsheet_id: &str, tab: &str) -> Result<Url> {
    spreadsheet_url(
        api_base,
        spreadsheet_id,
        &format!("{}:clear", quote_tab(tab)),
    )
}

pub fn get_url(api_base: &str, spreadsheet_id: &str, tab: &str) -> Result<Url> {
    spreadsheet_url(api_base, spreadsheet_id, &quote_tab(tab))
}

pub fn batch_update_url(api_base: &str, spreadsheet_id: &str) -> Result<Url> {
    let mut url = Url::parse(api_base).context("invalid Sheets API base url")?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Sheets API base url cannot take path segments"))?
        .push(&format!("{spreadsheet_id}:batchUpdate"));
    Ok(url)
}

pub fn values_body(range: &str, rows: &[Vec<String>]) -> serde_json::Value {
    json!({ "range": range, "majorDimension": "ROWS", "values": rows })
}

/// `batchUpdate` requests removing 1-based sheet `row`. The API counts rows
/// from zero with an exclusive end.
pub fn delete_row_request(sheet_id: i64, row: usize) -> serde_json::Value {
    json!({
        "requests": [{
            "deleteDimension": {
                "range": {
                    "sheetId": sheet_id,
                    "dimension": "ROWS",
                    "startIndex": row.saturating_sub(1),
                    "endIndex": row,
                }
            }
        }]
    })
}

/// Numeric id of `tab` among the spreadsheet's known tabs.
pub fn lookup_tab(ids: &HashMap<String, i64>, tab: &str) -> Result<i64, SheetError> {
    ids.get(tab)
        .copied()
        .ok_or_else(|| SheetError::MissingTab(tab.to_string()))
}

/// Google Sheets API v4 adapter. One instance serves one spreadsheet for the
/// life of the process.
pub struct GoogleSheetsClient {
    spreadsheet_id: String,
    api_base: String,
    http: Client,
    tokens: TokenSource,
    sheet_ids: Mutex<HashMap<String, i64>>,
}

impl GoogleSheetsClient {
    pub fn new(
        spreadsheet: &str,
        key: ServiceAccountKey,
        timeout: Duration,
    ) -> Result<Self> {
        let spreadsheet_id = spreadsheet_id(spreadsheet);
        if spreadsheet_id.is_empty() {
            bail!("spreadsheet id is empty");
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        let tokens = TokenSource::new(key, http.clone());

        Ok(Self {
            spreadsheet_id,
            api_base: SHEETS_API.to_string(),
            http,
            tokens,
            sheet_ids: Mutex::new(HashMap::new()),
        })
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let token = self.tokens.bearer()?;
        let response = request
            .bearer_auth(token)
            .send()
            .context("request to Google Sheets failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("Google Sheets returned {status}: {body}");
        }
        Ok(response)
    }

    fn refresh_sheet_ids(&self) -> Result<HashMap<String, i64>> {
        let mut url = Url::parse(&self.api_base).context("invalid Sheets API base url")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Sheets API base url cannot take path segments"))?
            .push(&self.spreadsheet_id);
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(sheetId,title)");
        let meta: SpreadsheetMeta = self
            .send(self.http.get(url))?
            .json()
            .context("failed to decode spreadsheet metadata")?;

        let ids: HashMap<String, i64> = meta
            .sheets
            .into_iter()
            .map(|sheet| (sheet.properties.title, sheet.properties.sheet_id))
            .collect();

        let mut cached = self
            .sheet_ids
            .lock()
            .map_err(|_| anyhow!("sheet id cache lock poisoned"))?;
        *cached = ids.clone();
        Ok(ids)
    }

    fn require_sheet_id(&self, tab: &str) -> Result<i64, SheetError> {
        {
            let cached = self
                .sheet_ids
                .lock()
                .map_err(|_| SheetError::Unavailable("sheet id cache lock poisoned".into()))?;
            if let Some(id) = cached.get(tab) {
                return Ok(*id);
            }
        }
        let ids = self.refresh_sheet_ids().map_err(unavailable)?;
        lookup_tab(&ids, tab)
    }

    fn get_values(&self, tab: &str) -> Result<Vec<Vec<String>>> {
        let url = get_url(&self.api_base, &self.spreadsheet_id, tab)?;
        let range: ValueRange = self
            .send(self.http.get(url))?
            .json()
            .with_context(|| format!("failed to decode values of {tab}"))?;
        Ok(range.values)
    }

    fn put_values(&self, range: &str, rows: &[Vec<String>]) -> Result<()> {
        let url = update_url(&self.api_base, &self.spreadsheet_id, range)?;
        self.send(self.http.put(url).json(&values_body(range, rows)))?;
        Ok(())
    }
}

fn unavailable(err: anyhow::Error) -> SheetError {
    SheetError::Unavailable(format!("{err:#}"))
}

impl SheetClient for GoogleSheetsClient {
    /// Tabs are never created remotely: a configured tab missing from the
    /// spreadsheet is an error, not a reason to start an empty board.
    fn ensure_tab(&self, tab: &str, _headers: &[&str]) -> Result<(), SheetError> {
        let sheet_id = self.require_sheet_id(tab)?;
        debug!(tab, sheet_id, "found tab");
        Ok(())
    }

    fn read_values(&self, tab: &str) -> Result<Vec<Vec<String>>, SheetError> {
        self.require_sheet_id(tab)?;
        let values = self.get_values(tab).map_err(unavailable)?;
        debug!(tab, rows = values.len(), "read values");
        Ok(values)
    }

    fn append_row(&self, tab: &str, values: &[String]) -> Result<(), SheetError> {
        let url = append_url(&self.api_base, &self.spreadsheet_id, tab).map_err(unavailable)?;
        let body = values_body(&quote_tab(tab), &[values.to_vec()]);
        self.send(self.http.post(url).json(&body))
            .map_err(unavailable)?;
        debug!(tab, "appended row");
        Ok(())
    }

    fn update_cell(
        &self,
        tab: &str,
        row: usize,
        col: usize,
        value: &str,
    ) -> Result<(), SheetError> {
        if row == 0 || col == 0 {
            return Err(SheetError::RowOutOfRange {
                tab: tab.to_string(),
                row,
            });
        }
        self.put_values(&cell_range(tab, row, col), &[vec![value.to_string()]])
            .map_err(unavailable)
    }

    fn delete_row(&self, tab: &str, row: usize) -> Result<(), SheetError> {
        if row == 0 {
            return Err(SheetError::RowOutOfRange {
                tab: tab.to_string(),
                row,
            });
        }
        let sheet_id = self.require_sheet_id(tab)?;
        let url = batch_update_url(&self.api_base, &self.spreadsheet_id).map_err(unavailable)?;
        self.send(self.http.post(url).json(&delete_row_request(sheet_id, row)))
            .map_err(unavailable)?;
        debug!(tab, row, "deleted row");
        Ok(())
    }

    fn clear(&self, tab: &str) -> Result<(), SheetError> {
        let url = clear_url(&self.api_base, &self.spreadsheet_id, tab).map_err(unavailable)?;
        self.send(self.http.post(url).json(&json!({})))
            .map_err(unavailable)?;
        Ok(())
    }

    fn write_rows(&self, tab: &str, rows: &[Vec<String>]) -> Result<(), SheetError> {
        self.put_values(&cell_range(tab, 1, 1), rows)
            .map_err(unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spreadsheet_id_accepts_urls_and_bare_ids() {
        assert_eq!(
            spreadsheet_id("https://docs.google.com/spreadsheets/d/1DZQu6vw34jFL6Mj/edit#gid=0"),
            "1DZQu6vw34jFL6Mj"
        );
        assert_eq!(
            spreadsheet_id("https://docs.google.com/spreadsheets/d/abc?usp=sharing"),
            "abc"
        );
        assert_eq!(spreadsheet_id("  abc123 "), "abc123");
    }

    #[test]
    fn column_letters_follow_a1_notation() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(3), "C");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(702), "ZZ");
        assert_eq!(column_letters(703), "AAA");
    }

    #[test]
    fn cell_range_quotes_tabs_that_need_it() {
        assert_eq!(cell_range("Cards", 4, 2), "Cards!B4");
        assert_eq!(cell_range("My Board", 1, 1), "'My Board'!A1");
        assert_eq!(cell_range("Ana's", 2, 3), "'Ana''s'!C2");
    }

    #[test]
    fn delete_row_request_counts_from_zero() {
        let request = delete_row_request(7, 2);
        let range = &request["requests"][0]["deleteDimension"]["range"];

        assert_eq!(range["sheetId"], 7);
        assert_eq!(range["dimension"], "ROWS");
        assert_eq!(range["startIndex"], 1);
        assert_eq!(range["endIndex"], 2);
    }

    #[test]
    fn append_url_targets_quoted_tab_with_raw_insert() {
        let url = append_url(SHEETS_API, "abc", "My Board").expect("url should build");

        assert_eq!(
            url.path(),
            "/v4/spreadsheets/abc/values/'My%20Board':append"
        );
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("valueInputOption".to_string(), "RAW".to_string()),
                ("insertDataOption".to_string(), "INSERT_ROWS".to_string()),
            ]
        );
    }

    #[test]
    fn update_url_writes_single_cell_as_raw() {
        let url =
            update_url(SHEETS_API, "abc", &cell_range("Cards", 4, 3)).expect("url should build");

        assert_eq!(url.path(), "/v4/spreadsheets/abc/values/Cards!C4");
        assert_eq!(url.query(), Some("valueInputOption=RAW"));
    }

    #[test]
    fn batch_update_and_clear_urls() {
        let batch = batch_update_url(SHEETS_API, "abc").expect("url should build");
        let clear = clear_url(SHEETS_API, "abc", "Colunas").expect("url should build");

        assert_eq!(batch.path(), "/v4/spreadsheets/abc:batchUpdate");
        assert_eq!(clear.path(), "/v4/spreadsheets/abc/values/Colunas:clear");
    }

    #[test]
    fn values_body_wraps_rows() {
        let body = values_body("Colunas!A1", &[vec!["Lista".to_string()]]);

        assert_eq!(body["range"], "Colunas!A1");
        assert_eq!(body["majorDimension"], "ROWS");
        assert_eq!(body["values"][0][0], "Lista");
    }

    #[test]
    fn unknown_tab_is_missing_not_created() {
        let ids = HashMap::from([("Colunas".to_string(), 0), ("Cards".to_string(), 42)]);

        assert_eq!(lookup_tab(&ids, "Cards"), Ok(42));
        assert_eq!(
            lookup_tab(&ids, "Colunaz"),
            Err(SheetError::MissingTab("Colunaz".to_string()))
        );
    }
}
