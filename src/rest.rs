use crate::client::{create_api_client, Config};
use crate::error::Result;
use crate::model::{Account, DataFile, NewUser, Permission, Role, Trial};
use crate::response::{normalize_error, Collection, DataWithMeta};
use crate::token::decode_email;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;

/// Context for portal API requests.
///
/// Binds the shared HTTP client to the configured base URL. It carries no
/// credential: every operation takes the caller's bearer token as an explicit
/// parameter, so the token lifecycle stays entirely with the caller. The
/// context is cheap to clone and safe to share across concurrent operations;
/// nothing in it is mutated after construction.
#[derive(Debug, Clone)]
pub struct ApiContext {
    /// HTTP client
    client: Client,
    /// Configuration
    config: Config,
}

/// Filter, sort, and pagination parameters for file listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_num: Option<i64>,
    /// Comma-separated trial ids to filter on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_ids: Option<String>,
    /// Comma-separated upload types to filter on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_types: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    /// "asc" or "desc"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_friendly: Option<bool>,
}

/// Query value for list reads that take no parameters
const EMPTY_QUERY: &[(&str, String)] = &[];

#[derive(Debug, Deserialize)]
struct Etagged {
    #[serde(rename = "_etag")]
    etag: String,
}

impl ApiContext {
    /// Create a new API context for the given configuration
    pub fn new(config: Config) -> Self {
        ApiContext {
            client: create_api_client(),
            config,
        }
    }

    /// Create an API context reusing an existing HTTP client
    pub fn with_client(client: Client, config: Config) -> Self {
        ApiContext { client, config }
    }

    /// Build a request for an endpoint path, bound to the caller's token
    pub(crate) fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.client
            .request(method, self.config.endpoint(path))
            .bearer_auth(token)
    }

    /// Send a request and normalize any non-2xx response into an [`crate::ApiError`]
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(
            status = status.as_u16(),
            url = %response.url(),
            elapsed = ?started.elapsed(),
            "api response"
        );
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(normalize_error(status, &body));
        }
        Ok(response)
    }

    /// Fetch a single item: GET `{endpoint}/{id}`.
    ///
    /// A missing item surfaces as [`crate::ApiError::NotFound`].
    pub async fn get_item<T>(&self, token: &str, endpoint: &str, id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let path = format!("{}/{}", endpoint, id);
        let response = self.execute(self.request(Method::GET, &path, token)).await?;
        Ok(response.json().await?)
    }

    /// List items from a collection endpoint, unwrapping the `_items` field.
    ///
    /// `query` carries optional filter/sort/pagination parameters.
    pub async fn list_items<T, Q>(&self, token: &str, endpoint: &str, query: &Q) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, endpoint, token).query(query);
        let response = self.execute(request).await?;
        let collection: Collection<T> = response.json().await?;
        collection.into_items()
    }

    /// List items plus the backend-reported total, for paginated tables
    pub async fn list_with_meta<T, Q>(
        &self,
        token: &str,
        endpoint: &str,
        query: &Q,
    ) -> Result<DataWithMeta<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, endpoint, token).query(query);
        let response = self.execute(request).await?;
        let collection: Collection<T> = response.json().await?;
        collection.into_data_with_meta()
    }

    /// Create an item: POST `{endpoint}`. Not idempotent; never retried.
    pub async fn create_item<T, B>(&self, token: &str, endpoint: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, endpoint, token).json(body);
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }

    /// Update an item: PATCH `{endpoint}/{id}` with `If-Match: {etag}`.
    ///
    /// A stale etag surfaces as [`crate::ApiError::PreconditionFailed`]; the
    /// caller decides whether to refetch and re-attempt.
    pub async fn update_item<T, B>(
        &self,
        token: &str,
        endpoint: &str,
        id: &str,
        etag: &str,
        patch: &B,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let path = format!("{}/{}", endpoint, id);
        let request = self
            .request(Method::PATCH, &path, token)
            .header("If-Match", etag)
            .json(patch);
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }

    /// Delete an item: DELETE `{endpoint}/{id}` with `If-Match: {etag}`
    pub async fn delete_item(
        &self,
        token: &str,
        endpoint: &str,
        id: &str,
        etag: &str,
    ) -> Result<()> {
        let path = format!("{}/{}", endpoint, id);
        let request = self
            .request(Method::DELETE, &path, token)
            .header("If-Match", etag);
        self.execute(request).await?;
        Ok(())
    }

    /// Fetch just the concurrency etag for an item, for use before an update
    pub async fn get_etag(&self, token: &str, endpoint: &str, id: &str) -> Result<String> {
        let item: Etagged = self.get_item(token, endpoint, id).await?;
        Ok(item.etag)
    }

    /// Look up the caller's own account.
    ///
    /// Decodes the email claim from the token (unverified; the backend is the
    /// trust boundary) and queries the accounts resource for it. Returns
    /// `None` when no account exists yet for that email.
    pub async fn get_account_info(&self, token: &str) -> Result<Option<Account>> {
        let email = decode_email(token)?;
        let filter = json!({ "email": email }).to_string();
        let mut users: Vec<Account> = self
            .list_items(token, "users", &[("where", filter)])
            .await?;
        if users.is_empty() {
            Ok(None)
        } else {
            Ok(Some(users.swap_remove(0)))
        }
    }

    // ----------- Files ----------- //

    /// List downloadable files with filters, sorting, and pagination
    pub async fn get_files(&self, token: &str, query: &FileQuery) -> Result<DataWithMeta<DataFile>> {
        self.list_with_meta(token, "downloadable_files", query).await
    }

    /// Fetch a single downloadable file record
    pub async fn get_single_file(&self, token: &str, id: i64) -> Result<DataFile> {
        self.get_item(token, "downloadable_files", &id.to_string())
            .await
    }

    // ----------- Accounts ----------- //

    /// List every account
    pub async fn get_all_accounts(&self, token: &str) -> Result<Vec<Account>> {
        self.list_items(token, "users", EMPTY_QUERY).await
    }

    /// Register a new account
    pub async fn create_user(&self, token: &str, new_user: &NewUser) -> Result<Account> {
        self.create_item(token, "new_users", new_user).await
    }

    /// Apply a partial update to an account
    pub async fn update_user<B>(
        &self,
        token: &str,
        id: i64,
        etag: &str,
        updates: &B,
    ) -> Result<Account>
    where
        B: Serialize + ?Sized,
    {
        self.update_item(token, "users", &id.to_string(), etag, updates)
            .await
    }

    /// Change an account's role
    pub async fn update_role(
        &self,
        token: &str,
        id: i64,
        etag: &str,
        role: Role,
    ) -> Result<Account> {
        self.update_user(token, id, etag, &json!({ "role": role }))
            .await
    }

    /// Fetch the current etag for an account
    pub async fn get_user_etag(&self, token: &str, id: i64) -> Result<String> {
        self.get_etag(token, "users", &id.to_string()).await
    }

    // ----------- Trials ----------- //

    /// List every trial
    pub async fn get_trials(&self, token: &str) -> Result<Vec<Trial>> {
        self.list_items(token, "trial_metadata", EMPTY_QUERY).await
    }

    /// Replace a trial's metadata blob. Only `metadata_json` is sent in the
    /// patch body; everything else on the record is backend-owned.
    pub async fn update_trial_metadata(
        &self,
        token: &str,
        etag: &str,
        trial: &Trial,
    ) -> Result<Trial> {
        let patch = json!({ "metadata_json": trial.metadata_json });
        self.update_item(token, "trial_metadata", &trial.trial_id, etag, &patch)
            .await
    }

    // ----------- Permissions ----------- //

    /// List the trial/assay permissions granted to one user
    pub async fn get_permissions_for_user(
        &self,
        token: &str,
        user_id: i64,
    ) -> Result<Vec<Permission>> {
        let filter = json!({ "to_user": user_id }).to_string();
        self.list_items(token, "permissions", &[("where", filter)])
            .await
    }

    /// Grant a user access to one trial/assay combination
    pub async fn grant_permission(
        &self,
        token: &str,
        user: &Account,
        trial: &str,
        assay_type: &str,
    ) -> Result<Permission> {
        let body = json!({
            "to_user": user.id,
            "trial": trial,
            "assay_type": assay_type,
        });
        self.create_item(token, "permissions", &body).await
    }

    /// Revoke a previously granted permission
    pub async fn revoke_permission(
        &self,
        token: &str,
        permission_id: i64,
        etag: &str,
    ) -> Result<()> {
        self.delete_item(token, "permissions", &permission_id.to_string(), etag)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_query_serializes_only_set_fields() {
        let query = FileQuery {
            page_num: Some(2),
            trial_ids: Some("10021,10022".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&query).unwrap();
        let fields = value.as_object().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["page_num"], 2);
        assert_eq!(fields["trial_ids"], "10021,10022");
    }
}
