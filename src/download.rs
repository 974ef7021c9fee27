use crate::error::Result;
use crate::rest::ApiContext;
use futures::future::try_join_all;
use reqwest::Method;

/// Resolve a single file id to a short-lived download URL.
///
/// The URL string is returned verbatim; it is only valid for the duration of
/// the user-initiated download and must not be cached.
pub async fn get_download_url(ctx: &ApiContext, token: &str, file_id: i64) -> Result<String> {
    let request = ctx
        .request(Method::GET, "downloadable_files/download_url", token)
        .query(&[("id", file_id)]);
    let response = ctx.execute(request).await?;
    Ok(response.text().await?)
}

/// Resolve download URLs for many files concurrently and open each one.
///
/// All resolutions are issued at once; the operation waits for every one to
/// settle and fails on the first resolution error, in which case `open_url`
/// is never invoked. On success the opener runs once per file in input order,
/// and the future resolving is the completion signal.
pub async fn trigger_batch_download<F>(
    ctx: &ApiContext,
    token: &str,
    file_ids: &[i64],
    mut open_url: F,
) -> Result<()>
where
    F: FnMut(&str),
{
    let urls = try_join_all(
        file_ids
            .iter()
            .map(|id| get_download_url(ctx, token, *id)),
    )
    .await?;

    for url in &urls {
        open_url(url);
    }
    Ok(())
}

/// Fetch a tab-separated file listing for the given ids, suitable for
/// saving as `filelist.tsv`. The TSV contents are not parsed here.
pub async fn get_filelist(ctx: &ApiContext, token: &str, file_ids: &[i64]) -> Result<Vec<u8>> {
    let request = ctx
        .request(Method::POST, "downloadable_files/filelist", token)
        .json(&serde_json::json!({ "file_ids": file_ids }));
    let response = ctx.execute(request).await?;
    Ok(response.bytes().await?.to_vec())
}
