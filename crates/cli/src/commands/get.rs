//! Fetch any resource through the query cache.

use threadline_storefront::config::StorefrontConfig;
use threadline_storefront::query::{CacheClass, DataQuery, DataRequest, QueryClient};
use threadline_storefront::resource::Resource;
use tracing::{info, warn};

use super::print_json;

/// Fetch a list (no `id`) or one record and print it.
///
/// # Errors
///
/// Returns an error if configuration is missing or the fetch fails.
pub async fn run(
    resource: Resource,
    id: Option<&str>,
    class: CacheClass,
    raw: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let client = QueryClient::from_config(&config)?;

    let mut request = match id {
        Some(id) => DataRequest::detail(resource, id, class),
        None => DataRequest::list(resource, class),
    };
    if raw {
        request = request.raw();
    }

    let query = DataQuery::new(client, request);
    info!(key = %query.key(), class = %class, "Fetching");

    let state = query.load().await;
    if let Some(error) = state.error {
        return Err(format!("Failed to load {resource}: {error}").into());
    }

    match state.data {
        Some(data) => {
            if data.is_raw() && !raw {
                warn!("Payload could not be normalized, printing it as received");
            }
            print_json(&*data)
        }
        None => print_json(&serde_json::Value::Null),
    }
}
