//! Per-user blob namespace: `{email}/{category}/{filename}`.

use common::Category;
use common::storage::ObjectStore;
use tracing::{info, warn};

use crate::error::AppError;
use crate::utils::filename::disambiguated_name;

const FOLDER_CONTENT_TYPE: &str = "application/x-directory";

/// Key of a category folder placeholder, e.g. `alice@example.com/images/`.
pub fn folder_key(email: &str, category: Category) -> String {
    format!("{email}/{}/", category.as_str())
}

/// Key of a file inside a category folder.
pub fn object_key(email: &str, category: Category, file_name: &str) -> String {
    format!("{email}/{}/{file_name}", category.as_str())
}

/// Create the empty folder placeholders for every category.
///
/// Failures are logged and skipped: a missing placeholder does not prevent
/// uploads, which write full keys.
pub async fn provision(objects: &dyn ObjectStore, email: &str) {
    for category in Category::ALL {
        let key = folder_key(email, category);
        let result = match objects.exists(&key).await {
            Ok(true) => Ok(()),
            Ok(false) => objects.put(&key, &[], FOLDER_CONTENT_TYPE).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!(owner = %email, key = %key, error = %e, "Failed to provision namespace folder");
        }
    }
    info!(owner = %email, "Namespace folders created/verified");
}

/// First free name for `file_name` in the owner's category folder.
///
/// Tries `file_name`, then `stem(1).ext`, `stem(2).ext`, ... up to
/// `max_probes` alternatives. Returns the chosen key and bare filename.
pub async fn resolve_free_name(
    objects: &dyn ObjectStore,
    email: &str,
    category: Category,
    file_name: &str,
    max_probes: u32,
) -> Result<(String, String), AppError> {
    let key = object_key(email, category, file_name);
    if !objects.exists(&key).await? {
        return Ok((key, file_name.to_string()));
    }

    for counter in 1..=max_probes {
        let candidate = disambiguated_name(file_name, counter);
        let key = object_key(email, category, &candidate);
        if !objects.exists(&key).await? {
            return Ok((key, candidate));
        }
    }

    Err(AppError::Conflict(format!(
        "Too many files named '{file_name}'. Rename the file and try again."
    )))
}
