use crate::github::apps::AppCredentials;

const PLATFORM_APP: &str = "dte-cloud-platform";
const STRIPPED_PREFIXES: &[&str] = &["dte-cloud-platform-", "dte-cloud-application-"];

/// Converts an app name into the upper-snake prefix used for its variables.
///
/// ```
/// use github_issue_ops::naming::variable_prefix;
///
/// assert_eq!(variable_prefix("dte-cloud-platform"), "CLOUD_PLATFORM");
/// assert_eq!(variable_prefix("dte-cloud-platform-actions"), "ACTIONS");
/// assert_eq!(variable_prefix("my-custom-app"), "MY_CUSTOM_APP");
/// ```
pub fn variable_prefix(name: &str) -> String {
    if name == PLATFORM_APP {
        return "CLOUD_PLATFORM".to_string();
    }

    let stem = STRIPPED_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name);

    stem.replace(['-', ' '], "_").to_uppercase()
}

/// Variables to provision for a created app, as `(name, value)` pairs.
///
/// An app without a webhook has no `WEBHOOK_SECRET` variable.
pub fn app_variables(credentials: &AppCredentials, installation_id: u64) -> Vec<(String, String)> {
    let prefix = variable_prefix(&credentials.name);
    [
        ("APP_ID", Some(credentials.id.to_string())),
        ("SLUG", Some(credentials.slug.clone())),
        ("CLIENT_ID", Some(credentials.client_id.clone())),
        ("CLIENT_SECRET", Some(credentials.client_secret.clone())),
        ("WEBHOOK_SECRET", credentials.webhook_secret.clone()),
        ("INSTALLATION_ID", Some(installation_id.to_string())),
        ("PEM", Some(credentials.pem.clone())),
    ]
    .into_iter()
    .filter_map(|(suffix, value)| Some((format!("{prefix}_{suffix}"), value?)))
    .collect()
}
