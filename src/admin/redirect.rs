//! Post-save redirects and open-redirect protection.
//!
//! The order change screen accepts a `next` target. It is honoured only when it stays on
//! one of the configured hosts and uses an http(s) scheme; anything else falls back to
//! the default changelist.

use crate::{config::Settings, errors::Result};
use http::{HeaderValue, Response, StatusCode, header::LOCATION};
use reqwest::Url;
use tracing::debug;

/// Host used to resolve relative targets. A relative target that resolves anywhere
/// else escaped its origin.
const RELATIVE_BASE: &str = "http://relative.invalid/";
const RELATIVE_HOST: &str = "relative.invalid";

/// Checks an absolute URL and returns its normalized form.
fn absolute_target(url: &Url, allowed_hosts: &[String], require_https: bool) -> Option<String> {
    let scheme_ok = url.scheme() == "https" || (!require_https && url.scheme() == "http");
    if !scheme_ok || !url.username().is_empty() || url.password().is_some() {
        return None;
    }

    let host = url.host_str().filter(|host| !host.is_empty())?;
    let netloc = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    allowed_hosts
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&netloc))
        .then(|| url.as_str().to_string())
}

/// Returns the percent-encoded redirect target when `url` is safe, `None` otherwise.
fn redirect_target(url: &str, allowed_hosts: &[String], require_https: bool) -> Option<String> {
    // Browsers read "///host" as "//host"
    if url.starts_with("///") || url.chars().next().is_some_and(char::is_control) {
        return None;
    }

    if let Ok(parsed) = Url::parse(url) {
        // "http:///host", "http:host" and "javascript:..." carry no authority as written
        let rest = url.get(parsed.scheme().len()..).unwrap_or_default();
        if !rest.starts_with("://") || rest.starts_with(":///") {
            return None;
        }
        return absolute_target(&parsed, allowed_hosts, require_https);
    }

    if url.starts_with("//") {
        // Scheme-relative: the browser keeps the current scheme, assume http
        let parsed = Url::parse(&format!("http:{url}")).ok()?;
        let target = absolute_target(&parsed, allowed_hosts, require_https)?;
        return target.strip_prefix("http:").map(str::to_string);
    }

    let joined = Url::parse(RELATIVE_BASE).ok()?.join(url).ok()?;
    if joined.host_str() != Some(RELATIVE_HOST)
        || joined.port().is_some()
        || !joined.username().is_empty()
        || joined.password().is_some()
    {
        return None;
    }
    if !url.starts_with('/') {
        return Some(url.to_string());
    }

    let mut target = joined.path().to_string();
    if let Some(query) = joined.query() {
        target.push('?');
        target.push_str(query);
    }
    if let Some(fragment) = joined.fragment() {
        target.push('#');
        target.push_str(fragment);
    }
    Some(target)
}

/// Cleans `url` and checks both its literal and its backslash-as-slash reading.
fn checked_target(url: &str, allowed_hosts: &[String], require_https: bool) -> Option<String> {
    let url: String = url
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
        .collect();
    if url.is_empty() {
        return None;
    }

    redirect_target(&url.replace('\\', "/"), allowed_hosts, require_https)?;
    redirect_target(&url, allowed_hosts, require_https)
}

/// Whether `url` is safe to redirect to.
///
/// Relative paths are always safe. Absolute URLs must name one of `allowed_hosts`
/// (including any non-default port) and use http or https (https only when
/// `require_https`). Backslashes are checked both literally and as forward slashes,
/// since browsers treat them as path separators.
#[must_use]
pub fn url_has_allowed_host_and_scheme(
    url: &str,
    allowed_hosts: &[String],
    require_https: bool,
) -> bool {
    checked_target(url, allowed_hosts, require_https).is_some()
}

/// Builds the response sent after an order change was saved.
///
/// Redirects to `next` when it passes [`url_has_allowed_host_and_scheme`] against
/// `settings.allowed_hosts`, otherwise to `settings.changelist_url`. A safe `next` that
/// cannot be sent as a header as written is sent percent-encoded.
pub fn response_change(next: Option<&str>, settings: &Settings) -> Result<Response<()>> {
    let requested = next.map(str::trim).and_then(|next| {
        let Some(target) = checked_target(next, &settings.allowed_hosts, false) else {
            debug!("Ignoring unsafe redirect target {:?}", next);
            return None;
        };
        HeaderValue::from_str(next)
            .or_else(|_| HeaderValue::from_str(&target))
            .inspect_err(|e| debug!("Cannot redirect to {:?}: {}", next, e))
            .ok()
    });

    let location = match requested {
        Some(location) => location,
        None => HeaderValue::from_str(&settings.changelist_url).map_err(http::Error::from)?,
    };

    Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, location)
        .body(())
        .map_err(Into::into)
}
