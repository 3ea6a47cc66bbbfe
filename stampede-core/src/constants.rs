use std::time::Duration;

pub const DEFAULT_VIRTUAL_USERS: usize = 10;
pub const DEFAULT_DURATION: Duration = Duration::from_secs(30);
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(500);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Header carrying the API key when one is configured.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Path appended to the base URL for every request.
pub const TARGET_PATH: &str = "/run";

/// Statuses that pass the per-request check. 401 is accepted alongside 200
/// so that expected auth rejections do not count as failures.
pub const PASSING_STATUSES: &[u16] = &[200, 401];
