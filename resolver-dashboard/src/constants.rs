pub(crate) const DEFAULT_PORT: u16 = 3000;
pub(crate) const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:8989";
pub(crate) const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;
pub(crate) const DEFAULT_FLEET_METRICS_MS: u64 = 60_000;
pub(crate) const DEFAULT_STATIC_DIR: &str = "./static";
pub(crate) const NO_CACHE: &str = "no-cache, no-store, must-revalidate, proxy-revalidate, max-age=0";
