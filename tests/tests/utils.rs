use mock_service::MockConfig;
use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Backend with no API key configured.
pub const OPEN_PORT: u16 = 3010;
/// Backend that requires [`API_KEY`] and returns 401 otherwise.
pub const KEYED_PORT: u16 = 3011;
pub const API_KEY: &str = "test-key";

#[allow(unused)]
pub async fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    let wait = ONCE_LOCK.get().is_none();

    ONCE_LOCK.get_or_init(|| {
        let _ = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .try_init();

        // The mock servers live on their own runtime so they outlive any
        // single test's runtime.
        std::thread::spawn(|| {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let open: SocketAddr = format!("0.0.0.0:{OPEN_PORT}").parse().unwrap();
                let keyed: SocketAddr = format!("0.0.0.0:{KEYED_PORT}").parse().unwrap();
                tokio::join!(
                    mock_service::run(open, MockConfig::default()),
                    mock_service::run(
                        keyed,
                        MockConfig {
                            api_key: Some(API_KEY.to_string()),
                        }
                    ),
                );
            });
        });
    });

    if wait {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}
