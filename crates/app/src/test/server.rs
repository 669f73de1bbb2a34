//! Local HTTP servers for client tests.

use axum::Router;
use testresult::TestResult;
use tokio::net::TcpListener;
use url::Url;

/// Serve `router` on a free local port and return the API base URL,
/// `http://127.0.0.1:<port>/api`. Routes are mounted under `/api`.
pub(crate) async fn spawn(router: Router) -> TestResult<Url> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router).await {
            eprintln!("test server stopped: {error}");
        }
    });

    Ok(Url::parse(&format!("http://{address}/api"))?)
}
