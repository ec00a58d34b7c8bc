//! Writes a `RelayResponse` onto a Pingora session.

use pingora_core::Result;
use pingora_http::ResponseHeader;
use pingora_proxy::Session;

use super::handler::RelayResponse;

/// Cache-defeating headers for composited image responses. Every layer
/// (browser, CDN, intermediary proxy) is told not to store the body.
const CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

/// Write the response header and body to the session.
pub async fn write_response(session: &mut Session, response: &RelayResponse) -> Result<()> {
    let mut header = ResponseHeader::build(response.status, None)?;
    header.insert_header("Content-Type", response.content_type.as_str())?;
    header.insert_header("Content-Length", response.body.len().to_string())?;

    if response.cache_defeat {
        header.insert_header("Cache-Control", CACHE_CONTROL)?;
        header.insert_header("Pragma", "no-cache")?;
        header.insert_header("Expires", "0")?;
    }

    if let Some(seconds) = response.retry_after {
        header.insert_header("Retry-After", seconds.to_string())?;
    }

    session
        .write_response_header(Box::new(header), false)
        .await?;
    session
        .write_response_body(Some(response.body.clone()), true)
        .await?;

    Ok(())
}
