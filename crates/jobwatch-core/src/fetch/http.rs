//! Blocking JSON requests over libcurl.
//!
//! Runs in the current thread; `HttpJobApi` calls these from
//! `spawn_blocking` so the poll loop never blocks the runtime.

use std::time::Duration;

use super::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
}

/// Connect and whole-request timeouts applied to every request.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            request: Duration::from_secs(30),
        }
    }
}

/// Performs one request and returns the response body for any 2xx status.
pub(crate) fn perform(
    method: Method,
    url: &str,
    body: Option<&[u8]>,
    timeouts: Timeouts,
) -> Result<Vec<u8>, FetchError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.connect_timeout(timeouts.connect)?;
    easy.timeout(timeouts.request)?;

    let mut list = curl::easy::List::new();
    list.append("Accept: application/json")?;
    match method {
        Method::Get => easy.get(true)?,
        Method::Post => {
            list.append("Content-Type: application/json")?;
            easy.post(true)?;
            easy.post_fields_copy(body.unwrap_or_default())?;
        }
    }
    easy.http_headers(list)?;

    let mut buf = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            buf.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    Ok(buf)
}
