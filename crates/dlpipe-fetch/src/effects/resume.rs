//! Opening the not-yet-committed remainder of a resource.

use std::borrow::Cow;

use tracing::debug;

use super::http::{HttpClient, HttpResponse};
use super::state::ContentLength;
use crate::core::{
    RANGE, RangeError, STATUS_BAD_GATEWAY, STATUS_OK, STATUS_PARTIAL_CONTENT, range_header,
    validate_resume,
};
use crate::error::{FetchError, Result};

/// Issues the request for each attempt and validates that the server
/// cooperates with resuming.
///
/// At offset 0 this is a plain GET that must answer 200 and fixes the
/// session's content length. Past offset 0 it is a range request that must
/// answer 206 with a `Content-Range` covering exactly the rest of the
/// resource. Only a 502 is reported as transient; every other rejection is
/// final.
pub struct ResumeDriver<'a, C> {
    client:         &'a C,
    url:            &'a str,
    headers:        &'a [(String, String)],
    content_length: ContentLength,
}

impl<'a, C: HttpClient> ResumeDriver<'a, C> {
    pub fn new(
        client: &'a C,
        url: &'a str,
        headers: &'a [(String, String)],
        content_length: ContentLength,
    ) -> Self {
        Self {
            client,
            url,
            headers,
            content_length,
        }
    }

    pub fn content_length(&self) -> Option<u64> { self.content_length.get() }

    /// Fail fast when `offset` cannot be resumed from.
    pub fn check_resumable(&self, offset: u64) -> std::result::Result<(), RangeError> {
        if offset > 0 && self.content_length.get().is_none() {
            return Err(RangeError::UnknownLength { offset });
        }
        Ok(())
    }

    pub async fn open(&self, offset: u64) -> Result<HttpResponse<C::Error>> {
        self.check_resumable(offset)?;

        let headers = if offset == 0 {
            Cow::Borrowed(self.headers)
        } else {
            Cow::Owned(with_range(self.headers, offset))
        };

        debug!(url = self.url, offset, "sending request");
        let response = self
            .client
            .get(self.url, &headers)
            .await
            .map_err(Into::<FetchError>::into)?;

        if response.status == STATUS_BAD_GATEWAY {
            return Err(FetchError::BadGateway);
        }

        if offset == 0 {
            self.accept_first(&response)?;
        } else {
            self.accept_resume(&response, offset)?;
        }
        Ok(response)
    }

    fn accept_first(&self, response: &HttpResponse<C::Error>) -> Result<()> {
        if response.status != STATUS_OK {
            return Err(FetchError::UnexpectedFirstStatus(response.status));
        }
        if let Some(declared) = response.content_length {
            let fixed = self.content_length.record(declared);
            if fixed != declared {
                return Err(RangeError::LengthChanged {
                    expected: fixed,
                    actual:   declared,
                }
                .into());
            }
        }
        Ok(())
    }

    fn accept_resume(&self, response: &HttpResponse<C::Error>, offset: u64) -> Result<()> {
        if response.status != STATUS_PARTIAL_CONTENT {
            return Err(FetchError::UnexpectedResumeStatus(response.status));
        }
        let total = self
            .content_length
            .get()
            .ok_or(RangeError::UnknownLength { offset })?;
        validate_resume(response.content_range.as_deref(), offset, total)?;
        Ok(())
    }
}

/// The configured headers with any `Range` replaced by one starting at `offset`.
fn with_range(headers: &[(String, String)], offset: u64) -> Vec<(String, String)> {
    headers
        .iter()
        .filter(|(key, _)| !key.eq_ignore_ascii_case(RANGE))
        .cloned()
        .chain(std::iter::once((RANGE.to_string(), range_header(offset))))
        .collect()
}
