// src/gitlab/paginate.rs
// =============================================================================
// This module walks the projects of a group one page at a time.
//
// Flow per page:
//   GET page N -> non-2xx? fail -> stream body to the sink + "\n"
//              -> x-total-pages empty/absent or == N? done : N + 1
//
// Exactly one request is in flight at any time. Nothing is retried: the
// first transport error or bad status ends the run, and whatever was already
// written to the sink stays there.
//
// Rust concepts:
// - Lifetimes: Paginator<'a> borrows the Config instead of copying it
// - Generics with trait bounds: any `AsyncWrite + Unpin` can be the sink
//   (tokio's stdout in production, a Vec<u8> in tests)
// - Streaming: Response::chunk() hands us the body piece by piece
// - Enums: PageOutcome says whether to keep going
// =============================================================================

use reqwest::header::HeaderValue;
use reqwest::{Client, Response};
use tokio::io::{AsyncWrite, AsyncWriteExt}; // AsyncWriteExt gives us .write_all() and .flush()
use tracing::{debug, info};
use url::Url;

use super::endpoint::{page_url, projects_url, TOKEN_HEADER, TOTAL_PAGES_HEADER};
use crate::config::Config;
use crate::error::{Error, Result};

/// What a single page fetch tells the loop to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The service reports more pages after this one
    More,
    /// This was the last page
    Last,
}

/// Summary of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of pages written to the sink
    pub pages: u64,
}

// Sequential page fetcher for one group
//
// Holds one reqwest Client for the whole run so the connection to GitLab
// can be reused between pages
pub struct Paginator<'a> {
    client: Client,
    config: &'a Config,
    projects: Url, // .../api/v4/groups/{group}/projects, without a query
}

impl<'a> Paginator<'a> {
    // Creates a paginator
    //
    // Parameters:
    //   config: the resolved configuration (borrowed for the paginator's lifetime)
    //
    // Returns: Result<Paginator>
    //   Error: Client if reqwest cannot build its TLS backend
    pub fn new(config: &'a Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gitlab-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            client,
            config,
            projects: projects_url(&config.url_prefix, &config.group),
        })
    }

    // Fetches pages 1, 2, 3, ... into `out` until the last page is written
    //
    // Parameters:
    //   out: where page bodies go (stdout in production)
    //
    // Returns: Result<RunSummary>
    //   Success: how many pages were written
    //   Error: the first Transport, HttpStatus or Output error; pages written
    //          before it stay in `out`
    pub async fn run<W>(&self, out: &mut W) -> Result<RunSummary>
    where
        W: AsyncWrite + Unpin,
    {
        // The page cursor starts at 1 and only ever goes up by one
        let mut page: u64 = 1;
        loop {
            match self.fetch_page(page, out).await? {
                PageOutcome::Last => return Ok(RunSummary { pages: page }),
                PageOutcome::More => page += 1,
            }
        }
    }

    // Fetches one page and copies its body to `out`, followed by a newline
    //
    // Parameters:
    //   page: 1-based page number sent as ?page=
    //   out: where the body goes
    //
    // Returns: Result<PageOutcome>
    //   Success: More or Last, decided by the x-total-pages header
    //   Error: Transport (connect/DNS/timeout/body read), HttpStatus (non-2xx)
    //          or Output (writing to `out` failed)
    //
    // The Response is owned by this function, so it is dropped (and its
    // connection released) on every return path
    pub async fn fetch_page<W>(&self, page: u64, out: &mut W) -> Result<PageOutcome>
    where
        W: AsyncWrite + Unpin,
    {
        let url = page_url(&self.projects, page);
        info!(url = %url, page, "fetching page");

        // Wraps a reqwest error together with the URL that failed
        let transport = |source| Error::Transport {
            url: url.to_string(),
            source,
        };

        // The timeout covers connecting, headers and the whole body read.
        let mut response = self
            .client
            .get(url.clone())
            .header(TOKEN_HEADER, &self.config.token)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(transport)?;

        // Anything outside 200-299 ends the run
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        // Read the header before consuming the body
        let outcome = if is_last_page(response.headers().get(TOTAL_PAGES_HEADER), page) {
            PageOutcome::Last
        } else {
            PageOutcome::More
        };
        debug!(
            page,
            status = status.as_u16(),
            total_pages = ?total_pages(&response),
            "page response"
        );

        // Copy the body as it arrives instead of buffering the whole page
        while let Some(chunk) = response.chunk().await.map_err(transport)? {
            out.write_all(&chunk).await?;
        }
        out.write_all(b"\n").await?;
        out.flush().await?;

        Ok(outcome)
    }
}

/// True when the total-pages header says `page` is the final page.
///
/// An absent or empty header also ends pagination: the service either has
/// one page or does not report totals, and both are treated as "done".
/// A header that is not valid UTF-8 counts as absent.
pub fn is_last_page(total_pages: Option<&HeaderValue>, page: u64) -> bool {
    match total_pages.and_then(|value| value.to_str().ok()) {
        None => true,
        // Compared as text: "3" matches page 3, "03" does not
        Some(total) => total.is_empty() || total == page.to_string(),
    }
}

// The raw x-total-pages value, for logging only
fn total_pages(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(TOTAL_PAGES_HEADER)
        .and_then(|value| value.to_str().ok())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does `W: AsyncWrite + Unpin` mean?
//    - AsyncWrite: "something you can write bytes to without blocking",
//      like tokio::io::Stdout, a file, or a Vec<u8>
//    - Unpin: the writer can be moved in memory while in use; needed because
//      we hold it as `&mut W` across .await points
//
// 2. What is Response::chunk()?
//    - Returns the next piece of the body as Bytes, or None when done
//    - `while let Some(chunk) = ...? { }` loops until the body is exhausted
//
// 3. Why is `transport` a closure?
//    - Both .send() and .chunk() can fail with a reqwest::Error
//    - The closure builds the same Error::Transport for both, with the URL
//
// 4. What is Paginator<'a>?
//    - 'a is a lifetime: the Paginator cannot outlive the Config it borrows
//    - The compiler checks this for us; no copying of the token or URL
// -----------------------------------------------------------------------------
