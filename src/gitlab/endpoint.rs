// src/gitlab/endpoint.rs
// =============================================================================
// This module builds the URLs of the GitLab "list group projects" endpoint:
//
//   {url-prefix}/api/v4/groups/{group}/projects?per_page=100&page=N
//
// Rust concepts:
// - Constants: `pub const` values shared with the paginator
// - Borrowing: functions take &Url and return a fresh Url
// - Builder-style APIs: url's path_segments_mut() and query_pairs_mut()
// =============================================================================

use url::Url;

/// Projects requested per page
pub const PER_PAGE: u32 = 100;

/// Response header GitLab uses to report how many pages exist
pub const TOTAL_PAGES_HEADER: &str = "x-total-pages";

/// Request header carrying the private token
pub const TOKEN_HEADER: &str = "Private-Token";

// Appends api/v4/groups/{group}/projects to the path of the base URL
//
// Parameters:
//   base: the --url-prefix URL
//   group: group name, or full path for subgroups
//
// Returns: a new Url with no query and no fragment
//
// Examples:
//   https://gitlab.example.com   + "platform"     -> .../api/v4/groups/platform/projects
//   https://example.com/gitlab/  + "platform"     -> .../gitlab/api/v4/groups/platform/projects
//   https://gitlab.example.com   + "parent/child" -> .../groups/parent%2Fchild/projects
pub fn projects_url(base: &Url, group: &str) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);

    // cannot_be_a_base URLs are rejected while resolving the config
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty() // drop the empty segment left by a trailing '/'
            .extend(["api", "v4", "groups", group, "projects"]);
    }

    url
}

// Returns the projects URL with the query set for one page
//
// Parameters:
//   projects: the URL from projects_url()
//   page: 1-based page number
//
// Any existing query is replaced, not appended to
pub fn page_url(projects: &Url, page: u64) -> Url {
    let mut url = projects.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("per_page", &PER_PAGE.to_string())
        .append_pair("page", &page.to_string());
    url
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not just format!("{}/api/v4/groups/{}/projects", base, group)?
//    - A trailing '/' on the base would give "//api"
//    - A '/' inside the group would become extra path segments
//    - extend() percent-encodes each segment for us
//
// 2. What does `if let Ok(mut segments) = ...` do?
//    - path_segments_mut() returns Err for URLs like "mailto:x", which
//      have no path to extend
//    - if let runs the block only in the Ok case
//
// 3. When is the query written?
//    - query_pairs_mut() returns a helper that writes the query back into
//      the Url when it is dropped, at the end of the statement
// -----------------------------------------------------------------------------
