// src/gitlab/mod.rs
// =============================================================================
// This module talks to the GitLab REST API (v4).
//
// Submodules:
// - endpoint: builds /api/v4/groups/{group}/projects URLs
// - paginate: fetches those pages one after another into an output sink
//
// Only the Paginator is needed outside this module.
// =============================================================================

mod endpoint;
mod paginate;

// Re-export so main.rs can write `gitlab::Paginator`
pub use paginate::Paginator;
