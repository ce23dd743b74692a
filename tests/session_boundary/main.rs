//! Session-boundary end-to-end tests against the in-memory kernel.

mod common;

mod lifecycle;
mod periodic_commit;
mod visibility;
