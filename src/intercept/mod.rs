//! Pre-send and post-receive stages of the dispatch pipeline.

pub(crate) mod request;
pub(crate) mod response;

pub(crate) use response::Disposition;
