pub mod completions;
pub mod compute;
pub mod request;
