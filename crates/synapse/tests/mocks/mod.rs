pub mod articles;
pub mod invoker;
pub mod transcripts;
