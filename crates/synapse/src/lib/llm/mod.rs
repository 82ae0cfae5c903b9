pub mod gemini;
pub mod invoker;
