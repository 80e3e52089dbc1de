pub mod chat;
pub mod summarise;

pub use chat::ChatService;
pub use summarise::{build_summary_prompt, SummariseService};
