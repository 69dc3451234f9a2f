mod event;
mod parse;
mod render;

pub use parse::{parse_transcript, try_parse_transcript};
pub use render::render_conversation;
