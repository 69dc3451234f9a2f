use serde_json::Value;

/// One decoded transcript line, discriminated by its `type` field.
///
/// Expected shapes:
/// ```json
/// {"type":"user","message":{"content":"fix the login bug"}}
/// {"type":"user","message":{"content":[{"type":"tool_result",...},{"type":"text","text":"..."}]}}
/// {"type":"assistant","message":{"content":[{"type":"text","text":"..."},{"type":"tool_use","name":"Edit","input":{...}}]}}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event<'a> {
    User(UserContent<'a>),
    Assistant(Vec<ContentBlock<'a>>),
    Other,
}

/// User content is either a bare string or a list of content blocks.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UserContent<'a> {
    Plain(&'a str),
    Blocks(Vec<ContentBlock<'a>>),
    Missing,
}

/// One entry of a `message.content` array.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ContentBlock<'a> {
    Text(&'a str),
    ToolUse { name: &'a str, input: &'a Value },
    Other,
}

impl<'a> Event<'a> {
    pub fn classify(json: &'a Value) -> Self {
        let content = json.get("message").and_then(|m| m.get("content"));
        match json.get("type").and_then(|v| v.as_str()) {
            Some("user") => Event::User(match content {
                Some(Value::String(s)) => UserContent::Plain(s),
                Some(Value::Array(arr)) => UserContent::Blocks(classify_blocks(arr)),
                _ => UserContent::Missing,
            }),
            Some("assistant") => Event::Assistant(match content {
                Some(Value::Array(arr)) => classify_blocks(arr),
                _ => Vec::new(),
            }),
            _ => Event::Other,
        }
    }
}

fn classify_blocks(arr: &[Value]) -> Vec<ContentBlock<'_>> {
    arr.iter().map(ContentBlock::classify).collect()
}

impl<'a> ContentBlock<'a> {
    fn classify(block: &'a Value) -> Self {
        match block.get("type").and_then(|t| t.as_str()) {
            Some("text") => match block.get("text").and_then(|t| t.as_str()) {
                Some(text) => ContentBlock::Text(text),
                None => ContentBlock::Other,
            },
            Some("tool_use") => ContentBlock::ToolUse {
                name: block.get("name").and_then(|n| n.as_str()).unwrap_or(""),
                input: block.get("input").unwrap_or(&Value::Null),
            },
            _ => ContentBlock::Other,
        }
    }
}
