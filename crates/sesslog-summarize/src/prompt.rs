/// Build the fixed summarization instruction around a rendered conversation.
pub(crate) fn summarization_prompt(conversation: &str) -> String {
    format!(
        "Summarize this Claude Code session in a structured markdown format.
Write in the SAME language the user used (Russian if they wrote in Russian, English if English).

Format:
```
# Session: <date> — <short title describing main task>
## Status: <completed|in-progress|interrupted>
## Summary
<2-3 sentences about what was done>
## Key decisions
- <decision 1>
- <decision 2>
## Files changed
- <file1> (<new|modified|deleted>)
## Problems encountered
- <problem and how it was resolved>
## Next steps
- <what remains to be done, if anything>
```

If the session was trivial (just a greeting or simple question), write a one-line summary instead.

Session transcript:
{conversation}"
    )
}
