//! Line-oriented response shape: `Thought:` / `Action:` / `Answer:` lines.

/// A directive extracted from line-oriented text, before tool resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineDirective {
    Action {
        tool: String,
        input: String,
        thought: String,
    },
    Answer {
        answer: String,
        thought: String,
    },
}

/// Scan `body` for directive lines.
///
/// Accepts `Action: tool: input`, or `Action: tool` followed by an
/// `Action Input:` line. `Answer:` and `Final Answer:` capture the rest of
/// the line plus every following line. Markdown emphasis around the labels
/// is ignored, as are `PAUSE` and any line without a recognized label.
/// An action wins over an answer when both appear.
pub(crate) fn parse_lines(body: &str) -> Option<LineDirective> {
    let lines: Vec<&str> = body.lines().collect();

    let mut thoughts: Vec<String> = Vec::new();
    let mut action: Option<(String, String)> = None;
    let mut action_input: Option<String> = None;
    let mut answer: Option<String> = None;

    for (idx, raw) in lines.iter().enumerate() {
        let line = clean(raw);
        let Some((label, payload)) = line.split_once(':') else {
            continue;
        };
        let label = label.trim().trim_matches('*').trim().to_ascii_lowercase();
        let payload = payload.trim().trim_start_matches('*').trim();

        match label.as_str() {
            "thought" => {
                if !payload.is_empty() {
                    thoughts.push(payload.to_string());
                }
            }
            "action" if action.is_none() => {
                let (tool, input) = payload.split_once(':').unwrap_or((payload, ""));
                action = Some((tool.trim().to_string(), input.trim().to_string()));
            }
            "action input" | "action_input" if action_input.is_none() => {
                action_input = Some(payload.to_string());
            }
            "answer" | "final answer" | "final_answer" if answer.is_none() => {
                let mut text = payload.to_string();
                for rest in &lines[idx + 1..] {
                    text.push('\n');
                    text.push_str(rest);
                }
                answer = Some(text.trim().to_string());
            }
            _ => {}
        }
    }

    let thought = thoughts.join(" ");

    if let Some((tool, input)) = action {
        let input = if input.is_empty() {
            action_input.unwrap_or_default()
        } else {
            input
        };
        return Some(LineDirective::Action {
            tool,
            input: unquote(&input).to_string(),
            thought,
        });
    }

    answer.map(|answer| LineDirective::Answer { answer, thought })
}

fn clean(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| matches!(c, '*' | '#' | '>' | '-' | '_') || c.is_whitespace())
}

fn unquote(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(tool: &str, input: &str, thought: &str) -> Option<LineDirective> {
        Some(LineDirective::Action {
            tool: tool.into(),
            input: input.into(),
            thought: thought.into(),
        })
    }

    #[test]
    fn inline_action() {
        assert_eq!(
            parse_lines("Thought: look it up\nAction: wikipedia: Paris\nPAUSE"),
            action("wikipedia", "Paris", "look it up")
        );
    }

    #[test]
    fn action_with_separate_input_line() {
        assert_eq!(
            parse_lines("Action: web_search\nAction Input: \"rust 2024 edition\""),
            action("web_search", "rust 2024 edition", "")
        );
    }

    #[test]
    fn input_keeps_inner_colons() {
        assert_eq!(
            parse_lines("Action: web_search: time in UTC: now"),
            action("web_search", "time in UTC: now", "")
        );
    }

    #[test]
    fn emphasised_labels() {
        assert_eq!(
            parse_lines("**Action:** wikipedia: Lyon"),
            action("wikipedia", "Lyon", "")
        );
        assert_eq!(
            parse_lines("**Answer**: Lyon"),
            Some(LineDirective::Answer { answer: "Lyon".into(), thought: String::new() })
        );
    }

    #[test]
    fn answer_takes_following_lines() {
        let parsed = parse_lines("Thought: done\nFinal Answer: Paris\nIt is on the Seine.");
        assert_eq!(
            parsed,
            Some(LineDirective::Answer {
                answer: "Paris\nIt is on the Seine.".into(),
                thought: "done".into(),
            })
        );
    }

    #[test]
    fn action_beats_answer() {
        let parsed = parse_lines("Answer: maybe Paris\nAction: wikipedia: Paris");
        assert_eq!(parsed, action("wikipedia", "Paris", ""));
    }

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(parse_lines("ACTION: Wikipedia: Oslo"), action("Wikipedia", "Oslo", ""));
    }

    #[test]
    fn prose_yields_nothing() {
        assert_eq!(parse_lines("I think the capital is Paris."), None);
        assert_eq!(parse_lines(""), None);
    }
}
