//! Prompt text sent to the generative API.

/// Ask for one new question, steering away from everything already published.
pub fn topic_prompt(brand: &str, host: &str, completed: &[String]) -> String {
    let avoid = completed
        .iter()
        .map(|t| format!("\"{t}\""))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"
You're an AI for "{brand}" hosted at {host}.
Your goal is to generate a single, simple, funny, or common question that people might Google.
The question should be easy for anyone to understand.

Avoid these topics:
{avoid}

Return ONLY the question. No extra text or explanation.
"#
    )
}

/// Ask for a complete standalone page answering `topic`.
pub fn page_prompt(brand: &str, topic: &str) -> String {
    format!(
        r#"
You are a world-class AI web copywriter and SEO expert.
Your job is to create a standalone HTML file for the brand "{brand}" that acts as a funny, witty "answer" to a Google search query.

The search query (topic) is: "{topic}"

Generate one full, clean, semantic HTML5 page based on this.

Here are the rules:
1.  **Doctype and Lang**: Start with `<!DOCTYPE html>` and `<html lang="en">`.
2.  **Title**: Write a clever, thought-provoking <title> that feels like a direct, funny answer to the query.
3.  **Meta Description**: Write a <meta name="description"> that supports the title with humor or unexpected wisdom, including relevant keywords naturally.
4.  **Meta Keywords**: Add <meta name="keywords"> with terms related to the query to boost searchability.
5.  **Meta Author**: Add `<meta name="author" content="{brand}">`.
6.  **CSS**: Use simple, inline CSS within a `<style>` tag in the `<head>`. The style should be minimalist and not distract from the message. Use a dark theme (e.g., background: #121212; color: #e0e0e0;). Center the content vertically and horizontally.
7.  **Body Content**: In the `<body>`, use an `<h1>` for the main punchline, followed by a `<p>` that continues the joke or message.
8.  **Footer**: End the body with `<footer>— {brand}</footer>`.
9.  **No Extras**: No scripts, no external links, no complex UI. It must be a single, lightweight, self-contained HTML file.

Return ONLY the full HTML code, starting with `<!DOCTYPE html>` and ending with `</html>`. Do not include any markdown code block delimiters like ```html or ```. Do not include any other text or explanation.
"#
    )
}
