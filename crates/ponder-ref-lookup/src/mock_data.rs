//! Offline reference data for the lookup tools.
//!
//! All data in this module is hardcoded. No external systems are contacted.
//! The module stands in for an encyclopedia API and a web search engine.

use serde_json::{json, Value};

// ── Encyclopedia (mock) ──────────────────────────────────────────────────────

struct Article {
    title: &'static str,
    /// Lowercase phrases that select this article when found in a query.
    keys: &'static [&'static str],
    summary: &'static str,
}

const ARTICLES: &[Article] = &[
    Article {
        title: "Paris",
        keys: &["paris", "capital of france"],
        summary: "Paris is the capital and most populous city of France. \
                  It is located on the Seine river in the north of the country.",
    },
    Article {
        title: "Lyon",
        keys: &["lyon"],
        summary: "Lyon is the third-largest city of France, at the confluence \
                  of the Rhone and the Saone.",
    },
    Article {
        title: "Eiffel Tower",
        keys: &["eiffel"],
        summary: "The Eiffel Tower is a wrought-iron lattice tower in Paris, \
                  completed in 1889 and 330 metres tall.",
    },
    Article {
        title: "Mount Everest",
        keys: &["everest", "highest mountain"],
        summary: "Mount Everest is Earth's highest mountain above sea level, \
                  at 8,849 metres, on the border of Nepal and China.",
    },
    Article {
        title: "Rust (programming language)",
        keys: &["rust programming", "rust language", "rust (programming"],
        summary: "Rust is a general-purpose programming language emphasizing \
                  performance, type safety and concurrency. Version 1.0 was \
                  released in May 2015.",
    },
    Article {
        title: "Ada Lovelace",
        keys: &["lovelace"],
        summary: "Ada Lovelace was an English mathematician known for her work \
                  on Charles Babbage's Analytical Engine and is often regarded \
                  as the first computer programmer.",
    },
];

/// Look up an encyclopedia article for `query`.
///
/// Matching is case-insensitive: the first article with a key phrase that
/// occurs in the query, or whose title equals the query, wins. Returns
/// `{"query", "title", "summary"}` or `None` when nothing matches.
pub fn lookup_article(query: &str) -> Option<Value> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    ARTICLES
        .iter()
        .find(|a| a.title.to_lowercase() == needle || a.keys.iter().any(|k| needle.contains(k)))
        .map(|a| {
            json!({
                "query": query,
                "title": a.title,
                "summary": a.summary,
            })
        })
}

// ── Web search index (mock) ──────────────────────────────────────────────────

struct Page {
    title: &'static str,
    link: &'static str,
    snippet: &'static str,
}

const PAGES: &[Page] = &[
    Page {
        title: "Paris - Official website of the City of Paris",
        link: "https://www.paris.fr/",
        snippet: "Paris, capital of France: news, services and events in the city.",
    },
    Page {
        title: "France travel guide: Paris, Lyon and beyond",
        link: "https://travel.example.com/france",
        snippet: "Plan a trip to France. Paris is the capital; Lyon is famous for food.",
    },
    Page {
        title: "Weather in Oslo - 10 day forecast",
        link: "https://weather.example.com/oslo",
        snippet: "Oslo weather today: 4 degrees, light rain, wind from the south west.",
    },
    Page {
        title: "Rust 2024 edition is stable",
        link: "https://blog.rust-lang.org/2025/02/20/Rust-1.85.0.html",
        snippet: "Rust 1.85.0 stabilizes the 2024 edition, the largest edition release yet.",
    },
    Page {
        title: "The Rust Programming Language book",
        link: "https://doc.rust-lang.org/book/",
        snippet: "An introductory book about Rust, the programming language.",
    },
    Page {
        title: "Mount Everest height remeasured",
        link: "https://news.example.com/everest-height",
        snippet: "China and Nepal jointly announced Everest's height as 8,848.86 metres.",
    },
    Page {
        title: "Ada Lovelace Day",
        link: "https://findingada.com/",
        snippet: "An international celebration of the achievements of women in STEM.",
    },
];

/// Maximum number of results a search returns.
pub const MAX_RESULTS: usize = 10;

/// Search the mock index.
///
/// A page scores one point per query word (longer than two characters)
/// found in its title or snippet. Returns
/// `{"top_results": [{"position", "title", "link", "snippet"}]}` ordered by
/// score, at most [`MAX_RESULTS`] entries, or `None` when nothing scores.
pub fn search_web(query: &str) -> Option<Value> {
    let words: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(str::to_lowercase)
        .collect();

    let mut scored: Vec<(usize, &Page)> = PAGES
        .iter()
        .map(|page| {
            let haystack = format!("{} {}", page.title, page.snippet).to_lowercase();
            (words.iter().filter(|w| haystack.contains(w.as_str())).count(), page)
        })
        .filter(|(score, _)| *score > 0)
        .collect();

    if scored.is_empty() {
        return None;
    }

    // Stable sort keeps index order among equal scores.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let top_results: Vec<Value> = scored
        .iter()
        .take(MAX_RESULTS)
        .enumerate()
        .map(|(idx, (_, page))| {
            json!({
                "position": idx + 1,
                "title": page.title,
                "link": page.link,
                "snippet": page.snippet,
            })
        })
        .collect();

    Some(json!({ "top_results": top_results }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_by_key_phrase() {
        let article = lookup_article("What is the capital of France?").unwrap();
        assert_eq!(article["title"], "Paris");
        assert_eq!(article["query"], "What is the capital of France?");
        assert!(article["summary"].as_str().unwrap().contains("capital"));
    }

    #[test]
    fn test_article_by_title_is_case_insensitive() {
        assert_eq!(lookup_article("LYON").unwrap()["title"], "Lyon");
    }

    #[test]
    fn test_article_miss() {
        assert!(lookup_article("Atlantis").is_none());
        assert!(lookup_article("   ").is_none());
    }

    #[test]
    fn test_search_ranks_by_matching_words() {
        let results = search_web("rust 2024 edition").unwrap();
        let top = results["top_results"].as_array().unwrap();
        assert_eq!(top[0]["title"], "Rust 2024 edition is stable");
        assert_eq!(top[0]["position"], 1);
        for (idx, entry) in top.iter().enumerate() {
            assert_eq!(entry["position"], idx + 1);
        }
    }

    #[test]
    fn test_search_miss() {
        assert!(search_web("zz qq").is_none());
        assert!(search_web("xylophone quartet").is_none());
    }

    #[test]
    fn test_search_caps_results() {
        let results = search_web("the paris france rust weather everest ada lovelace").unwrap();
        assert!(results["top_results"].as_array().unwrap().len() <= MAX_RESULTS);
    }
}
