//! APA 7th edition citation formatting.

use log::error;

use crate::summary::PaperSummary;

/// Name particles kept with the surname instead of becoming initials.
const PARTICLES: [&str; 4] = ["van", "von", "de", "du"];

/// Words left lowercase in a sentence-case title (except in first position).
const MINOR_WORDS: [&str; 15] = [
    "a", "an", "the", "and", "but", "or", "for", "nor", "on", "at", "to", "from", "by", "in",
    "of",
];

/// Create an APA 7th edition style citation for a paper.
pub fn apa_citation(summary: &PaperSummary) -> String {
    if summary.authors.is_empty() {
        return format!("Unknown. ({}). {}.", summary.year, title_case(&summary.title));
    }

    let formatted: Vec<String> = summary.authors.iter().map(|a| invert_author(a)).collect();
    let authors = match formatted.len() {
        1 => formatted[0].clone(),
        2 => format!("{} & {}", formatted[0], formatted[1]),
        _ => format!(
            "{}, & {}",
            formatted[..formatted.len() - 1].join(", "),
            formatted[formatted.len() - 1]
        ),
    };

    format!("{} ({}). {}.", authors, summary.year, title_case(&summary.title))
}

/// Create the reviewed-papers section appended to the generated review.
pub fn reviewed_papers_list(summaries: &[PaperSummary]) -> String {
    let mut list = String::from("## List of Reviewed Papers\n\n");
    for summary in summaries {
        if summary.title.trim().is_empty() {
            error!("Error creating citation for paper with empty title");
            list.push_str("- Error in citation: (untitled)\n");
            continue;
        }
        list.push_str(&format!("- {}\n", apa_citation(summary)));
    }
    list
}

/// Invert "First Middle Last" into "Last, F. M.", keeping surname particles
/// ("van", "de", ...) attached to the last name.
fn invert_author(author: &str) -> String {
    let parts: Vec<&str> = author.split_whitespace().collect();
    if parts.len() < 2 {
        return author.to_string();
    }

    let second_last = parts[parts.len() - 2];
    let last_name = if PARTICLES.contains(&second_last.to_lowercase().as_str()) {
        format!("{} {}", second_last, parts[parts.len() - 1])
    } else {
        parts[parts.len() - 1].to_string()
    };

    let initials: Vec<String> = parts[..parts.len() - 1]
        .iter()
        .filter(|p| !PARTICLES.contains(&p.to_lowercase().as_str()))
        .filter_map(|p| p.chars().next())
        .map(|c| format!("{}.", c.to_uppercase()))
        .collect();

    format!("{}, {}", last_name, initials.join(" "))
}

/// Sentence-case a title: capitalize the first word, lowercase minor words,
/// capitalize the rest. Trailing period dropped.
fn title_case(title: &str) -> String {
    let cased: Vec<String> = title
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            if i == 0 || !MINOR_WORDS.contains(&word.to_lowercase().as_str()) {
                capitalize(word)
            } else {
                word.to_lowercase()
            }
        })
        .collect();
    let joined = cased.join(" ");
    joined.strip_suffix('.').unwrap_or(&joined).to_string()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str()
        }
        None => String::new(),
    }
}
