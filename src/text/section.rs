//! Section extraction by markdown heading
//!
//! A section starts after the first heading whose title matches the
//! requested name (case-insensitive) and runs until the next heading of the
//! same or shallower level. Deeper sub-headings are part of the section.

/// Parse a heading line into `(level, title)`.
///
/// A heading is a run of 1–6 `#` followed by whitespace and a title.
/// Optional closing `#`s are dropped from the title.
pub fn heading_of(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }

    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        // `#tag` style text, not a heading
        return None;
    }

    let title = rest.trim().trim_end_matches('#').trim_end();
    Some((level, title))
}

/// Return the text under the heading named `heading`, or `None` if the
/// heading is missing or has no content before the next sibling heading.
pub fn extract_section(text: &str, heading: &str) -> Option<String> {
    let wanted = heading.trim().to_lowercase();
    let mut section_level: Option<usize> = None;
    let mut captured: Vec<&str> = Vec::new();

    for line in text.lines() {
        match (section_level, heading_of(line)) {
            (None, Some((level, title))) => {
                if title.to_lowercase() == wanted {
                    section_level = Some(level);
                }
            }
            (None, None) => {}
            (Some(current), Some((level, _))) if level <= current => break,
            (Some(_), _) => captured.push(line),
        }
    }

    let joined = captured.join("\n");
    let body = joined.trim();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_content_between_sibling_headings() {
        let doc = "# A\nfirst\nsecond\n# B\nother";
        assert_eq!(extract_section(doc, "A").as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn missing_heading_returns_none() {
        let doc = "# A\ncontent";
        assert_eq!(extract_section(doc, "Health Log"), None);
    }

    #[test]
    fn heading_match_is_case_insensitive() {
        let doc = "## health LOG\n- coffee\n## Notes\nx";
        assert_eq!(extract_section(doc, "Health Log").as_deref(), Some("- coffee"));
    }

    #[test]
    fn deeper_headings_stay_inside_section() {
        let doc = "## Health Log\n### Foods\n- rice\n### Symptoms\n- nausea\n## Tasks\n- call";
        assert_eq!(
            extract_section(doc, "Health Log").as_deref(),
            Some("### Foods\n- rice\n### Symptoms\n- nausea")
        );
    }

    #[test]
    fn shallower_heading_terminates_section() {
        let doc = "### Health Log\n- tea\n# Next Day\n- coffee";
        assert_eq!(extract_section(doc, "Health Log").as_deref(), Some("- tea"));
    }

    #[test]
    fn section_runs_to_end_of_document() {
        let doc = "# Journal\ntext\n## Health Log\n- eggs\n- toast";
        assert_eq!(extract_section(doc, "Health Log").as_deref(), Some("- eggs\n- toast"));
    }

    #[test]
    fn immediately_followed_by_sibling_is_none() {
        let doc = "## Health Log\n\n## Notes\nstuff";
        assert_eq!(extract_section(doc, "Health Log"), None);
    }

    #[test]
    fn only_first_matching_heading_is_used() {
        let doc = "# Health Log\nfirst\n# Other\n# Health Log\nsecond";
        assert_eq!(extract_section(doc, "Health Log").as_deref(), Some("first"));
    }

    #[test]
    fn hashtags_are_not_headings() {
        assert_eq!(heading_of("#health"), None);
        assert_eq!(heading_of("####### seven"), None);
        assert_eq!(heading_of("## Health Log ##"), Some((2, "Health Log")));
        let doc = "# Health Log\n#migraine today\n# End";
        assert_eq!(extract_section(doc, "Health Log").as_deref(), Some("#migraine today"));
    }
}
