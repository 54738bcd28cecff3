//! Splitting long listings into reply-sized pages.

/// Lines per page in the playlist listing.
pub(super) const PLAYLIST_PAGE_LINES: usize = 10;

/// Longest page body a chat embed accepts.
pub(super) const MAX_PAGE_CHARS: usize = 4096;

/// Join every `per_page` lines into one page body.
pub(super) fn by_count(lines: &[String], per_page: usize) -> Vec<String> {
    lines
        .chunks(per_page.max(1))
        .map(|chunk| chunk.join("\n"))
        .collect()
}

/// Greedily pack newline-joined lines into bodies of at most `max_chars`
/// characters. A single line longer than the limit gets a page of its own.
pub(super) fn by_length(lines: &[String], max_chars: usize) -> Vec<String> {
    let mut pages = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for line in lines {
        let line_chars = line.chars().count();
        if !current.is_empty() && current_chars + line_chars + 1 > max_chars {
            pages.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_chars += 1;
        }
        current.push_str(line);
        current_chars += line_chars;
    }
    if !current.is_empty() {
        pages.push(current);
    }
    pages
}
