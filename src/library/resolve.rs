use crate::error::Error;

use super::model::AudioFile;

/// Largest edit distance still accepted as a fuzzy match.
pub const FUZZY_THRESHOLD: usize = 6;

/// Which rule selected a file.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatchKind {
    /// The input was a 1-based position in scan order.
    Index,
    /// The input equals the file name, ignoring case and surrounding whitespace.
    Exact,
    /// The input is the closest file name within `FUZZY_THRESHOLD` edits.
    Fuzzy,
}

/// A file picked from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub file: &'a AudioFile,
    pub kind: MatchKind,
    /// Edit distance, for fuzzy matches only.
    pub distance: Option<usize>,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Levenshtein distance over chars, unit cost for insert, delete and substitute.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Two rows of the classic table are enough.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[b.len()]
}

/// The integer at the start of `input`, ignoring leading whitespace and
/// anything after the digits: `"2nd"` is 2, `"3.5"` is 3, `"-1x"` is -1.
/// Out-of-range digit runs saturate.
pub fn leading_integer(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let len = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }

    let digits = &unsigned[..len];
    let value = if negative {
        format!("-{digits}").parse().unwrap_or(i64::MIN)
    } else {
        digits.parse().unwrap_or(i64::MAX)
    };
    Some(value)
}

/// Pick one file from `files` for the user's `input`.
///
/// Rules are tried in order: input starting with an integer is a 1-based
/// index (and never falls through to name matching), then exact name, then
/// the closest name within `FUZZY_THRESHOLD` edits. Ties go to the earliest
/// file.
pub fn resolve<'a>(input: &str, files: &'a [AudioFile]) -> Result<Resolution<'a>, Error> {
    let trimmed = input.trim();

    if let Some(index) = leading_integer(trimmed) {
        let file = usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| files.get(i))
            .ok_or(Error::IndexOutOfRange {
                index,
                len: files.len(),
            })?;
        return Ok(Resolution {
            file,
            kind: MatchKind::Index,
            distance: None,
        });
    }

    let wanted = normalize(trimmed);

    if let Some(file) = files.iter().find(|f| normalize(&f.name) == wanted) {
        return Ok(Resolution {
            file,
            kind: MatchKind::Exact,
            distance: None,
        });
    }

    let mut best: Option<(&AudioFile, usize)> = None;
    for file in files {
        let distance = levenshtein(&wanted, &normalize(&file.name));
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((file, distance));
        }
    }

    match best {
        Some((file, distance)) if distance <= FUZZY_THRESHOLD => Ok(Resolution {
            file,
            kind: MatchKind::Fuzzy,
            distance: Some(distance),
        }),
        _ => Err(Error::NoMatch(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn files(names: &[&str]) -> Vec<AudioFile> {
        names
            .iter()
            .map(|n| AudioFile::new(Path::new("/music"), &Path::new("/music").join(format!("{n}.mp3"))))
            .collect()
    }

    #[test]
    fn levenshtein_matches_known_distances() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("too", "two"), 1);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("café", "cafe"), 1);
    }

    #[test]
    fn every_valid_index_selects_that_file() {
        let lib = files(&["one", "two", "three"]);
        for (i, f) in lib.iter().enumerate() {
            let r = resolve(&(i + 1).to_string(), &lib).unwrap();
            assert_eq!(r.file, f);
            assert_eq!(r.kind, MatchKind::Index);
            assert_eq!(r.distance, None);
        }
    }

    #[test]
    fn out_of_range_indices_name_the_valid_range() {
        let lib = files(&["one", "two", "three"]);
        for input in ["0", "4", "-1"] {
            let err = resolve(input, &lib).unwrap_err();
            assert!(matches!(err, Error::IndexOutOfRange { len: 3, .. }), "{input}");
        }
    }

    #[test]
    fn integers_never_fall_through_to_name_matching() {
        let lib = files(&["12", "one"]);
        // "12" is a file name too, but as an integer it is index 12.
        assert!(matches!(
            resolve("12", &lib),
            Err(Error::IndexOutOfRange { index: 12, len: 2 })
        ));
    }

    #[test]
    fn leading_integer_reads_the_digit_prefix() {
        assert_eq!(leading_integer("12"), Some(12));
        assert_eq!(leading_integer("  2nd"), Some(2));
        assert_eq!(leading_integer("3.5"), Some(3));
        assert_eq!(leading_integer("12abc"), Some(12));
        assert_eq!(leading_integer("-1"), Some(-1));
        assert_eq!(leading_integer("+7 songs"), Some(7));
        assert_eq!(leading_integer("99999999999999999999"), Some(i64::MAX));
        assert_eq!(leading_integer("one"), None);
        assert_eq!(leading_integer("-"), None);
        assert_eq!(leading_integer("a1"), None);
        assert_eq!(leading_integer(""), None);
    }

    #[test]
    fn digit_prefixed_input_is_an_index() {
        let lib = files(&["one", "two", "three"]);
        let r = resolve("2nd", &lib).unwrap();
        assert_eq!(r.file.name, "two");
        assert_eq!(r.kind, MatchKind::Index);

        assert_eq!(resolve("3.5", &lib).unwrap().file.name, "three");
        assert!(matches!(
            resolve("12abc", &lib),
            Err(Error::IndexOutOfRange { index: 12, len: 3 })
        ));
    }

    #[test]
    fn exact_match_ignores_case_and_whitespace() {
        let lib = files(&["Pizza Party", "Dough Boy"]);
        let r = resolve("  dOUGH boy \t", &lib).unwrap();
        assert_eq!(r.file.name, "Dough Boy");
        assert_eq!(r.kind, MatchKind::Exact);
    }

    #[test]
    fn exact_match_takes_the_first_duplicate() {
        let root = Path::new("/music");
        let lib = vec![
            AudioFile::new(root, &root.join("a/song.mp3")),
            AudioFile::new(root, &root.join("b/song.flac")),
        ];
        assert_eq!(resolve("song", &lib).unwrap().file.relative, "a/song.mp3");
    }

    #[test]
    fn near_miss_resolves_fuzzily_with_distance() {
        let lib = files(&["one", "two", "three"]);
        let r = resolve("too", &lib).unwrap();
        assert_eq!(r.file.name, "two");
        assert_eq!(r.kind, MatchKind::Fuzzy);
        assert_eq!(r.distance, Some(1));
    }

    #[test]
    fn fuzzy_ties_go_to_the_first_file() {
        let lib = files(&["abcd", "abce"]);
        let r = resolve("abcz", &lib).unwrap();
        assert_eq!(r.file.name, "abcd");
        assert_eq!(r.distance, Some(1));
    }

    #[test]
    fn threshold_is_inclusive_at_six() {
        let lib = files(&["abcdefghij"]);
        // six substitutions
        let r = resolve("zzzzzzghij", &lib).unwrap();
        assert_eq!(r.distance, Some(6));
        // seven substitutions
        assert!(matches!(resolve("zzzzzzzhij", &lib), Err(Error::NoMatch(_))));
    }

    #[test]
    fn far_input_is_rejected() {
        let lib = files(&["one", "two", "three"]);
        assert!(matches!(
            resolve("a completely different title", &lib),
            Err(Error::NoMatch(_))
        ));
    }

    #[test]
    fn empty_library_has_no_match() {
        assert!(matches!(resolve("anything", &[]), Err(Error::NoMatch(_))));
    }
}
