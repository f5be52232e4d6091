//! Output file naming.

use std::collections::HashSet;

/// Strips the extension from `name`, if it has one.
///
/// Only the last dot counts. A leading dot (`.hidden`) is not an extension
/// separator, so such names are returned unchanged.
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Derives an output name by replacing (or appending) the extension.
pub fn output_name(input_name: &str, extension: &str) -> String {
    format!("{}.{extension}", file_stem(input_name))
}

/// Makes names unique within one archive by suffixing ` (n)` before the
/// extension of every repeat. First occurrences keep their name.
pub fn dedupe_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut unique = Vec::with_capacity(names.len());

    for name in names {
        if taken.insert(name.clone()) {
            unique.push(name);
            continue;
        }

        let stem = file_stem(&name);
        let ext = &name[stem.len()..];
        let mut n = 1;
        let candidate = loop {
            let candidate = format!("{stem} ({n}){ext}");
            if !taken.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        taken.insert(candidate.clone());
        unique.push(candidate);
    }

    unique
}
