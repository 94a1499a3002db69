//! Recovers the literal argument of a `pd!` call from its source text, so the
//! print out shows the expression as it was written.

/// The macros whose arguments are extracted.
const MACRO_NAMES: [&str; 2] = ["pdi!", "pd!"];

/// Returns the argument of a `pd!` or `pdi!` invocation in the given source
/// text, without per call options. With a 1-based `column`, the first
/// invocation on the first line at or after that column is used, so that
/// several calls on one line each find their own argument; otherwise the
/// first invocation is used.
///
/// Returns `None` when there is no invocation, or when the invocation does not
/// close within the text, e.g. because fewer source lines were read than the
/// call spans.
pub fn extract_expression(source: &str, column: Option<u32>) -> Option<String> {
    let mut invocations: Vec<(usize, &str)> = MACRO_NAMES
        .iter()
        .flat_map(|name| find_invocations(source, name).into_iter().map(move |index| (index, *name)))
        .collect();
    invocations.sort_unstable();

    let (start, name) = column
        .and_then(|column| {
            invocations
                .iter()
                .find(|(index, _)| first_line_column(source, *index).is_some_and(|found| found >= column))
        })
        .or_else(|| invocations.first())
        .copied()?;

    let rest = source[start + name.len()..].trim_start();
    let open = rest.chars().next()?;
    let close = match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        _ => return None,
    };

    let inner = balanced_contents(&rest[open.len_utf8()..], close)?;
    let argument = split_options(inner).trim();
    if argument.is_empty() {
        None
    } else {
        Some(dedent(argument))
    }
}

/// Finds every `name` that is not part of a longer identifier.
fn find_invocations(source: &str, name: &str) -> Vec<usize> {
    source
        .match_indices(name)
        .map(|(index, _)| index)
        .filter(|index| {
            source[..*index]
                .chars()
                .next_back()
                .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
        })
        .collect()
}

/// The 1-based character column of `index`, when it lies on the first line.
fn first_line_column(source: &str, index: usize) -> Option<u32> {
    let prefix = &source[..index];
    if prefix.contains('\n') {
        return None;
    }
    u32::try_from(prefix.chars().count() + 1).ok()
}

/// Returns the text up to the delimiter that closes the already opened one.
fn balanced_contents(text: &str, close: char) -> Option<&str> {
    let mut depth = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match c {
            '"' => skip_string(&mut chars)?,
            '\'' => {
                // Either a char literal such as '(' or '\n', or a lifetime.
                let mut lookahead = chars.clone();
                match (lookahead.next(), lookahead.next()) {
                    (Some((_, '\\')), _) => {
                        chars.next();
                        chars.next();
                        skip_until(&mut chars, '\'')?;
                    }
                    (Some(_), Some((_, '\''))) => {
                        chars.next();
                        chars.next();
                    }
                    _ => {}
                }
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                if depth == 0 {
                    return (c == close).then(|| &text[..index]);
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    None
}

fn skip_string<I: Iterator<Item = (usize, char)>>(chars: &mut I) -> Option<()> {
    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => return Some(()),
            _ => {}
        }
    }
    None
}

fn skip_until<I: Iterator<Item = (usize, char)>>(chars: &mut I, end: char) -> Option<()> {
    chars.find(|(_, c)| *c == end).map(|_| ())
}

/// Drops the `; options` part of `pd!(value; options)`.
fn split_options(argument: &str) -> &str {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, c) in argument.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => return &argument[..index],
            _ => {}
        }
    }

    argument
}

/// Removes the indentation that all continuation lines share.
fn dedent(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default().trim_end();
    let rest: Vec<&str> = lines.collect();

    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut result = first.to_string();
    for line in rest {
        result.push('\n');
        result.push_str(line.get(indent..).unwrap_or_else(|| line.trim_start()).trim_end());
    }
    result
}
