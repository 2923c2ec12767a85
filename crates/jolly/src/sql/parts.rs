use std::fmt::Write;

/// A piece of SQL text: either raw text or a positional parameter slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SqlPart {
    Raw(String),
    Param,
}

/// Append raw text, merging with a trailing raw part.
pub(crate) fn push_raw(parts: &mut Vec<SqlPart>, sql: &str) {
    if sql.is_empty() {
        return;
    }

    match parts.last_mut() {
        Some(SqlPart::Raw(last)) => last.push_str(sql),
        _ => parts.push(SqlPart::Raw(sql.to_string())),
    }
}

/// Render parts to `out`, numbering placeholders from `$1`.
pub(crate) fn render(parts: &[SqlPart], out: &mut String) {
    let mut idx = 0;
    for part in parts {
        match part {
            SqlPart::Raw(s) => out.push_str(s),
            SqlPart::Param => {
                idx += 1;
                let _ = write!(out, "${}", idx);
            }
        }
    }
}

pub(crate) fn count_params(parts: &[SqlPart]) -> usize {
    parts.iter().filter(|p| matches!(p, SqlPart::Param)).count()
}
