//! Flattening of per-parameter errors into public records.
//!
//! | Error | `param` |
//! |-------|---------|
//! | coercion / validation of `p` | `p` |
//! | nested entry `c` under `p` | `p.c` |
//! | nested entry without `param` under `p` | `p` |
//! | array element `i` entry `c` under `p` | `p[i].c` |
//! | global | absent |

use veritas_core::{ErrorEntry, ParamError};

/// Joins a parent parameter with a nested entry's path.
pub(crate) fn compose_path(parent: &str, child: Option<&str>) -> String {
    match child {
        None => parent.to_string(),
        Some(child) if child.starts_with('[') => format!("{parent}{child}"),
        Some(child) => format!("{parent}.{child}"),
    }
}

/// Formats one error into public entries.
///
/// `param` is the owning parameter; `None` for schema-level errors, whose
/// entries carry no path of their own.
pub(crate) fn format_error(param: Option<&str>, error: ParamError) -> Vec<ErrorEntry> {
    match error {
        ParamError::Coercion(reason) | ParamError::Validation(reason) => match param {
            Some(name) => vec![ErrorEntry::for_param(name, &reason)],
            None => vec![ErrorEntry::global(&reason)],
        },
        ParamError::Nested(entries) => match param {
            Some(name) => entries
                .into_iter()
                .map(|entry| {
                    let path = compose_path(name, entry.param.as_deref());
                    entry.with_param(Some(path))
                })
                .collect(),
            None => entries,
        },
        ParamError::Global(reasons) => reasons
            .iter()
            .map(|reason| ErrorEntry::global(reason))
            .collect(),
    }
}

/// Assembles the final list: per-parameter entries in order, then the
/// schema-level error, if any.
pub(crate) fn format_errors(
    per_param: Vec<(String, ParamError)>,
    global: Option<ParamError>,
) -> Vec<ErrorEntry> {
    let mut entries: Vec<ErrorEntry> = per_param
        .into_iter()
        .flat_map(|(name, error)| format_error(Some(&name), error))
        .collect();
    if let Some(error) = global {
        entries.extend(format_error(None, error));
    }
    entries
}
