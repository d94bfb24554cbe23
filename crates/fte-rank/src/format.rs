// Automaton description text format: line parsing into facts.
//
// Each non-blank line is tab-separated:
//   src \t dst \t symbol-in \t symbol-out    (transition)
//   state                                    (final state)
// Ids are kept as raw integers here; range checks happen in `dfa`.

use crate::DfaError;

/// A single parsed line of an automaton description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fact {
    /// `src --symbol_in--> dst`. `symbol_out` is carried but never ranked over.
    Transition {
        src: i64,
        dst: i64,
        symbol_in: i64,
        symbol_out: i64,
    },
    /// `state` is accepting.
    Final { state: i64 },
}

impl Fact {
    /// Parse one line. `line_no` is 1-based and only used for error reporting.
    ///
    /// Returns `Ok(None)` for blank lines.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Option<Fact>, DfaError> {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split('\t').collect();
        match fields.as_slice() {
            [src, dst, symbol_in, symbol_out] => Ok(Some(Fact::Transition {
                src: parse_field(src, line_no)?,
                dst: parse_field(dst, line_no)?,
                symbol_in: parse_field(symbol_in, line_no)?,
                symbol_out: parse_field(symbol_out, line_no)?,
            })),
            [state] => Ok(Some(Fact::Final {
                state: parse_field(state, line_no)?,
            })),
            _ => Err(DfaError::Format {
                line: line_no,
                reason: format!("expected 1 or 4 tab-separated fields, got {}", fields.len()),
            }),
        }
    }
}

fn parse_field(field: &str, line_no: usize) -> Result<i64, DfaError> {
    let field = field.trim();
    field.parse::<i64>().map_err(|_| DfaError::Format {
        line: line_no,
        reason: format!("field {field:?} is not a decimal integer"),
    })
}

/// Parse a whole automaton description into its facts, in line order.
///
/// Blank lines are skipped wherever they occur. Fails on the first malformed
/// line; no partial fact list is returned.
pub fn parse_description(text: &str) -> Result<Vec<Fact>, DfaError> {
    let mut facts = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if let Some(fact) = Fact::parse_line(line, i + 1)? {
            facts.push(fact);
        }
    }
    Ok(facts)
}
