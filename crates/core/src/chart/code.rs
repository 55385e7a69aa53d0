//! Hierarchical account code generation.
//!
//! Roots take the next integer in their class block (`1001`, `1002`, ...).
//! Children of a root append `-NN` (`1001-02`). Deeper levels append two more
//! digits without a separator (`1001-0201`). Sequence `99` is reserved for the
//! fallback account that absorbs a parent's history.

use super::error::ChartError;
use super::types::AccountClass;

/// Separator between a root code and its children's sequence.
pub const CODE_SEPARATOR: char = '-';

/// Sequence reserved for fallback accounts.
pub const FALLBACK_SEQUENCE: u32 = 99;

const BLOCK_SIZE: u32 = 1000;

/// Returns the next free root code for `class`.
///
/// `existing` may contain every code in the book; non-numeric codes and codes
/// outside the class block are ignored.
///
/// # Errors
///
/// Returns `CodeSpaceExhausted` when the block has no room left.
pub fn next_root_code<'a, I>(class: AccountClass, existing: I) -> Result<String, ChartError>
where
    I: IntoIterator<Item = &'a str>,
{
    let base = class.code_block();
    let last = base + BLOCK_SIZE - 1;

    let max = existing
        .into_iter()
        .filter_map(|code| code.parse::<u32>().ok())
        .filter(|n| (base..=last).contains(n))
        .fold(base, u32::max);

    if max >= last {
        return Err(ChartError::CodeSpaceExhausted {
            prefix: base.to_string(),
        });
    }
    Ok((max + 1).to_string())
}

/// Prefix that children of `parent_code` share.
#[must_use]
pub fn child_prefix(parent_code: &str) -> String {
    if parent_code.contains(CODE_SEPARATOR) {
        parent_code.to_string()
    } else {
        format!("{parent_code}{CODE_SEPARATOR}")
    }
}

/// Returns the next free child code under `parent_code`.
///
/// Only codes that are exactly the prefix plus two digits count as siblings,
/// so grandchildren and fallback codes of other levels never collide.
///
/// # Errors
///
/// Returns `CodeSpaceExhausted` once sequences `01..=98` are used up.
pub fn next_child_code<'a, I>(parent_code: &str, existing: I) -> Result<String, ChartError>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = child_prefix(parent_code);

    let max = existing
        .into_iter()
        .filter_map(|code| code.strip_prefix(prefix.as_str()))
        .filter(|rest| rest.len() == 2 && rest.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|rest| rest.parse::<u32>().ok())
        .filter(|&seq| seq != FALLBACK_SEQUENCE)
        .fold(0, u32::max);

    let next = max + 1;
    if next >= FALLBACK_SEQUENCE {
        return Err(ChartError::CodeSpaceExhausted { prefix });
    }
    Ok(format!("{prefix}{next:02}"))
}

/// Code of the fallback account under `parent_code`.
#[must_use]
pub fn fallback_code(parent_code: &str) -> String {
    format!("{parent_code}{CODE_SEPARATOR}{FALLBACK_SEQUENCE}")
}

/// Display name of the fallback account under a parent.
#[must_use]
pub fn fallback_name(parent_name: &str) -> String {
    format!("Unclassified {parent_name}")
}
