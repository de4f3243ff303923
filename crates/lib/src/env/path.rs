//! Operations on separator-delimited path lists.
//!
//! An absent variable is treated as an empty string, so prepending to it
//! leaves a trailing separator (`a:`) and appending leaves a leading one
//! (`:a`). The empty slot stands for whatever the user's own shell setup puts
//! there, e.g. the default `MANPATH` search path.

/// `value` placed in front of `existing`.
pub fn prepend_entry(value: &str, existing: Option<&str>, sep: char) -> String {
  format!("{value}{sep}{}", existing.unwrap_or(""))
}

/// `value` placed after `existing`.
pub fn append_entry(value: &str, existing: Option<&str>, sep: char) -> String {
  format!("{}{sep}{value}", existing.unwrap_or(""))
}

/// Remove a contiguous run of `block` entries from `entries`.
///
/// Searches from the front, or from the back when `from_end` is set. If the
/// run is not present as a whole, each block entry is removed individually
/// (first or last occurrence). Returns `false` when that fallback removed
/// anything.
pub fn remove_block(entries: &mut Vec<String>, block: &[String], from_end: bool) -> bool {
  if block.is_empty() {
    return true;
  }

  let n = block.len();
  let found = if entries.len() < n {
    None
  } else if from_end {
    (0..=entries.len() - n).rev().find(|&i| entries[i..i + n] == *block)
  } else {
    (0..=entries.len() - n).find(|&i| entries[i..i + n] == *block)
  };

  if let Some(i) = found {
    entries.drain(i..i + n);
    return true;
  }

  let before = entries.len();
  for item in block {
    let pos = if from_end {
      entries.iter().rposition(|e| e == item)
    } else {
      entries.iter().position(|e| e == item)
    };
    if let Some(pos) = pos {
      entries.remove(pos);
    }
  }
  entries.len() == before
}
