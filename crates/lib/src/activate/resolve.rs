//! Turning queries into installed specs.

use tracing::debug;

use super::types::{ActivateError, LoadedRoot};
use crate::config::FirstPolicy;
use crate::db::{InstalledSpec, InstalledSpecs};
use crate::ledger::Ledger;
use crate::spec::Query;

/// The one installed spec `query` names.
///
/// Several matches are an error unless `first` is set, in which case
/// `policy` picks one.
pub(super) fn installed<'a, D: InstalledSpecs + ?Sized>(
  db: &'a D,
  query: &Query,
  first: bool,
  policy: FirstPolicy,
) -> Result<&'a InstalledSpec, ActivateError> {
  let matches: Vec<&InstalledSpec> = db.all().into_iter().filter(|i| query.matches(&i.spec)).collect();

  match matches.as_slice() {
    [] => Err(ActivateError::NoMatch {
      query: query.to_string(),
    }),
    [only] => Ok(*only),
    _ if first => {
      let chosen = pick_first(&matches, policy);
      debug!(query = %query, chosen = %chosen.spec, %policy, "picked one of several matches");
      Ok(chosen)
    }
    _ => Err(ActivateError::AmbiguousMatch {
      query: query.to_string(),
      candidates: matches.iter().map(|i| i.spec.to_string()).collect(),
    }),
  }
}

fn pick_first<'a>(matches: &[&'a InstalledSpec], policy: FirstPolicy) -> &'a InstalledSpec {
  let mut chosen = matches[0];
  if policy == FirstPolicy::MostRecent {
    for &candidate in &matches[1..] {
      if candidate.installed_at > chosen.installed_at {
        chosen = candidate;
      }
    }
  }
  chosen
}

/// The one loaded root `query` names.
///
/// Only roots in the ledger are candidates. A root whose record is gone
/// from the database can still be named by hash.
pub(super) fn loaded<'a, D: InstalledSpecs + ?Sized>(
  db: &'a D,
  ledger: &Ledger,
  query: &Query,
) -> Result<LoadedRoot<'a>, ActivateError> {
  let matches: Vec<LoadedRoot<'a>> = ledger
    .iter()
    .map(|hash| LoadedRoot {
      hash: hash.clone(),
      installed: db.get(hash),
    })
    .filter(|root| match root.installed {
      Some(installed) => query.matches(&installed.spec),
      None => query.is_hash_only() && query.matches_hash(&root.hash),
    })
    .collect();

  match matches.as_slice() {
    [] => {
      if db.all().iter().any(|i| query.matches(&i.spec)) {
        Err(ActivateError::NotLoaded {
          query: query.to_string(),
        })
      } else {
        Err(ActivateError::NoMatch {
          query: query.to_string(),
        })
      }
    }
    [only] => Ok(only.clone()),
    _ => Err(ActivateError::AmbiguousMatch {
      query: query.to_string(),
      candidates: matches
        .iter()
        .map(|root| match root.installed {
          Some(installed) => installed.spec.to_string(),
          None => format!("/{} (no longer installed)", root.hash.short()),
        })
        .collect(),
    }),
  }
}
