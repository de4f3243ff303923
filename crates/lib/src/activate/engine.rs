use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::resolve;
use super::types::{ActivateError, Activation, LoadOptions, LoadedRoot, Phase, UnloadTarget};
use crate::config::{Config, FirstPolicy};
use crate::consts::PRIOR_VAR_PREFIX;
use crate::db::{InstalledSpec, InstalledSpecs};
use crate::env::{EnvSnapshot, MutationSet};
use crate::hook::RunEnvHook;
use crate::inspect::PrefixInspector;
use crate::ledger::Ledger;
use crate::shell::Dialect;
use crate::spec::Query;
use crate::traverse::{MissingPolicy, runtime_closure};
use crate::util::hash::DagHash;

/// Variable holding the value `name` had before the root `hash` overwrote it.
pub fn prior_var(hash: &DagHash, name: &str) -> String {
  format!("{PRIOR_VAR_PREFIX}{}_{name}", hash.short())
}

fn stash_prefix(hash: &DagHash) -> String {
  format!("{PRIOR_VAR_PREFIX}{}_", hash.short())
}

/// Plans loads and unloads against one installation database.
pub struct Engine<'a, D: ?Sized, H: ?Sized> {
  db: &'a D,
  hook: &'a H,
  inspector: PrefixInspector,
  first_policy: FirstPolicy,
}

impl<'a, D, H> Engine<'a, D, H>
where
  D: InstalledSpecs + ?Sized,
  H: RunEnvHook + ?Sized,
{
  pub fn new(db: &'a D, hook: &'a H, config: &Config) -> Self {
    Self {
      db,
      hook,
      inspector: config.inspector(),
      first_policy: config.first_policy,
    }
  }

  /// Every operation loading `root` performs, dependencies first.
  ///
  /// For each spec of the runtime closure the prefix inspections come
  /// first, then whatever the hook adds.
  pub fn plan(&self, root: &InstalledSpec, missing: MissingPolicy) -> Result<MutationSet, ActivateError> {
    debug!(phase = %Phase::Planning, root = %root.spec, "planning");
    let mut plan = MutationSet::new();
    for installed in runtime_closure(root, self.db, missing)? {
      plan.merge(self.inspector.inspect(&installed.spec.prefix));
      self.hook.setup_run_environment(installed, &mut plan)?;
    }
    Ok(plan)
  }

  /// Plan loading every root named by `queries` into `env`.
  ///
  /// A root that is already loaded is unloaded first, so loading twice
  /// leaves the environment as loading once.
  pub fn load(&self, queries: &[Query], options: &LoadOptions, env: &EnvSnapshot) -> Result<Activation, ActivateError> {
    let dialect = select_dialect(options.dialect, env)?;

    debug!(phase = %Phase::Resolving, queries = queries.len(), "resolving");
    let roots = queries
      .iter()
      .map(|query| resolve::installed(self.db, query, options.first, self.first_policy))
      .collect::<Result<Vec<_>, _>>()?;

    let mut ledger = Ledger::read(env);
    let mut working = env.clone();
    let mut mutations = MutationSet::new();

    for root in &roots {
      let hash = &root.spec.hash;
      let plan = self.plan(root, MissingPolicy::Error)?;

      if ledger.contains(hash) {
        info!(root = %root.spec, "already loaded, reloading");
        let undo = undo_plan(hash, &plan, &working);
        stage(&mut working, &mut mutations, undo);
      }

      let stash = capture_priors(hash, &plan, &working);
      stage(&mut working, &mut mutations, stash);
      stage(&mut working, &mut mutations, plan);
      ledger.add(hash.clone());
      info!(root = %root.spec, "loaded");
    }

    mutations.push(ledger.to_op());
    let hashes = roots.iter().map(|root| root.spec.hash.clone()).collect();
    Ok(finish(dialect, hashes, &mutations, env))
  }

  /// Plan unloading `target` from `env`.
  pub fn unload(
    &self,
    target: &UnloadTarget,
    dialect: Option<Dialect>,
    env: &EnvSnapshot,
  ) -> Result<Activation, ActivateError> {
    let dialect = select_dialect(dialect, env)?;
    let mut ledger = Ledger::read(env);

    debug!(phase = %Phase::Resolving, "resolving loaded roots");
    let mut targets: Vec<LoadedRoot<'a>> = match target {
      UnloadTarget::All => self.loaded_from(&ledger).into_iter().rev().collect(),
      UnloadTarget::Queries(queries) => queries
        .iter()
        .map(|query| resolve::loaded(self.db, &ledger, query))
        .collect::<Result<Vec<_>, _>>()?,
    };
    let mut seen = HashSet::new();
    targets.retain(|root| seen.insert(root.hash.clone()));

    let mut working = env.clone();
    let mut mutations = MutationSet::new();

    for root in &targets {
      let undo = match root.installed {
        Some(installed) => {
          let plan = self.plan(installed, MissingPolicy::Skip)?;
          undo_plan(&root.hash, &plan, &working)
        }
        None => {
          warn!(hash = %root.hash, "loaded package is no longer installed; only restoring saved variables");
          restore_stashed(&root.hash, &working)
        }
      };
      stage(&mut working, &mut mutations, undo);
      ledger.remove(&root.hash);
      info!(hash = %root.hash.short(), "unloaded");
    }

    mutations.push(ledger.to_op());
    let hashes = targets.into_iter().map(|root| root.hash).collect();
    Ok(finish(dialect, hashes, &mutations, env))
  }

  /// Roots loaded in `env`, oldest first.
  pub fn loaded(&self, env: &EnvSnapshot) -> Vec<LoadedRoot<'a>> {
    self.loaded_from(&Ledger::read(env))
  }

  fn loaded_from(&self, ledger: &Ledger) -> Vec<LoadedRoot<'a>> {
    ledger
      .iter()
      .map(|hash| LoadedRoot {
        hash: hash.clone(),
        installed: self.db.get(hash),
      })
      .collect()
  }
}

fn select_dialect(requested: Option<Dialect>, env: &EnvSnapshot) -> Result<Dialect, ActivateError> {
  requested
    .or_else(|| Dialect::from_integration(env))
    .ok_or(ActivateError::NoShellSupport)
}

fn stage(working: &mut EnvSnapshot, mutations: &mut MutationSet, set: MutationSet) {
  set.apply_to(working);
  mutations.merge(set);
}

fn finish(dialect: Dialect, roots: Vec<DagHash>, mutations: &MutationSet, env: &EnvSnapshot) -> Activation {
  let changes = mutations.resolve(env);
  debug!(phase = %Phase::Rendering, %dialect, variables = changes.len(), "rendering");
  let text = dialect.render(&changes);
  debug!(phase = %Phase::Done, "activation ready");
  Activation {
    dialect,
    roots,
    changes,
    text,
  }
}

/// Save the current value of every variable `plan` assigns or unsets, and
/// of path variables that are set but empty.
fn capture_priors(hash: &DagHash, plan: &MutationSet, working: &EnvSnapshot) -> MutationSet {
  let mut stash = MutationSet::new();
  for name in plan.touched() {
    let Some(value) = working.get(name) else {
      continue;
    };
    let absolute = plan.ops().iter().any(|op| op.name() == name && op.is_absolute());
    if absolute || value.is_empty() {
      stash.set(prior_var(hash, name), value);
    }
  }
  stash
}

/// The inverse of `plan`, restoring saved values and dropping the stash.
fn undo_plan(hash: &DagHash, plan: &MutationSet, working: &EnvSnapshot) -> MutationSet {
  let mut undo = plan.invert(working, |name| working.get(&prior_var(hash, name)).map(str::to_string));
  let prefix = stash_prefix(hash);
  for name in working.names_with_prefix(&prefix) {
    undo.unset(name);
  }
  undo
}

/// Restore whatever was saved for `hash` without knowing its plan.
fn restore_stashed(hash: &DagHash, working: &EnvSnapshot) -> MutationSet {
  let prefix = stash_prefix(hash);
  let mut restore = MutationSet::new();
  for stash in working.names_with_prefix(&prefix) {
    if let (Some(name), Some(value)) = (stash.strip_prefix(prefix.as_str()), working.get(stash)) {
      restore.set(name, value);
    }
    restore.unset(stash);
  }
  restore
}
