use std::collections::BTreeMap;

/// A point-in-time copy of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
  vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
  pub fn new() -> Self {
    Self::default()
  }

  /// Capture the environment of the current process.
  ///
  /// Variables whose name or value is not valid unicode are skipped.
  pub fn from_process() -> Self {
    std::env::vars_os()
      .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
      .collect()
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.vars.get(name).map(String::as_str)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.vars.contains_key(name)
  }

  pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.vars.insert(name.into(), value.into());
  }

  pub fn unset(&mut self, name: &str) {
    self.vars.remove(name);
  }

  /// Builder-style `set`, handy for fixtures.
  pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.set(name, value);
    self
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// Names of variables starting with `prefix`, in sorted order.
  pub fn names_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    self
      .vars
      .range(prefix.to_string()..)
      .map(|(k, _)| k.as_str())
      .take_while(move |k| k.starts_with(prefix))
  }

  pub fn len(&self) -> usize {
    self.vars.len()
  }

  pub fn is_empty(&self) -> bool {
    self.vars.is_empty()
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }
}
