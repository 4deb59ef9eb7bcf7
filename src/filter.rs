//! Name-based selection of reporting scopes.
//!
//! An [`IgnoreList`] holds a set of interface names and a sense flag. With the
//! default sense the list is a deny list: every listed name is skipped. With
//! the sense inverted the list becomes an allow list: only listed names pass.
//!
//! An empty list never skips anything.

/// Case-sensitive allow/deny list of scope names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    patterns: Vec<String>,
    invert: bool,
}

impl IgnoreList {
    /// Creates an empty list with the given sense.
    ///
    /// # Arguments
    ///
    /// * `invert` - `false` for a deny list, `true` for an allow list.
    pub fn new(invert: bool) -> Self {
        Self {
            patterns: Vec::new(),
            invert,
        }
    }

    /// Adds every pattern and sets the sense flag in one call.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp6_monitor::filter::IgnoreList;
    ///
    /// let mut list = IgnoreList::default();
    /// list.configure(["eth1"], false);
    /// assert!(list.matches("eth1"));
    /// assert!(!list.matches("eth0"));
    /// ```
    pub fn configure<I, S>(&mut self, patterns: I, invert: bool)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            self.add(pattern);
        }
        self.set_invert(invert);
    }

    /// Adds a single pattern. Patterns already present are not stored twice.
    pub fn add(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }

    /// Sets the sense of the list.
    ///
    /// # Arguments
    ///
    /// * `invert` - `false` to skip listed names, `true` to skip unlisted names.
    pub fn set_invert(&mut self, invert: bool) {
        self.invert = invert;
    }

    /// Returns `true` if the list is an allow list.
    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Returns `true` if no pattern was added. An empty list skips nothing.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns the patterns in the order they were added.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns `true` if the scope `name` should be skipped.
    ///
    /// The decision is `listed(name) XOR invert`, except that an empty list
    /// and an empty name never cause a skip.
    pub fn matches(&self, name: &str) -> bool {
        if self.patterns.is_empty() || name.is_empty() {
            return false;
        }

        let listed = self.patterns.iter().any(|p| p == name);
        listed ^ self.invert
    }
}
