//! Built-in snippet set served whenever the external store cannot be reached.

use chrono::{DateTime, Utc};

use crate::domain::snippet::{distinct_sorted, Snippet, SnippetCriteria, SnippetDraft, TagField};

const REACT_USE_STATE: &str = r#"import { useState } from 'react';

function Counter() {
  const [count, setCount] = useState(0);

  return (
    <div>
      <p>Count: {count}</p>
      <button onClick={() => setCount(count + 1)}>+</button>
    </div>
  );
}"#;

const PYTHON_LIST_COMPREHENSION: &str = r#"# Create a list of squares for even numbers
numbers = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]
squares = [x**2 for x in numbers if x % 2 == 0]
print(squares)  # [4, 16, 36, 64, 100]"#;

const CSS_FLEX_CENTER: &str = r#".container {
  display: flex;
  justify-content: center;
  align-items: center;
  height: 100vh;
}"#;

const BASH_DEV_SETUP: &str = r#"#!/usr/bin/env bash
set -euo pipefail

sudo apt-get update
sudo apt-get install -y git curl build-essential
curl -fsSL https://deb.nodesource.com/setup_20.x | sudo -E bash -
sudo apt-get install -y nodejs"#;

const BASH_DEV_SETUP_DOC: &str = r#"# Developer machine bootstrap

Installs the base toolchain on a fresh Debian or Ubuntu box.

1. `set -euo pipefail` aborts on the first failing command.
2. Build tools and `curl` come from the distribution.
3. Node.js 20 is installed from the NodeSource repository.

Run it once as a user with `sudo` rights."#;

const YAML_CI_WORKFLOW: &str = r#"name: ci
on: [push, pull_request]

jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: actions/setup-node@v4
        with:
          node-version: 20
      - run: npm ci
      - run: npm test"#;

const YAML_CI_WORKFLOW_DOC: &str = r#"# Minimal CI workflow

Runs the test suite on every push and pull request.

- `npm ci` installs exactly what the lockfile pins.
- Bump `node-version` together with the production runtime."#;

const TS_DEBOUNCE: &str = r#"export function debounce<T extends (...args: any[]) => void>(fn: T, wait = 300) {
  let timer: ReturnType<typeof setTimeout> | undefined;
  return (...args: Parameters<T>) => {
    if (timer) clearTimeout(timer);
    timer = setTimeout(() => fn(...args), wait);
  };
}"#;

/// Snapshot of fixture records, in display order.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    snippets: Vec<Snippet>,
}

impl FixtureStore {
    /// The built-in fixture set, numbered `"1"`, `"2"`, ... and stamped with `now`.
    pub fn builtin() -> Self {
        Self::builtin_at(Utc::now())
    }

    pub fn builtin_at(at: DateTime<Utc>) -> Self {
        let snippets = Self::drafts()
            .into_iter()
            .enumerate()
            .map(|(idx, draft)| draft.into_snippet((idx + 1).to_string(), at))
            .collect();
        Self { snippets }
    }

    /// The fixture records as drafts, for seeding a fresh store.
    pub fn drafts() -> Vec<SnippetDraft> {
        vec![
            SnippetDraft::new("React useState Hook Example", "javascript", "react", REACT_USE_STATE),
            SnippetDraft::new(
                "Python List Comprehension",
                "python",
                "python",
                PYTHON_LIST_COMPREHENSION,
            ),
            SnippetDraft::new("CSS Flexbox Center", "css", "css", CSS_FLEX_CENTER),
            SnippetDraft::new("Developer Machine Setup", "bash", "setup", BASH_DEV_SETUP)
                .with_markdown(BASH_DEV_SETUP_DOC),
            SnippetDraft::new("GitHub Actions Node CI", "yaml", "automation", YAML_CI_WORKFLOW)
                .with_github_link("https://github.com/actions/starter-workflows")
                .with_markdown(YAML_CI_WORKFLOW_DOC),
            SnippetDraft::new("Debounce Helper", "typescript", "utils", TS_DEBOUNCE),
        ]
    }

    pub fn all(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn filter(&self, criteria: &SnippetCriteria) -> Vec<Snippet> {
        criteria.apply(&self.snippets)
    }

    /// Exact id lookup. Fixture ids are not UUIDs, so no format check applies here.
    pub fn find(&self, id: &str) -> Option<Snippet> {
        self.snippets.iter().find(|s| s.id == id).cloned()
    }

    pub fn distinct(&self, field: TagField) -> Vec<String> {
        distinct_sorted(self.snippets.iter().map(|s| s.tag(field).to_string()))
    }
}
