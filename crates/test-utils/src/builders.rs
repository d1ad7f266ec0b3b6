#![allow(dead_code)]

use std::path::PathBuf;

use runherd::exec::Task;

/// Argv vector for running a small shell snippet, for tests that need
/// controllable exit codes and delays.
pub fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

/// Builder for [`Task`] to simplify test setup.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(name: &str, argv: Vec<String>) -> Self {
        Self {
            task: Task::new(name, argv),
        }
    }

    /// A task that runs `sh -c <script>`.
    pub fn shell(name: &str, script: &str) -> Self {
        Self::new(name, sh(script))
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.task.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.task.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.task.tag = Some(tag.to_string());
        self
    }

    pub fn hint(mut self, hint: &str) -> Self {
        self.task.hint = Some(hint.to_string());
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}
