// src/forest/builder.rs

//! Build a [`Forest`] from `+`-prefixed definition lines.
//!
//! ```text
//! cmd1          job 1, root
//! +cmd2         job 2, runs after job 1
//! ++cmd3        job 3, runs after job 2
//! cmd4          job 4, root
//! +cmd5         job 5, runs after job 4
//! ```
//!
//! A line's parent is the most recently registered job one level up. The
//! "last job per depth" table is never trimmed, so a deeper line that
//! follows a new root attaches to whatever was last seen at its parent
//! depth, even in an earlier tree.

use tracing::debug;

use crate::config::ForestOptions;
use crate::errors::{JobmanError, Result};
use crate::forest::{Forest, JobId};

/// Incremental forest builder.
///
/// Lines may be fed from several sources in sequence; line numbers in
/// errors count every line pushed so far, including skipped ones.
#[derive(Debug)]
pub struct ForestBuilder {
    options: ForestOptions,
    forest: Forest,
    /// `last_at_depth[d]` is the most recent job registered at depth `d`.
    last_at_depth: Vec<Option<JobId>>,
    line_no: usize,
}

impl ForestBuilder {
    pub fn new(options: ForestOptions) -> Self {
        Self {
            options,
            forest: Forest::new(),
            last_at_depth: Vec::new(),
            line_no: 0,
        }
    }

    /// Parse a whole sequence of lines in one go.
    pub fn build<I, S>(options: ForestOptions, lines: I) -> Result<Forest>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = Self::new(options);
        builder.extend(lines)?;
        Ok(builder.finish())
    }

    pub fn extend<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.push_line(line.as_ref())?;
        }
        Ok(())
    }

    /// Parse one definition line.
    ///
    /// Returns the id of the registered job, or `None` for blank and comment
    /// lines.
    pub fn push_line(&mut self, line: &str) -> Result<Option<JobId>> {
        self.line_no += 1;
        let line = line.trim_end();

        if line.is_empty() || line.starts_with(self.options.comment) {
            return Ok(None);
        }

        let marker = self.options.marker;
        let depth = line.chars().take_while(|&c| c == marker).count();
        let command = &line[depth * marker.len_utf8()..];

        if let Some(max) = self.options.max_depth {
            if depth > max {
                return Err(JobmanError::DepthExceeded {
                    line: self.line_no,
                    depth,
                    max,
                });
            }
        }

        if command.is_empty() {
            return Err(JobmanError::EmptyCommand { line: self.line_no });
        }

        let parent = match depth {
            0 => None,
            d => match self.last_at_depth.get(d - 1).copied().flatten() {
                Some(parent) => Some(parent),
                None => {
                    return Err(JobmanError::DanglingDependency {
                        line: self.line_no,
                        depth,
                    });
                }
            },
        };

        let id = self.forest.register(command.to_string(), depth, parent);

        if self.last_at_depth.len() <= depth {
            self.last_at_depth.resize(depth + 1, None);
        }
        self.last_at_depth[depth] = Some(id);

        debug!(
            job = %id,
            depth,
            parent = ?parent.map(JobId::number),
            command,
            "registered job"
        );

        Ok(Some(id))
    }

    pub fn job_count(&self) -> usize {
        self.forest.len()
    }

    pub fn finish(self) -> Forest {
        debug!(jobs = self.forest.len(), "job forest complete");
        self.forest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::JobStatus;

    fn build(lines: &[&str]) -> Result<Forest> {
        ForestBuilder::build(ForestOptions::default(), lines.iter().copied())
    }

    fn id(number: usize) -> JobId {
        JobId::from_number(number).unwrap()
    }

    #[test]
    fn builds_nested_trees_from_markers() {
        let forest = build(&["cmd1", "+cmd2", "++cmd3", "cmd4", "+cmd5"]).unwrap();

        assert_eq!(forest.len(), 5);
        let commands: Vec<_> = forest.jobs().iter().map(|j| j.command()).collect();
        assert_eq!(commands, ["cmd1", "cmd2", "cmd3", "cmd4", "cmd5"]);

        let job = |n| forest.get(id(n)).unwrap();
        assert_eq!(job(1).dependents(), &[id(2)]);
        assert_eq!(job(2).dependents(), &[id(3)]);
        assert!(job(3).dependents().is_empty());
        assert_eq!(job(4).dependents(), &[id(5)]);

        assert_eq!(job(3).parent(), Some(id(2)));
        assert_eq!(job(3).depth(), 2);

        let statuses: Vec<_> = forest.jobs().iter().map(|j| j.status()).collect();
        assert_eq!(
            statuses,
            [
                JobStatus::Ready,
                JobStatus::Held,
                JobStatus::Held,
                JobStatus::Ready,
                JobStatus::Held
            ]
        );
        let roots: Vec<_> = forest.roots().map(|j| j.id()).collect();
        assert_eq!(roots, [id(1), id(4)]);
    }

    #[test]
    fn siblings_share_the_same_parent() {
        let forest = build(&["setup", "+a", "+b", "+c"]).unwrap();
        assert_eq!(forest.get(id(1)).unwrap().dependents(), &[id(2), id(3), id(4)]);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let forest = build(&["# header", "", "   ", "cmd1", "#+not a job", "+cmd2"]).unwrap();
        assert_eq!(forest.len(), 2);
        assert_eq!(forest.get(id(1)).unwrap().dependents(), &[id(2)]);
    }

    #[test]
    fn trims_trailing_whitespace_and_carriage_returns() {
        let forest = build(&["echo one  \r", "+echo two\t"]).unwrap();
        assert_eq!(forest.get(id(1)).unwrap().command(), "echo one");
        assert_eq!(forest.get(id(2)).unwrap().command(), "echo two");
    }

    #[test]
    fn dangling_dependency_is_rejected() {
        match build(&["# comment", "+orphan"]) {
            Err(JobmanError::DanglingDependency { line, depth }) => {
                assert_eq!(line, 2);
                assert_eq!(depth, 1);
            }
            other => panic!("expected DanglingDependency, got {other:?}"),
        }
    }

    #[test]
    fn skipping_a_level_is_rejected() {
        assert!(matches!(
            build(&["root", "++too deep"]),
            Err(JobmanError::DanglingDependency { line: 2, depth: 2 })
        ));
    }

    #[test]
    fn depth_cap_is_a_configuration_error() {
        let options = ForestOptions {
            max_depth: Some(1),
            ..ForestOptions::default()
        };
        let err = ForestBuilder::build(options, ["a", "+b", "++c"]).unwrap_err();
        assert!(matches!(
            err,
            JobmanError::DepthExceeded {
                line: 3,
                depth: 2,
                max: 1
            }
        ));
    }

    #[test]
    fn depth_is_unbounded_without_a_cap() {
        let lines: Vec<String> = (0..64).map(|d| format!("{}echo {d}", "+".repeat(d))).collect();
        let forest = ForestBuilder::build(ForestOptions::default(), &lines).unwrap();
        assert_eq!(forest.len(), 64);
        let deepest = forest.get(id(64)).unwrap();
        assert_eq!(deepest.depth(), 63);
        assert_eq!(deepest.parent(), Some(id(63)));
    }

    #[test]
    fn marker_only_line_is_rejected() {
        assert!(matches!(
            build(&["root", "+"]),
            Err(JobmanError::EmptyCommand { line: 2 })
        ));
    }

    #[test]
    fn stale_depth_entries_are_reused_across_trees() {
        // `++d` attaches to the most recent depth-1 job, which
        // lives in the first tree.
        let forest = build(&["a", "+b", "c", "++d"]).unwrap();
        assert_eq!(forest.get(id(4)).unwrap().parent(), Some(id(2)));
        assert_eq!(forest.get(id(2)).unwrap().dependents(), &[id(4)]);
        assert!(forest.get(id(3)).unwrap().dependents().is_empty());
    }

    #[test]
    fn incremental_feeding_continues_line_numbers() {
        let mut builder = ForestBuilder::new(ForestOptions::default());
        builder.extend(["first", "+second"]).unwrap();
        builder.push_line("").unwrap();
        assert_eq!(builder.job_count(), 2);

        match builder.push_line("+++gap") {
            Err(JobmanError::DanglingDependency { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected DanglingDependency, got {other:?}"),
        }
    }

    #[test]
    fn custom_marker_character() {
        let options = ForestOptions {
            marker: '>',
            ..ForestOptions::default()
        };
        let forest = ForestBuilder::build(options, ["a", ">b", "+c"]).unwrap();
        assert_eq!(forest.get(id(2)).unwrap().parent(), Some(id(1)));
        assert_eq!(forest.get(id(3)).unwrap().command(), "+c");
        assert_eq!(forest.get(id(3)).unwrap().parent(), None);
    }

    #[test]
    fn render_tree_matches_input_notation() {
        let forest = build(&["cmd1", "+cmd2", "++cmd3", "cmd4", "+cmd5", "+cmd6"]).unwrap();
        assert_eq!(
            forest.render_tree(),
            "cmd1 (ready)\n+cmd2 (held)\n++cmd3 (held)\ncmd4 (ready)\n+cmd5 (held)\n+cmd6 (held)\n"
        );
    }
}
