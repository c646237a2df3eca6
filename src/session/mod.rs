//! Interactive console session
//!
//! Holds at most one tree at a time and turns [`Command`]s into text.
//! A failed command never changes the tree; its error message tells the
//! user to try again.

mod command;

pub use command::{Command, CommandError};

use thiserror::Error;

use crate::config::TreeConfig;
use crate::persistence::{JsonStore, PersistError};
use crate::render::{legend, TreeRenderer};
use crate::tree::SegmentTree;

/// Errors reported back to the user by [`Session::execute`]
#[derive(Debug, Error)]
pub enum SessionError {
    /// Input could not be parsed
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Command needs a tree but none was built yet
    #[error("no segment tree yet; run 'auto' or 'init' first")]
    NoTree,

    /// Too many initial values
    #[error("at most {max} values can be entered, got {got}; please try entering again")]
    TooManyValues {
        /// Leaf count
        max: usize,
        /// Values supplied
        got: usize,
    },

    /// Position or range outside `1..=L`, or reversed
    #[error("invalid range {left}..={right} (valid positions are 1 to {leaf_count}); please try entering again")]
    InvalidRange {
        /// First position entered
        left: usize,
        /// Last position entered
        right: usize,
        /// Leaf count
        leaf_count: usize,
    },

    /// Store could not be read or written
    #[error("unable to access saved tree: {0}")]
    Store(#[from] PersistError),
}

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text and keep reading commands
    Continue(String),

    /// Stop the session
    Quit,
}

/// Console session state
#[derive(Debug)]
pub struct Session {
    config: TreeConfig,
    renderer: TreeRenderer,
    store: JsonStore,
    tree: Option<SegmentTree>,
}

impl Session {
    /// Start a session without a tree
    pub fn new(config: TreeConfig) -> Self {
        Self {
            renderer: config.renderer(),
            store: JsonStore::new(config.store_path.clone()),
            config,
            tree: None,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Current tree, if one was built or loaded
    pub fn tree(&self) -> Option<&SegmentTree> {
        self.tree.as_ref()
    }

    /// Parse and execute one line; errors become retry messages
    pub fn run_line(&mut self, line: &str) -> Outcome {
        let result = Command::parse(line)
            .map_err(SessionError::from)
            .and_then(|command| self.execute(command));

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::debug!(line, error = %err, "rejected command");
                Outcome::Continue(format!("\n{}", err))
            }
        }
    }

    /// Execute a parsed command
    pub fn execute(&mut self, command: Command) -> Result<Outcome, SessionError> {
        let leaf_count = self.config.leaf_count;

        let message = match command {
            Command::Quit => return Ok(Outcome::Quit),
            Command::Help => return Ok(Outcome::Continue(Command::usage(leaf_count))),
            Command::Show => None,
            Command::Auto => {
                let values: Vec<i32> = (1..=leaf_count as i32).collect();
                self.replace_tree(&values);
                None
            }
            Command::Init(mut values) => {
                if values.len() > leaf_count {
                    return Err(SessionError::TooManyValues {
                        max: leaf_count,
                        got: values.len(),
                    });
                }
                values.resize(leaf_count, 0);
                self.replace_tree(&values);
                None
            }
            Command::Query { left, right } => {
                let tree = self.tree.as_mut().ok_or(SessionError::NoTree)?;
                let (l, r) = zero_based_range(left, right, tree.leaf_count())?;
                let result = tree.range_query(l, r);
                Some(format!("Sum/Product of the specified range = {}", result))
            }
            Command::Update { position, value } => {
                let tree = self.tree.as_mut().ok_or(SessionError::NoTree)?;
                let (index, _) = zero_based_range(position, position, tree.leaf_count())?;
                tree.update(index, value);
                Some("Updated value!".to_string())
            }
            Command::Flip => {
                let tree = self.tree.as_mut().ok_or(SessionError::NoTree)?;
                let merge_fn = tree.flip_merge_fn();
                Some(format!("Updated merge function to {}!", merge_fn))
            }
            Command::Save => {
                let tree = self.tree.as_ref().ok_or(SessionError::NoTree)?;
                self.store.write(tree)?;
                Some(format!("Saved current tree to {}", self.store.path().display()))
            }
            Command::Load => {
                let tree = self.store.read()?;
                if tree.leaf_count() != leaf_count {
                    tracing::warn!(
                        stored = tree.leaf_count(),
                        configured = leaf_count,
                        "saved tree has a different leaf count"
                    );
                }
                self.tree = Some(tree);
                Some("Loaded saved tree successfully!".to_string())
            }
        };

        let mut text = message.map(|m| format!("\n{}\n", m)).unwrap_or_default();
        text.push_str(&self.display_tree()?);
        Ok(Outcome::Continue(text))
    }

    /// Header, rendered tree and legend; consumes the highlights
    pub fn display_tree(&mut self) -> Result<String, SessionError> {
        let tree = self.tree.as_mut().ok_or(SessionError::NoTree)?;
        let merge_fn = tree.merge_fn();
        let rendered = self.renderer.render(tree);
        Ok(format!(
            "\n\nSegment Tree (Current Merge fn: {} )\n\n{}\n{}\n",
            merge_fn,
            rendered,
            legend()
        ))
    }

    fn replace_tree(&mut self, values: &[i32]) {
        self.tree = Some(SegmentTree::with_merge_fn(
            values,
            self.config.default_merge_fn,
        ));
    }
}

/// Convert a 1-based inclusive range to 0-based, rejecting bad input
fn zero_based_range(
    left: usize,
    right: usize,
    leaf_count: usize,
) -> Result<(usize, usize), SessionError> {
    if left == 0 || left > right || right > leaf_count {
        return Err(SessionError::InvalidRange {
            left,
            right,
            leaf_count,
        });
    }
    Ok((left - 1, right - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{strip_ansi, ColorStyle};

    fn session() -> Session {
        Session::new(
            TreeConfig::default()
                .with_leaf_count(8)
                .with_color_style(ColorStyle::Plain),
        )
    }

    fn text(outcome: Outcome) -> String {
        match outcome {
            Outcome::Continue(text) => text,
            Outcome::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_auto_then_query() {
        let mut session = session();
        let shown = text(session.run_line("auto"));
        assert!(shown.contains("Current Merge fn: Addition"));

        let answer = text(session.run_line("query 1 8"));
        assert!(answer.contains("Sum/Product of the specified range = 36"));
    }

    #[test]
    fn test_init_pads_with_zeros() {
        let mut session = session();
        session.run_line("init 5 6");
        let tree = session.tree().expect("tree built");
        assert_eq!(tree.leaf_count(), 8);
        assert_eq!(tree.root().value, 11);
        assert_eq!(tree.leaf(7).value, 0);
    }

    #[test]
    fn test_errors_leave_state_untouched() {
        let mut session = session();
        assert!(text(session.run_line("query 1 2")).contains("no segment tree"));

        session.run_line("auto");
        let before = session.tree().expect("tree").root().value;

        for line in ["query 3 2", "query 0 1", "update 9 1", "init 1 2 3 4 5 6 7 8 9", "bogus"] {
            let reply = text(session.run_line(line));
            assert!(!reply.contains("Segment Tree"), "{} should not render", line);
        }
        assert_eq!(session.tree().expect("tree").root().value, before);
    }

    #[test]
    fn test_update_and_flip() {
        let mut session = session();
        session.run_line("auto");
        session.run_line("update 1 2");
        assert_eq!(session.tree().expect("tree").root().value, 37);

        let reply = text(session.run_line("flip"));
        assert!(reply.contains("Updated merge function to Product!"));
        // 2 * 2 * 3 * ... * 8
        assert_eq!(session.tree().expect("tree").root().value, 80_640);
    }

    #[test]
    fn test_render_consumes_highlights() {
        let mut session = Session::new(TreeConfig::default().with_leaf_count(4));
        session.run_line("auto");
        let reply = text(session.run_line("query 2 3"));
        assert!(reply.contains("\u{1b}[41m"));
        assert!(strip_ansi(&reply).contains("Sum/Product of the specified range = 5"));

        let again = text(session.run_line("show"));
        assert!(!again.contains("\u{1b}[41m"));
    }

    #[test]
    fn test_quit() {
        assert_eq!(session().run_line("quit"), Outcome::Quit);
    }
}
