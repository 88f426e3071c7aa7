//! Jump targets for `break` and `continue`.
//!
//! Each enclosing loop owns one slot for its continue landing label, filled
//! by the first bare `continue` that targets it and emitted by the loop after
//! its body.

use crate::alloc::IdAllocator;
use crate::names::escape_ident;

#[derive(Debug)]
pub(crate) enum ControlFrame {
    Loop {
        /// JavaScript labels when the loop is the body of labeled statements
        labels: Vec<String>,
        continue_label: Option<String>,
    },
    Switch,
    /// Labeled statement that is not a loop
    Labeled(String),
    /// Function boundary introduced by try/catch/finally scaffolding
    Barrier,
}

/// How a `break` or `continue` is spelled in Lua.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Jump {
    Break,
    Goto(String),
    /// The target lies outside a try/catch/finally closure
    Blocked,
    Missing,
}

#[derive(Debug, Default)]
pub(crate) struct ControlStack {
    frames: Vec<ControlFrame>,
}

impl ControlStack {
    pub fn push(&mut self, frame: ControlFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<ControlFrame> {
        self.frames.pop()
    }

    pub fn break_target(&self, label: Option<&str>) -> Jump {
        for frame in self.frames.iter().rev() {
            match (frame, label) {
                (ControlFrame::Barrier, _) => return Jump::Blocked,
                (ControlFrame::Loop { .. } | ControlFrame::Switch, None) => return Jump::Break,
                (ControlFrame::Loop { labels, .. }, Some(wanted))
                    if labels.iter().any(|name| name == wanted) =>
                {
                    return Jump::Goto(format!("{}__After", escape_ident(wanted)))
                }
                (ControlFrame::Labeled(name), Some(wanted)) if name == wanted => {
                    return Jump::Goto(format!("{}__After", escape_ident(name)))
                }
                _ => {}
            }
        }
        Jump::Missing
    }

    /// Resolve a `continue`, allocating the loop's landing label on first use.
    pub fn continue_target(&mut self, label: Option<&str>, ids: &mut IdAllocator) -> Jump {
        for frame in self.frames.iter_mut().rev() {
            match frame {
                ControlFrame::Barrier => return Jump::Blocked,
                ControlFrame::Loop {
                    labels,
                    continue_label,
                } => match label {
                    None => {
                        let landing = continue_label.get_or_insert_with(|| ids.fresh("__Continue"));
                        return Jump::Goto(landing.clone());
                    }
                    Some(wanted) if labels.iter().any(|name| name == wanted) => {
                        return Jump::Goto(escape_ident(wanted))
                    }
                    Some(_) => {}
                },
                ControlFrame::Switch | ControlFrame::Labeled(_) => {}
            }
        }
        Jump::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loop_frame(labels: &[&str]) -> ControlFrame {
        ControlFrame::Loop {
            labels: labels.iter().map(|name| name.to_string()).collect(),
            continue_label: None,
        }
    }

    #[test]
    fn test_bare_continue_reuses_landing() {
        let mut ids = IdAllocator::new();
        let mut control = ControlStack::default();
        control.push(loop_frame(&[]));
        control.push(ControlFrame::Switch);

        let first = control.continue_target(None, &mut ids);
        let second = control.continue_target(None, &mut ids);
        assert_eq!(first, Jump::Goto("__Continue1".to_string()));
        assert_eq!(first, second);

        control.pop();
        match control.pop() {
            Some(ControlFrame::Loop { continue_label, .. }) => {
                assert_eq!(continue_label.as_deref(), Some("__Continue1"))
            }
            other => panic!("expected loop frame, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_loops_have_separate_slots() {
        let mut ids = IdAllocator::new();
        let mut control = ControlStack::default();
        control.push(loop_frame(&[]));
        control.push(loop_frame(&[]));
        assert_eq!(
            control.continue_target(None, &mut ids),
            Jump::Goto("__Continue1".to_string())
        );
        control.pop();
        assert_eq!(
            control.continue_target(None, &mut ids),
            Jump::Goto("__Continue2".to_string())
        );
    }

    #[test]
    fn test_labeled_targets() {
        let mut ids = IdAllocator::new();
        let mut control = ControlStack::default();
        control.push(loop_frame(&["outer"]));
        control.push(loop_frame(&[]));

        assert_eq!(control.break_target(None), Jump::Break);
        assert_eq!(
            control.break_target(Some("outer")),
            Jump::Goto("outer__After".to_string())
        );
        assert_eq!(
            control.continue_target(Some("outer"), &mut ids),
            Jump::Goto("outer".to_string())
        );
        assert_eq!(control.break_target(Some("missing")), Jump::Missing);
    }

    #[test]
    fn test_stacked_labels_share_a_loop() {
        let mut ids = IdAllocator::new();
        let mut control = ControlStack::default();
        control.push(ControlFrame::Labeled("skipped".to_string()));
        control.push(loop_frame(&["a", "b"]));
        assert_eq!(
            control.continue_target(Some("a"), &mut ids),
            Jump::Goto("a".to_string())
        );
        assert_eq!(
            control.continue_target(Some("b"), &mut ids),
            Jump::Goto("b".to_string())
        );
        assert_eq!(control.break_target(Some("a")), Jump::Goto("a__After".to_string()));
        assert_eq!(control.continue_target(Some("skipped"), &mut ids), Jump::Missing);
    }

    #[test]
    fn test_barrier_blocks_jumps() {
        let mut ids = IdAllocator::new();
        let mut control = ControlStack::default();
        control.push(loop_frame(&[]));
        control.push(ControlFrame::Barrier);
        assert_eq!(control.break_target(None), Jump::Blocked);
        assert_eq!(control.continue_target(None, &mut ids), Jump::Blocked);
    }

    #[test]
    fn test_continue_without_loop() {
        let mut ids = IdAllocator::new();
        let mut control = ControlStack::default();
        control.push(ControlFrame::Labeled("block".to_string()));
        assert_eq!(control.continue_target(None, &mut ids), Jump::Missing);
    }
}
