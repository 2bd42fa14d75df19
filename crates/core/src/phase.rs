use thiserror::Error;

/// Lifecycle of one control.
///
/// ```text
/// Uninitialized -> Initializing -> Ready
///                       |     ^       |
///                       v     |       |
///                     Error --+-------+  (settings change / re-appear)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlPhase {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal control transition {from:?} -> {to:?}")]
pub struct IllegalTransition {
    pub from: ControlPhase,
    pub to: ControlPhase,
}

impl ControlPhase {
    pub fn can_transition_to(self, to: ControlPhase) -> bool {
        use ControlPhase::*;
        matches!(
            (self, to),
            (Uninitialized, Initializing)
                | (Initializing, Ready)
                | (Initializing, Error)
                | (Ready, Initializing)
                | (Error, Initializing)
        )
    }

    pub fn transition(&mut self, to: ControlPhase) -> Result<(), IllegalTransition> {
        if !self.can_transition_to(to) {
            return Err(IllegalTransition { from: *self, to });
        }
        *self = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ControlPhase::*;
    use super::*;

    #[test]
    fn happy_path_and_recovery() {
        let mut p = ControlPhase::default();
        p.transition(Initializing).unwrap();
        p.transition(Error).unwrap();
        p.transition(Initializing).unwrap();
        p.transition(Ready).unwrap();
        p.transition(Initializing).unwrap();
        assert_eq!(p, Initializing);
    }

    #[test]
    fn double_initialize_is_illegal() {
        let mut p = Initializing;
        let err = p.transition(Initializing).unwrap_err();
        assert_eq!(err.from, Initializing);
        assert_eq!(p, Initializing);
        assert!(!Uninitialized.can_transition_to(Ready));
        assert!(!Ready.can_transition_to(Error));
    }
}
