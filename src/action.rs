//! The action vocabulary: named operations bound to keys/buttons, each with
//! a fixed parameter type validated at binding load time.
use crate::error::{Error, Result};

/// Every action a binding can name. Mirrors the fixed table in the
/// configuration grammar (uppercased-hyphenated names, e.g. `SPLIT-HORIZONTALLY`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ActionCode {
    None,
    ReloadConfiguration,
    CloseWindow,
    MinimizeWindow,
    FocusWindow,
    InitiateMove,
    InitiateResize,
    NextWindow,
    PreviousWindow,
    RemoveFrame,
    ToggleTiling,
    TraverseFocus,
    ToggleFullscreen,
    SplitHorizontally,
    SplitVertically,
    MoveUp,
    MoveLeft,
    MoveRight,
    MoveDown,
    ShowWindowList,
    Run,
    ShowMessage,
    ShowMessageRun,
    ResizeBy,
    Quit,
}

impl ActionCode {
    /// The parameter shape the configuration loader must enforce for this code.
    pub fn parameter_kind(self) -> ParameterKind {
        use ActionCode::*;
        match self {
            Run | ShowMessage | ShowMessageRun => ParameterKind::String,
            ResizeBy => ParameterKind::Quad,
            _ => ParameterKind::Void,
        }
    }
}

/// The three parameter shapes an [ActionCode] can require.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParameterKind {
    Void,
    String,
    Quad,
}

/// The tagged parameter an [Action] carries. The action's code determines
/// which tag is legal; the loader validates this once at binding load time
/// so `do_action` can assume it already holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Void,
    String(String),
    /// `(left, top, right, bottom)`, used by `RESIZE-BY`.
    Quad(i32, i32, i32, i32),
}

/// One configured action: a code plus its validated parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub code: ActionCode,
    pub parameter: Value,
}

impl Action {
    /// Construct an action, checking that `parameter`'s shape matches what
    /// `code` requires.
    pub fn new(code: ActionCode, parameter: Value) -> Result<Self> {
        let kind = code.parameter_kind();
        let matches = matches!(
            (kind, &parameter),
            (ParameterKind::Void, Value::Void)
                | (ParameterKind::String, Value::String(_))
                | (ParameterKind::Quad, Value::Quad(..))
        );
        if !matches {
            return Err(Error::OperationInvalid(format!(
                "action {:?} requires a {:?} parameter",
                code, kind
            )));
        }
        Ok(Self { code, parameter })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_parameter_kind_is_rejected() {
        assert!(Action::new(ActionCode::Run, Value::Void).is_err());
        assert!(Action::new(ActionCode::Run, Value::String("st".into())).is_ok());
        assert!(Action::new(ActionCode::Quit, Value::Void).is_ok());
        assert!(Action::new(ActionCode::ResizeBy, Value::Quad(1, 2, 3, 4)).is_ok());
    }
}
